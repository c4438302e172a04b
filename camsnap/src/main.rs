use anyhow::{Context, Result};
use camsnap::output::DEFAULT_JPEG_QUALITY;
use camsnap::{
    CaptureOutcome, CaptureSource, DeviceSlot, JpegSink, Resolution, SaveLocation, Session,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maximum capture width
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Maximum capture height
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Directory snapshots are saved to
    /// Defaults to a WebcamCaptures folder in the pictures directory
    #[arg(short, long)]
    save_dir: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,

    /// List configured cameras and exit
    #[arg(long)]
    list: bool,

    /// Take a single snapshot and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

type Device = Box<dyn CaptureSource>;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cap = Resolution::new(args.width, args.height);
    let save_location = args
        .save_dir
        .map(SaveLocation::new)
        .unwrap_or_default();

    tracing::info!("camsnap starting");
    tracing::info!("Resolution cap: {}", cap);
    tracing::info!("Save directory: {}", save_location.get().display());

    let devices = open_devices().context("Failed to enumerate cameras")?;
    let mut session =
        Session::new(devices, save_location).with_sink(JpegSink::new(args.jpeg_quality));

    let configured = session.configure(cap).devices().count();
    if configured == 0 {
        tracing::warn!("No cameras could be configured");
    }

    if args.list {
        print_devices(&session);
        return Ok(());
    }

    if args.once {
        report(&session.capture_all());
        return Ok(());
    }

    run_interactive(&mut session)
}

#[cfg(feature = "webcam")]
fn open_devices() -> Result<Vec<Device>> {
    Ok(camsnap::capture::enumerate_webcams()?
        .into_iter()
        .map(|webcam| Box::new(webcam) as Device)
        .collect())
}

#[cfg(not(feature = "webcam"))]
fn open_devices() -> Result<Vec<Device>> {
    anyhow::bail!("camsnap was built without the `webcam` feature")
}

/// A line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Snapshot,
    SetDir(PathBuf),
    ShowDir,
    List,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "s" | "snap" | "snapshot" => Self::Snapshot,
            "d" | "dir" if !rest.is_empty() => Self::SetDir(PathBuf::from(rest)),
            "d" | "dir" | "p" | "pwd" => Self::ShowDir,
            "l" | "list" => Self::List,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        };
        Some(command)
    }
}

fn run_interactive(session: &mut Session<Device>) -> Result<()> {
    print_devices(session);
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;

        match Command::parse(&line) {
            None => continue,
            Some(Command::Snapshot) => report(&session.capture_all()),
            Some(Command::SetDir(dir)) => {
                println!("Save directory set to: {}", dir.display());
                session.set_save_directory(dir);
            }
            Some(Command::ShowDir) => {
                println!("Save directory: {}", session.save_directory().display())
            }
            Some(Command::List) => print_devices(session),
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => break,
            Some(Command::Unknown(input)) => eprintln!("Unknown command: {}", input),
        }
    }

    tracing::info!("camsnap exiting");
    Ok(())
}

fn print_devices(session: &Session<Device>) {
    let slots = session.devices().slots();
    if slots.is_empty() {
        println!("No cameras found");
    }

    for (index, slot) in slots.iter().enumerate() {
        match slot {
            DeviceSlot::Ready(device) => {
                let active = device
                    .resolution()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let modes: Vec<String> = device
                    .supported_resolutions()
                    .iter()
                    .map(|r| r.to_string())
                    .collect();
                println!(
                    "[{}] {} @ {} (supports {})",
                    index,
                    device.name(),
                    active,
                    modes.join(", ")
                );
            }
            DeviceSlot::Rejected(rejected) => {
                println!("[{}] {}: {}", index, rejected.device, rejected.error);
            }
        }
    }
}

fn print_help() {
    println!("Commands: s(nap), d(ir) <path>, p(wd), l(ist), h(elp), q(uit)");
}

/// Show one message per outcome, styled by outcome kind
fn report(outcomes: &[CaptureOutcome]) {
    if outcomes.is_empty() {
        println!("No cameras to capture from");
    }

    for outcome in outcomes {
        if outcome.is_success() {
            println!("Snapshot Captured: {}", outcome);
        } else {
            eprintln!("Capture Error: {}", outcome);
        }
    }
}
