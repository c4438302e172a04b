use crate::capture::CaptureSource;
use crate::configure::DeviceSlot;
use crate::error::CaptureError;
use crate::output::{self, OutputSink};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Timestamp shared by every file of one snapshot run
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Outcome of one device's snapshot attempt
#[derive(Debug)]
pub enum CaptureOutcome {
    Saved { device: String, path: PathBuf },
    Failed { device: String, error: CaptureError },
}

impl CaptureOutcome {
    pub fn device(&self) -> &str {
        match self {
            Self::Saved { device, .. } | Self::Failed { device, .. } => device,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Saved { path, .. } => Some(path),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CaptureError> {
        match self {
            Self::Saved { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

impl fmt::Display for CaptureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved { device, path } => {
                write!(f, "Image for {} saved to {}", device, path.display())
            }
            Self::Failed { device, error } if error.is_acquisition() => {
                write!(f, "Failed to capture image from {}: {}", device, error)
            }
            Self::Failed { device, error } => {
                write!(f, "Error saving image for {}: {}", device, error)
            }
        }
    }
}

/// `capture_<timestamp>_<index>.<ext>`
pub fn snapshot_file_name(timestamp: &str, index: usize, extension: &str) -> String {
    format!("capture_{}_{}.{}", timestamp, index, extension)
}

/// Take one snapshot from every enumerated device and save it under `save_dir`
///
/// Returns exactly one outcome per slot, in enumeration order. See
/// [`capture_all_at`].
pub fn capture_all<D, S>(
    slots: &mut [DeviceSlot<D>],
    save_dir: &Path,
    sink: &S,
) -> Vec<CaptureOutcome>
where
    D: CaptureSource,
    S: OutputSink + ?Sized,
{
    capture_all_at(slots, save_dir, sink, Local::now().naive_local())
}

/// Like [`capture_all`], with the run timestamp supplied by the caller
///
/// `save_dir` is created if missing. A creation failure is only logged: the
/// per-device writes that follow will fail and be reported individually.
/// A device that yields no frame, or whose frame cannot be written, does
/// not stop the remaining devices from being captured. Rejected slots are
/// reported as [`CaptureError::NotConfigured`] and never touched. File
/// names carry the slot's enumeration index.
pub fn capture_all_at<D, S>(
    slots: &mut [DeviceSlot<D>],
    save_dir: &Path,
    sink: &S,
    taken_at: NaiveDateTime,
) -> Vec<CaptureOutcome>
where
    D: CaptureSource,
    S: OutputSink + ?Sized,
{
    let _span = tracing::debug_span!("capture_all", dir = %save_dir.display()).entered();

    if let Err(e) = std::fs::create_dir_all(save_dir) {
        tracing::warn!(
            "Failed to create save directory {}: {}",
            save_dir.display(),
            e
        );
    }

    let timestamp = taken_at.format(TIMESTAMP_FORMAT).to_string();
    let start = Instant::now();

    let outcomes: Vec<CaptureOutcome> = slots
        .iter_mut()
        .enumerate()
        .map(|(index, slot)| {
            let device_name = slot.name().to_string();
            let result = match slot {
                DeviceSlot::Ready(device) => {
                    let file_name = snapshot_file_name(&timestamp, index, sink.extension());
                    capture_one(device, sink, save_dir, &file_name)
                }
                DeviceSlot::Rejected(rejected) => {
                    Err(CaptureError::NotConfigured(rejected.error.to_string()))
                }
            };

            match result {
                Ok(path) => {
                    tracing::info!("Saved {} to {}", device_name, path.display());
                    CaptureOutcome::Saved {
                        device: device_name,
                        path,
                    }
                }
                Err(error) => {
                    tracing::warn!("Snapshot from {} failed: {}", device_name, error);
                    CaptureOutcome::Failed {
                        device: device_name,
                        error,
                    }
                }
            }
        })
        .collect();

    tracing::debug!(
        "Snapshot {} finished: {}/{} saved in {:.1}ms",
        timestamp,
        outcomes.iter().filter(|o| o.is_success()).count(),
        outcomes.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    outcomes
}

fn capture_one<D, S>(
    device: &mut D,
    sink: &S,
    save_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, CaptureError>
where
    D: CaptureSource,
    S: OutputSink + ?Sized,
{
    let frame = device
        .capture_frame()
        .map_err(CaptureError::Acquire)?
        .filter(|frame| frame.width() > 0 && frame.height() > 0)
        .ok_or(CaptureError::EmptyFrame)?;

    output::write_image(sink, &frame, save_dir, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure::Rejected;
    use crate::error::ConfigureError;
    use crate::output::JpegSink;
    use crate::resolution::Resolution;
    use anyhow::{bail, Result};
    use chrono::NaiveDate;
    use image::RgbImage;

    enum Behaviour {
        Frame,
        Empty,
        Broken,
    }

    struct StubCamera {
        name: &'static str,
        behaviour: Behaviour,
        captures: usize,
    }

    impl StubCamera {
        fn new(name: &'static str, behaviour: Behaviour) -> Self {
            Self {
                name,
                behaviour,
                captures: 0,
            }
        }
    }

    impl CaptureSource for StubCamera {
        fn name(&self) -> &str {
            self.name
        }

        fn supported_resolutions(&self) -> &[Resolution] {
            &[]
        }

        fn apply_resolution(&mut self, _resolution: Resolution) -> Result<()> {
            Ok(())
        }

        fn capture_frame(&mut self) -> Result<Option<RgbImage>> {
            self.captures += 1;
            match self.behaviour {
                Behaviour::Frame => Ok(Some(RgbImage::from_pixel(4, 3, image::Rgb([9, 9, 9])))),
                Behaviour::Empty => Ok(None),
                Behaviour::Broken => bail!("device unplugged"),
            }
        }

        fn resolution(&self) -> Option<Resolution> {
            None
        }
    }

    fn ready(devices: Vec<StubCamera>) -> Vec<DeviceSlot<StubCamera>> {
        devices.into_iter().map(DeviceSlot::from).collect()
    }

    fn taken_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap()
    }

    #[test]
    fn file_name_layout() {
        assert_eq!(
            snapshot_file_name("20240309_070501", 2, "jpg"),
            "capture_20240309_070501_2.jpg"
        );
    }

    #[test]
    fn one_outcome_per_device_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut devices = ready(vec![
            StubCamera::new("a", Behaviour::Frame),
            StubCamera::new("b", Behaviour::Empty),
            StubCamera::new("c", Behaviour::Broken),
            StubCamera::new("d", Behaviour::Frame),
        ]);

        let outcomes = capture_all_at(&mut devices, dir.path(), &JpegSink::default(), taken_at());

        let names: Vec<_> = outcomes.iter().map(|o| o.device()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert!(devices
            .iter()
            .all(|slot| matches!(slot, DeviceSlot::Ready(d) if d.captures == 1)));

        assert_eq!(
            outcomes[0].path(),
            Some(dir.path().join("capture_20240309_070501_0.jpg").as_path())
        );
        assert!(matches!(outcomes[1].error(), Some(CaptureError::EmptyFrame)));
        assert!(matches!(outcomes[2].error(), Some(CaptureError::Acquire(_))));
        assert_eq!(
            outcomes[3].path(),
            Some(dir.path().join("capture_20240309_070501_3.jpg").as_path())
        );
    }

    #[test]
    fn empty_frame_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut devices = ready(vec![StubCamera::new("b", Behaviour::Empty)]);

        capture_all_at(&mut devices, dir.path(), &JpegSink::default(), taken_at());

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn zero_sized_frame_counts_as_empty() {
        struct Blank;

        impl CaptureSource for Blank {
            fn name(&self) -> &str {
                "blank"
            }
            fn supported_resolutions(&self) -> &[Resolution] {
                &[]
            }
            fn apply_resolution(&mut self, _resolution: Resolution) -> Result<()> {
                Ok(())
            }
            fn capture_frame(&mut self) -> Result<Option<RgbImage>> {
                Ok(Some(RgbImage::new(0, 0)))
            }
            fn resolution(&self) -> Option<Resolution> {
                None
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let outcomes = capture_all_at(
            &mut [DeviceSlot::Ready(Blank)],
            dir.path(),
            &JpegSink::default(),
            taken_at(),
        );

        assert!(matches!(outcomes[0].error(), Some(CaptureError::EmptyFrame)));
    }

    #[test]
    fn messages_follow_outcome_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut devices = ready(vec![
            StubCamera::new("Front Cam", Behaviour::Frame),
            StubCamera::new("Rear Cam", Behaviour::Empty),
        ]);

        let outcomes = capture_all_at(&mut devices, dir.path(), &JpegSink::default(), taken_at());

        assert!(outcomes[0]
            .to_string()
            .starts_with("Image for Front Cam saved to "));
        assert_eq!(
            outcomes[1].to_string(),
            "Failed to capture image from Rear Cam: Image is null"
        );
    }

    #[test]
    fn unwritable_directory_fails_every_frame_but_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let mut devices = ready(vec![
            StubCamera::new("a", Behaviour::Frame),
            StubCamera::new("b", Behaviour::Frame),
        ]);

        let outcomes = capture_all_at(&mut devices, &blocked, &JpegSink::default(), taken_at());

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(matches!(outcome.error(), Some(CaptureError::Write { .. })));
            assert!(outcome.to_string().starts_with("Error saving image for "));
        }
    }

    #[test]
    fn rejected_slot_keeps_its_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut slots = vec![
            DeviceSlot::Ready(StubCamera::new("a", Behaviour::Frame)),
            DeviceSlot::Rejected(Rejected {
                device: "b".to_string(),
                error: ConfigureError::NoModes,
            }),
            DeviceSlot::Ready(StubCamera::new("c", Behaviour::Frame)),
        ];

        let outcomes = capture_all_at(&mut slots, dir.path(), &JpegSink::default(), taken_at());

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            outcomes[1].error(),
            Some(CaptureError::NotConfigured(_))
        ));
        assert!(outcomes[1]
            .to_string()
            .starts_with("Failed to capture image from b: device was not configured"));
        assert_eq!(
            outcomes[2].path(),
            Some(dir.path().join("capture_20240309_070501_2.jpg").as_path())
        );
    }
}
