use crate::capture::CaptureSource;
use crate::configure::{configure_device, Configured, DeviceSlot};
use crate::output::JpegSink;
use crate::resolution::Resolution;
use crate::save_dir::SaveLocation;
use crate::snapshot::{capture_all, CaptureOutcome};
use std::path::{Path, PathBuf};

/// A set of cameras plus the place their snapshots go
///
/// This is what a front-end drives: configure once, then take snapshots and
/// change the save directory as the user asks. Every enumerated camera keeps
/// its slot, so each snapshot reports on all of them.
pub struct Session<D> {
    devices: Configured<D>,
    save_location: SaveLocation,
    sink: JpegSink,
}

impl<D: CaptureSource> Session<D> {
    pub fn new(devices: Vec<D>, save_location: SaveLocation) -> Self {
        Self {
            devices: Configured::unconfigured(devices),
            save_location,
            sink: JpegSink::default(),
        }
    }

    pub fn with_sink(mut self, sink: JpegSink) -> Self {
        self.sink = sink;
        self
    }

    /// Configure every usable device for `cap`
    ///
    /// Devices rejected by an earlier pass stay rejected.
    pub fn configure(&mut self, cap: Resolution) -> &Configured<D> {
        let _span = tracing::debug_span!("configure", cap = %cap).entered();

        let slots = std::mem::replace(&mut self.devices, Configured::unconfigured(Vec::new()))
            .into_slots()
            .into_iter()
            .map(|slot| match slot {
                DeviceSlot::Ready(device) => configure_device(device, cap),
                rejected => rejected,
            })
            .collect();

        self.devices = Configured::from_slots(slots);
        &self.devices
    }

    /// Snapshot every device into the current save directory
    ///
    /// One outcome per enumerated device, rejected ones included.
    pub fn capture_all(&mut self) -> Vec<CaptureOutcome> {
        capture_all(
            self.devices.slots_mut(),
            self.save_location.get(),
            &self.sink,
        )
    }

    pub fn devices(&self) -> &Configured<D> {
        &self.devices
    }

    pub fn save_directory(&self) -> &Path {
        self.save_location.get()
    }

    pub fn set_save_directory(&mut self, dir: impl Into<PathBuf>) {
        self.save_location.set(dir);
    }
}
