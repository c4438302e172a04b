//! Multi-camera snapshot core.
//!
//! Enumerated cameras are configured at the largest resolution that fits a
//! cap, then snapshotted together into one directory with a shared
//! timestamp. Each camera succeeds or fails on its own.

pub mod capture;
pub mod configure;
pub mod error;
pub mod output;
pub mod resolution;
pub mod save_dir;
pub mod session;
pub mod snapshot;

pub use capture::CaptureSource;
pub use configure::{configure, Configured, DeviceSlot, Rejected};
pub use error::{CaptureError, ConfigureError};
pub use output::{JpegSink, OutputSink};
pub use resolution::{select_resolution, Resolution};
pub use save_dir::SaveLocation;
pub use session::Session;
pub use snapshot::{capture_all, capture_all_at, CaptureOutcome};
