#[cfg(feature = "webcam")]
mod webcam;

#[cfg(feature = "webcam")]
pub use webcam::{enumerate_webcams, WebcamCapture};

use anyhow::{Context, Result};
use image::RgbImage;

use crate::resolution::Resolution;

/// Trait for camera capture sources
///
/// Implemented by real webcams and by test doubles, so the configurator and
/// snapshot pipeline never need hardware.
pub trait CaptureSource {
    /// Human-readable device name
    fn name(&self) -> &str;

    /// Resolutions the device can run at, in the order the device reports them
    fn supported_resolutions(&self) -> &[Resolution];

    /// Switch the device to `resolution`
    fn apply_resolution(&mut self, resolution: Resolution) -> Result<()>;

    /// Capture a single frame
    ///
    /// `Ok(None)` means the device answered but delivered no image data.
    fn capture_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Currently active resolution, if one has been applied
    fn resolution(&self) -> Option<Resolution>;
}

impl<T: CaptureSource + ?Sized> CaptureSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supported_resolutions(&self) -> &[Resolution] {
        (**self).supported_resolutions()
    }

    fn apply_resolution(&mut self, resolution: Resolution) -> Result<()> {
        (**self).apply_resolution(resolution)
    }

    fn capture_frame(&mut self) -> Result<Option<RgbImage>> {
        (**self).capture_frame()
    }

    fn resolution(&self) -> Option<Resolution> {
        (**self).resolution()
    }
}

/// Wrap decoded RGB bytes in an image
///
/// Fails when the buffer length does not match `width * height * 3`.
pub fn rgb_frame(width: u32, height: u32, raw: Vec<u8>) -> Result<RgbImage> {
    let len = raw.len();
    RgbImage::from_raw(width, height, raw).with_context(|| {
        format!(
            "Decoded frame is {} bytes, too short for {}x{} RGB",
            len, width, height
        )
    })
}
