use super::OutputSink;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use std::io::Write;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Lossy JPEG encoder for snapshots
#[derive(Debug, Clone, Copy)]
pub struct JpegSink {
    quality: u8,
}

impl JpegSink {
    /// `quality` is clamped to 1..=100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegSink {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl OutputSink for JpegSink {
    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn encode(&self, frame: &RgbImage, out: &mut dyn Write) -> image::ImageResult<()> {
        let _span = tracing::debug_span!("encode_jpeg").entered();

        let mut encoder = JpegEncoder::new_with_quality(out, self.quality);
        encoder.encode(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
    }
}
