mod jpeg;

pub use jpeg::{JpegSink, DEFAULT_JPEG_QUALITY};

use crate::error::CaptureError;
use image::RgbImage;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Trait for still-image encoders
pub trait OutputSink {
    /// File extension for encoded images, without the dot
    fn extension(&self) -> &'static str;

    /// Encode a frame into `out`
    fn encode(&self, frame: &RgbImage, out: &mut dyn Write) -> image::ImageResult<()>;
}

/// Encode `frame` into `dir/file_name`
///
/// The image is written to a temporary file inside `dir` and renamed into
/// place once complete, so a failed encode or write never leaves a
/// truncated image behind. Returns the absolute path of the written file.
pub fn write_image<S: OutputSink + ?Sized>(
    sink: &S,
    frame: &RgbImage,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, CaptureError> {
    let target = dir.join(file_name);
    let write_err = |reason| CaptureError::Write {
        path: target.clone(),
        reason,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".capture")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(write_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        sink.encode(frame, &mut writer)
            .map_err(|reason| CaptureError::Encode {
                path: target.clone(),
                reason,
            })?;
        writer.flush().map_err(write_err)?;
    }

    // Second-resolution names collide when snapshots are taken in quick succession
    if target.exists() {
        tracing::warn!("Replacing existing snapshot {}", target.display());
    }

    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    Ok(std::path::absolute(&target).unwrap_or(target))
}
