use super::{rgb_frame, CaptureSource};
use crate::resolution::Resolution;
use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// A webcam opened through the native camera backend
pub struct WebcamCapture {
    camera: Camera,
    name: String,
    supported: Vec<Resolution>,
    active: Option<Resolution>,
}

impl WebcamCapture {
    pub fn open(index: CameraIndex, name: String) -> Result<Self> {
        tracing::info!("Opening webcam {}", name);

        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let mut camera = Camera::new(index, requested).context("Failed to open camera")?;

        let formats = camera
            .compatible_camera_formats()
            .context("Failed to query camera formats")?;

        // Formats repeat per frame rate and pixel format; keep each size once
        let mut supported: Vec<Resolution> = Vec::new();
        for format in formats {
            let res = format.resolution();
            let res = Resolution::new(res.width(), res.height());
            if !supported.contains(&res) {
                supported.push(res);
            }
        }

        tracing::debug!("{} supports {} resolutions", name, supported.len());

        Ok(Self {
            camera,
            name,
            supported,
            active: None,
        })
    }
}

/// Open every camera the native backend reports
///
/// Cameras that cannot be opened are logged and skipped.
pub fn enumerate_webcams() -> Result<Vec<WebcamCapture>> {
    let cameras = nokhwa::query(ApiBackend::Auto).context("Failed to query cameras")?;

    tracing::info!("Found {} camera(s)", cameras.len());

    let mut opened = Vec::with_capacity(cameras.len());
    for info in cameras {
        let name = info.human_name();
        match WebcamCapture::open(info.index().clone(), name.clone()) {
            Ok(webcam) => opened.push(webcam),
            Err(e) => tracing::warn!("Skipping camera {}: {:#}", name, e),
        }
    }

    Ok(opened)
}

impl CaptureSource for WebcamCapture {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_resolutions(&self) -> &[Resolution] {
        &self.supported
    }

    fn apply_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.camera
            .set_resolution(nokhwa::utils::Resolution::new(
                resolution.width,
                resolution.height,
            ))
            .with_context(|| format!("Camera rejected {}", resolution))?;

        if !self.camera.is_stream_open() {
            self.camera
                .open_stream()
                .context("Failed to open camera stream")?;
        }

        self.active = Some(resolution);
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Option<RgbImage>> {
        let frame = self.camera.frame().context("Failed to capture frame")?;

        if frame.buffer().is_empty() {
            return Ok(None);
        }

        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode frame")?;

        // Rebuild through raw bytes so nokhwa's image version does not leak out
        let (width, height) = (decoded.width(), decoded.height());
        rgb_frame(width, height, decoded.into_raw()).map(Some)
    }

    fn resolution(&self) -> Option<Resolution> {
        self.active
    }
}
