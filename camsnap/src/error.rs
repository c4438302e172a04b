use std::path::PathBuf;

use thiserror::Error;

use crate::resolution::Resolution;

// Causes are folded into each message rather than exposed through
// `Error::source`, so chain-printing reporters show them once.

/// Why a device was left out of the configured set
#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error("device reports no supported resolutions")]
    NoModes,
    #[error("failed to apply {resolution}: {reason:#}")]
    Apply {
        resolution: Resolution,
        reason: anyhow::Error,
    },
}

/// Why a single device produced no snapshot file
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Image is null")]
    EmptyFrame,
    #[error("device was not configured ({0})")]
    NotConfigured(String),
    #[error("frame acquisition failed: {0:#}")]
    Acquire(anyhow::Error),
    #[error("failed to encode {path}: {reason}")]
    Encode {
        path: PathBuf,
        reason: image::ImageError,
    },
    #[error("failed to write {path}: {reason}")]
    Write {
        path: PathBuf,
        reason: std::io::Error,
    },
}

impl CaptureError {
    /// Frame-side failures happen before any file is touched
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            Self::EmptyFrame | Self::NotConfigured(_) | Self::Acquire(_)
        )
    }
}
