//! Camera Capture Collaborator
//!
//! Supplies already-compressed frames to the downlink core, one per
//! capture tick. Camera hardware, pixel-format conversion and JPEG
//! compression all live behind the [`FrameSource`] seam; the sources here
//! stand in for that pipeline with an in-memory test pattern encoder and
//! a replay-from-disk source for ground testing.

pub mod source;

pub use source::{CompressedFrame, FrameSource, ReplayCamera, SyntheticCamera};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("failed to open frame source: {0}")]
    Open(String),

    #[error("invalid camera configuration: {0}")]
    Config(String),

    #[error("jpeg encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("frame read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Which collaborator supplies compressed frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSourceKind {
    /// In-memory test pattern, JPEG-encoded at the configured quality
    #[default]
    Synthetic,
    /// Cycle over the JPEG files of a directory
    Replay,
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// JPEG quality factor, 1-100
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            jpeg_quality: 80,
        }
    }
}

impl CameraConfig {
    /// Check startup values. Invalid settings are fatal at startup, never
    /// recoverable at runtime.
    pub fn validate(&self) -> Result<(), CameraError> {
        if self.device.is_empty() {
            return Err(CameraError::Config("camera device path is empty".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CameraError::Config("frame dimensions must be non-zero".into()));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(CameraError::Config(
                "jpeg quality must be between 1 and 100 inclusive".into(),
            ));
        }
        Ok(())
    }
}
