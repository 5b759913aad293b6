//! Frame Sources
//!
//! Everything the downlink needs from the capture side is one call:
//! "give me the next compressed frame and its timestamp". The sources
//! below implement that call without V4L2 hardware.

use crate::{CameraConfig, CameraError};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An already-compressed image handed over by the capture collaborator
#[derive(Debug, Clone)]
pub struct CompressedFrame {
    /// JPEG payload
    pub bytes: Vec<u8>,
    /// Capture timestamp (milliseconds since the epoch)
    pub captured_at_ms: u64,
}

/// Supplier of compressed frames, one per capture tick
pub trait FrameSource: Send {
    /// Produce the next compressed frame
    fn next_frame(&mut self) -> Result<CompressedFrame, CameraError>;
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Deterministic stand-in for the camera pipeline.
///
/// Renders a moving test pattern and JPEG-encodes it in memory at the
/// configured quality, so the downlink runs without capture hardware.
pub struct SyntheticCamera {
    config: CameraConfig,
    sequence: u32,
}

impl SyntheticCamera {
    /// Create a synthetic source from validated camera settings
    pub fn new(config: CameraConfig) -> Self {
        info!(
            width = config.width,
            height = config.height,
            quality = config.jpeg_quality,
            "synthetic frame source ready"
        );
        Self {
            config,
            sequence: 0,
        }
    }

    /// Diagonal RGB gradient shifted by the frame sequence number
    fn render_pattern(&self) -> Vec<u8> {
        let (w, h) = (self.config.width, self.config.height);
        let phase = self.sequence;
        let mut rgb = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                rgb.push(((x + phase) % 256) as u8);
                rgb.push(((y + phase) % 256) as u8);
                rgb.push((((x + y) / 2) % 256) as u8);
            }
        }
        rgb
    }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Result<CompressedFrame, CameraError> {
        let rgb = self.render_pattern();

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, self.config.jpeg_quality);
        encoder.encode(
            &rgb,
            self.config.width,
            self.config.height,
            ExtendedColorType::Rgb8,
        )?;

        self.sequence = self.sequence.wrapping_add(1);
        debug!(sequence = self.sequence, bytes = jpeg.len(), "frame encoded");

        Ok(CompressedFrame {
            bytes: jpeg,
            captured_at_ms: now_ms(),
        })
    }
}

/// Replays the JPEG files of a directory in name order, wrapping around.
///
/// Ground-test aid: feed the downlink a fixed set of real images instead
/// of a live camera.
pub struct ReplayCamera {
    files: Vec<PathBuf>,
    next: usize,
}

impl ReplayCamera {
    /// Scan `dir` for `.jpg`/`.jpeg` files; fails when none are present
    pub fn new(dir: &Path) -> Result<Self, CameraError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CameraError::Open(format!(
                "no jpeg files in {}",
                dir.display()
            )));
        }

        info!(count = files.len(), "replay frame source ready");
        Ok(Self { files, next: 0 })
    }
}

impl FrameSource for ReplayCamera {
    fn next_frame(&mut self) -> Result<CompressedFrame, CameraError> {
        let path = &self.files[self.next];
        self.next = (self.next + 1) % self.files.len();

        let bytes = std::fs::read(path)?;
        Ok(CompressedFrame {
            bytes,
            captured_at_ms: now_ms(),
        })
    }
}
