//! Downlink Configuration
//!
//! All startup values are validated before the service is constructed;
//! invalid values are fatal at startup, not recoverable at runtime.

use camera_capture::{CameraConfig, CameraError, FrameSourceKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("serial port path is empty")]
    SerialPort,

    #[error("baud rate must be greater than zero")]
    BaudRate,

    #[error("frame delay must be greater than zero")]
    FrameDelay,

    #[error("ring capacity must be at least 1")]
    RingCapacity,

    #[error("replay source requires replay_dir")]
    ReplayDir,

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Downlink service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkConfig {
    /// Serial device the ground link is attached to
    pub serial_port: String,
    /// Link baud rate (raw 8N1)
    pub baud_rate: u32,
    /// Delay between capture ticks in milliseconds
    pub frame_delay_ms: u64,
    /// Number of image records in the ring
    pub ring_capacity: usize,
    /// Drop a fresh frame instead of overwriting undrained image bytes
    pub skip_undrained: bool,
    /// Which collaborator supplies frames
    pub source: FrameSourceKind,
    /// Directory of JPEG files for the replay source
    pub replay_dir: Option<PathBuf>,
    /// Camera collaborator settings
    pub camera: CameraConfig,
}

impl Default for DownlinkConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyS0".to_string(),
            baud_rate: 460_800,
            frame_delay_ms: 200,
            ring_capacity: 8,
            skip_undrained: false,
            source: FrameSourceKind::Synthetic,
            replay_dir: None,
            camera: CameraConfig::default(),
        }
    }
}

impl DownlinkConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every startup value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_port.is_empty() {
            return Err(ConfigError::SerialPort);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::BaudRate);
        }
        if self.frame_delay_ms == 0 {
            return Err(ConfigError::FrameDelay);
        }
        if self.ring_capacity == 0 {
            return Err(ConfigError::RingCapacity);
        }
        if self.source == FrameSourceKind::Replay && self.replay_dir.is_none() {
            return Err(ConfigError::ReplayDir);
        }
        self.camera.validate()?;
        Ok(())
    }
}
