//! Downlink Error Types

use camera_capture::CameraError;
use thiserror::Error;

/// Errors that terminate a downlink role.
///
/// Malformed requests and short reads are not represented here: those are
/// soft conditions resolved inside the link loop. Only transport failures
/// and construction-time problems surface as errors.
#[derive(Debug, Error)]
pub enum DownlinkError {
    /// Transport read or write failed
    #[error("transport i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Frame source failed to produce an image
    #[error("capture error: {0}")]
    Capture(#[from] CameraError),
}
