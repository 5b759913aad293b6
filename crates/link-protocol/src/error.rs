//! Wire Protocol Error Types

use thiserror::Error;

/// Errors raised while decoding a request frame.
///
/// On a noisy serial link these are expected conditions: the link task
/// drops the offending frame and keeps reading, it never escalates.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// First byte was not the frame header
    #[error("bad frame header: expected AA, got {0:02X}")]
    BadHeader(u8),

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}
