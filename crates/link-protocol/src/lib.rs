//! Telemetry Link Wire Protocol
//!
//! Byte-exact framing for the ground/device image downlink. The ground
//! station sends fixed 6-byte requests asking for the next N bytes of
//! image data; the device answers with a variable-length response frame.
//! Both directions are guarded by a single-byte XOR checksum.

mod error;
mod frame;

pub use error::FrameError;
pub use frame::{xor_checksum, RequestFrame, ResponseFrame};
pub use frame::{HEADER, REQUEST_LEN, RESPONSE_OVERHEAD};
