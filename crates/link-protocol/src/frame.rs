//! Request and Response Frame Codecs
//!
//! Layouts (all multi-byte fields big-endian):
//!
//! Request, ground to device, fixed 6 bytes:
//!   `[0xAA][reqHi][reqLo][reserved][reserved][checksum]`
//!
//! Response, device to ground, `5 + bytes_contained + 1` bytes:
//!   `[0xAA][reqHi][reqLo][conHi][conLo][payload...][checksum]`
//!
//! The checksum byte is the XOR of every byte preceding it.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};

/// Frame header byte, first on the wire in both directions
pub const HEADER: u8 = 0xAA;

/// Fixed length of a ground-to-device request frame
pub const REQUEST_LEN: usize = 6;

/// Bytes a response frame adds around its payload (5 header bytes + checksum)
pub const RESPONSE_OVERHEAD: usize = 6;

/// XOR checksum over a byte range
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0x00, |acc, b| acc ^ b)
}

/// Ground-to-device request for the next chunk of the current image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFrame {
    /// Number of image bytes the ground station wants next
    pub bytes_requested: u16,
}

impl RequestFrame {
    /// Create a request for `bytes_requested` image bytes
    pub fn new(bytes_requested: u16) -> Self {
        Self { bytes_requested }
    }

    /// Decode a raw 6-byte request.
    ///
    /// Valid iff the first byte is [`HEADER`] and the XOR of bytes 0..5
    /// equals byte 5. Bytes 3-4 are reserved and not interpreted.
    pub fn decode(raw: &[u8; REQUEST_LEN]) -> Result<Self, FrameError> {
        if raw[0] != HEADER {
            return Err(FrameError::BadHeader(raw[0]));
        }
        let expected = xor_checksum(&raw[..REQUEST_LEN - 1]);
        if expected != raw[REQUEST_LEN - 1] {
            return Err(FrameError::ChecksumMismatch {
                expected,
                actual: raw[REQUEST_LEN - 1],
            });
        }
        Ok(Self {
            bytes_requested: u16::from_be_bytes([raw[1], raw[2]]),
        })
    }

    /// Encode this request as sent by the ground station
    pub fn encode(&self) -> [u8; REQUEST_LEN] {
        let mut raw = [0u8; REQUEST_LEN];
        raw[0] = HEADER;
        raw[1..3].copy_from_slice(&self.bytes_requested.to_be_bytes());
        // bytes 3-4 stay zeroed (reserved)
        raw[REQUEST_LEN - 1] = xor_checksum(&raw[..REQUEST_LEN - 1]);
        raw
    }
}

/// Device-to-ground response carrying a chunk of image payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFrame {
    /// Echo of the request field that produced this response
    pub bytes_requested: u16,
    /// Image payload, never longer than `bytes_requested`
    pub payload: Vec<u8>,
}

impl ResponseFrame {
    /// Create a response echoing `bytes_requested` and carrying `payload`
    pub fn new(bytes_requested: u16, payload: Vec<u8>) -> Self {
        debug_assert!(payload.len() <= bytes_requested as usize);
        Self {
            bytes_requested,
            payload,
        }
    }

    /// Actual payload length carried by this response
    pub fn bytes_contained(&self) -> u16 {
        self.payload.len() as u16
    }

    /// Encode this response for the wire.
    ///
    /// Pure function: no I/O, no shared state.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RESPONSE_OVERHEAD + self.payload.len());
        out.push(HEADER);
        out.extend_from_slice(&self.bytes_requested.to_be_bytes());
        out.extend_from_slice(&self.bytes_contained().to_be_bytes());
        out.extend_from_slice(&self.payload);
        out.push(xor_checksum(&out));
        out
    }
}
