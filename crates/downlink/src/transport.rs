//! Serial Transport
//!
//! The link rides on a raw byte stream; everything else in this crate is
//! generic over `AsyncRead + AsyncWrite`, so tests substitute an
//! in-memory duplex pipe for the port opened here.

use crate::error::DownlinkError;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

/// Open the link serial device in raw 8N1 mode at `baud_rate`.
///
/// Failure here is fatal at startup.
pub fn open_serial(path: &str, baud_rate: u32) -> Result<SerialStream, DownlinkError> {
    let stream = tokio_serial::new(path, baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()?;

    info!(port = path, baud = baud_rate, "serial link open");
    Ok(stream)
}
