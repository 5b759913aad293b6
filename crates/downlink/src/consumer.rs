//! Link Consumer
//!
//! Serves ground-station requests: read exactly one 6-byte request per
//! transport read, decode it, drain the requested bytes from the record
//! at the ring cursor, and write the framed response back. Decode, drain
//! and respond happen inside a single critical section on the shared
//! ring, so the capture role never observes a half-applied drain step.

use crate::error::DownlinkError;
use crate::service::SharedRing;
use image_ring::ImageRing;
use link_protocol::{RequestFrame, ResponseFrame, REQUEST_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Apply one request against the ring.
///
/// Returns the response to send, or `None` when there is nothing to do:
/// nothing was requested, or the record at the cursor has no undrained
/// bytes. `None` leaves the ring untouched; it is the steady "waiting for
/// a new image" state, not an error.
///
/// When the request covers the whole remainder the payload is capped at
/// what is actually left (the device never pads) and the cursor advances;
/// a smaller request moves the drain offset forward and leaves the cursor
/// in place.
pub fn drain_step(request: RequestFrame, ring: &mut ImageRing) -> Option<ResponseFrame> {
    let requested = request.bytes_requested as usize;
    let remaining = ring.current().remaining();

    if requested == 0 || remaining == 0 {
        return None;
    }

    if requested >= remaining {
        let payload = ring.current_mut().drain(remaining);
        ring.advance_cursor();
        Some(ResponseFrame::new(request.bytes_requested, payload))
    } else {
        let payload = ring.current_mut().drain(requested);
        Some(ResponseFrame::new(request.bytes_requested, payload))
    }
}

/// The link role: an endless request/response loop over one transport
pub struct LinkConsumer<T> {
    transport: T,
    ring: SharedRing,
}

impl<T> LinkConsumer<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a consumer draining `ring` over `transport`
    pub fn new(transport: T, ring: SharedRing) -> Self {
        Self { transport, ring }
    }

    /// Serve requests until the transport closes.
    ///
    /// Runs for the life of the process on a real serial port; returning
    /// `Ok` on end-of-stream is only reachable with test transports.
    pub async fn run(mut self) -> Result<(), DownlinkError> {
        info!("link consumer started");
        let mut raw = [0u8; REQUEST_LEN];

        loop {
            // One read per frame. A fragmented request is dropped whole:
            // partial frames are never buffered across reads.
            let n = self.transport.read(&mut raw).await?;
            if n == 0 {
                info!("link transport closed");
                return Ok(());
            }
            if n != REQUEST_LEN {
                debug!(got = n, "short read, dropping");
                continue;
            }

            let mut ring = self.ring.lock().await;

            let request = match RequestFrame::decode(&raw) {
                Ok(request) => request,
                Err(reason) => {
                    debug!(%reason, "dropping malformed request");
                    continue;
                }
            };
            debug!(bytes_requested = request.bytes_requested, "request");

            if let Some(response) = drain_step(request, &mut ring) {
                self.transport.write_all(&response.encode()).await?;
                self.transport.flush().await?;
                debug!(
                    bytes_contained = response.bytes_contained(),
                    cursor = ring.cursor(),
                    "response sent"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_ring::ImageRing;
    use link_protocol::xor_checksum;
    use proptest::prelude::*;
    use std::sync::Arc;
    use tokio::io::duplex;
    use tokio::sync::Mutex;

    fn ring_with_image(capacity: usize, image: Vec<u8>) -> ImageRing {
        let mut ring = ImageRing::new(capacity);
        ring.install_at(0, image, 0);
        ring
    }

    #[test]
    fn test_partial_then_capped_drain() {
        let mut ring = ring_with_image(2, (0u8..10).collect());

        // First request takes 4 of 10 bytes; cursor stays put
        let response = drain_step(RequestFrame::new(4), &mut ring).unwrap();
        assert_eq!(response.bytes_contained(), 4);
        assert_eq!(response.payload, vec![0, 1, 2, 3]);
        assert_eq!(ring.current().drain_offset(), 4);
        assert_eq!(ring.cursor(), 0);

        // Second request wants 10 but only 6 remain: capped, cursor advances
        let response = drain_step(RequestFrame::new(10), &mut ring).unwrap();
        assert_eq!(response.bytes_requested, 10);
        assert_eq!(response.bytes_contained(), 6);
        assert_eq!(response.payload, vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(ring.cursor(), 1);
    }

    #[test]
    fn test_exact_request_drains_and_advances() {
        let mut ring = ring_with_image(2, vec![7; 16]);

        let response = drain_step(RequestFrame::new(16), &mut ring).unwrap();
        assert_eq!(response.bytes_contained(), 16);
        assert_eq!(ring.cursor(), 1);
    }

    #[test]
    fn test_empty_record_is_no_action() {
        let mut ring = ImageRing::new(2);
        assert!(drain_step(RequestFrame::new(100), &mut ring).is_none());
        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.current().drain_offset(), 0);
    }

    #[test]
    fn test_zero_request_is_no_action() {
        let mut ring = ring_with_image(2, vec![1, 2, 3]);
        assert!(drain_step(RequestFrame::new(0), &mut ring).is_none());
        assert_eq!(ring.current().remaining(), 3);
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn test_fully_drained_record_is_no_action() {
        let mut ring = ring_with_image(2, vec![1, 2, 3]);
        drain_step(RequestFrame::new(3), &mut ring).unwrap();

        // Cursor moved to the empty slot 1; nothing more to send
        assert!(drain_step(RequestFrame::new(3), &mut ring).is_none());
        assert_eq!(ring.cursor(), 1);
    }

    proptest! {
        #[test]
        fn prop_chunking_conserves_bytes(
            image in proptest::collection::vec(any::<u8>(), 1..2048),
            requests in proptest::collection::vec(0u16..600, 1..64),
        ) {
            let mut ring = ring_with_image(2, image.clone());
            let mut sent = Vec::new();
            let mut advances = 0;

            for requested in requests {
                let before = ring.current().remaining();
                let cursor_before = ring.cursor();

                match drain_step(RequestFrame::new(requested), &mut ring) {
                    Some(response) => {
                        // Cap invariant
                        prop_assert!(response.bytes_contained() as usize <= requested as usize);
                        prop_assert!(response.bytes_contained() as usize <= before);
                        sent.extend_from_slice(&response.payload);
                    }
                    None => {
                        prop_assert!(requested == 0 || before == 0);
                        prop_assert_eq!(ring.cursor(), cursor_before);
                    }
                }
                if ring.cursor() != cursor_before {
                    advances += 1;
                }
            }

            // Conservation: what went out is a prefix of the image, whole
            // image iff the cursor advanced, and it advanced exactly once
            prop_assert_eq!(&image[..sent.len()], &sent[..]);
            if advances > 0 {
                prop_assert_eq!(advances, 1);
                prop_assert_eq!(sent.len(), image.len());
            }
        }
    }

    #[tokio::test]
    async fn test_serves_requests_over_transport() {
        let ring: SharedRing = Arc::new(Mutex::new(ring_with_image(2, (0u8..10).collect())));
        let (device, mut ground) = duplex(256);
        let consumer = LinkConsumer::new(device, ring.clone());
        let server = tokio::spawn(consumer.run());

        ground
            .write_all(&RequestFrame::new(4).encode())
            .await
            .unwrap();

        let mut response = [0u8; 10]; // 5 header + 4 payload + checksum
        ground.read_exact(&mut response).await.unwrap();
        assert_eq!(response[0], 0xAA);
        assert_eq!(&response[1..3], &[0x00, 0x04]); // requested echo
        assert_eq!(&response[3..5], &[0x00, 0x04]); // contained
        assert_eq!(&response[5..9], &[0, 1, 2, 3]);
        assert_eq!(response[9], xor_checksum(&response[..9]));

        assert_eq!(ring.lock().await.current().drain_offset(), 4);

        // Closing the ground side ends the loop cleanly
        drop(ground);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_malformed_request_is_dropped_silently() {
        let ring: SharedRing = Arc::new(Mutex::new(ring_with_image(2, vec![9; 8])));
        let (device, mut ground) = duplex(256);
        let server = tokio::spawn(LinkConsumer::new(device, ring.clone()).run());

        // Corrupt checksum: no response, no state change
        let mut corrupt = RequestFrame::new(4).encode();
        corrupt[5] ^= 0x01;
        ground.write_all(&corrupt).await.unwrap();

        // A valid follow-up still gets served, proving the loop moved on
        ground
            .write_all(&RequestFrame::new(8).encode())
            .await
            .unwrap();

        let mut response = [0u8; 14]; // 5 + 8 + 1
        ground.read_exact(&mut response).await.unwrap();
        assert_eq!(&response[3..5], &[0x00, 0x08]);
        assert_eq!(&response[5..13], &[9; 8]);

        let ring = ring.lock().await;
        assert_eq!(ring.cursor(), 1); // advanced once, by the valid request
        drop(ring);

        drop(ground);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_fragment_dropped_without_reassembly() {
        let ring: SharedRing = Arc::new(Mutex::new(ring_with_image(2, vec![3; 5])));
        let (device, mut ground) = duplex(256);
        let server = tokio::spawn(LinkConsumer::new(device, ring.clone()).run());

        // Only half a request ever arrives; the fragment is discarded, not
        // held for the rest of the frame
        let request = RequestFrame::new(5).encode();
        ground.write_all(&request[..3]).await.unwrap();
        drop(ground);

        server.await.unwrap().unwrap();
        let ring = ring.lock().await;
        assert_eq!(ring.current().remaining(), 5);
        assert_eq!(ring.cursor(), 0);
    }

    #[tokio::test]
    async fn test_no_response_when_ring_empty() {
        let ring: SharedRing = Arc::new(Mutex::new(ImageRing::new(2)));
        let (device, mut ground) = duplex(256);
        let server = tokio::spawn(LinkConsumer::new(device, ring.clone()).run());

        ground
            .write_all(&RequestFrame::new(64).encode())
            .await
            .unwrap();

        // The consumer stays silent; only EOF ends the exchange
        drop(ground);
        server.await.unwrap().unwrap();

        let ring = ring.lock().await;
        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.current().drain_offset(), 0);
    }
}
