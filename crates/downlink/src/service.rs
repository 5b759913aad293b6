//! Service Coordinator
//!
//! Owns the shared image ring and runs the two link roles against it.
//! Both roles take the same lock for their entire critical section, so
//! every ring mutation is atomic from the other role's perspective: an
//! install is never observed half-applied by the consumer, a drain step
//! never half-applied by the producer.

use crate::capture::CaptureTask;
use crate::config::DownlinkConfig;
use crate::consumer::LinkConsumer;
use crate::error::DownlinkError;
use camera_capture::FrameSource;
use image_ring::ImageRing;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tracing::info;

/// Ring shared between the capture and link roles under one lock
pub type SharedRing = Arc<Mutex<ImageRing>>;

/// Wires the capture producer and the link consumer to one ring
pub struct DownlinkService {
    config: DownlinkConfig,
    source: Box<dyn FrameSource>,
}

impl DownlinkService {
    /// Create a service from validated configuration and a frame source
    pub fn new(config: DownlinkConfig, source: Box<dyn FrameSource>) -> Self {
        Self { config, source }
    }

    /// Run both roles until one stops.
    ///
    /// On a real serial link neither role returns; the service ends only
    /// when a role fails, or on end-of-stream with test transports.
    pub async fn run<T>(self, transport: T) -> Result<(), DownlinkError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let ring: SharedRing = Arc::new(Mutex::new(ImageRing::new(self.config.ring_capacity)));
        info!(capacity = self.config.ring_capacity, "image ring allocated");

        let capture = CaptureTask::new(
            self.source,
            ring.clone(),
            Duration::from_millis(self.config.frame_delay_ms),
            self.config.skip_undrained,
        );
        let consumer = LinkConsumer::new(transport, ring);

        tokio::select! {
            result = capture.run() => result,
            result = consumer.run() => result,
        }
    }
}
