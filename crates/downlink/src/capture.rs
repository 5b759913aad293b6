//! Capture Role
//!
//! On a fixed cadence, obtains a compressed image from the capture
//! collaborator and installs it into the ring at the cursor. The whole
//! install is one critical section on the shared ring; cursor advancement
//! is exclusively the consumer's job.

use crate::error::DownlinkError;
use crate::service::SharedRing;
use camera_capture::FrameSource;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// The capture role: periodic producer of ring images
pub struct CaptureTask {
    source: Box<dyn FrameSource>,
    ring: SharedRing,
    frame_delay: Duration,
    skip_undrained: bool,
}

impl CaptureTask {
    /// Create the capture role over a shared ring
    pub fn new(
        source: Box<dyn FrameSource>,
        ring: SharedRing,
        frame_delay: Duration,
        skip_undrained: bool,
    ) -> Self {
        Self {
            source,
            ring,
            frame_delay,
            skip_undrained,
        }
    }

    /// Capture images for the life of the process
    pub async fn run(mut self) -> Result<(), DownlinkError> {
        info!(
            delay_ms = self.frame_delay.as_millis() as u64,
            skip_undrained = self.skip_undrained,
            "capture task started"
        );
        loop {
            sleep(self.frame_delay).await;
            self.tick().await?;
        }
    }

    /// One capture cycle: produce a frame and install it at the cursor.
    ///
    /// The default policy overwrites whatever occupies the slot, drained
    /// or not; with `skip_undrained` the fresh frame is dropped instead
    /// when undrained bytes would be lost.
    async fn tick(&mut self) -> Result<(), DownlinkError> {
        let frame = self.source.next_frame()?;
        let mut ring = self.ring.lock().await;

        if self.skip_undrained && ring.current().remaining() > 0 {
            debug!(slot = ring.cursor(), "slot still draining, frame dropped");
            return Ok(());
        }

        let cursor = ring.cursor();
        let discarded = ring.install_at(cursor, frame.bytes, frame.captured_at_ms);
        if discarded > 0 {
            warn!(discarded, slot = cursor, "overwrote undrained image bytes");
        }
        debug!(slot = cursor, bytes = ring.current().len(), "image installed");
        Ok(())
    }
}
