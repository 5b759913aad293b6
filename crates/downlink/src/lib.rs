//! Image Downlink Service
//!
//! Couples the two roles of the telemetry link: a capture task that
//! installs fresh compressed images into the shared ring on a fixed
//! cadence, and a link consumer that answers ground-station requests by
//! draining the ring chunk by chunk over the serial transport. Both roles
//! mutate the ring under one mutual-exclusion region each.

mod capture;
mod config;
mod consumer;
mod error;
mod service;
mod transport;

pub use capture::CaptureTask;
pub use config::{ConfigError, DownlinkConfig};
pub use consumer::{drain_step, LinkConsumer};
pub use error::DownlinkError;
pub use service::{DownlinkService, SharedRing};
pub use transport::open_serial;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(Level::INFO.to_string())),
        )
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
