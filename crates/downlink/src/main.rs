//! FlightCam Image Downlink - Main Entry Point

use anyhow::Context;
use camera_capture::{FrameSource, FrameSourceKind, ReplayCamera, SyntheticCamera};
use downlink::{init_logging, open_serial, DownlinkConfig, DownlinkService};
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== FlightCam Image Downlink v{} ===", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => DownlinkConfig::load(Path::new(&path))
            .with_context(|| format!("loading configuration from {}", path))?,
        None => {
            let config = DownlinkConfig::default();
            config.validate().context("validating default configuration")?;
            config
        }
    };
    info!(
        serial = %config.serial_port,
        baud = config.baud_rate,
        capacity = config.ring_capacity,
        delay_ms = config.frame_delay_ms,
        camera = %config.camera.device,
        quality = config.camera.jpeg_quality,
        "downlink configured"
    );

    let source: Box<dyn FrameSource> = match config.source {
        FrameSourceKind::Synthetic => Box::new(SyntheticCamera::new(config.camera.clone())),
        FrameSourceKind::Replay => {
            let dir = config
                .replay_dir
                .clone()
                .ok_or_else(|| anyhow::anyhow!("replay source requires replay_dir"))?;
            Box::new(ReplayCamera::new(&dir)?)
        }
    };

    let transport = open_serial(&config.serial_port, config.baud_rate)
        .with_context(|| format!("opening serial port {}", config.serial_port))?;

    DownlinkService::new(config, source).run(transport).await?;
    Ok(())
}
