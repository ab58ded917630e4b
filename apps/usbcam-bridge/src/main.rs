//! USB camera bridge host.
//!
//! Runs a capture session with a synthetic preview camera feeding NV21 frames
//! through the capturer. Pass a JSON config path as the first argument.

mod bridge;
mod camera;
mod config;
mod observer;

use std::path::PathBuf;

use config::BridgeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usbcam_bridge=debug,usbcam_capturer=debug,usbcam_video=info".into()),
        )
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = BridgeConfig::resolve(config_path.as_deref())?;

    bridge::run(config).await?;
    Ok(())
}
