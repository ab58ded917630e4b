//! Wires the preview camera, the capturer and the consumer task together.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use usbcam_capturer::{
    CaptureRequestHandler, CaptureStats, CapturerObserver, FrameStatus, UsbVideoCapturer,
};

use crate::camera::{PreviewCamera, PreviewSink, StreamControl};
use crate::config::BridgeConfig;
use crate::observer::{CaptureEvent, ChannelObserver};

impl<P, O> PreviewSink for UsbVideoCapturer<P, O>
where
    P: CaptureRequestHandler,
    O: CapturerObserver,
{
    fn on_stream_started(&self) {
        self.on_capturer_started(true);
    }

    fn on_stream_stopped(&self) {
        self.on_capturer_stopped();
    }

    fn on_preview_frame(&self, data: &[u8], width: u32, height: u32, format: i32) {
        let status = self.submit_frame(data, width, height, format);
        if status != FrameStatus::Success {
            warn!("Preview frame dropped: {status}");
        }
    }
}

/// How often the session checks the capturer's counters for dropped frames,
/// which produce no capture event.
const STATS_POLL: Duration = Duration::from_millis(20);

/// Run one capture session: start streaming until `camera.frames` frames have
/// been submitted (delivered or dropped), stop, and return the capturer's
/// counters.
pub async fn run(config: BridgeConfig) -> anyhow::Result<CaptureStats> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let streaming = Arc::new(AtomicBool::new(false));

    let capturer = Arc::new(UsbVideoCapturer::with_config(
        StreamControl::new(streaming.clone()),
        config.capturer.clone(),
    ));
    capturer.initialize(Arc::new(ChannelObserver::new(event_tx)));

    let mut camera = PreviewCamera::start(config.camera.clone(), streaming, capturer.clone())?;
    capturer.start_capture(config.camera.format());

    let target = config.camera.frames;
    let mut poll = tokio::time::interval(STATS_POLL);
    let mut received = 0u64;
    let mut running = false;
    let mut stop_requested = false;

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(CaptureEvent::Started(true)) => {
                    info!("Capture running");
                    running = true;
                }
                Some(CaptureEvent::Started(false)) => {
                    warn!("Producer failed to start capture");
                    break;
                }
                Some(CaptureEvent::Frame(frame)) => {
                    received += 1;
                    debug!(
                        "Frame {}: {}x{} ts={}ns",
                        received,
                        frame.width(),
                        frame.height(),
                        frame.timestamp_ns()
                    );
                }
                Some(CaptureEvent::Stopped) | None => break,
            },
            _ = poll.tick() => {
                if !camera.is_running() {
                    warn!("Preview camera is no longer running");
                    break;
                }
            }
        }

        let stats = capturer.stats();
        if running && !stop_requested && stats.delivered + stats.dropped >= target {
            if stats.dropped > 0 {
                warn!("{} of {} frames were dropped", stats.dropped, target);
            }
            capturer.stop_capture();
            stop_requested = true;
        }
    }

    camera.stop();
    capturer.dispose();

    let stats = capturer.stats();
    info!(
        "Capture session finished: {} delivered, {} dropped, {} consumed",
        stats.delivered, stats.dropped, received
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;
    use usbcam_capturer::CapturerConfig;

    #[tokio::test]
    async fn test_session_delivers_requested_frames() {
        let config = BridgeConfig {
            capturer: CapturerConfig::strict(),
            camera: CameraSettings {
                width: 8,
                height: 8,
                fps: 200,
                frames: 5,
            },
        };

        let stats = run(config).await.unwrap();

        assert!(stats.delivered >= 5);
        assert_eq!(stats.dropped, 0);
    }

    #[tokio::test]
    async fn test_oversized_preview_is_dropped_under_strict() {
        let config = BridgeConfig {
            capturer: CapturerConfig {
                max_width: 4,
                max_height: 4,
                ..CapturerConfig::strict()
            },
            camera: CameraSettings {
                width: 8,
                height: 8,
                fps: 200,
                frames: 0,
            },
        };

        let stats = run(config).await.unwrap();

        assert_eq!(stats.delivered, 0);
    }

    #[tokio::test]
    async fn test_session_ends_when_every_frame_is_dropped() {
        let config = BridgeConfig {
            capturer: CapturerConfig {
                max_width: 4,
                max_height: 4,
                ..CapturerConfig::strict()
            },
            camera: CameraSettings {
                width: 8,
                height: 8,
                fps: 200,
                frames: 5,
            },
        };

        let stats = tokio::time::timeout(Duration::from_secs(5), run(config))
            .await
            .expect("session did not finish")
            .unwrap();

        assert_eq!(stats.delivered, 0);
        assert!(stats.dropped >= 5);
    }

    #[tokio::test]
    async fn test_session_ends_with_zero_sized_preview() {
        let config = BridgeConfig {
            capturer: CapturerConfig::default(),
            camera: CameraSettings {
                width: 0,
                height: 0,
                fps: 200,
                frames: 3,
            },
        };

        let stats = tokio::time::timeout(Duration::from_secs(5), run(config))
            .await
            .expect("session did not finish")
            .unwrap();

        assert_eq!(stats.delivered, 0);
        assert!(stats.dropped >= 3);
    }
}
