//! Observer forwarding capture events to the async side over a channel.

use tokio::sync::mpsc;
use tracing::{debug, info};
use usbcam_capturer::CapturerObserver;
use usbcam_video::PlanarFrame;

/// Capture event delivered to the consumer task
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// Producer confirmed start (or failure to start)
    Started(bool),
    /// Producer confirmed stop
    Stopped,
    /// Converted I420 frame
    Frame(PlanarFrame),
}

pub struct ChannelObserver {
    event_tx: mpsc::UnboundedSender<CaptureEvent>,
}

impl ChannelObserver {
    pub fn new(event_tx: mpsc::UnboundedSender<CaptureEvent>) -> Self {
        Self { event_tx }
    }

    fn send(&self, event: CaptureEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Capture event receiver dropped");
        }
    }
}

impl CapturerObserver for ChannelObserver {
    fn on_capturer_started(&self, success: bool) {
        info!("Observer: capturer started ({})", success);
        self.send(CaptureEvent::Started(success));
    }

    fn on_capturer_stopped(&self) {
        info!("Observer: capturer stopped");
        self.send(CaptureEvent::Stopped);
    }

    fn on_frame_captured(&self, frame: &PlanarFrame) {
        self.send(CaptureEvent::Frame(frame.clone()));
    }
}
