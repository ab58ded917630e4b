//! Traits for the two sides of the capturer: the frame producer that owns the
//! USB camera, and the observer that consumes converted frames.

use usbcam_video::{CaptureFormat, PlanarFrame};

/// Trait for receiving capture events. Implement this on the consuming
/// pipeline to get frames and capturer state changes.
///
/// All methods run synchronously on the thread that triggered them: frame
/// delivery happens on the producer's capture thread, so a slow observer
/// blocks the producer.
pub trait CapturerObserver: Send + Sync + 'static {
    /// Called once the producer confirms it started (or failed to start)
    /// delivering frames.
    fn on_capturer_started(&self, success: bool);

    /// Called once the producer confirms it stopped delivering frames.
    fn on_capturer_stopped(&self);

    /// Called with every successfully converted frame.
    ///
    /// The frame is only borrowed for the duration of the call. Clone it to
    /// keep it; the planes are reference counted.
    fn on_frame_captured(&self, frame: &PlanarFrame);
}

/// Trait for the external frame producer. The capturer relays start and stop
/// requests from the pipeline to it.
pub trait CaptureRequestHandler: Send + Sync + 'static {
    /// The pipeline wants frames. The producer should begin submitting and
    /// then confirm via `on_capturer_started`.
    fn request_start(&self, format: CaptureFormat);

    /// The pipeline no longer wants frames. The producer should confirm via
    /// `on_capturer_stopped`.
    fn request_stop(&self);
}
