//! Video capturer that feeds USB camera frames into the consuming pipeline.
//!
//! The capturer never talks to the camera itself. An external producer pushes
//! NV21 buffers through [`UsbVideoCapturer::submit_frame`], which converts them
//! to I420 and hands them to the registered observer on the calling thread.
//! Start/stop requests from the pipeline are relayed to the producer, and the
//! producer's confirmations are relayed back to the observer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, error, info, warn};
use usbcam_video::{nv21_to_i420, CaptureFormat, PixelFormat, PlanarFrame, VideoResult, VideoRotation};

use crate::config::{CapturerConfig, ValidationPolicy};
use crate::observer::{CaptureRequestHandler, CapturerObserver};
use crate::status::FrameStatus;

/// Whether the producer has confirmed it is delivering frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Stopped,
    Started,
}

/// Snapshot of the capturer's frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames converted and handed to the observer
    pub delivered: u64,
    /// Frames rejected or lost to an internal error
    pub dropped: u64,
}

#[derive(Default)]
struct FrameCounters {
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// Capturer bridging an external USB frame producer `P` and a pipeline
/// observer `O`.
///
/// Lifecycle calls and frame submissions may come from different threads.
pub struct UsbVideoCapturer<P, O> {
    producer: P,
    observer: RwLock<Option<Arc<O>>>,
    started: AtomicBool,
    config: CapturerConfig,
    /// Zero point of frame timestamps
    epoch: Instant,
    counters: FrameCounters,
}

impl<P, O> UsbVideoCapturer<P, O>
where
    P: CaptureRequestHandler,
    O: CapturerObserver,
{
    pub fn new(producer: P) -> Self {
        Self::with_config(producer, CapturerConfig::default())
    }

    pub fn with_config(producer: P, config: CapturerConfig) -> Self {
        Self {
            producer,
            observer: RwLock::new(None),
            started: AtomicBool::new(false),
            config,
            epoch: Instant::now(),
            counters: FrameCounters::default(),
        }
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }

    pub fn config(&self) -> &CapturerConfig {
        &self.config
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────

    /// Register the observer that receives frames and state changes.
    /// Replaces any previously registered observer.
    pub fn initialize(&self, observer: Arc<O>) {
        let mut slot = self.observer.write().unwrap_or_else(PoisonError::into_inner);
        if slot.replace(observer).is_some() {
            debug!("Capturer observer replaced");
        }
        info!("Capturer initialized");
    }

    /// Ask the producer to start submitting frames.
    ///
    /// The capture state only changes once the producer confirms through
    /// [`Self::on_capturer_started`].
    pub fn start_capture(&self, format: CaptureFormat) {
        info!(
            "Requesting capture start at {}x{} @ {} fps",
            format.width, format.height, format.fps
        );
        self.producer.request_start(format);
    }

    /// Ask the producer to stop submitting frames.
    pub fn stop_capture(&self) {
        info!("Requesting capture stop");
        self.producer.request_stop();
    }

    /// Frames are sized per submission, so a format change needs no action.
    pub fn change_capture_format(&self, format: CaptureFormat) {
        debug!(
            "Ignoring capture format change to {}x{} @ {} fps",
            format.width, format.height, format.fps
        );
    }

    pub fn dispose(&self) {
        debug!("Capturer disposed");
    }

    pub fn is_screencast(&self) -> bool {
        false
    }

    /// Producer confirmation that frame delivery started (or failed to).
    pub fn on_capturer_started(&self, success: bool) {
        self.started.store(success, Ordering::Release);
        info!("Capturer started: {}", success);
        if let Some(observer) = self.observer() {
            observer.on_capturer_started(success);
        }
    }

    /// Producer confirmation that frame delivery stopped.
    pub fn on_capturer_stopped(&self) {
        self.started.store(false, Ordering::Release);
        info!("Capturer stopped");
        if let Some(observer) = self.observer() {
            observer.on_capturer_stopped();
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.started.load(Ordering::Acquire) {
            CaptureState::Started
        } else {
            CaptureState::Stopped
        }
    }

    pub fn stats(&self) -> CaptureStats {
        CaptureStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    // ─── Frame submission ──────────────────────────────────────────────────

    /// Convert one NV21 buffer and deliver it to the observer.
    ///
    /// Runs entirely on the caller's thread and blocks for as long as the
    /// observer takes. Never panics; every failure maps to a [`FrameStatus`].
    pub fn submit_frame(&self, data: &[u8], width: u32, height: u32, format: i32) -> FrameStatus {
        debug!(
            "Frame submitted: {} bytes, {}x{}, format {}",
            data.len(),
            width,
            height,
            format
        );

        let status = self.process_frame(data, width, height, format);
        if status.is_success() {
            self.counters.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        }
        status
    }

    fn process_frame(&self, data: &[u8], width: u32, height: u32, format: i32) -> FrameStatus {
        if data.is_empty() {
            error!("Frame buffer is empty");
            return FrameStatus::EmptyBuffer;
        }

        if self.config.validation == ValidationPolicy::Strict {
            if let Err(status) = self.validate(data, width, height, format) {
                return status;
            }
        }

        if self.config.require_started && self.state() == CaptureState::Stopped {
            warn!("Frame submitted while capture is stopped, dropping");
            return FrameStatus::InternalError;
        }

        let frame = match self.next_frame(data, width, height) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Frame conversion failed: {e}");
                return FrameStatus::InternalError;
            }
        };

        let Some(observer) = self.observer() else {
            warn!("No observer registered, dropping frame");
            return FrameStatus::InternalError;
        };

        let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.on_frame_captured(&frame)));
        drop(frame);

        match delivered {
            Ok(()) => FrameStatus::Success,
            Err(_) => {
                error!("Observer panicked while handling frame");
                FrameStatus::InternalError
            }
        }
    }

    /// Strict pre-conversion checks.
    fn validate(&self, data: &[u8], width: u32, height: u32, format: i32) -> Result<(), FrameStatus> {
        if width == 0
            || height == 0
            || width % 2 != 0
            || height % 2 != 0
            || width > self.config.max_width
            || height > self.config.max_height
        {
            error!(
                "Illegal frame size {}x{} (max {}x{})",
                width, height, self.config.max_width, self.config.max_height
            );
            return Err(FrameStatus::InvalidDimensions);
        }

        let Some(expected) = PixelFormat::Nv21.frame_len(width, height) else {
            error!("Frame size {}x{} overflows the buffer length", width, height);
            return Err(FrameStatus::InvalidDimensions);
        };
        if data.len() < expected {
            error!(
                "Illegal data length: {} bytes for {}x{}, expected {}",
                data.len(),
                width,
                height,
                expected
            );
            return Err(FrameStatus::InvalidDimensions);
        }

        if let Err(e) = PixelFormat::require(format, PixelFormat::Nv21) {
            error!("Rejecting frame: {e}");
            return Err(FrameStatus::InvalidFormat);
        }

        Ok(())
    }

    fn next_frame(&self, data: &[u8], width: u32, height: u32) -> VideoResult<PlanarFrame> {
        let timestamp_ns = i64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(i64::MAX);
        let (y, u, v) = nv21_to_i420(data, width, height)?;
        PlanarFrame::new(y, u, v, width, height, VideoRotation::Rotation0, timestamp_ns)
    }

    fn observer(&self) -> Option<Arc<O>> {
        self.observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
