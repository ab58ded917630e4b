//! Synthetic USB preview camera.
//!
//! Stands in for the USB camera stack: a preview thread produces NV21 frames
//! while streaming is enabled and hands them to a [`PreviewSink`], the same
//! way the camera's preview callback feeds the capturer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use usbcam_capturer::CaptureRequestHandler;
use usbcam_video::{CaptureFormat, PixelFormat};

use crate::config::CameraSettings;

/// How often an idle preview thread checks whether streaming was requested
const IDLE_POLL: Duration = Duration::from_millis(5);

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Failed to start preview: {0}")]
    Init(String),
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Receiver of preview stream events, called on the preview thread.
pub trait PreviewSink: Send + Sync + 'static {
    fn on_stream_started(&self);
    fn on_stream_stopped(&self);
    fn on_preview_frame(&self, data: &[u8], width: u32, height: u32, format: i32);
}

/// Start/stop switch handed to the capturer as its frame producer.
pub struct StreamControl {
    streaming: Arc<AtomicBool>,
}

impl StreamControl {
    pub fn new(streaming: Arc<AtomicBool>) -> Self {
        Self { streaming }
    }
}

impl CaptureRequestHandler for StreamControl {
    fn request_start(&self, format: CaptureFormat) {
        debug!(
            "Stream start requested ({}x{} @ {} fps)",
            format.width, format.height, format.fps
        );
        self.streaming.store(true, Ordering::Release);
    }

    fn request_stop(&self) {
        debug!("Stream stop requested");
        self.streaming.store(false, Ordering::Release);
    }
}

/// Preview camera running on its own thread.
pub struct PreviewCamera {
    thread: Option<thread::JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl PreviewCamera {
    /// Spawn the preview thread. It idles until `streaming` is set.
    pub fn start<S: PreviewSink>(
        settings: CameraSettings,
        streaming: Arc<AtomicBool>,
        sink: Arc<S>,
    ) -> CameraResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let thread = thread::Builder::new()
            .name("usb-preview".into())
            .spawn(move || Self::preview_loop(settings, streaming, running_clone, sink))
            .map_err(|e| CameraError::Init(format!("Failed to spawn preview thread: {e}")))?;

        info!("Preview camera started");
        Ok(Self {
            thread: Some(thread),
            running,
        })
    }

    fn preview_loop<S: PreviewSink>(
        settings: CameraSettings,
        streaming: Arc<AtomicBool>,
        running: Arc<AtomicBool>,
        sink: Arc<S>,
    ) {
        let frame_interval = Duration::from_millis(1000 / settings.fps.max(1) as u64);
        let mut last_frame_time = Instant::now();
        let mut was_streaming = false;
        let mut frame_count = 0u64;

        while running.load(Ordering::Relaxed) {
            let is_streaming = streaming.load(Ordering::Acquire);
            if is_streaming != was_streaming {
                was_streaming = is_streaming;
                if is_streaming {
                    sink.on_stream_started();
                } else {
                    sink.on_stream_stopped();
                }
            }

            if !is_streaming {
                thread::sleep(IDLE_POLL);
                continue;
            }

            // Rate limiting
            let elapsed = last_frame_time.elapsed();
            if elapsed < frame_interval {
                thread::sleep(frame_interval - elapsed);
            }
            last_frame_time = Instant::now();

            let data = synthesize_nv21(settings.width, settings.height, frame_count);
            sink.on_preview_frame(&data, settings.width, settings.height, PixelFormat::Nv21.to_raw());

            frame_count += 1;
            if frame_count <= 3 {
                info!(
                    "PREVIEW: Sent frame {} ({}x{})",
                    frame_count, settings.width, settings.height
                );
            }
        }

        info!("Preview loop ended after {} frames", frame_count);
    }

    /// False once stopped, or if the preview thread exited on its own.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// Stop the preview thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(()) => info!("Preview camera stopped"),
                Err(_) => warn!("Preview thread panicked"),
            }
        }
    }
}

impl Drop for PreviewCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build one NV21 frame: a horizontal luma ramp that scrolls with
/// `frame_index`, over constant chroma (V = 160, U = 96).
pub fn synthesize_nv21(width: u32, height: u32, frame_index: u64) -> Vec<u8> {
    let width = width as usize;
    let height = height as usize;
    let y_size = width * height;
    let uv_size = y_size / 4;

    let mut data = Vec::with_capacity(y_size + uv_size * 2);
    for _row in 0..height {
        for col in 0..width {
            data.push(((col as u64 + frame_index) % 256) as u8);
        }
    }
    for _ in 0..uv_size {
        data.push(160);
        data.push(96);
    }
    data
}
