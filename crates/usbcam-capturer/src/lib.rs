pub mod capturer;
pub mod config;
pub mod observer;
pub mod status;

pub use capturer::{CaptureState, CaptureStats, UsbVideoCapturer};
pub use config::{CapturerConfig, ConfigError, ValidationPolicy};
pub use observer::{CaptureRequestHandler, CapturerObserver};
pub use status::FrameStatus;
