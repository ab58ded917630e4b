pub mod convert;
pub mod error;
pub mod format;
pub mod frame;

pub use convert::nv21_to_i420;
pub use error::{VideoError, VideoResult};
pub use format::{CaptureFormat, PixelFormat, VideoRotation};
pub use frame::PlanarFrame;
