use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame too large: {width}x{height}")]
    FrameTooLarge { width: u32, height: u32 },

    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unsupported pixel format tag: {0}")]
    UnsupportedFormat(i32),

    #[error("Plane size mismatch: {0}")]
    PlaneSize(&'static str),
}

pub type VideoResult<T> = Result<T, VideoError>;
