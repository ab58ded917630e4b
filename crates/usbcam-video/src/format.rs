//! Pixel formats, rotation and capture format descriptors.

use serde::{Deserialize, Serialize};

use crate::error::{VideoError, VideoResult};

/// Pixel layout of a raw buffer handed over by the USB camera producer.
///
/// The raw values are the ordinals of the producer's preview data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Y plane followed by interleaved V/U pairs (4:2:0)
    Nv21 = 0,
    /// Packed RGBA, 4 bytes per pixel
    Rgba = 1,
}

impl PixelFormat {
    /// Parse from the producer's format tag
    pub fn from_raw(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::Nv21),
            1 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Parse a tag, rejecting anything other than `expected`
    pub fn require(tag: i32, expected: Self) -> VideoResult<Self> {
        match Self::from_raw(tag) {
            Some(format) if format == expected => Ok(format),
            _ => Err(VideoError::UnsupportedFormat(tag)),
        }
    }

    /// Convert back to the producer's format tag
    pub fn to_raw(self) -> i32 {
        self as i32
    }

    /// Minimum buffer length for a frame of the given size, or `None` if it
    /// doesn't fit in `usize`
    pub fn frame_len(self, width: u32, height: u32) -> Option<usize> {
        let pixels = (width as usize).checked_mul(height as usize)?;
        match self {
            Self::Nv21 => pixels.checked_add((pixels / 4).checked_mul(2)?),
            Self::Rgba => pixels.checked_mul(4),
        }
    }
}

/// Clockwise rotation to apply when rendering a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl VideoRotation {
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Rotation0),
            90 => Some(Self::Rotation90),
            180 => Some(Self::Rotation180),
            270 => Some(Self::Rotation270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Rotation0 => 0,
            Self::Rotation90 => 90,
            Self::Rotation180 => 180,
            Self::Rotation270 => 270,
        }
    }
}

/// Requested capture resolution and frame rate.
///
/// Carried by start and format-change requests. The producer is free to
/// deliver frames of a different size; every submission declares its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl CaptureFormat {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self { width, height, fps }
    }
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
        }
    }
}
