//! Planar I420 frame handed to the capture observer.

use std::sync::Arc;

use crate::error::{VideoError, VideoResult};
use crate::format::VideoRotation;

/// Video frame in I420 (YUV 4:2:0 planar) format.
///
/// Layout:
/// - Y plane: width * height bytes, stride = width
/// - U plane: width * height / 4 bytes, stride = width / 2
/// - V plane: width * height / 4 bytes, stride = width / 2
///
/// Planes are reference counted and never mutated after construction, so
/// cloning a frame to keep it around past the capture callback is cheap.
#[derive(Debug, Clone)]
pub struct PlanarFrame {
    y: Arc<[u8]>,
    u: Arc<[u8]>,
    v: Arc<[u8]>,
    width: u32,
    height: u32,
    rotation: VideoRotation,
    timestamp_ns: i64,
}

impl PlanarFrame {
    /// Wrap already-separated planes.
    ///
    /// Fails if either dimension is zero or a plane does not have the size
    /// implied by `width` and `height`.
    pub fn new(
        y: Vec<u8>,
        u: Vec<u8>,
        v: Vec<u8>,
        width: u32,
        height: u32,
        rotation: VideoRotation,
        timestamp_ns: i64,
    ) -> VideoResult<Self> {
        if width == 0 || height == 0 {
            return Err(VideoError::InvalidDimensions { width, height });
        }

        let frame = Self {
            y: y.into(),
            u: u.into(),
            v: v.into(),
            width,
            height,
            rotation,
            timestamp_ns,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Expected Y plane size
    pub fn y_plane_size(width: u32, height: u32) -> usize {
        width as usize * height as usize
    }

    /// Expected U/V plane size
    pub fn uv_plane_size(width: u32, height: u32) -> usize {
        width as usize * height as usize / 4
    }

    /// Check that every plane has the size its dimensions call for
    pub fn validate(&self) -> VideoResult<()> {
        let y_size = Self::y_plane_size(self.width, self.height);
        let uv_size = Self::uv_plane_size(self.width, self.height);

        if self.y.len() != y_size {
            return Err(VideoError::PlaneSize("Y plane size doesn't match width * height"));
        }
        if self.u.len() != uv_size {
            return Err(VideoError::PlaneSize("U plane size doesn't match width * height / 4"));
        }
        if self.v.len() != uv_size {
            return Err(VideoError::PlaneSize("V plane size doesn't match width * height / 4"));
        }

        Ok(())
    }

    pub fn y(&self) -> &[u8] {
        &self.y
    }

    pub fn u(&self) -> &[u8] {
        &self.u
    }

    pub fn v(&self) -> &[u8] {
        &self.v
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride_y(&self) -> u32 {
        self.width
    }

    pub fn stride_u(&self) -> u32 {
        self.width / 2
    }

    pub fn stride_v(&self) -> u32 {
        self.width / 2
    }

    pub fn rotation(&self) -> VideoRotation {
        self.rotation
    }

    /// Capture time in nanoseconds on the capturer's monotonic clock
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    /// Copy the planes into one contiguous Y‖U‖V buffer
    pub fn to_packed(&self) -> Vec<u8> {
        let mut packed = Vec::with_capacity(self.y.len() + self.u.len() + self.v.len());
        packed.extend_from_slice(&self.y);
        packed.extend_from_slice(&self.u);
        packed.extend_from_slice(&self.v);
        packed
    }
}
