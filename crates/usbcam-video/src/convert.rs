//! NV21 to I420 conversion.
//!
//! USB cameras hand over preview frames as NV21: a full-resolution Y plane
//! followed by one interleaved chroma plane at quarter resolution. The
//! consuming pipeline wants I420, with U and V in separate planes.

use crate::error::{VideoError, VideoResult};

/// Convert an NV21 buffer to I420 planar format.
///
/// Input layout:
/// - `width * height` bytes of Y
/// - `width * height / 4` pairs of chroma, each pair being V then U
///
/// Bytes past the chroma tail are ignored.
///
/// Returns (Y plane, U plane, V plane).
pub fn nv21_to_i420(
    nv21: &[u8],
    width: u32,
    height: u32,
) -> VideoResult<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    if width == 0 || height == 0 {
        return Err(VideoError::InvalidDimensions { width, height });
    }

    let too_large = VideoError::FrameTooLarge { width, height };
    let y_size = (width as usize)
        .checked_mul(height as usize)
        .ok_or(too_large.clone())?;
    let uv_size = y_size / 4;
    let expected = uv_size
        .checked_mul(2)
        .and_then(|uv_len| uv_len.checked_add(y_size))
        .ok_or(too_large)?;

    if nv21.len() < expected {
        return Err(VideoError::BufferTooShort {
            expected,
            actual: nv21.len(),
        });
    }

    let y_plane = nv21[..y_size].to_vec();

    let mut u_plane = Vec::with_capacity(uv_size);
    let mut v_plane = Vec::with_capacity(uv_size);

    // V comes first in each pair; swapping these renders blue as red
    for pair in nv21[y_size..expected].chunks_exact(2) {
        v_plane.push(pair[0]);
        u_plane.push(pair[1]);
    }

    Ok((y_plane, u_plane, v_plane))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nv21_to_i420_dimensions() {
        let width = 640;
        let height = 480;
        let nv21 = vec![128u8; 640 * 480 * 3 / 2];

        let (y, u, v) = nv21_to_i420(&nv21, width, height).unwrap();

        assert_eq!(y.len(), 640 * 480);
        assert_eq!(u.len(), 640 * 480 / 4);
        assert_eq!(v.len(), 640 * 480 / 4);
    }

    #[test]
    fn test_luma_copied_verbatim() {
        let mut nv21: Vec<u8> = (0..16).collect();
        nv21.extend_from_slice(&[200; 8]);

        let (y, _, _) = nv21_to_i420(&nv21, 4, 4).unwrap();

        assert_eq!(y, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_v_precedes_u() {
        // Tail is V0,U0,V1,U1,V2,U2,V3,U3
        let mut nv21 = vec![0u8; 16];
        nv21.extend_from_slice(&[10, 20, 11, 21, 12, 22, 13, 23]);

        let (_, u, v) = nv21_to_i420(&nv21, 4, 4).unwrap();

        assert_eq!(v, vec![10, 11, 12, 13]);
        assert_eq!(u, vec![20, 21, 22, 23]);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut nv21 = vec![0u8; 16];
        nv21.extend_from_slice(&[1, 2, 1, 2, 1, 2, 1, 2]);
        nv21.extend_from_slice(&[99; 10]);

        let (y, u, v) = nv21_to_i420(&nv21, 4, 4).unwrap();

        assert_eq!(y.len(), 16);
        assert_eq!(u, vec![2; 4]);
        assert_eq!(v, vec![1; 4]);
    }

    #[test]
    fn test_short_buffer() {
        let nv21 = vec![0u8; 23];
        assert_eq!(
            nv21_to_i420(&nv21, 4, 4).unwrap_err(),
            VideoError::BufferTooShort {
                expected: 24,
                actual: 23
            }
        );
    }

    #[test]
    fn test_oversized_dimensions() {
        assert_eq!(
            nv21_to_i420(&[1u8; 24], u32::MAX, u32::MAX).unwrap_err(),
            VideoError::FrameTooLarge {
                width: u32::MAX,
                height: u32::MAX
            }
        );
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            nv21_to_i420(&[0u8; 8], 0, 4),
            Err(VideoError::InvalidDimensions { .. })
        ));
    }
}
