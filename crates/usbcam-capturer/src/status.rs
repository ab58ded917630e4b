//! Result codes returned to the frame producer.

use std::fmt;

/// Outcome of a single frame submission.
///
/// The producer only ever sees the integer code; the reason behind an
/// `InternalError` is reported through logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FrameStatus {
    /// Frame was converted and delivered to the observer
    Success = 0,
    /// Buffer was empty
    EmptyBuffer = -1,
    /// Dimensions exceed the maximum or don't match the buffer length
    InvalidDimensions = -2,
    /// Rotation is not one of 0/90/180/270
    InvalidRotation = -3,
    /// Frame rate out of range
    InvalidFrameRate = -4,
    /// Unrecognized or unsupported pixel format
    InvalidFormat = -5,
    /// No observer, conversion failure, or observer failure
    InternalError = -10,
}

impl FrameStatus {
    /// Integer code handed back to the producer
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse from a raw code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            -1 => Some(Self::EmptyBuffer),
            -2 => Some(Self::InvalidDimensions),
            -3 => Some(Self::InvalidRotation),
            -4 => Some(Self::InvalidFrameRate),
            -5 => Some(Self::InvalidFormat),
            -10 => Some(Self::InternalError),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::EmptyBuffer => "empty buffer",
            Self::InvalidDimensions => "invalid dimensions",
            Self::InvalidRotation => "invalid rotation",
            Self::InvalidFrameRate => "invalid frame rate",
            Self::InvalidFormat => "invalid format",
            Self::InternalError => "internal error",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(FrameStatus::Success.code(), 0);
        assert_eq!(FrameStatus::EmptyBuffer.code(), -1);
        assert_eq!(FrameStatus::InvalidDimensions.code(), -2);
        assert_eq!(FrameStatus::InvalidRotation.code(), -3);
        assert_eq!(FrameStatus::InvalidFrameRate.code(), -4);
        assert_eq!(FrameStatus::InvalidFormat.code(), -5);
        assert_eq!(FrameStatus::InternalError.code(), -10);
    }

    #[test]
    fn test_from_code() {
        for code in [0, -1, -2, -3, -4, -5, -10] {
            assert_eq!(FrameStatus::from_code(code).unwrap().code(), code);
        }
        assert_eq!(FrameStatus::from_code(-6), None);
        assert_eq!(FrameStatus::from_code(1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FrameStatus::EmptyBuffer.to_string(), "empty buffer (-1)");
        assert_eq!(FrameStatus::InternalError.to_string(), "internal error (-10)");
    }
}
