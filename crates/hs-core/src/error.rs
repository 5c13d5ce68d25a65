use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    InvalidDimensions {
        width: usize,
        height: usize,
        granularity: usize,
    },
    BufferTooSmall {
        expected: usize,
        actual: usize,
    },
    Misaligned {
        required: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidDimensions {
                width,
                height,
                granularity,
            } => {
                write!(
                    f,
                    "invalid dimensions {width}x{height}: \
                     width and height must be even and width a multiple of {granularity}"
                )
            }
            Self::BufferTooSmall { expected, actual } => {
                write!(f, "buffer too small: need {expected} bytes, got {actual}")
            }
            Self::Misaligned { required } => {
                write!(f, "buffer not aligned to {required} bytes")
            }
        }
    }
}

impl std::error::Error for Error {}
