//! Error types for the baseline JPEG encoder.

use std::fmt;

use crate::types::PixelFormat;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for encoder operations.
///
/// Every variant except [`Error::IoError`] is produced during validation,
/// before the first byte reaches the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Width or height is zero or does not fit the 16-bit frame header
    InvalidDimensions {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
    /// Image buffer size doesn't match dimensions
    BufferSizeMismatch {
        /// Expected buffer size in bytes
        expected: usize,
        /// Actual buffer size in bytes
        actual: usize,
    },
    /// The configured color mode differs from the image's pixel format
    ColorModeMismatch {
        /// Color mode set on the encoder
        expected: PixelFormat,
        /// Pixel format of the image
        actual: PixelFormat,
    },
    /// Comment does not fit in a COM segment
    CommentTooLong {
        /// Comment length in bytes
        len: usize,
        /// Maximum allowed length in bytes
        max: usize,
    },
    /// Invalid Huffman table structure
    InvalidHuffmanTable,
    /// I/O error reported by a writer-backed sink
    IoError(String),
    /// Memory allocation failed
    AllocationFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::BufferSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {}, got {}",
                    expected, actual
                )
            }
            Error::ColorModeMismatch { expected, actual } => {
                write!(
                    f,
                    "Color mode mismatch: encoder expects {}, image is {}",
                    expected, actual
                )
            }
            Error::CommentTooLong { len, max } => {
                write!(f, "Comment too long: {} bytes (max {})", len, max)
            }
            Error::InvalidHuffmanTable => {
                write!(f, "Invalid Huffman table structure")
            }
            Error::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            Error::AllocationFailed => {
                write!(f, "Memory allocation failed")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::AllocationFailed
    }
}
