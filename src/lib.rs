//! # baseline-jpeg
//!
//! Baseline (sequential, Huffman-coded) JPEG encoder that streams its output
//! through a byte sink.
//!
//! - Grayscale and RGB input of any size up to 65535x65535
//! - Optional 4:2:0 chroma subsampling
//! - Quality 1-100 with the standard Annex K tables
//! - Optional comment (COM) and JFIF pixel density
//!
//! Output bytes are handed to a [`ByteSink`] in order as soon as they are
//! produced. Every `FnMut(u8)` closure is a sink, as is `Vec<u8>`.
//!
//! ## Quick Start
//!
//! ```
//! use baseline_jpeg::Encoder;
//!
//! # fn main() -> Result<(), baseline_jpeg::Error> {
//! // RGB pixel data (3 bytes per pixel, row-major order)
//! let rgb_pixels: Vec<u8> = vec![0; 64 * 48 * 3];
//!
//! let jpeg_data = Encoder::new()
//!     .quality(85)
//!     .downsample(true)
//!     .encode_rgb(&rgb_pixels, 64, 48)?;
//! assert_eq!(&jpeg_data[jpeg_data.len() - 2..], &[0xFF, 0xD9]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming to a Closure
//!
//! ```
//! use baseline_jpeg::{Encoder, Image};
//!
//! # fn main() -> Result<(), baseline_jpeg::Error> {
//! let gray: Vec<u8> = (0..100 * 100).map(|i| (i % 256) as u8).collect();
//! let mut size = 0usize;
//! let mut count_bytes = |_byte: u8| size += 1;
//!
//! Encoder::new()
//!     .comment("counted, not stored")
//!     .encode(&Image::gray(&gray, 100, 100), &mut count_bytes)?;
//! assert!(size > 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing to a File or Stream
//!
//! ```no_run
//! use baseline_jpeg::{Encoder, Image, PixelDensity};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let rgb_pixels: Vec<u8> = vec![0; 100 * 100 * 3];
//! let file = File::create("output.jpg")?;
//!
//! Encoder::new()
//!     .quality(90)
//!     .pixel_density(PixelDensity::dpi(300, 300))
//!     .encode_to_writer(&Image::rgb(&rgb_pixels, 100, 100), file)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// ============================================================================
// Internal modules - hidden from public docs but accessible for tests
// ============================================================================

/// Bitstream writing utilities (internal).
#[doc(hidden)]
pub mod bitstream;

/// Color conversion utilities (internal).
#[doc(hidden)]
pub mod color;

/// Constants and tables (internal).
#[doc(hidden)]
pub mod consts;

/// Forward DCT (internal).
#[doc(hidden)]
pub mod dct;

/// Huffman entropy encoding (internal).
#[doc(hidden)]
pub mod entropy;

/// Huffman table construction (internal).
#[doc(hidden)]
pub mod huffman;

/// JPEG marker writing (internal).
#[doc(hidden)]
pub mod marker;

/// Quantization (internal).
#[doc(hidden)]
pub mod quant;

/// Chroma subsampling (internal).
#[doc(hidden)]
pub mod sample;

/// Byte sinks.
pub mod sink;

/// Core type definitions (internal).
#[doc(hidden)]
pub mod types;

mod encode;
mod error;

// ============================================================================
// Public API
// ============================================================================

/// JPEG encoder and its boolean entry point.
pub use encode::{write_jpeg, Encoder, DEFAULT_QUALITY};

/// Error type for encoding operations.
pub use error::Error;

/// Result type alias for encoding operations.
pub use error::Result;

/// Consumers of encoded bytes.
pub use sink::{ByteSink, IoSink};

/// Input image and configuration value types.
pub use types::{CommentPolicy, DensityUnit, Image, PixelDensity, PixelFormat, Subsampling};

/// Largest comment that fits a COM segment, in bytes.
pub use consts::MAX_COMMENT_LEN;
