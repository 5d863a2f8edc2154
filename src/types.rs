//! Core type definitions for the encoder.
//!
//! Input images, configuration value types, and the frame/scan descriptors
//! shared by the marker writer and the encoder pipeline.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{DCTSIZE2, MAX_COMPONENTS};

// =============================================================================
// Pixel Format
// =============================================================================

/// Layout of the input sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    /// One byte per pixel
    Gray,
    /// Three bytes per pixel: red, green, blue
    Rgb,
}

impl PixelFormat {
    /// Bytes per pixel in the input buffer.
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }

    /// Number of components written to the JPEG frame.
    pub const fn num_components(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => MAX_COMPONENTS,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Gray => f.write_str("grayscale"),
            PixelFormat::Rgb => f.write_str("RGB"),
        }
    }
}

// =============================================================================
// Image
// =============================================================================

/// A borrowed raster image: row-major, top-to-bottom samples.
///
/// The encoder only reads the buffer for the duration of one call.
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl<'a> Image<'a> {
    /// Wrap a sample buffer. Nothing is checked until encoding.
    pub fn new(pixels: &'a [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            pixels,
            width,
            height,
            format,
        }
    }

    /// Grayscale image, one byte per pixel.
    pub fn gray(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self::new(pixels, width, height, PixelFormat::Gray)
    }

    /// RGB image, three bytes per pixel.
    pub fn rgb(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self::new(pixels, width, height, PixelFormat::Rgb)
    }

    /// Sample buffer.
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of the buffer.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Buffer length implied by the dimensions and format, or `None` if it
    /// overflows `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.format.channels()))
    }
}

// =============================================================================
// Subsampling
// =============================================================================

/// Chroma subsampling mode. Ignored for grayscale images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Subsampling {
    /// 4:4:4 - chroma at full resolution
    #[default]
    S444,
    /// 4:2:0 - chroma halved horizontally and vertically
    S420,
}

impl Subsampling {
    /// Returns (h_samp_factor, v_samp_factor) for the luminance component.
    pub const fn luma_factors(self) -> (u8, u8) {
        match self {
            Subsampling::S444 => (1, 1),
            Subsampling::S420 => (2, 2),
        }
    }

    /// Returns (h_samp_factor, v_samp_factor) for chroma components.
    pub const fn chroma_factors(self) -> (u8, u8) {
        (1, 1)
    }

    /// MCU edge length in pixels (8 or 16).
    pub const fn mcu_size(self) -> usize {
        match self {
            Subsampling::S444 => 8,
            Subsampling::S420 => 16,
        }
    }
}

// =============================================================================
// Comment Policy
// =============================================================================

/// What to do with a comment longer than a COM segment allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommentPolicy {
    /// Fail validation with [`Error::CommentTooLong`](crate::Error::CommentTooLong)
    #[default]
    Reject,
    /// Keep the longest UTF-8 prefix that fits
    Truncate,
}

// =============================================================================
// Pixel Density (JFIF)
// =============================================================================

/// Unit of the JFIF density fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DensityUnit {
    /// No unit; the density only gives the pixel aspect ratio
    #[default]
    None = 0,
    /// Dots per inch
    DotsPerInch = 1,
    /// Dots per centimeter
    DotsPerCm = 2,
}

/// Pixel density written to the APP0 segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelDensity {
    /// Unit of `x` and `y`
    pub unit: DensityUnit,
    /// Horizontal density
    pub x: u16,
    /// Vertical density
    pub y: u16,
}

impl Default for PixelDensity {
    fn default() -> Self {
        Self::aspect_ratio(1, 1)
    }
}

impl PixelDensity {
    /// Unitless pixel aspect ratio.
    pub const fn aspect_ratio(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::None,
            x,
            y,
        }
    }

    /// Dots per inch.
    pub const fn dpi(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::DotsPerInch,
            x,
            y,
        }
    }

    /// Dots per centimeter.
    pub const fn dpcm(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::DotsPerCm,
            x,
            y,
        }
    }
}

// =============================================================================
// Frame / Scan descriptors
// =============================================================================

/// Per-component parameters written to SOF and SOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Component identifier (1 = Y, 2 = Cb, 3 = Cr)
    pub component_id: u8,
    /// Horizontal sampling factor
    pub h_samp_factor: u8,
    /// Vertical sampling factor
    pub v_samp_factor: u8,
    /// Quantization table slot
    pub quant_tbl_no: u8,
    /// DC Huffman table slot
    pub dc_tbl_no: u8,
    /// AC Huffman table slot
    pub ac_tbl_no: u8,
}

impl ComponentInfo {
    /// Luminance component with the given sampling factors.
    pub const fn luma(h_samp_factor: u8, v_samp_factor: u8) -> Self {
        Self {
            component_id: 1,
            h_samp_factor,
            v_samp_factor,
            quant_tbl_no: 0,
            dc_tbl_no: 0,
            ac_tbl_no: 0,
        }
    }

    /// Chrominance component `id` (2 = Cb, 3 = Cr) with the given sampling
    /// factors.
    pub const fn chroma(component_id: u8, h_samp_factor: u8, v_samp_factor: u8) -> Self {
        Self {
            component_id,
            h_samp_factor,
            v_samp_factor,
            quant_tbl_no: 1,
            dc_tbl_no: 1,
            ac_tbl_no: 1,
        }
    }
}

/// Build the frame components for a pixel format and subsampling mode.
pub fn create_components(format: PixelFormat, subsampling: Subsampling) -> Vec<ComponentInfo> {
    match format {
        PixelFormat::Gray => vec![ComponentInfo::luma(1, 1)],
        PixelFormat::Rgb => {
            let (h, v) = subsampling.luma_factors();
            let (ch, cv) = subsampling.chroma_factors();
            vec![
                ComponentInfo::luma(h, v),
                ComponentInfo::chroma(2, ch, cv),
                ComponentInfo::chroma(3, ch, cv),
            ]
        }
    }
}

/// The single sequential scan of a baseline image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanInfo {
    /// Number of components in this scan (1 or 3)
    pub comps_in_scan: u8,
    /// Component indices for this scan
    pub component_index: [u8; MAX_COMPONENTS],
    /// Spectral selection start
    pub ss: u8,
    /// Spectral selection end
    pub se: u8,
    /// Successive approximation high bit
    pub ah: u8,
    /// Successive approximation low bit
    pub al: u8,
}

impl ScanInfo {
    /// Interleaved full-spectrum scan over `num_components` components.
    pub const fn baseline(num_components: u8) -> Self {
        Self {
            comps_in_scan: num_components,
            component_index: [0, 1, 2],
            ss: 0,
            se: 63,
            ah: 0,
            al: 0,
        }
    }
}

// =============================================================================
// Quantization table
// =============================================================================

/// 64 quantization divisors in zigzag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    /// Divisors, `values[0]` applies to the DC coefficient
    pub values: [u16; DCTSIZE2],
}

impl QuantTable {
    /// Wrap a zigzag-ordered table.
    pub const fn new(values: [u16; DCTSIZE2]) -> Self {
        Self { values }
    }
}

/// A quantized 8x8 block in zigzag order.
pub type ZigzagBlock = [i16; DCTSIZE2];

/// A level-shifted 8x8 block of samples or DCT coefficients, natural order.
pub type FloatBlock = [f32; DCTSIZE2];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_channels() {
        assert_eq!(PixelFormat::Gray.channels(), 1);
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Gray.num_components(), 1);
        assert_eq!(PixelFormat::Rgb.num_components(), 3);
    }

    #[test]
    fn test_image_expected_len() {
        let data = [0u8; 10];
        assert_eq!(Image::gray(&data, 5, 2).expected_len(), Some(10));
        assert_eq!(Image::rgb(&data, 5, 2).expected_len(), Some(30));
        assert_eq!(
            Image::gray(&data, 65535, 65535).expected_len(),
            Some(65535 * 65535)
        );
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_image_expected_len_overflow() {
        let data = [0u8; 1];
        assert_eq!(Image::rgb(&data, 65535, 65535).expected_len(), None);
    }

    #[test]
    fn test_subsampling_factors() {
        assert_eq!(Subsampling::S444.luma_factors(), (1, 1));
        assert_eq!(Subsampling::S420.luma_factors(), (2, 2));
        assert_eq!(Subsampling::S420.chroma_factors(), (1, 1));
        assert_eq!(Subsampling::S444.mcu_size(), 8);
        assert_eq!(Subsampling::S420.mcu_size(), 16);
    }

    #[test]
    fn test_create_components() {
        let gray = create_components(PixelFormat::Gray, Subsampling::S420);
        assert_eq!(gray.len(), 1);
        assert_eq!(gray[0].h_samp_factor, 1);

        let color = create_components(PixelFormat::Rgb, Subsampling::S420);
        assert_eq!(color.len(), 3);
        assert_eq!((color[0].h_samp_factor, color[0].v_samp_factor), (2, 2));
        assert_eq!(color[1].component_id, 2);
        assert_eq!((color[1].h_samp_factor, color[1].v_samp_factor), (1, 1));
        assert_eq!(color[2].quant_tbl_no, 1);
    }

    #[test]
    fn test_default_density_is_square_aspect() {
        let density = PixelDensity::default();
        assert_eq!(density.unit, DensityUnit::None);
        assert_eq!((density.x, density.y), (1, 1));
    }
}
