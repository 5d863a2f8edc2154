//! JPEG encoder pipeline.
//!
//! [`Encoder`] holds the configuration and drives one image per call:
//! validation, plane preparation, then markers and the single interleaved
//! baseline scan, written to a [`ByteSink`] as they are produced.
//!
//! # Examples
//!
//! ```
//! use baseline_jpeg::{Encoder, Image, Subsampling};
//!
//! let pixels = vec![128u8; 32 * 16 * 3];
//! let mut jpeg = Vec::new();
//! Encoder::new()
//!     .quality(85)
//!     .subsampling(Subsampling::S420)
//!     .comment("made by baseline-jpeg")
//!     .encode(&Image::rgb(&pixels, 32, 16), &mut jpeg)?;
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! # Ok::<(), baseline_jpeg::Error>(())
//! ```

use std::borrow::Cow;
use std::io::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitstream::BitWriter;
use crate::color::convert_rgb_to_ycbcr;
use crate::consts::{DCTSIZE, MAX_COMMENT_LEN, MAX_DIMENSION};
use crate::dct::{forward_dct_8x8, load_block};
use crate::entropy::EntropyEncoder;
use crate::error::{Error, Result};
use crate::huffman::{
    std_ac_chroma, std_ac_luma, std_dc_chroma, std_dc_luma, HuffTable, HuffmanTables,
};
use crate::marker::MarkerWriter;
use crate::quant::{create_quant_tables, Quantizer};
use crate::sample::{chroma_dimensions, downsample_h2v2};
use crate::sink::{ByteSink, IoSink};
use crate::types::{
    create_components, CommentPolicy, ComponentInfo, FloatBlock, Image, PixelDensity, PixelFormat,
    QuantTable, ScanInfo, Subsampling,
};

pub(crate) mod helpers;

use helpers::{mcu_count, truncate_utf8, try_alloc_vec};

/// Default quality level
pub const DEFAULT_QUALITY: u8 = 90;

/// Baseline JPEG encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Encoder {
    /// Quality level (1-100)
    quality: u8,
    /// Chroma subsampling mode (ignored for grayscale)
    subsampling: Subsampling,
    /// Text for the COM segment
    comment: Option<String>,
    /// What to do with an over-long comment
    comment_policy: CommentPolicy,
    /// Required pixel format of the input, if any
    color_mode: Option<PixelFormat>,
    /// Pixel density for JFIF APP0 marker
    pixel_density: PixelDensity,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Create an encoder at quality 90, 4:4:4, with no comment.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            subsampling: Subsampling::S444,
            comment: None,
            comment_policy: CommentPolicy::Reject,
            color_mode: None,
            pixel_density: PixelDensity::default(),
        }
    }

    /// Set quality level (1-100). Out-of-range values are clamped.
    ///
    /// Higher values produce larger, higher-quality images.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Set chroma subsampling mode.
    pub fn subsampling(mut self, mode: Subsampling) -> Self {
        self.subsampling = mode;
        self
    }

    /// Enable 4:2:0 chroma subsampling (`true`) or keep full-resolution
    /// chroma (`false`).
    pub fn downsample(self, enable: bool) -> Self {
        self.subsampling(if enable {
            Subsampling::S420
        } else {
            Subsampling::S444
        })
    }

    /// Embed a comment (COM segment) after the JFIF header.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Choose how comments longer than 65533 bytes are handled.
    pub fn comment_policy(mut self, policy: CommentPolicy) -> Self {
        self.comment_policy = policy;
        self
    }

    /// Require images of the given pixel format.
    ///
    /// Encoding an image of another format fails with
    /// [`Error::ColorModeMismatch`].
    pub fn color_mode(mut self, format: PixelFormat) -> Self {
        self.color_mode = Some(format);
        self
    }

    /// Set the pixel density written to the JFIF APP0 marker.
    pub fn pixel_density(mut self, density: PixelDensity) -> Self {
        self.pixel_density = density;
        self
    }

    /// Configured quality.
    pub fn get_quality(&self) -> u8 {
        self.quality
    }

    /// Configured subsampling mode.
    pub fn get_subsampling(&self) -> Subsampling {
        self.subsampling
    }

    /// Encode an image into `sink`.
    ///
    /// All validation happens before the first byte is written; on error
    /// the sink has received nothing.
    pub fn encode<S: ByteSink + ?Sized>(&self, image: &Image<'_>, sink: &mut S) -> Result<()> {
        let comment = self.validate(image)?;
        let (width, height) = frame_dimensions(image)?;
        let format = image.format();
        let subsampling = match format {
            PixelFormat::Gray => Subsampling::S444,
            PixelFormat::Rgb => self.subsampling,
        };

        log::debug!(
            "Encoding {}x{} {} image, quality {}, {:?}",
            image.width(),
            image.height(),
            format,
            self.quality,
            subsampling
        );

        // Everything fallible happens before output starts
        let planes = Planes::prepare(image, subsampling)?;
        let quant_tables = create_quant_tables(self.quality);
        let quantizers = [
            Quantizer::new(&quant_tables[0]),
            Quantizer::new(&quant_tables[1]),
        ];
        let huffman = HuffmanTables::standard()?;
        let components = create_components(format, subsampling);
        let num_components = format.num_components();

        let mut markers = MarkerWriter::new(sink);
        markers.write_soi();
        markers.write_jfif_app0(&self.pixel_density);
        if let Some(text) = comment {
            markers.write_com(text.as_bytes());
        }

        let (dc_luma, ac_luma) = (std_dc_luma(), std_ac_luma());
        let (dc_chroma, ac_chroma) = (std_dc_chroma(), std_ac_chroma());
        let mut dqt: Vec<(u8, &QuantTable)> = vec![(0, &quant_tables[0])];
        let mut dht: Vec<(u8, bool, &HuffTable)> = vec![(0, false, &dc_luma), (0, true, &ac_luma)];
        if num_components > 1 {
            dqt.push((1, &quant_tables[1]));
            dht.push((1, false, &dc_chroma));
            dht.push((1, true, &ac_chroma));
        }
        markers.write_dqt_multiple(&dqt);

        markers.write_sof0(width, height, &components);
        markers.write_dht_multiple(&dht);
        markers.write_sos(&ScanInfo::baseline(num_components as u8), &components);

        let scan_bytes = {
            let mut bits = BitWriter::new(markers.sink_mut());
            {
                let mut entropy = EntropyEncoder::new(&mut bits);
                encode_scan(
                    &planes,
                    &components,
                    subsampling,
                    &quantizers,
                    &huffman,
                    &mut entropy,
                );
            }
            bits.flush();
            debug_assert!(bits.is_aligned());
            bits.bytes_written()
        };

        markers.write_eoi();

        log::debug!(
            "Encoded {} bytes ({} header/trailer, {} scan)",
            markers.bytes_written() + scan_bytes,
            markers.bytes_written(),
            scan_bytes
        );
        Ok(())
    }

    /// Encode grayscale image data to JPEG.
    ///
    /// # Arguments
    /// * `gray_data` - Grayscale pixel data (1 byte per pixel, row-major)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn encode_gray(&self, gray_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode(&Image::gray(gray_data, width, height), &mut output)?;
        Ok(output)
    }

    /// Encode RGB image data to JPEG.
    ///
    /// # Arguments
    /// * `rgb_data` - RGB pixel data (3 bytes per pixel, row-major)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn encode_rgb(&self, rgb_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode(&Image::rgb(rgb_data, width, height), &mut output)?;
        Ok(output)
    }

    /// Encode an image to a writer.
    ///
    /// A write failure does not stop encoding; the first I/O error is
    /// returned as [`Error::IoError`] once the stream is complete.
    pub fn encode_to_writer<W: Write>(&self, image: &Image<'_>, output: W) -> Result<()> {
        let mut sink = IoSink::new(output);
        self.encode(image, &mut sink)?;
        sink.finish()?;
        Ok(())
    }

    /// Check the image against the configuration and resolve the comment.
    fn validate(&self, image: &Image<'_>) -> Result<Option<&str>> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions { width, height });
        }

        let expected = image
            .expected_len()
            .ok_or(Error::InvalidDimensions { width, height })?;
        if image.pixels().len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: image.pixels().len(),
            });
        }

        if let Some(mode) = self.color_mode {
            if mode != image.format() {
                return Err(Error::ColorModeMismatch {
                    expected: mode,
                    actual: image.format(),
                });
            }
        }

        let comment = match self.comment.as_deref() {
            Some(text) if text.len() > MAX_COMMENT_LEN => match self.comment_policy {
                CommentPolicy::Reject => {
                    return Err(Error::CommentTooLong {
                        len: text.len(),
                        max: MAX_COMMENT_LEN,
                    });
                }
                CommentPolicy::Truncate => {
                    let kept = truncate_utf8(text, MAX_COMMENT_LEN);
                    log::warn!(
                        "Comment truncated from {} to {} bytes",
                        text.len(),
                        kept.len()
                    );
                    Some(kept)
                }
            },
            other => other,
        };

        Ok(comment)
    }
}

/// Width and height as the 16-bit fields of the frame header.
fn frame_dimensions(image: &Image<'_>) -> Result<(u16, u16)> {
    let (width, height) = (image.width(), image.height());
    let invalid = || Error::InvalidDimensions { width, height };
    Ok((
        u16::try_from(width).map_err(|_| invalid())?,
        u16::try_from(height).map_err(|_| invalid())?,
    ))
}

/// Encode an image through a byte sink, reporting only success or failure.
///
/// `quality` is clamped to 1-100; `downsample` selects 4:2:0 for RGB input.
/// Returns `false` when validation fails, in which case nothing was
/// written.
#[allow(clippy::too_many_arguments)]
pub fn write_jpeg<S: ByteSink + ?Sized>(
    sink: &mut S,
    pixels: &[u8],
    width: u32,
    height: u32,
    is_rgb: bool,
    quality: u8,
    downsample: bool,
    comment: Option<&str>,
) -> bool {
    let format = if is_rgb {
        PixelFormat::Rgb
    } else {
        PixelFormat::Gray
    };
    let mut encoder = Encoder::new().quality(quality).downsample(downsample);
    if let Some(text) = comment {
        encoder = encoder.comment(text);
    }

    match encoder.encode(&Image::new(pixels, width, height, format), sink) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("JPEG encoding failed: {}", e);
            false
        }
    }
}

// ============================================================================
// Planes and scan
// ============================================================================

/// One sample plane with its dimensions.
struct Plane<'a> {
    data: Cow<'a, [u8]>,
    width: usize,
    height: usize,
}

impl Plane<'_> {
    #[inline]
    fn block(&self, bx: usize, by: usize) -> FloatBlock {
        load_block(&self.data, self.width, self.height, bx, by)
    }
}

/// The Y plane and, for color images, the (possibly subsampled) chroma
/// planes.
struct Planes<'a> {
    luma: Plane<'a>,
    chroma: Option<[Plane<'a>; 2]>,
}

impl<'a> Planes<'a> {
    fn prepare(image: &Image<'a>, subsampling: Subsampling) -> Result<Self> {
        let width = image.width() as usize;
        let height = image.height() as usize;

        match image.format() {
            PixelFormat::Gray => Ok(Self {
                luma: Plane {
                    data: Cow::Borrowed(image.pixels()),
                    width,
                    height,
                },
                chroma: None,
            }),
            PixelFormat::Rgb => {
                let len = width * height;
                let mut y = try_alloc_vec(0u8, len)?;
                let mut cb = try_alloc_vec(0u8, len)?;
                let mut cr = try_alloc_vec(0u8, len)?;
                convert_rgb_to_ycbcr(image.pixels(), &mut y, &mut cb, &mut cr);

                let (cw, ch) = chroma_dimensions(width, height, subsampling);
                let (cb, cr) = match subsampling {
                    Subsampling::S444 => (cb, cr),
                    Subsampling::S420 => {
                        let (cb, _, _) = downsample_h2v2(&cb, width, height)?;
                        let (cr, _, _) = downsample_h2v2(&cr, width, height)?;
                        (cb, cr)
                    }
                };
                debug_assert_eq!(cb.len(), cw * ch);
                let chroma = [
                    Plane {
                        data: Cow::Owned(cb),
                        width: cw,
                        height: ch,
                    },
                    Plane {
                        data: Cow::Owned(cr),
                        width: cw,
                        height: ch,
                    },
                ];

                Ok(Self {
                    luma: Plane {
                        data: Cow::Owned(y),
                        width,
                        height,
                    },
                    chroma: Some(chroma),
                })
            }
        }
    }
}

/// Transform, quantize and entropy-code one block.
#[inline]
#[allow(clippy::too_many_arguments)]
fn encode_block<S: ByteSink + ?Sized>(
    plane: &Plane<'_>,
    bx: usize,
    by: usize,
    component: usize,
    comp: &ComponentInfo,
    quantizers: &[Quantizer; 2],
    huffman: &HuffmanTables,
    entropy: &mut EntropyEncoder<'_, '_, S>,
) {
    let mut block = plane.block(bx, by);
    forward_dct_8x8(&mut block);
    let zz = quantizers[comp.quant_tbl_no as usize].quantize(&block);
    entropy.encode_block(
        &zz,
        component,
        &huffman.dc[comp.dc_tbl_no as usize],
        &huffman.ac[comp.ac_tbl_no as usize],
    );
}

/// Code every MCU in raster order: the luma blocks of the MCU (row order),
/// then Cb, then Cr.
#[allow(clippy::too_many_arguments)]
fn encode_scan<S: ByteSink + ?Sized>(
    planes: &Planes<'_>,
    components: &[ComponentInfo],
    subsampling: Subsampling,
    quantizers: &[Quantizer; 2],
    huffman: &HuffmanTables,
    entropy: &mut EntropyEncoder<'_, '_, S>,
) {
    let mcu_size = subsampling.mcu_size();
    let mcus_x = mcu_count(planes.luma.width, mcu_size);
    let mcus_y = mcu_count(planes.luma.height, mcu_size);
    let luma = &components[0];

    for mcu_y in 0..mcus_y {
        for mcu_x in 0..mcus_x {
            for v in 0..luma.v_samp_factor as usize {
                for h in 0..luma.h_samp_factor as usize {
                    let bx = mcu_x * mcu_size + h * DCTSIZE;
                    let by = mcu_y * mcu_size + v * DCTSIZE;
                    encode_block(&planes.luma, bx, by, 0, luma, quantizers, huffman, entropy);
                }
            }

            if let Some(chroma) = &planes.chroma {
                // Chroma components are 1x1, one block per MCU
                let bx = mcu_x * DCTSIZE;
                let by = mcu_y * DCTSIZE;
                for (i, plane) in chroma.iter().enumerate() {
                    let component = i + 1;
                    encode_block(
                        plane,
                        bx,
                        by,
                        component,
                        &components[component],
                        quantizers,
                        huffman,
                        entropy,
                    );
                }
            }
        }
    }
}

/// Unit tests for private encoder internals.
/// Public API tests are in tests/encode_tests.rs.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_defaults() {
        let enc = Encoder::new();
        assert_eq!(enc.quality, 90);
        assert_eq!(enc.subsampling, Subsampling::S444);
        assert_eq!(enc.comment, None);
        assert_eq!(enc.comment_policy, CommentPolicy::Reject);
        assert_eq!(enc.color_mode, None);
        assert_eq!(enc, Encoder::default());
    }

    #[test]
    fn test_encoder_builder_fields() {
        let enc = Encoder::new()
            .quality(75)
            .downsample(true)
            .comment("hi")
            .color_mode(PixelFormat::Rgb)
            .pixel_density(PixelDensity::dpi(96, 96));

        assert_eq!(enc.get_quality(), 75);
        assert_eq!(enc.get_subsampling(), Subsampling::S420);
        assert_eq!(enc.comment.as_deref(), Some("hi"));
        assert_eq!(enc.color_mode, Some(PixelFormat::Rgb));
        assert_eq!(enc.pixel_density, PixelDensity::dpi(96, 96));

        assert_eq!(enc.downsample(false).get_subsampling(), Subsampling::S444);
    }

    #[test]
    fn test_quality_clamping() {
        assert_eq!(Encoder::new().quality(0).quality, 1);
        assert_eq!(Encoder::new().quality(150).quality, 100);
    }

    #[test]
    fn test_encoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Encoder>();
    }

    #[test]
    fn test_validate_dimensions() {
        let enc = Encoder::new();
        let data = [0u8; 4];
        for (w, h) in [(0, 1), (1, 0), (65536, 1), (1, 65536)] {
            let err = enc.validate(&Image::gray(&data, w, h)).unwrap_err();
            assert_eq!(err, Error::InvalidDimensions { width: w, height: h });
        }
    }

    #[test]
    fn test_validate_buffer_size() {
        let data = [0u8; 10];
        let err = Encoder::new()
            .validate(&Image::rgb(&data, 2, 2))
            .unwrap_err();
        assert_eq!(
            err,
            Error::BufferSizeMismatch {
                expected: 12,
                actual: 10
            }
        );
    }

    #[test]
    fn test_validate_color_mode() {
        let data = [0u8; 4];
        let err = Encoder::new()
            .color_mode(PixelFormat::Rgb)
            .validate(&Image::gray(&data, 2, 2))
            .unwrap_err();
        assert_eq!(
            err,
            Error::ColorModeMismatch {
                expected: PixelFormat::Rgb,
                actual: PixelFormat::Gray
            }
        );
    }

    #[test]
    fn test_validate_comment_policies() {
        let data = [0u8; 1];
        let image = Image::gray(&data, 1, 1);
        let long = "x".repeat(MAX_COMMENT_LEN + 1);

        let err = Encoder::new().comment(long.clone()).validate(&image).unwrap_err();
        assert_eq!(
            err,
            Error::CommentTooLong {
                len: MAX_COMMENT_LEN + 1,
                max: MAX_COMMENT_LEN
            }
        );

        let enc = Encoder::new()
            .comment(long)
            .comment_policy(CommentPolicy::Truncate);
        let kept = enc.validate(&image).unwrap().unwrap();
        assert_eq!(kept.len(), MAX_COMMENT_LEN);

        let exact = "y".repeat(MAX_COMMENT_LEN);
        let enc = Encoder::new().comment(exact);
        assert_eq!(enc.validate(&image).unwrap().unwrap().len(), MAX_COMMENT_LEN);
    }

    #[test]
    fn test_frame_dimensions() {
        let data = [0u8; 1];
        assert_eq!(frame_dimensions(&Image::gray(&data, 65535, 1)), Ok((65535, 1)));
        assert_eq!(
            frame_dimensions(&Image::gray(&data, 1, 65536)),
            Err(Error::InvalidDimensions {
                width: 1,
                height: 65536
            })
        );
    }

    #[test]
    fn test_planes_444_keeps_full_chroma() {
        let data = vec![0u8; 5 * 3 * 3];
        let planes = Planes::prepare(&Image::rgb(&data, 5, 3), Subsampling::S444).unwrap();
        let chroma = planes.chroma.unwrap();
        assert_eq!((chroma[0].width, chroma[0].height), (5, 3));
        assert_eq!(chroma[1].data.len(), 15);
    }

    #[test]
    fn test_planes_420_dimensions() {
        let data = vec![0u8; 17 * 9 * 3];
        let planes = Planes::prepare(&Image::rgb(&data, 17, 9), Subsampling::S420).unwrap();
        assert_eq!((planes.luma.width, planes.luma.height), (17, 9));
        let chroma = planes.chroma.unwrap();
        assert_eq!((chroma[0].width, chroma[0].height), (9, 5));
        assert_eq!(chroma[1].data.len(), 45);
    }

    #[test]
    fn test_planes_gray_borrows_input() {
        let data = [1u8, 2, 3, 4];
        let planes = Planes::prepare(&Image::gray(&data, 2, 2), Subsampling::S420).unwrap();
        assert!(matches!(planes.luma.data, Cow::Borrowed(_)));
        assert!(planes.chroma.is_none());
    }

    #[test]
    fn test_write_jpeg_flags() {
        let mut out = Vec::new();
        assert!(!write_jpeg(&mut out, &[], 0, 0, false, 90, false, None));
        assert!(out.is_empty());

        assert!(write_jpeg(&mut out, &[128; 4], 2, 2, false, 90, false, Some("c")));
        assert_eq!(&out[..2], &[0xFF, 0xD8]);
        assert_eq!(&out[out.len() - 2..], &[0xFF, 0xD9]);
    }
}
