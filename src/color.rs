//! Color space conversion routines.
//!
//! RGB to YCbCr conversion following JFIF / BT.601, using 16-bit fixed-point
//! arithmetic:
//! ```text
//! Y  =        0.299    * R + 0.587    * G + 0.114    * B
//! Cb = 128 -  0.168736 * R - 0.331264 * G + 0.5      * B
//! Cr = 128 +  0.5      * R - 0.418688 * G - 0.081312 * B
//! ```
//! Grayscale input needs no conversion: its samples are the Y plane.

use rgb::FromSlice;

/// Fixed-point precision bits
const SCALEBITS: i32 = 16;

/// Half unit for rounding during right shift
const ONE_HALF: i32 = 1 << (SCALEBITS - 1);

/// Center value for Cb/Cr
const CBCR_CENTER: i32 = 128;

// FIX(x) = round(x * 2^SCALEBITS)
const FIX_0_299: i32 = 19595;
const FIX_0_587: i32 = 38470;
const FIX_0_114: i32 = 7471;
const FIX_0_168736: i32 = 11058;
const FIX_0_331264: i32 = 21710;
const FIX_0_5: i32 = 32768;
const FIX_0_418688: i32 = 27439;
const FIX_0_081312: i32 = 5329;

/// Convert a single RGB pixel to YCbCr.
///
/// Each output is rounded to nearest and clamped to 0-255.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as i32;
    let g = g as i32;
    let b = b as i32;

    let y = (FIX_0_299 * r + FIX_0_587 * g + FIX_0_114 * b + ONE_HALF) >> SCALEBITS;
    let cb = ((-FIX_0_168736 * r - FIX_0_331264 * g + FIX_0_5 * b + ONE_HALF) >> SCALEBITS)
        + CBCR_CENTER;
    let cr = ((FIX_0_5 * r - FIX_0_418688 * g - FIX_0_081312 * b + ONE_HALF) >> SCALEBITS)
        + CBCR_CENTER;

    (
        y.clamp(0, 255) as u8,
        cb.clamp(0, 255) as u8,
        cr.clamp(0, 255) as u8,
    )
}

/// Convert interleaved RGB data into three full-resolution planes.
///
/// # Arguments
/// * `rgb` - Input RGB data (3 bytes per pixel)
/// * `y_out` - Output Y plane
/// * `cb_out` - Output Cb plane
/// * `cr_out` - Output Cr plane
pub fn convert_rgb_to_ycbcr(rgb: &[u8], y_out: &mut [u8], cb_out: &mut [u8], cr_out: &mut [u8]) {
    let pixels = rgb.as_rgb();
    debug_assert_eq!(pixels.len(), y_out.len());
    debug_assert_eq!(pixels.len(), cb_out.len());
    debug_assert_eq!(pixels.len(), cr_out.len());

    for (i, px) in pixels.iter().enumerate() {
        let (y, cb, cr) = rgb_to_ycbcr(px.r, px.g, px.b);
        y_out[i] = y;
        cb_out[i] = cb;
        cr_out[i] = cr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Floating-point reference for comparison.
    fn reference(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        (
            0.299 * r + 0.587 * g + 0.114 * b,
            128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b,
            128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b,
        )
    }

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_ycbcr(0, 0, 0), (0, 128, 128));
        assert_eq!(rgb_to_ycbcr(255, 255, 255), (255, 128, 128));

        let (y, cb, cr) = rgb_to_ycbcr(255, 0, 0);
        assert_eq!(y, 76);
        assert_eq!(cb, 85);
        assert_eq!(cr, 255);

        let (y, cb, cr) = rgb_to_ycbcr(0, 0, 255);
        assert_eq!(y, 29);
        assert_eq!(cb, 255);
        assert_eq!(cr, 107);
    }

    #[test]
    fn test_gray_pixels_have_neutral_chroma() {
        for v in (0..=255u8).step_by(17) {
            let (y, cb, cr) = rgb_to_ycbcr(v, v, v);
            assert_eq!(y, v);
            assert_eq!(cb, 128);
            assert_eq!(cr, 128);
        }
    }

    #[test]
    fn test_matches_float_reference() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
                    let (fy, fcb, fcr) = reference(r, g, b);
                    assert!((y as f64 - fy.clamp(0.0, 255.0)).abs() <= 1.0);
                    assert!((cb as f64 - fcb.clamp(0.0, 255.0)).abs() <= 1.0);
                    assert!((cr as f64 - fcr.clamp(0.0, 255.0)).abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_convert_planes() {
        let rgb = [255, 0, 0, 0, 255, 0, 10, 10, 10];
        let mut y = [0u8; 3];
        let mut cb = [0u8; 3];
        let mut cr = [0u8; 3];
        convert_rgb_to_ycbcr(&rgb, &mut y, &mut cb, &mut cr);

        assert_eq!((y[0], cb[0], cr[0]), rgb_to_ycbcr(255, 0, 0));
        assert_eq!((y[1], cb[1], cr[1]), rgb_to_ycbcr(0, 255, 0));
        assert_eq!((y[2], cb[2], cr[2]), (10, 128, 128));
    }
}
