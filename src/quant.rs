//! Quantization tables and block quantization.
//!
//! Tables are the ITU-T T.81 Annex K tables scaled by the IJG quality
//! formula. The quantizer folds the AAN output scale of
//! [`forward_dct_8x8`](crate::dct::forward_dct_8x8) into its divisors, so
//! quantizing a transformed block needs one multiply per coefficient.

use crate::consts::{DCTSIZE, DCTSIZE2, JPEG_NATURAL_ORDER, STD_CHROMA_QUANT, STD_LUMA_QUANT};
use crate::dct::AAN_SCALE_FACTORS;
use crate::types::{FloatBlock, QuantTable, ZigzagBlock};

/// Largest AC coefficient magnitude for 8-bit baseline (size category 10).
pub const MAX_AC_COEF: i32 = 1023;

/// Largest DC coefficient magnitude for 8-bit baseline (size category 11).
pub const MAX_DC_COEF: i32 = 2047;

/// Convert quality (1-100) to the IJG percentage scale factor.
///
/// Quality 50 maps to 100 (tables unchanged), quality 100 to 0.
pub fn quality_scaling(quality: u8) -> u32 {
    let quality = quality.clamp(1, 100) as u32;
    if quality < 50 {
        5000 / quality
    } else {
        200 - 2 * quality
    }
}

impl QuantTable {
    /// Scale a natural-order base table by quality factor.
    ///
    /// The result is stored in zigzag order with every entry in 1..=255.
    pub fn from_quality(base: &[u16; DCTSIZE2], quality: u8) -> Self {
        let scale = quality_scaling(quality);

        let mut values = [0u16; DCTSIZE2];
        for (zz, v) in values.iter_mut().enumerate() {
            let val = (base[JPEG_NATURAL_ORDER[zz]] as u32 * scale + 50) / 100;
            *v = val.clamp(1, 255) as u16;
        }

        Self::new(values)
    }

    /// Standard luminance table at the given quality.
    pub fn luma(quality: u8) -> Self {
        Self::from_quality(&STD_LUMA_QUANT, quality)
    }

    /// Standard chrominance table at the given quality.
    pub fn chroma(quality: u8) -> Self {
        Self::from_quality(&STD_CHROMA_QUANT, quality)
    }
}

/// Luminance (slot 0) and chrominance (slot 1) tables for a quality.
pub fn create_quant_tables(quality: u8) -> [QuantTable; 2] {
    [QuantTable::luma(quality), QuantTable::chroma(quality)]
}

/// Block quantizer for one table.
///
/// Holds `1 / (q * 8 * aan(row) * aan(col))` per natural-order position.
#[derive(Debug, Clone)]
pub struct Quantizer {
    reciprocals: [f32; DCTSIZE2],
}

impl Quantizer {
    /// Precompute reciprocal divisors for a zigzag-ordered table.
    pub fn new(table: &QuantTable) -> Self {
        let mut reciprocals = [0.0f32; DCTSIZE2];
        for (zz, &q) in table.values.iter().enumerate() {
            let pos = JPEG_NATURAL_ORDER[zz];
            let row = pos / DCTSIZE;
            let col = pos % DCTSIZE;
            let divisor =
                q as f64 * 8.0 * AAN_SCALE_FACTORS[row] as f64 * AAN_SCALE_FACTORS[col] as f64;
            reciprocals[pos] = (1.0 / divisor) as f32;
        }
        Self { reciprocals }
    }

    /// Quantize a transformed block, writing the result in zigzag order.
    ///
    /// Values are rounded to nearest and limited to the baseline ranges
    /// (DC within +/-2047, AC within +/-1023).
    pub fn quantize(&self, coeffs: &FloatBlock) -> ZigzagBlock {
        let mut out = [0i16; DCTSIZE2];
        for (zz, dst) in out.iter_mut().enumerate() {
            let pos = JPEG_NATURAL_ORDER[zz];
            let limit = if zz == 0 { MAX_DC_COEF } else { MAX_AC_COEF };
            let v = (coeffs[pos] * self.reciprocals[pos]).round() as i32;
            *dst = v.clamp(-limit, limit) as i16;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dct::{forward_dct_8x8, load_block};

    #[test]
    fn test_quality_scaling() {
        assert_eq!(quality_scaling(50), 100);
        assert_eq!(quality_scaling(100), 0);
        assert_eq!(quality_scaling(1), 5000);
        assert_eq!(quality_scaling(25), 200);
        assert_eq!(quality_scaling(90), 20);
        // Out-of-range values are clamped
        assert_eq!(quality_scaling(0), 5000);
        assert_eq!(quality_scaling(255), 0);
    }

    #[test]
    fn test_quality_50_is_annex_k() {
        let luma = QuantTable::luma(50);
        let chroma = QuantTable::chroma(50);
        for zz in 0..DCTSIZE2 {
            assert_eq!(luma.values[zz], STD_LUMA_QUANT[JPEG_NATURAL_ORDER[zz]]);
            assert_eq!(chroma.values[zz], STD_CHROMA_QUANT[JPEG_NATURAL_ORDER[zz]]);
        }
    }

    #[test]
    fn test_zigzag_storage() {
        let luma = QuantTable::luma(50);
        // zigzag 1 is natural (0,1) = 11, zigzag 2 is natural (1,0) = 12
        assert_eq!(&luma.values[..3], &[16, 11, 12]);
    }

    #[test]
    fn test_extremes() {
        assert!(QuantTable::luma(100).values.iter().all(|&v| v == 1));
        assert!(QuantTable::chroma(1).values.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_range_and_monotonicity() {
        let mut prev = create_quant_tables(1);
        for q in 1..=100u8 {
            let tables = create_quant_tables(q);
            for (table, prev_table) in tables.iter().zip(prev.iter()) {
                for (&v, &p) in table.values.iter().zip(prev_table.values.iter()) {
                    assert!((1..=255).contains(&v), "q{} has {}", q, v);
                    assert!(v <= p, "q{} entry {} above q{} entry {}", q, v, q - 1, p);
                }
            }
            prev = tables;
        }
    }

    #[test]
    fn test_flat_block_quantizes_to_dc_only() {
        let plane = [200u8; DCTSIZE2];
        let mut block = load_block(&plane, 8, 8, 0, 0);
        forward_dct_8x8(&mut block);

        let table = QuantTable::luma(90);
        let zz = Quantizer::new(&table).quantize(&block);

        // True DC is 8 * 72, divided by q = 3 (16 * 20 / 100, rounded)
        assert_eq!(table.values[0], 3);
        assert_eq!(zz[0], 192);
        assert!(zz[1..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_quantize_clamps_to_baseline_range() {
        let quantizer = Quantizer::new(&QuantTable::new([1; DCTSIZE2]));
        let coeffs = [1.0e6f32; DCTSIZE2];
        let zz = quantizer.quantize(&coeffs);
        assert_eq!(zz[0], MAX_DC_COEF as i16);
        assert!(zz[1..].iter().all(|&c| c == MAX_AC_COEF as i16));

        let zz = quantizer.quantize(&[-1.0e6f32; DCTSIZE2]);
        assert_eq!(zz[0], -MAX_DC_COEF as i16);
        assert_eq!(zz[63], -MAX_AC_COEF as i16);
    }

    #[test]
    fn test_quantize_reorders_to_zigzag() {
        let quantizer = Quantizer::new(&QuantTable::new([1; DCTSIZE2]));
        // Only natural position 8 (row 1, col 0) is nonzero: zigzag index 2
        let mut coeffs = [0.0f32; DCTSIZE2];
        coeffs[8] = 8.0 * AAN_SCALE_FACTORS[1] * 5.0;
        let zz = quantizer.quantize(&coeffs);
        assert_eq!(zz[2], 5);
        assert_eq!(zz.iter().filter(|&&c| c != 0).count(), 1);
    }
}
