//! Chroma subsampling for JPEG encoding.
//!
//! Two modes are supported:
//! - 4:4:4 (no subsampling) - chroma planes are used as-is
//! - 4:2:0 (h2v2) - 2:1 horizontal, 2:1 vertical
//!
//! 4:2:0 uses a box filter over each 2x2 group with a constant rounding
//! bias of 2. Odd widths and heights replicate the last column/row, so the
//! output plane is ceil(w/2) x ceil(h/2).

use crate::encode::helpers::try_alloc_vec;
use crate::error::Result;
use crate::types::Subsampling;

/// Downsample one output row from a pair of input rows (4:2:0).
///
/// # Arguments
/// * `row0` - First input row
/// * `row1` - Second input row (the same slice as `row0` at the bottom edge)
/// * `output` - Output row, at least ceil(row0.len() / 2) samples
///
/// # Panics
/// Panics if the rows differ in length or the output is too small.
pub fn downsample_h2v2_rows(row0: &[u8], row1: &[u8], output: &mut [u8]) {
    assert_eq!(row0.len(), row1.len(), "input rows must have same length");
    let output_len = (row0.len() + 1) / 2;
    assert!(output.len() >= output_len, "output buffer too small");

    for (i, out) in output.iter_mut().enumerate().take(output_len) {
        let idx = i * 2;
        let p00 = row0[idx] as u16;
        let p10 = row1[idx] as u16;
        let (p01, p11) = if idx + 1 < row0.len() {
            (row0[idx + 1] as u16, row1[idx + 1] as u16)
        } else {
            (p00, p10) // edge replication
        };
        *out = ((p00 + p01 + p10 + p11 + 2) >> 2) as u8;
    }
}

/// Downsample a full plane 2:1 in both directions.
///
/// # Returns
/// `(plane, output_width, output_height)`
pub fn downsample_h2v2(
    input: &[u8],
    input_width: usize,
    input_height: usize,
) -> Result<(Vec<u8>, usize, usize)> {
    debug_assert_eq!(input.len(), input_width * input_height);

    let output_width = (input_width + 1) / 2;
    let output_height = (input_height + 1) / 2;
    let mut output = try_alloc_vec(0u8, output_width * output_height)?;

    for (oy, out_row) in output.chunks_exact_mut(output_width).enumerate() {
        let y0 = oy * 2;
        let y1 = (y0 + 1).min(input_height - 1);
        let row0 = &input[y0 * input_width..(y0 + 1) * input_width];
        let row1 = &input[y1 * input_width..(y1 + 1) * input_width];
        downsample_h2v2_rows(row0, row1, out_row);
    }

    Ok((output, output_width, output_height))
}

/// Dimensions of a chroma plane for the given subsampling mode.
pub fn chroma_dimensions(width: usize, height: usize, subsampling: Subsampling) -> (usize, usize) {
    match subsampling {
        Subsampling::S444 => (width, height),
        Subsampling::S420 => ((width + 1) / 2, (height + 1) / 2),
    }
}
