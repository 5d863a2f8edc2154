//! Forward DCT (Discrete Cosine Transform) implementation.
//!
//! This implements the Arai-Agui-Nakajima (AAN) algorithm for the 8x8 DCT
//! in floating point, matching libjpeg's jfdctflt.c.
//!
//! The algorithm uses 5 multiplies and 29 adds per 1-D DCT.
//! A 2-D DCT is done by 1-D DCT on rows followed by 1-D DCT on columns.
//!
//! Note: coefficient (u, v) comes out scaled by `8 * aan(u) * aan(v)`
//! compared to the true DCT, where `aan(0) = 1` and
//! `aan(k) = sqrt(2) * cos(k * pi / 16)`. The scale is folded into the
//! quantization divisors (see [`crate::quant::Quantizer`]).
//!
//! Reference: Y. Arai, T. Agui and M. Nakajima,
//! "A Fast DCT-SQ Scheme for Images", Trans. IEICE E-71(11), 1988.

use crate::consts::{DCTSIZE, DCTSIZE2};
use crate::types::FloatBlock;
use multiversion::multiversion;

/// Per-frequency output scale of the AAN transform, `aan(k)`.
pub const AAN_SCALE_FACTORS: [f32; DCTSIZE] = [
    1.0,
    1.387_039_8,
    1.306_563,
    1.175_875_6,
    1.0,
    0.785_694_96,
    0.541_196_1,
    0.275_899_38,
];

const FIX_0_382683433: f32 = 0.382_683_43;
const FIX_0_541196100: f32 = 0.541_196_1;
const FIX_0_707106781: f32 = 0.707_106_77;
const FIX_1_306562965: f32 = 1.306_563;

/// Extract the 8x8 block whose top-left pixel is `(bx, by)`.
///
/// Positions past the right or bottom edge of the plane repeat the last
/// column or row. Samples are level-shifted by -128.
pub fn load_block(plane: &[u8], plane_width: usize, plane_height: usize, bx: usize, by: usize) -> FloatBlock {
    debug_assert!(plane_width > 0 && plane_height > 0);
    debug_assert_eq!(plane.len(), plane_width * plane_height);

    let mut block = [0.0f32; DCTSIZE2];
    for y in 0..DCTSIZE {
        let sy = (by + y).min(plane_height - 1);
        let row = &plane[sy * plane_width..(sy + 1) * plane_width];
        for x in 0..DCTSIZE {
            let sx = (bx + x).min(plane_width - 1);
            block[y * DCTSIZE + x] = row[sx] as f32 - 128.0;
        }
    }
    block
}

/// One 1-D AAN pass over eight values `stride` apart, starting at `base`.
#[inline(always)]
fn fdct_1d(data: &mut [f32; DCTSIZE2], base: usize, stride: usize) {
    let at = |i: usize| base + i * stride;

    let tmp0 = data[at(0)] + data[at(7)];
    let tmp7 = data[at(0)] - data[at(7)];
    let tmp1 = data[at(1)] + data[at(6)];
    let tmp6 = data[at(1)] - data[at(6)];
    let tmp2 = data[at(2)] + data[at(5)];
    let tmp5 = data[at(2)] - data[at(5)];
    let tmp3 = data[at(3)] + data[at(4)];
    let tmp4 = data[at(3)] - data[at(4)];

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    data[at(0)] = tmp10 + tmp11;
    data[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * FIX_0_707106781;
    data[at(2)] = tmp13 + z1;
    data[at(6)] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    // The rotator is modified from fig 4-8 to avoid extra negations.
    let z5 = (tmp10 - tmp12) * FIX_0_382683433;
    let z2 = FIX_0_541196100 * tmp10 + z5;
    let z4 = FIX_1_306562965 * tmp12 + z5;
    let z3 = tmp11 * FIX_0_707106781;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    data[at(5)] = z13 + z2;
    data[at(3)] = z13 - z2;
    data[at(1)] = z11 + z4;
    data[at(7)] = z11 - z4;
}

/// Perform the forward DCT on one 8x8 block, in place.
///
/// Input is level-shifted samples in natural (row-major) order; output is
/// AAN-scaled coefficients in natural order.
///
/// Uses `multiversion` for automatic SIMD optimization via autovectorization.
#[multiversion(targets(
    "x86_64+avx2",
    "x86_64+sse4.1",
    "x86+avx2",
    "x86+sse4.1",
    "aarch64+neon",
))]
pub fn forward_dct_8x8(data: &mut FloatBlock) {
    // Pass 1: process rows
    for row in 0..DCTSIZE {
        fdct_1d(data, row * DCTSIZE, 1);
    }

    // Pass 2: process columns
    for col in 0..DCTSIZE {
        fdct_1d(data, col, DCTSIZE);
    }
}
