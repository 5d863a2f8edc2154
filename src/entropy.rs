//! Huffman entropy encoder for JPEG.
//!
//! This module implements baseline Huffman encoding for quantized blocks:
//! - DC coefficient encoding with differential coding
//! - AC coefficient encoding with run-length coding
//! - EOB (End of Block) and ZRL (Zero Run Length) symbols
//!
//! Blocks arrive already in zigzag order, index 0 being the DC term.
//!
//! Reference: ITU-T T.81 Section F.1.2

use crate::bitstream::BitWriter;
use crate::consts::{DCTSIZE2, MAX_COMPONENTS};
use crate::huffman::DerivedTable;
use crate::sink::ByteSink;
use crate::types::ZigzagBlock;

/// EOB (End of Block) symbol - encodes as run=0, size=0
const EOB: u8 = 0x00;

/// ZRL (Zero Run Length 16) symbol - encodes 16 consecutive zeros
const ZRL: u8 = 0xF0;

/// Largest DC difference category for 8-bit samples
const MAX_DC_BITS: u8 = 11;

/// Number of bits needed to represent a value (its JPEG size category).
///
/// - 0 → 0 bits
/// - ±1 → 1 bit
/// - ±2..3 → 2 bits
/// - etc.
#[inline]
pub fn jpeg_nbits(value: i32) -> u8 {
    32 - value.unsigned_abs().leading_zeros() as u8
}

/// Additional bits for a value of category `nbits`.
///
/// Negative values are sent as `value - 1` masked to `nbits`, so their
/// leading bit is 0.
#[inline]
fn value_bits(value: i32, nbits: u8) -> u32 {
    let v = if value < 0 { value - 1 } else { value };
    (v as u32) & ((1u32 << nbits) - 1)
}

/// Entropy encoder state for a single scan.
pub struct EntropyEncoder<'w, 'a, S: ByteSink + ?Sized> {
    /// Bitstream writer
    writer: &'w mut BitWriter<'a, S>,
    /// Last DC value for each component (for differential coding)
    last_dc_val: [i32; MAX_COMPONENTS],
}

impl<'w, 'a, S: ByteSink + ?Sized> EntropyEncoder<'w, 'a, S> {
    /// Create a new entropy encoder with all DC predictors at zero.
    pub fn new(writer: &'w mut BitWriter<'a, S>) -> Self {
        Self {
            writer,
            last_dc_val: [0; MAX_COMPONENTS],
        }
    }

    /// Encode a single 8x8 block.
    ///
    /// # Arguments
    /// * `block` - Quantized coefficients in zigzag order
    /// * `component` - Component index, selects the DC predictor
    /// * `dc_table` - Derived DC Huffman table
    /// * `ac_table` - Derived AC Huffman table
    pub fn encode_block(
        &mut self,
        block: &ZigzagBlock,
        component: usize,
        dc_table: &DerivedTable,
        ac_table: &DerivedTable,
    ) {
        self.encode_dc(block[0] as i32, component, dc_table);
        self.encode_ac(block, ac_table);
    }

    /// Encode the DC coefficient as the difference from the previous DC
    /// value of the same component.
    fn encode_dc(&mut self, dc: i32, component: usize, dc_table: &DerivedTable) {
        let diff = dc - self.last_dc_val[component];
        self.last_dc_val[component] = dc;

        let nbits = jpeg_nbits(diff);
        debug_assert!(nbits <= MAX_DC_BITS, "DC difference {} out of range", diff);

        let (code, size) = dc_table.get_code(nbits);
        self.writer.put_bits(code, size);

        if nbits > 0 {
            self.writer.put_bits(value_bits(diff, nbits), nbits);
        }
    }

    /// Encode AC coefficients 1..=63 as (run, size) symbols.
    fn encode_ac(&mut self, block: &ZigzagBlock, ac_table: &DerivedTable) {
        let mut run = 0u8;

        for &coef in &block[1..DCTSIZE2] {
            if coef == 0 {
                run += 1;
                continue;
            }

            while run >= 16 {
                let (code, size) = ac_table.get_code(ZRL);
                self.writer.put_bits(code, size);
                run -= 16;
            }

            let coef = coef as i32;
            let nbits = jpeg_nbits(coef);
            let (code, size) = ac_table.get_code((run << 4) | nbits);
            self.writer.put_bits(code, size);
            self.writer.put_bits(value_bits(coef, nbits), nbits);
            run = 0;
        }

        // Trailing zeros collapse into EOB; a nonzero coefficient 63 needs none
        if run > 0 {
            let (code, size) = ac_table.get_code(EOB);
            self.writer.put_bits(code, size);
        }
    }
}
