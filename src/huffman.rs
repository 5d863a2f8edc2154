//! Huffman tables for baseline encoding.
//!
//! A [`HuffTable`] is the raw form carried in a DHT segment: code counts per
//! length plus the symbols in code order. [`DerivedTable`] expands it into
//! code/length pairs indexed by symbol (ITU-T T.81 Figures C.1-C.3), so that
//! emitting a symbol is a single lookup.
//!
//! Only the four Annex K tables are used; they are derived once per encode.

use crate::consts::{
    AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES, AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES,
    DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES, DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES,
};
use crate::error::{Error, Result};

/// Maximum code length allowed by JPEG (16 bits)
pub const MAX_CODE_LENGTH: usize = 16;

/// A Huffman table in DHT form (bits + values).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffTable {
    /// Number of codes of each length (`bits[0]` is unused)
    pub bits: [u8; MAX_CODE_LENGTH + 1],
    /// Symbol values in order of increasing code length
    pub huffval: [u8; 256],
}

impl Default for HuffTable {
    fn default() -> Self {
        Self {
            bits: [0; MAX_CODE_LENGTH + 1],
            huffval: [0; 256],
        }
    }
}

impl HuffTable {
    /// Build a table from length counts and the symbol list.
    pub fn from_bits_and_values(bits: &[u8; MAX_CODE_LENGTH + 1], values: &[u8]) -> Self {
        let mut htbl = Self {
            bits: *bits,
            ..Self::default()
        };
        htbl.huffval[..values.len()].copy_from_slice(values);
        htbl
    }

    /// Number of symbols defined by `bits`.
    pub fn num_symbols(&self) -> usize {
        self.bits[1..].iter().map(|&b| b as usize).sum()
    }

    /// Symbols in code order.
    pub fn symbols(&self) -> &[u8] {
        &self.huffval[..self.num_symbols().min(256)]
    }
}

/// Standard DC luminance table (Annex K.3, Table K.3).
pub fn std_dc_luma() -> HuffTable {
    HuffTable::from_bits_and_values(&DC_LUMINANCE_BITS, &DC_LUMINANCE_VALUES)
}

/// Standard AC luminance table (Annex K.3, Table K.5).
pub fn std_ac_luma() -> HuffTable {
    HuffTable::from_bits_and_values(&AC_LUMINANCE_BITS, &AC_LUMINANCE_VALUES)
}

/// Standard DC chrominance table (Annex K.3, Table K.4).
pub fn std_dc_chroma() -> HuffTable {
    HuffTable::from_bits_and_values(&DC_CHROMINANCE_BITS, &DC_CHROMINANCE_VALUES)
}

/// Standard AC chrominance table (Annex K.3, Table K.6).
pub fn std_ac_chroma() -> HuffTable {
    HuffTable::from_bits_and_values(&AC_CHROMINANCE_BITS, &AC_CHROMINANCE_VALUES)
}

/// Huffman table expanded for encoding: code and length by symbol.
#[derive(Clone, Debug)]
pub struct DerivedTable {
    /// Code for each symbol, right-aligned
    pub codes: [u32; 256],
    /// Code length for each symbol (0 means the symbol has no code)
    pub lengths: [u8; 256],
}

impl DerivedTable {
    /// Derive the encoding table from a raw table.
    ///
    /// `is_dc` restricts symbols to 0..=15. Fails with
    /// [`Error::InvalidHuffmanTable`] if the counts overflow 256 symbols or
    /// their code space (the all-ones code is reserved), or a symbol is out
    /// of range or repeated.
    pub fn from_huff_table(htbl: &HuffTable, is_dc: bool) -> Result<Self> {
        // Figure C.1: code length of each symbol position
        let mut huffsize = [0u8; 257];
        let mut count = 0usize;
        for len in 1..=MAX_CODE_LENGTH {
            let n = htbl.bits[len] as usize;
            if count + n > 256 {
                return Err(Error::InvalidHuffmanTable);
            }
            huffsize[count..count + n].fill(len as u8);
            count += n;
        }

        // Figure C.2: canonical codes
        let mut huffcode = [0u32; 256];
        let mut code = 0u32;
        let mut len = huffsize[0] as u32;
        let mut p = 0usize;
        while p < count {
            while p < count && huffsize[p] as u32 == len {
                huffcode[p] = code;
                code += 1;
                p += 1;
            }
            if code >= (1 << len) {
                return Err(Error::InvalidHuffmanTable);
            }
            code <<= 1;
            len += 1;
        }

        // Figure C.3: index by symbol
        let max_symbol = if is_dc { 15 } else { 255 };
        let mut codes = [0u32; 256];
        let mut lengths = [0u8; 256];
        for i in 0..count {
            let symbol = htbl.huffval[i] as usize;
            if symbol > max_symbol || lengths[symbol] != 0 {
                return Err(Error::InvalidHuffmanTable);
            }
            codes[symbol] = huffcode[i];
            lengths[symbol] = huffsize[i];
        }

        Ok(Self { codes, lengths })
    }

    /// Code and length for a symbol; length 0 if the symbol has no code.
    #[inline]
    pub fn get_code(&self, symbol: u8) -> (u32, u8) {
        let idx = symbol as usize;
        (self.codes[idx], self.lengths[idx])
    }
}

/// The DC and AC tables for luminance (slot 0) and chrominance (slot 1).
#[derive(Clone, Debug)]
pub struct HuffmanTables {
    /// DC tables by slot
    pub dc: [DerivedTable; 2],
    /// AC tables by slot
    pub ac: [DerivedTable; 2],
}

impl HuffmanTables {
    /// Derive the four Annex K tables.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            dc: [
                DerivedTable::from_huff_table(&std_dc_luma(), true)?,
                DerivedTable::from_huff_table(&std_dc_chroma(), true)?,
            ],
            ac: [
                DerivedTable::from_huff_table(&std_ac_luma(), false)?,
                DerivedTable::from_huff_table(&std_ac_chroma(), false)?,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_luma_codes() {
        let dtbl = DerivedTable::from_huff_table(&std_dc_luma(), true).unwrap();

        // Table K.3: category 0 = 00, 1 = 010, 2 = 011, 11 = 111111110
        assert_eq!(dtbl.get_code(0), (0b00, 2));
        assert_eq!(dtbl.get_code(1), (0b010, 3));
        assert_eq!(dtbl.get_code(2), (0b011, 3));
        assert_eq!(dtbl.get_code(6), (0b1110, 4));
        assert_eq!(dtbl.get_code(11), (0b1_1111_1110, 9));
    }

    #[test]
    fn test_dc_chroma_codes() {
        let dtbl = DerivedTable::from_huff_table(&std_dc_chroma(), true).unwrap();

        // Table K.4: categories 0..2 share length 2, 11 is eleven bits
        assert_eq!(dtbl.get_code(0), (0b00, 2));
        assert_eq!(dtbl.get_code(2), (0b10, 2));
        assert_eq!(dtbl.get_code(3), (0b110, 3));
        assert_eq!(dtbl.get_code(11), (0b111_1111_1110, 11));
    }

    #[test]
    fn test_ac_luma_codes() {
        let dtbl = DerivedTable::from_huff_table(&std_ac_luma(), false).unwrap();

        // Table K.5
        assert_eq!(dtbl.get_code(0x00), (0b1010, 4)); // EOB
        assert_eq!(dtbl.get_code(0x01), (0b00, 2));
        assert_eq!(dtbl.get_code(0x02), (0b01, 2));
        assert_eq!(dtbl.get_code(0x11), (0b1100, 4));
        assert_eq!(dtbl.get_code(0xF0), (0b111_1111_1001, 11)); // ZRL
    }

    #[test]
    fn test_ac_chroma_codes() {
        let dtbl = DerivedTable::from_huff_table(&std_ac_chroma(), false).unwrap();

        // Table K.6
        assert_eq!(dtbl.get_code(0x00), (0b00, 2)); // EOB
        assert_eq!(dtbl.get_code(0x01), (0b01, 2));
        assert_eq!(dtbl.get_code(0xF0), (0b11_1111_1010, 10)); // ZRL
    }

    #[test]
    fn test_every_ac_symbol_is_coded() {
        // Baseline AC needs every (run, size) with size 1..=10, plus EOB and ZRL
        let tables = HuffmanTables::standard().unwrap();
        for ac in &tables.ac {
            for run in 0..16u8 {
                for size in 1..=10u8 {
                    assert!(ac.get_code((run << 4) | size).1 > 0);
                }
            }
            assert!(ac.get_code(0x00).1 > 0);
            assert!(ac.get_code(0xF0).1 > 0);
        }
        for dc in &tables.dc {
            for size in 0..=11u8 {
                assert!(dc.get_code(size).1 > 0);
            }
        }
    }

    #[test]
    fn test_num_symbols() {
        assert_eq!(std_dc_luma().num_symbols(), 12);
        assert_eq!(std_ac_chroma().num_symbols(), 162);
        assert_eq!(std_ac_luma().symbols()[..3], [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_invalid_table_too_many_symbols() {
        let mut htbl = HuffTable::default();
        htbl.bits[1] = 255;
        htbl.bits[2] = 10;
        assert_eq!(
            DerivedTable::from_huff_table(&htbl, false).unwrap_err(),
            Error::InvalidHuffmanTable
        );
    }

    #[test]
    fn test_invalid_table_overfull_code_space() {
        // Three 1-bit codes cannot exist
        let mut htbl = HuffTable::default();
        htbl.bits[1] = 3;
        htbl.huffval[..3].copy_from_slice(&[0, 1, 2]);
        assert!(DerivedTable::from_huff_table(&htbl, false).is_err());
    }

    #[test]
    fn test_dc_symbol_range() {
        let mut htbl = HuffTable::default();
        htbl.bits[1] = 1;
        htbl.huffval[0] = 16;

        assert!(DerivedTable::from_huff_table(&htbl, true).is_err());
        assert!(DerivedTable::from_huff_table(&htbl, false).is_ok());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut htbl = HuffTable::default();
        htbl.bits[2] = 2;
        htbl.huffval[..2].copy_from_slice(&[5, 5]);
        assert!(DerivedTable::from_huff_table(&htbl, true).is_err());
    }
}
