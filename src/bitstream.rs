//! Bitstream writer for JPEG entropy coding.
//!
//! This module provides bit-level output with:
//! - MSB-first bit packing
//! - Automatic 0xFF byte stuffing (0xFF -> 0xFF 0x00)
//! - 1-bit padding of the final partial byte
//!
//! Completed bytes go to the [`ByteSink`] one at a time, as soon as they
//! are complete.

use crate::sink::ByteSink;

/// Bitstream writer for the entropy-coded segment.
pub struct BitWriter<'a, S: ByteSink + ?Sized> {
    /// Output destination
    sink: &'a mut S,
    /// Pending bits, right-aligned; only the low `bit_count` bits are live
    put_buffer: u32,
    /// Number of pending bits (always < 8 between calls)
    bit_count: u32,
    /// Total bytes written, stuffing included
    bytes_written: usize,
}

impl<'a, S: ByteSink + ?Sized> BitWriter<'a, S> {
    /// Create a new bitstream writer.
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            put_buffer: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Write bits to the bitstream.
    ///
    /// # Arguments
    /// * `code` - The bits to write (right-aligned)
    /// * `size` - Number of bits to write (1-16)
    #[inline]
    pub fn put_bits(&mut self, code: u32, size: u8) {
        debug_assert!(size <= 16, "Size must be <= 16 bits");
        debug_assert!(
            size == 0 || code < (1 << size),
            "Code exceeds size bits"
        );

        let size = size as u32;
        self.put_buffer = (self.put_buffer << size) | code;
        self.bit_count += size;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            let byte = (self.put_buffer >> self.bit_count) as u8;
            self.emit_byte_stuffed(byte);
        }
        self.put_buffer &= (1 << self.bit_count) - 1;
    }

    /// Emit a single byte with 0xFF stuffing.
    #[inline]
    fn emit_byte_stuffed(&mut self, byte: u8) {
        self.sink.put(byte);
        self.bytes_written += 1;

        if byte == 0xFF {
            self.sink.put(0x00);
            self.bytes_written += 1;
        }
    }

    /// Flush remaining bits to output, padding with 1s to byte boundary.
    ///
    /// Called at the end of the entropy-coded segment. The padding uses
    /// 1-bits as required by JPEG.
    pub fn flush(&mut self) {
        if self.bit_count > 0 {
            let padding = 8 - self.bit_count;
            self.put_bits((1 << padding) - 1, padding as u8);
        }
    }

    /// Get the number of bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Whether the writer sits on a byte boundary.
    pub fn is_aligned(&self) -> bool {
        self.bit_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_and_flush(ops: &[(u32, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for &(code, size) in ops {
            writer.put_bits(code, size);
        }
        writer.flush();
        out
    }

    #[test]
    fn test_basic_bits() {
        assert_eq!(write_and_flush(&[(0b10101010, 8)]), vec![0b10101010]);
    }

    #[test]
    fn test_multiple_small_writes() {
        let bytes = write_and_flush(&[(0b11, 2), (0b00, 2), (0b1111, 4)]);
        assert_eq!(bytes, vec![0b11001111]);
    }

    #[test]
    fn test_cross_byte_boundary() {
        // 11110000 1111xxxx (padded with 1s) = 0xF0 0xFF, and 0xFF gets stuffed
        let bytes = write_and_flush(&[(0b111100001111, 12)]);
        assert_eq!(bytes, vec![0xF0, 0xFF, 0x00]);
    }

    #[test]
    fn test_byte_stuffing() {
        assert_eq!(write_and_flush(&[(0xFF, 8)]), vec![0xFF, 0x00]);
    }

    #[test]
    fn test_no_stuffing_for_non_ff() {
        assert_eq!(write_and_flush(&[(0xFE, 8)]), vec![0xFE]);
    }

    #[test]
    fn test_padding_with_ones() {
        // 10101 + 111 padding
        assert_eq!(write_and_flush(&[(0b10101, 5)]), vec![0b10101111]);
    }

    #[test]
    fn test_flush_when_aligned_writes_nothing() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.put_bits(0xAB, 8);
        assert!(writer.is_aligned());
        writer.flush();
        writer.flush();
        assert_eq!(out, vec![0xAB]);
    }

    #[test]
    fn test_large_write() {
        assert_eq!(write_and_flush(&[(0xABCD, 16)]), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_sixteen_bits_on_unaligned_buffer() {
        // 7 pending bits + 16 new bits must not lose anything
        let bytes = write_and_flush(&[(0b1010101, 7), (0xFFFF, 16)]);
        // 1010101 1111111111111111 + 1 pad = 10101011 11111111 11111111
        assert_eq!(bytes, vec![0xAB, 0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn test_bytes_written_count() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);

        writer.put_bits(0xAB, 8);
        writer.put_bits(0xFF, 8);
        writer.put_bits(0xCD, 8);
        writer.flush();

        // AB, FF, 00 (stuffing), CD
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(out, vec![0xAB, 0xFF, 0x00, 0xCD]);
    }

    #[test]
    fn test_bytes_reach_sink_immediately() {
        let mut seen = Vec::new();
        {
            let mut sink = |b: u8| seen.push(b);
            let mut writer = BitWriter::new(&mut sink);
            writer.put_bits(0b1, 1);
            writer.put_bits(0b0101010, 7);
            writer.put_bits(0b1, 1);
        }
        // The trailing bit stays in the accumulator until flush
        assert_eq!(seen, vec![0b10101010]);
    }

    #[test]
    fn test_huffman_like_codes() {
        // 100 101 1010 + 11 padding = 10010110 10111111
        let bytes = write_and_flush(&[(0b100, 3), (0b101, 3), (0b1010, 4)]);
        assert_eq!(bytes, vec![0b10010110, 0b10111111]);
    }
}
