//! JPEG marker emission for encoding.
//!
//! This module handles writing the container segments of a baseline file:
//! - SOI (Start of Image)
//! - APP0 (JFIF header)
//! - COM (Comment)
//! - DQT (Define Quantization Table)
//! - SOF0 (Start of Frame, baseline)
//! - DHT (Define Huffman Table)
//! - SOS (Start of Scan)
//! - EOI (End of Image)
//!
//! Bytes go to the sink unstuffed. Multi-byte fields are big-endian.
//!
//! Reference: ITU-T T.81 Section B

use crate::consts::{
    JPEG_APP0, JPEG_COM, JPEG_DHT, JPEG_DQT, JPEG_EOI, JPEG_SOF0, JPEG_SOI, JPEG_SOS,
    MAX_COMMENT_LEN,
};
use crate::huffman::HuffTable;
use crate::sink::ByteSink;
use crate::types::{ComponentInfo, PixelDensity, QuantTable, ScanInfo};

/// JFIF identifier
const JFIF_ID: [u8; 5] = *b"JFIF\0";

/// JFIF version 1.01
const JFIF_VERSION: [u8; 2] = [1, 1];

/// Baseline sample precision
const PRECISION: u8 = 8;

/// Marker writer for JPEG encoding.
pub struct MarkerWriter<'a, S: ByteSink + ?Sized> {
    sink: &'a mut S,
    bytes_written: usize,
}

impl<'a, S: ByteSink + ?Sized> MarkerWriter<'a, S> {
    /// Create a new marker writer.
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            bytes_written: 0,
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        self.sink.put(byte);
        self.bytes_written += 1;
    }

    fn emit_bytes(&mut self, bytes: &[u8]) {
        self.sink.put_slice(bytes);
        self.bytes_written += bytes.len();
    }

    /// Write a 2-byte value in big-endian order.
    fn emit_2bytes(&mut self, value: u16) {
        self.emit_bytes(&value.to_be_bytes());
    }

    /// Write a marker (0xFF followed by marker code).
    fn emit_marker(&mut self, marker: u8) {
        self.emit_byte(0xFF);
        self.emit_byte(marker);
    }

    /// Write Start of Image marker.
    pub fn write_soi(&mut self) {
        log::trace!("SOI");
        self.emit_marker(JPEG_SOI);
    }

    /// Write End of Image marker.
    pub fn write_eoi(&mut self) {
        log::trace!("EOI");
        self.emit_marker(JPEG_EOI);
    }

    /// Write APP0 (JFIF) marker without a thumbnail.
    pub fn write_jfif_app0(&mut self, density: &PixelDensity) {
        log::trace!(
            "APP0 JFIF, density {:?} {}x{}",
            density.unit,
            density.x,
            density.y
        );
        self.emit_marker(JPEG_APP0);

        // 2 (length) + 5 (identifier) + 2 (version) + 1 (units) +
        // 4 (densities) + 2 (thumbnail size)
        self.emit_2bytes(16);
        self.emit_bytes(&JFIF_ID);
        self.emit_bytes(&JFIF_VERSION);
        self.emit_byte(density.unit as u8);
        self.emit_2bytes(density.x);
        self.emit_2bytes(density.y);
        self.emit_byte(0); // thumbnail width
        self.emit_byte(0); // thumbnail height
    }

    /// Write a comment marker carrying `comment` verbatim.
    ///
    /// The caller guarantees `comment.len() <= MAX_COMMENT_LEN`.
    pub fn write_com(&mut self, comment: &[u8]) {
        debug_assert!(comment.len() <= MAX_COMMENT_LEN);
        log::trace!("COM, {} bytes", comment.len());
        self.emit_marker(JPEG_COM);
        self.emit_2bytes(2 + comment.len() as u16);
        self.emit_bytes(comment);
    }

    /// Write one DQT marker holding several 8-bit tables.
    ///
    /// # Arguments
    /// * `tables` - Slice of (table slot, table in zigzag order)
    pub fn write_dqt_multiple(&mut self, tables: &[(u8, &QuantTable)]) {
        if tables.is_empty() {
            return;
        }
        log::trace!("DQT, {} tables", tables.len());

        // Pq/Tq + 64 values per table
        let total_len = 2 + tables.len() as u16 * 65;
        self.emit_marker(JPEG_DQT);
        self.emit_2bytes(total_len);

        for (slot, table) in tables {
            // Pq = 0 (8-bit) in high nibble, Tq in low nibble
            self.emit_byte(slot & 0x0F);
            for &value in table.values.iter() {
                debug_assert!((1..=255).contains(&value));
                self.emit_byte(value as u8);
            }
        }
    }

    /// Write the baseline Start of Frame marker.
    ///
    /// `width` and `height` are the true image size, not the padded size.
    pub fn write_sof0(&mut self, width: u16, height: u16, components: &[ComponentInfo]) {
        log::trace!("SOF0 {}x{}, {} components", width, height, components.len());
        self.emit_marker(JPEG_SOF0);

        // 2 (length) + 1 (precision) + 2 (height) + 2 (width) +
        // 1 (component count) + 3 per component
        let num_components = components.len() as u16;
        self.emit_2bytes(8 + 3 * num_components);

        self.emit_byte(PRECISION);
        self.emit_2bytes(height);
        self.emit_2bytes(width);
        self.emit_byte(num_components as u8);

        for comp in components {
            self.emit_byte(comp.component_id);
            self.emit_byte((comp.h_samp_factor << 4) | comp.v_samp_factor);
            self.emit_byte(comp.quant_tbl_no);
        }
    }

    /// Write one DHT marker holding several tables.
    ///
    /// # Arguments
    /// * `tables` - Slice of (table slot, is_ac, table)
    pub fn write_dht_multiple(&mut self, tables: &[(u8, bool, &HuffTable)]) {
        if tables.is_empty() {
            return;
        }
        log::trace!("DHT, {} tables", tables.len());

        // Tc/Th + 16 counts + symbols per table
        let total_len: usize = 2 + tables
            .iter()
            .map(|(_, _, table)| 17 + table.num_symbols())
            .sum::<usize>();

        self.emit_marker(JPEG_DHT);
        self.emit_2bytes(total_len as u16);

        for (slot, is_ac, table) in tables {
            // Tc (class) in high nibble, Th (slot) in low nibble
            let class = if *is_ac { 0x10 } else { 0x00 };
            self.emit_byte(class | (slot & 0x0F));
            self.emit_bytes(&table.bits[1..]);
            self.emit_bytes(table.symbols());
        }
    }

    /// Write Start of Scan marker.
    ///
    /// # Arguments
    /// * `scan` - Scan parameters
    /// * `components` - Frame components, indexed by `scan.component_index`
    pub fn write_sos(&mut self, scan: &ScanInfo, components: &[ComponentInfo]) {
        log::trace!("SOS, {} components", scan.comps_in_scan);
        self.emit_marker(JPEG_SOS);

        // 2 (length) + 1 (Ns) + 2 per component + 3 (Ss, Se, Ah/Al)
        self.emit_2bytes(6 + 2 * scan.comps_in_scan as u16);
        self.emit_byte(scan.comps_in_scan);

        for &idx in &scan.component_index[..scan.comps_in_scan as usize] {
            let comp = &components[idx as usize];
            self.emit_byte(comp.component_id);
            // DC table in high nibble, AC table in low nibble
            self.emit_byte((comp.dc_tbl_no << 4) | comp.ac_tbl_no);
        }

        self.emit_byte(scan.ss);
        self.emit_byte(scan.se);
        self.emit_byte((scan.ah << 4) | scan.al);
    }

    /// Get total bytes written.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Access the underlying sink, e.g. to stream scan data between segments.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut *self.sink
    }
}
