//! Byte sinks: where encoded output goes.
//!
//! The encoder hands every output byte, in order, to a [`ByteSink`]. Any
//! `FnMut(u8)` closure is a sink, as is `Vec<u8>`. [`IoSink`] adapts a
//! `std::io::Write` and keeps the first error for the caller to inspect.

use std::io::Write;

/// Synchronous, in-order consumer of single bytes.
///
/// Sinks cannot fail from the encoder's point of view; a sink that wraps a
/// fallible destination records the failure itself.
pub trait ByteSink {
    /// Consume one byte.
    fn put(&mut self, byte: u8);

    /// Consume a run of bytes in order.
    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put(b);
        }
    }
}

impl<F: FnMut(u8)> ByteSink for F {
    #[inline]
    fn put(&mut self, byte: u8) {
        self(byte)
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Sink over a `std::io::Write`.
///
/// After the first write error all further bytes are dropped; the error is
/// returned by [`IoSink::finish`].
pub struct IoSink<W: Write> {
    output: W,
    error: Option<std::io::Error>,
}

impl<W: Write> IoSink<W> {
    /// Wrap a writer.
    pub fn new(output: W) -> Self {
        Self {
            output,
            error: None,
        }
    }

    /// Flush the writer and return it, or the first error seen.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.output.flush()?;
        Ok(self.output)
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.put_slice(&[byte]);
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.output.write_all(bytes) {
            self.error = Some(e);
        }
    }
}
