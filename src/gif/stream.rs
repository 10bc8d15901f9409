//! Growable output byte buffer, doubling capacity from an initial default.

use byteorder::{LittleEndian, WriteBytesExt};

const DEFAULT_CAPACITY: usize = 4096;

/// A growable byte buffer backing a [`super::GifEncoder`]. All writes are
/// infallible in memory; a `Vec<u8>` underneath never actually needs to
/// report `std::io::Error`, but [`Stream`] still implements `std::io::Write`
/// so it composes with code that expects a sink.
#[derive(Debug, Default)]
pub(crate) struct Stream {
    buf: Vec<u8>,
}

impl Stream {
    pub(crate) fn new() -> Self {
        Stream {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.buf.clear();
    }

    pub(crate) fn write_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub(crate) fn write_bytes(&mut self, bytes: impl IntoIterator<Item = u8>) {
        self.buf.extend(bytes);
    }

    pub(crate) fn write_u16(&mut self, value: u16) {
        // Stream's backing Vec<u8> never fails to grow; unwrap is safe.
        self.buf.write_u16::<LittleEndian>(value).unwrap();
    }

    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }

    pub(crate) fn bytes_view(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_u16_is_little_endian() {
        let mut s = Stream::new();
        s.write_u16(0x1234);
        assert_eq!(s.bytes_view(), &[0x34, 0x12]);
    }

    #[test]
    fn reset_clears_but_keeps_capacity() {
        let mut s = Stream::new();
        s.write_bytes([1, 2, 3]);
        s.reset();
        assert_eq!(s.len(), 0);
    }
}
