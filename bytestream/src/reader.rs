//! Byte-level reader with bounded operations.

use crate::error::{ByteError, ByteResult};

/// A byte-level reader over a borrowed buffer.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unread tail without consuming it.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Returns the next byte without consuming it.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Reads `len` bytes as a borrowed slice.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(ByteError::EndOfBuffer {
                requested: len,
                available,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> ByteResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ByteResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> ByteResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ByteResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> ByteResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a little-endian `f32`.
    pub fn read_f32_le(&mut self) -> ByteResult<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Reads a little-endian `f64`.
    pub fn read_f64_le(&mut self) -> ByteResult<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Reads a little-endian length prefix of `prefix_bytes` (1 or 2) bytes.
    pub fn read_length_prefix(&mut self, prefix_bytes: u8) -> ByteResult<usize> {
        match prefix_bytes {
            1 => self.read_u8().map(usize::from),
            2 => self.read_u16_le().map(usize::from),
            _ => Err(ByteError::LengthOverflow {
                length: 0,
                prefix_bytes,
            }),
        }
    }
}
