//! Byte-level writer for encoding template messages.

use crate::error::{ByteError, ByteResult};

/// A byte-level writer with an optional upper bound on output length.
///
/// Call [`finish`](Self::finish) to get the final byte buffer.
#[derive(Debug)]
pub struct ByteWriter {
    bytes: Vec<u8>,
    limit: usize,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    /// Creates a new unbounded `ByteWriter`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            limit: usize::MAX,
        }
    }

    /// Creates a writer that refuses to grow beyond `limit` bytes.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(limit.min(4096)),
            limit,
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> ByteResult<()> {
        let attempted = self.bytes.len().saturating_add(data.len());
        if attempted > self.limit {
            return Err(ByteError::BufferOverflow {
                attempted,
                capacity: self.limit,
            });
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) -> ByteResult<()> {
        self.write_bytes(&[value])
    }

    /// Writes a little-endian `u16`.
    pub fn write_u16_le(&mut self, value: u16) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a big-endian `u16`.
    pub fn write_u16_be(&mut self, value: u16) -> ByteResult<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Writes a little-endian `u32`.
    pub fn write_u32_le(&mut self, value: u32) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a big-endian `u32`.
    pub fn write_u32_be(&mut self, value: u32) -> ByteResult<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Writes a little-endian `u64`.
    pub fn write_u64_le(&mut self, value: u64) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a little-endian `f32`.
    pub fn write_f32_le(&mut self, value: f32) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a little-endian `f64`.
    pub fn write_f64_le(&mut self, value: f64) -> ByteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Writes a little-endian length prefix of `prefix_bytes` (1 or 2) bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::LengthOverflow`] if `length` does not fit in the prefix.
    pub fn write_length_prefix(&mut self, length: usize, prefix_bytes: u8) -> ByteResult<()> {
        let overflow = ByteError::LengthOverflow {
            length,
            prefix_bytes,
        };
        match prefix_bytes {
            1 => self.write_u8(u8::try_from(length).map_err(|_| overflow)?),
            2 => self.write_u16_le(u16::try_from(length).map_err(|_| overflow)?),
            _ => Err(overflow),
        }
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
