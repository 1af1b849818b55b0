//! Error types for byte stream operations.

use std::fmt;

/// Result type for byte stream operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur during byte-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Attempted to write past the writer's limit.
    BufferOverflow {
        /// Total length the write would have produced.
        attempted: usize,
        /// Maximum capacity in bytes.
        capacity: usize,
    },

    /// A length does not fit in the prefix width used to encode it.
    LengthOverflow {
        /// The length that was too large.
        length: usize,
        /// Width of the prefix in bytes.
        prefix_bytes: u8,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::BufferOverflow {
                attempted,
                capacity,
            } => {
                write!(
                    f,
                    "attempted to write {attempted} bytes but buffer capacity is {capacity} bytes"
                )
            }
            Self::LengthOverflow {
                length,
                prefix_bytes,
            } => {
                write!(
                    f,
                    "length {length} does not fit in a {prefix_bytes}-byte prefix"
                )
            }
        }
    }
}

impl std::error::Error for ByteError {}
