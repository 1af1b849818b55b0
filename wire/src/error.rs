//! Error types for wire format operations.

use std::fmt;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// High-level decode errors for datagram framing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Captured buffer exceeds the configured maximum.
    BufferTooLarge { actual: usize, limit: usize },

    /// Buffer is structurally invalid.
    MalformedPacket(MalformedReason),
}

/// Why a datagram was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Fewer bytes than a header plus message id.
    TooShort { actual: usize, required: usize },

    /// Ack count claims more trailing ids than the buffer can hold.
    AckTrailer { count: u8, available: usize },

    /// A zero byte at the end of the buffer has no run-length count.
    MissingZeroCount { offset: usize },

    /// Expanding zero runs would exceed the buffer limit.
    ExpansionOverflow { limit: usize },
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Encoded datagram would exceed the buffer limit.
    BufferTooLarge { needed: usize, limit: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooLarge { actual, limit } => {
                write!(f, "buffer too large: {actual} bytes > {limit}")
            }
            Self::MalformedPacket(reason) => write!(f, "malformed packet: {reason}"),
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { actual, required } => {
                write!(f, "{actual} bytes, need at least {required}")
            }
            Self::AckTrailer { count, available } => {
                write!(f, "ack count {count} does not fit in {available} bytes")
            }
            Self::MissingZeroCount { offset } => {
                write!(f, "zero byte at offset {offset} has no run count")
            }
            Self::ExpansionOverflow { limit } => {
                write!(f, "zero-code expansion exceeds {limit} bytes")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooLarge { needed, limit } => {
                write!(f, "encoded datagram too large: need {needed}, limit {limit}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}

impl From<MalformedReason> for DecodeError {
    fn from(reason: MalformedReason) -> Self {
        Self::MalformedPacket(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_too_large() {
        let err = DecodeError::BufferTooLarge {
            actual: 9000,
            limit: 8192,
        };
        let msg = err.to_string();
        assert!(msg.contains("9000"));
        assert!(msg.contains("8192"));
    }

    #[test]
    fn decode_error_display_malformed() {
        let err = DecodeError::from(MalformedReason::AckTrailer {
            count: 4,
            available: 10,
        });
        let msg = err.to_string();
        assert!(msg.starts_with("malformed packet"));
        assert!(msg.contains("ack count 4"));
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::BufferTooLarge {
            needed: 10,
            limit: 4,
        };
        assert!(err.to_string().contains("too large"));
    }
}
