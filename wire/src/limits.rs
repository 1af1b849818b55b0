//! Configurable limits for bounded decoding.

/// Wire-level limits for datagram decoding.
///
/// Every buffer the wire layer accepts or produces, including the working
/// buffer of zero-code expansion, is capped at `max_buffer_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum datagram size in bytes, before and after expansion.
    pub max_buffer_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Matches the receive buffer of the protocol's message system.
            max_buffer_bytes: 8192,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_buffer_bytes: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_buffer_bytes: usize::MAX,
        }
    }
}
