//! Limits for codec-level decoding and parsing.

/// Codec limits enforced on top of the wire limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Framing limits, also applied to encoded datagrams.
    pub wire: wire::Limits,
    /// Maximum size of message text accepted by the parser.
    pub max_text_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            wire: wire::Limits::default(),
            max_text_bytes: 256 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            wire: wire::Limits::for_testing(),
            max_text_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            wire: wire::Limits::unlimited(),
            max_text_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_reasonable() {
        let limits = CodecLimits::default();
        assert_eq!(limits.wire.max_buffer_bytes, 8192);
        assert!(limits.max_text_bytes >= limits.wire.max_buffer_bytes * 3);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = CodecLimits::for_testing();
        let default_limits = CodecLimits::default();
        assert!(test_limits.wire.max_buffer_bytes < default_limits.wire.max_buffer_bytes);
        assert!(test_limits.max_text_bytes < default_limits.max_text_bytes);
    }

    #[test]
    fn unlimited_limits() {
        let limits = CodecLimits::unlimited();
        assert_eq!(limits.max_text_bytes, usize::MAX);
    }
}
