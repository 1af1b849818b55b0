//! Message numbers and their frequency-dependent encodings.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency class of a message, which determines its id width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Frequency {
    /// One byte: `[n]`.
    High,
    /// Two bytes: `[0xFF, n]`.
    Medium,
    /// Four bytes: `[0xFF, 0xFF, hi, lo]`.
    Low,
    /// Four bytes: `[0xFF, 0xFF, 0xFF, n]`.
    Fixed,
}

/// A message number qualified by its frequency class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireId {
    pub frequency: Frequency,
    pub number: u16,
}

const ESCAPE: u8 = 0xFF;

impl WireId {
    /// Creates a high-frequency id.
    #[must_use]
    pub const fn high(number: u8) -> Self {
        Self {
            frequency: Frequency::High,
            number: number as u16,
        }
    }

    /// Creates a medium-frequency id.
    #[must_use]
    pub const fn medium(number: u8) -> Self {
        Self {
            frequency: Frequency::Medium,
            number: number as u16,
        }
    }

    /// Creates a low-frequency id.
    #[must_use]
    pub const fn low(number: u16) -> Self {
        Self {
            frequency: Frequency::Low,
            number,
        }
    }

    /// Creates a fixed-frequency id.
    #[must_use]
    pub const fn fixed(number: u8) -> Self {
        Self {
            frequency: Frequency::Fixed,
            number: number as u16,
        }
    }

    /// Returns `true` if the number is encodable in its frequency class.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        match self.frequency {
            Frequency::High | Frequency::Medium => self.number >= 1 && self.number < 0xFF,
            Frequency::Low => self.number >= 1 && self.number < 0xFF00,
            Frequency::Fixed => self.number <= 0xFF,
        }
    }

    /// Returns the number of bytes this id occupies on the wire.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        match self.frequency {
            Frequency::High => 1,
            Frequency::Medium => 2,
            Frequency::Low | Frequency::Fixed => 4,
        }
    }

    /// Encodes the id.
    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        let [hi, lo] = self.number.to_be_bytes();
        match self.frequency {
            Frequency::High => vec![lo],
            Frequency::Medium => vec![ESCAPE, lo],
            Frequency::Low => vec![ESCAPE, ESCAPE, hi, lo],
            Frequency::Fixed => vec![ESCAPE, ESCAPE, ESCAPE, lo],
        }
    }

    /// Reads an id from the start of `bytes`.
    ///
    /// Returns `None` when the prefix is truncated or names message zero.
    #[must_use]
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let id = match bytes {
            [ESCAPE, ESCAPE, ESCAPE, n, ..] => Self::fixed(*n),
            [ESCAPE, ESCAPE, hi, lo, ..] => Self::low(u16::from_be_bytes([*hi, *lo])),
            [ESCAPE, ESCAPE, ..] => return None,
            [ESCAPE, n, ..] => Self::medium(*n),
            [ESCAPE] => return None,
            [n, ..] => Self::high(*n),
            [] => return None,
        };
        id.is_valid().then_some(id)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.frequency {
            Frequency::High => "High",
            Frequency::Medium => "Medium",
            Frequency::Low => "Low",
            Frequency::Fixed => "Fixed",
        };
        write!(f, "{class} {}", self.number)
    }
}
