//! Field kinds and definitions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The wire representation of a template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    /// Three little-endian `f32` components.
    Vector3,
    /// Three little-endian `f64` components.
    Vector3d,
    /// Four little-endian `f32` components.
    Vector4,
    /// Unit quaternion packed as its x, y, z `f32` components.
    Quaternion,
    /// 128-bit identifier, 16 raw bytes.
    Uuid,
    Bool,
    /// IPv4 address, octets in network order.
    IpAddr,
    /// Port number, big-endian.
    IpPort,
    /// Blob with a little-endian length prefix of `len_bytes` (1 or 2) bytes.
    Variable { len_bytes: u8 },
    /// Blob of exactly `size` bytes.
    Fixed { size: usize },
}

impl FieldKind {
    /// Returns the encoded width for kinds without a length prefix.
    #[must_use]
    pub const fn wire_size(self) -> Option<usize> {
        match self {
            Self::U8 | Self::S8 | Self::Bool => Some(1),
            Self::U16 | Self::S16 | Self::IpPort => Some(2),
            Self::U32 | Self::S32 | Self::F32 | Self::IpAddr => Some(4),
            Self::U64 | Self::S64 | Self::F64 => Some(8),
            Self::Vector3 | Self::Quaternion => Some(12),
            Self::Vector4 | Self::Uuid => Some(16),
            Self::Vector3d => Some(24),
            Self::Fixed { size } => Some(size),
            Self::Variable { .. } => None,
        }
    }

    /// Returns `true` for blob kinds, whose text form may be hex.
    #[must_use]
    pub const fn is_blob(self) -> bool {
        matches!(self, Self::Variable { .. } | Self::Fixed { .. })
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::S8 => "S8",
            Self::S16 => "S16",
            Self::S32 => "S32",
            Self::S64 => "S64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Vector3 => "Vector3",
            Self::Vector3d => "Vector3d",
            Self::Vector4 => "Vector4",
            Self::Quaternion => "Quaternion",
            Self::Uuid => "Uuid",
            Self::Bool => "Bool",
            Self::IpAddr => "IpAddr",
            Self::IpPort => "IpPort",
            Self::Variable { .. } => "Variable",
            Self::Fixed { .. } => "Fixed",
        }
    }
}

/// A named field within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a variable-length blob field with a one-byte length prefix.
    #[must_use]
    pub fn variable1(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Variable { len_bytes: 1 })
    }

    /// Creates a variable-length blob field with a two-byte length prefix.
    #[must_use]
    pub fn variable2(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Variable { len_bytes: 2 })
    }

    /// Creates a fixed-size blob field.
    #[must_use]
    pub fn fixed(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, FieldKind::Fixed { size })
    }
}
