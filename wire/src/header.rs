//! Datagram header types and constants.

use bytestream::ByteReader;

use crate::error::{MalformedReason, WireResult};

/// Header size in bytes: one flag byte plus a big-endian sequence id.
pub const HEADER_SIZE: usize = 1 + 4;

/// Smallest buffer that can hold a header and a one-byte message id.
pub const MIN_PACKET_SIZE: usize = HEADER_SIZE + 1;

/// Datagram flag bits carried in byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketFlags(u8);

impl PacketFlags {
    /// Body after the header is run-length zero-coded.
    pub const ZERO_CODED: u8 = 0x80;

    /// Sender expects an acknowledgement.
    pub const RELIABLE: u8 = 0x40;

    /// Datagram is a retransmission.
    pub const RESENT: u8 = 0x20;

    /// Ack ids and a count byte are appended after the message.
    pub const ACK_APPENDED: u8 = 0x10;

    /// Creates new flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns `true` if the body is zero-coded.
    #[must_use]
    pub const fn is_zero_coded(self) -> bool {
        self.0 & Self::ZERO_CODED != 0
    }

    /// Returns `true` if the datagram is reliable.
    #[must_use]
    pub const fn is_reliable(self) -> bool {
        self.0 & Self::RELIABLE != 0
    }

    /// Returns `true` if the datagram was resent.
    #[must_use]
    pub const fn is_resent(self) -> bool {
        self.0 & Self::RESENT != 0
    }

    /// Returns `true` if an ack trailer is appended.
    #[must_use]
    pub const fn has_acks(self) -> bool {
        self.0 & Self::ACK_APPENDED != 0
    }

    /// Returns these flags with `bit` set or cleared.
    #[must_use]
    pub const fn with(self, bit: u8, on: bool) -> Self {
        if on {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }

    /// Returns the flags with the transport-only bits (zero-coding, acks) cleared.
    #[must_use]
    pub const fn plain(self) -> Self {
        Self(self.0 & !(Self::ZERO_CODED | Self::ACK_APPENDED))
    }
}

/// Datagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketHeader {
    /// Flag bits.
    pub flags: PacketFlags,
    /// Sequence id, big-endian on the wire.
    pub sequence: u32,
}

impl PacketHeader {
    /// Creates a header with the given flags and sequence id.
    #[must_use]
    pub const fn new(flags: PacketFlags, sequence: u32) -> Self {
        Self { flags, sequence }
    }

    /// Parses the header from the first [`HEADER_SIZE`] bytes of `buf`.
    pub fn parse(buf: &[u8]) -> WireResult<Self> {
        let too_short = MalformedReason::TooShort {
            actual: buf.len(),
            required: HEADER_SIZE,
        };
        let mut reader = ByteReader::new(buf);
        let flags = reader.read_u8().map_err(|_| too_short)?;
        let sequence = reader.read_u32_be().map_err(|_| too_short)?;
        Ok(Self {
            flags: PacketFlags::from_raw(flags),
            sequence,
        })
    }

    /// Returns the encoded header bytes.
    #[must_use]
    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let seq = self.sequence.to_be_bytes();
        [self.flags.raw(), seq[0], seq[1], seq[2], seq[3]]
    }
}
