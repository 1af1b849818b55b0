//! Datagram framing for the msgscope codec.
//!
//! This crate handles the transport envelope of template datagrams: the
//! flag/sequence header, the appended ack trailer, run-length zero-coding and
//! buffer limits. It does not know about templates or blocks, only the bytes
//! around them.
//!
//! # Design Principles
//!
//! - **Bit-exact layout** - Byte 0 carries flags, bytes 1-4 the big-endian sequence id.
//! - **Fail closed** - Inconsistent trailers and oversized expansions are rejected, never truncated.
//! - **No domain knowledge** - This crate handles framing, not message contents.

mod error;
mod frame;
mod header;
mod limits;

pub use error::{DecodeError, EncodeError, MalformedReason, WireResult};
pub use frame::{
    decode_datagram, encode_datagram, strip_ack_trailer, zero_expand, Datagram, ACK_ID_SIZE,
};
pub use header::{PacketFlags, PacketHeader, HEADER_SIZE, MIN_PACKET_SIZE};
pub use limits::Limits;
