//! Datagram framing: ack trailers and zero-code expansion.

use bytestream::ByteReader;

use crate::error::{DecodeError, EncodeError, MalformedReason, WireResult};
use crate::header::{PacketFlags, PacketHeader, HEADER_SIZE, MIN_PACKET_SIZE};
use crate::limits::Limits;

/// Size of one appended ack id.
pub const ACK_ID_SIZE: usize = 4;

/// A framed datagram with transport-level transformations undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    /// Parsed header. Flags are kept exactly as captured.
    pub header: PacketHeader,
    /// Ack ids stripped from the trailer, in buffer order.
    pub acks: Vec<u32>,
    /// Expanded bytes after the header: message id followed by block data.
    pub message: Vec<u8>,
}

/// Decodes a captured datagram into header, ack ids and expanded message bytes.
///
/// The ack trailer is stripped before zero-code expansion, mirroring how the
/// sender appends it after compression.
pub fn decode_datagram(buf: &[u8], limits: &Limits) -> WireResult<Datagram> {
    if buf.len() > limits.max_buffer_bytes {
        return Err(DecodeError::BufferTooLarge {
            actual: buf.len(),
            limit: limits.max_buffer_bytes,
        });
    }
    let Some(&raw_flags) = buf.first() else {
        return Err(MalformedReason::TooShort {
            actual: 0,
            required: MIN_PACKET_SIZE,
        }
        .into());
    };
    let flags = PacketFlags::from_raw(raw_flags);

    let (framed, acks) = if flags.has_acks() {
        strip_ack_trailer(buf)?
    } else {
        (buf, Vec::new())
    };

    let expanded = if flags.is_zero_coded() {
        zero_expand(framed, limits.max_buffer_bytes)?
    } else {
        framed.to_vec()
    };

    if expanded.len() < MIN_PACKET_SIZE {
        return Err(MalformedReason::TooShort {
            actual: expanded.len(),
            required: MIN_PACKET_SIZE,
        }
        .into());
    }

    let header = PacketHeader::parse(&expanded)?;
    Ok(Datagram {
        header,
        acks,
        message: expanded[HEADER_SIZE..].to_vec(),
    })
}

/// Splits the ack trailer off a datagram whose ack flag is set.
///
/// The last byte is the ack count `N`; it is preceded by `N` big-endian ids.
/// The bytes left after removing the count must still hold `N` ids plus a
/// minimal packet.
pub fn strip_ack_trailer(buf: &[u8]) -> WireResult<(&[u8], Vec<u32>)> {
    let Some((&count, rest)) = buf.split_last() else {
        return Err(MalformedReason::TooShort {
            actual: 0,
            required: MIN_PACKET_SIZE,
        }
        .into());
    };
    let trailer_len = usize::from(count) * ACK_ID_SIZE;
    if rest.len() < trailer_len + MIN_PACKET_SIZE {
        return Err(MalformedReason::AckTrailer {
            count,
            available: rest.len(),
        }
        .into());
    }
    let (message, trailer) = rest.split_at(rest.len() - trailer_len);
    let mut reader = ByteReader::new(trailer);
    let mut acks = Vec::with_capacity(usize::from(count));
    while let Ok(id) = reader.read_u32_be() {
        acks.push(id);
    }
    Ok((message, acks))
}

/// Expands run-length zero-coding in everything after the header.
///
/// A literal `0x00` is followed by a count byte `K` and stands for `K` zero
/// bytes. Header bytes are copied verbatim. Expansion fails closed once the
/// output would exceed `limit` bytes.
pub fn zero_expand(buf: &[u8], limit: usize) -> WireResult<Vec<u8>> {
    let overflow = MalformedReason::ExpansionOverflow { limit };
    if buf.len() > limit {
        return Err(overflow.into());
    }
    let split = buf.len().min(HEADER_SIZE);
    let (header, body) = buf.split_at(split);

    let mut out = Vec::with_capacity(buf.len().saturating_mul(2).min(limit));
    out.extend_from_slice(header);

    let mut iter = body.iter().enumerate();
    while let Some((idx, &byte)) = iter.next() {
        if byte != 0 {
            if out.len() >= limit {
                return Err(overflow.into());
            }
            out.push(byte);
            continue;
        }
        let Some((_, &run)) = iter.next() else {
            return Err(MalformedReason::MissingZeroCount {
                offset: split + idx,
            }
            .into());
        };
        let new_len = out.len() + usize::from(run);
        if new_len > limit {
            return Err(overflow.into());
        }
        out.resize(new_len, 0);
    }
    Ok(out)
}

/// Prepends `header` to `message` without zero-coding or an ack trailer.
pub fn encode_datagram(
    header: PacketHeader,
    message: &[u8],
    limits: &Limits,
) -> Result<Vec<u8>, EncodeError> {
    let needed = HEADER_SIZE + message.len();
    if needed > limits.max_buffer_bytes {
        return Err(EncodeError::BufferTooLarge {
            needed,
            limit: limits.max_buffer_bytes,
        });
    }
    let mut out = Vec::with_capacity(needed);
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(message);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(seq: u32, message: &[u8]) -> Vec<u8> {
        let header = PacketHeader::new(PacketFlags::from_raw(PacketFlags::RELIABLE), seq);
        encode_datagram(header, message, &Limits::default()).unwrap()
    }

    #[test]
    fn decode_plain_datagram() {
        let buf = plain(7, &[0x01, 0xAA]);
        let dg = decode_datagram(&buf, &Limits::default()).unwrap();
        assert_eq!(dg.header.sequence, 7);
        assert!(dg.header.flags.is_reliable());
        assert!(dg.acks.is_empty());
        assert_eq!(dg.message, vec![0x01, 0xAA]);
    }

    #[test]
    fn decode_rejects_oversized_buffer() {
        let buf = vec![0u8; 300];
        let err = decode_datagram(&buf, &Limits::for_testing()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BufferTooLarge {
                actual: 300,
                limit: 256
            }
        );
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let cases: [&[u8]; 2] = [&[], &[0x00, 0, 0, 0, 1]];
        for buf in cases {
            let err = decode_datagram(buf, &Limits::default()).unwrap_err();
            assert!(matches!(
                err,
                DecodeError::MalformedPacket(MalformedReason::TooShort { .. })
            ));
        }
    }

    #[test]
    fn ack_trailer_is_stripped() {
        let mut buf = plain(3, &[0x01, 0x02]);
        buf[0] |= PacketFlags::ACK_APPENDED;
        buf.extend_from_slice(&0x0000_0010u32.to_be_bytes());
        buf.extend_from_slice(&0x0A0B_0C0Du32.to_be_bytes());
        buf.push(2);

        let dg = decode_datagram(&buf, &Limits::default()).unwrap();
        assert_eq!(dg.acks, vec![0x10, 0x0A0B_0C0D]);
        assert_eq!(dg.message, vec![0x01, 0x02]);
        assert!(dg.header.flags.has_acks());
    }

    #[test]
    fn ack_trailer_with_zero_count() {
        let mut buf = plain(3, &[0x01]);
        buf[0] |= PacketFlags::ACK_APPENDED;
        buf.push(0);
        let dg = decode_datagram(&buf, &Limits::default()).unwrap();
        assert!(dg.acks.is_empty());
        assert_eq!(dg.message, vec![0x01]);
    }

    #[test]
    fn inconsistent_ack_count_is_malformed() {
        let mut buf = plain(3, &[0x01]);
        buf[0] |= PacketFlags::ACK_APPENDED;
        buf.push(9);
        let err = decode_datagram(&buf, &Limits::default()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedPacket(MalformedReason::AckTrailer { count: 9, .. })
        ));
    }

    #[test]
    fn zero_runs_expand() {
        let buf = [0x80, 0, 0, 0, 1, 0x05, 0x00, 0x03, 0x07];
        let out = zero_expand(&buf, 64).unwrap();
        assert_eq!(out, vec![0x80, 0, 0, 0, 1, 0x05, 0, 0, 0, 0x07]);
    }

    #[test]
    fn zero_run_of_zero_inserts_nothing() {
        let buf = [0x80, 0, 0, 0, 1, 0x05, 0x00, 0x00, 0x07];
        let out = zero_expand(&buf, 64).unwrap();
        assert_eq!(out, vec![0x80, 0, 0, 0, 1, 0x05, 0x07]);
    }

    #[test]
    fn zero_header_bytes_are_literal() {
        let buf = [0x80, 0x00, 0x00, 0x00, 0x00, 0x09];
        assert_eq!(zero_expand(&buf, 64).unwrap(), buf.to_vec());
    }

    #[test]
    fn dangling_zero_is_malformed() {
        let buf = [0x80, 0, 0, 0, 1, 0x05, 0x00];
        let err = zero_expand(&buf, 64).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedPacket(MalformedReason::MissingZeroCount { offset: 6 })
        );
    }

    #[test]
    fn expansion_past_limit_fails_closed() {
        let buf = [0x80, 0, 0, 0, 1, 0x00, 0xFF, 0x00, 0xFF];
        let err = zero_expand(&buf, 300).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedPacket(MalformedReason::ExpansionOverflow { limit: 300 })
        );
        assert_eq!(zero_expand(&buf, 515).unwrap().len(), 515);
    }

    #[test]
    fn acks_stripped_before_expansion() {
        // Zero-coded message `01 00 02` followed by one ack id and a count.
        let mut buf = vec![0x90, 0, 0, 0, 4, 0x01, 0x00, 0x02];
        buf.extend_from_slice(&77u32.to_be_bytes());
        buf.push(1);
        let dg = decode_datagram(&buf, &Limits::default()).unwrap();
        assert_eq!(dg.acks, vec![77]);
        assert_eq!(dg.message, vec![0x01, 0x00, 0x00]);
    }

    #[test]
    fn encode_respects_limit() {
        let header = PacketHeader::default();
        let err = encode_datagram(header, &[0u8; 300], &Limits::for_testing()).unwrap_err();
        assert!(matches!(err, EncodeError::BufferTooLarge { needed: 305, .. }));
    }
}
