use proptest::prelude::*;
use wire::{decode_datagram, zero_expand, Limits, PacketFlags, HEADER_SIZE};

/// Test-side zero-coder: runs of zeros become `00 K`, split at 255.
fn zero_code(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut run = 0u8;
    for &byte in message {
        if byte == 0 {
            if run == u8::MAX {
                out.extend_from_slice(&[0, run]);
                run = 0;
            }
            run += 1;
        } else {
            if run > 0 {
                out.extend_from_slice(&[0, run]);
                run = 0;
            }
            out.push(byte);
        }
    }
    if run > 0 {
        out.extend_from_slice(&[0, run]);
    }
    out
}

fn message_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(0u8), any::<u8>()], 1..400)
}

proptest! {
    #[test]
    fn prop_zero_expand_inverts_zero_code(seq in any::<u32>(), message in message_strategy()) {
        let mut buf = vec![PacketFlags::ZERO_CODED];
        buf.extend_from_slice(&seq.to_be_bytes());
        buf.extend_from_slice(&zero_code(&message));

        let expanded = zero_expand(&buf, usize::MAX).unwrap();
        prop_assert_eq!(&expanded[..HEADER_SIZE], &buf[..HEADER_SIZE]);
        prop_assert_eq!(&expanded[HEADER_SIZE..], message.as_slice());
    }

    #[test]
    fn prop_consistent_ack_trailer_does_not_change_decode(
        seq in any::<u32>(),
        message in prop::collection::vec(1u8..=255, 1..64),
        acks in prop::collection::vec(any::<u32>(), 0..8),
    ) {
        let mut bare = vec![PacketFlags::RELIABLE];
        bare.extend_from_slice(&seq.to_be_bytes());
        bare.extend_from_slice(&message);

        let mut acked = bare.clone();
        acked[0] |= PacketFlags::ACK_APPENDED;
        for id in &acks {
            acked.extend_from_slice(&id.to_be_bytes());
        }
        acked.push(acks.len() as u8);

        let limits = Limits::default();
        let plain = decode_datagram(&bare, &limits).unwrap();
        let with_acks = decode_datagram(&acked, &limits).unwrap();
        prop_assert_eq!(plain.message, with_acks.message);
        prop_assert_eq!(plain.header.sequence, with_acks.header.sequence);
        prop_assert_eq!(with_acks.acks, acks);
    }

    #[test]
    fn prop_decode_never_panics(buf in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode_datagram(&buf, &Limits::for_testing());
    }
}
