use std::num::NonZeroUsize;

use capture::{CaptureConfig, CaptureLog, FilterSpec, RawMessageEntry, RingBuffer};
use proptest::prelude::*;

const NAMES: [&str; 6] = [
    "AgentUpdate",
    "ChatFromSimulator",
    "ChatFromViewer",
    "FetchInventory2",
    "ObjectUpdate",
    "Invalid",
];

fn name_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(NAMES.to_vec()), 0..3)
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
}

fn filter_text() -> impl Strategy<Value = String> {
    prop::collection::vec((any::<bool>(), prop::sample::select(NAMES.to_vec())), 0..4).prop_map(
        |tokens| {
            tokens
                .into_iter()
                .map(|(negated, name)| {
                    if negated {
                        format!("!{}", name.to_ascii_lowercase())
                    } else {
                        name.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        },
    )
}

proptest! {
    #[test]
    fn prop_ring_keeps_last_n(capacity in 1usize..32, extra in 0usize..64) {
        let mut ring = RingBuffer::new(NonZeroUsize::new(capacity).unwrap());
        let total = capacity + extra;
        let mut evicted = Vec::new();
        for value in 0..total {
            evicted.extend(ring.push(value));
        }
        prop_assert_eq!(ring.iter().copied().collect::<Vec<_>>(), (extra..total).collect::<Vec<_>>());
        prop_assert_eq!(evicted, (0..extra).collect::<Vec<_>>());
    }

    #[test]
    fn prop_log_keeps_last_n(capacity in 1usize..16, extra in 0usize..32) {
        let log = CaptureLog::new(CaptureConfig {
            capacity: NonZeroUsize::new(capacity).unwrap(),
        });
        for n in 0..capacity + extra {
            log.capture(RawMessageEntry::Datagram {
                from: "127.0.0.1:1".parse().unwrap(),
                to: "127.0.0.1:2".parse().unwrap(),
                bytes: (n as u32).to_be_bytes().to_vec(),
            });
        }
        let kept: Vec<u32> = log
            .snapshot()
            .iter()
            .map(|entry| match &**entry {
                RawMessageEntry::Datagram { bytes, .. } => {
                    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
                }
                _ => unreachable!(),
            })
            .collect();
        let expected: Vec<u32> = (extra..capacity + extra).map(|n| n as u32).collect();
        prop_assert_eq!(kept, expected);
        prop_assert_eq!(log.stats().evicted, extra as u64);
    }

    #[test]
    fn prop_filter_is_idempotent(
        text in filter_text(),
        history in prop::collection::vec(name_set(), 0..24),
    ) {
        let spec = FilterSpec::parse(&text);
        let once: Vec<&Vec<String>> = spec.apply(&history, |names| names.clone());
        let owned: Vec<Vec<String>> = once.iter().map(|names| (*names).clone()).collect();
        let twice: Vec<&Vec<String>> = spec.apply(&owned, |names| names.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_filter_is_order_preserving(
        text in filter_text(),
        history in prop::collection::vec(name_set(), 0..24),
    ) {
        let spec = FilterSpec::parse(&text);
        let indexed: Vec<(usize, Vec<String>)> = history.into_iter().enumerate().collect();
        let kept: Vec<usize> = spec
            .apply(&indexed, |(_, names)| names.clone())
            .into_iter()
            .map(|(idx, _)| *idx)
            .collect();
        prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn prop_display_reparses(text in filter_text()) {
        let spec = FilterSpec::parse(&text);
        prop_assert_eq!(FilterSpec::parse(&spec.to_string()), spec);
    }
}
