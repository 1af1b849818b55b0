use std::num::NonZeroUsize;
use std::sync::{mpsc, Arc};
use std::thread;

use capture::{
    CaptureConfig, CaptureLog, ConversationCorrelator, ConversationPair, Correlation,
    EntryInspector, FilterSpec, RawMessageEntry,
};
use codec::{
    Direction, HttpMethod, HttpRequest, HttpResponse, RenderOptions, StaticCapabilities,
};
use demo_catalog::demo_catalog;

const CLIENT: &str = "192.168.1.20:50000";
const SIM: &str = "203.0.113.7:13005";

fn datagram(from: &str, to: &str, bytes: Vec<u8>) -> RawMessageEntry {
    RawMessageEntry::Datagram {
        from: from.parse().unwrap(),
        to: to.parse().unwrap(),
        bytes,
    }
}

fn start_ping(seq: u8, ping: u8) -> RawMessageEntry {
    datagram(SIM, CLIENT, vec![0x40, 0, 0, 0, seq, 1, ping, 0, 0, 0, 0])
}

fn complete_ping(seq: u8, ping: u8) -> RawMessageEntry {
    datagram(CLIENT, SIM, vec![0, 0, 0, 0, seq, 2, ping])
}

fn request(id: u64, url: &str) -> RawMessageEntry {
    RawMessageEntry::HttpRequest {
        request: HttpRequest::new(HttpMethod::Post, url),
        request_id: id,
    }
}

fn response(id: u64, url: &str) -> RawMessageEntry {
    let mut response = HttpResponse::new(200);
    response.url = Some(url.to_string());
    RawMessageEntry::HttpResponse {
        response,
        request_id: id,
    }
}

#[test]
fn concurrent_producers_keep_every_entry() {
    let log = CaptureLog::new(CaptureConfig {
        capacity: NonZeroUsize::new(4 * 250).unwrap(),
    });
    let (tx, rx) = mpsc::channel();
    log.set_subscriber(Some(Box::new(move |entry: &Arc<RawMessageEntry>| {
        let _ = tx.send(Arc::clone(entry));
    })));

    thread::scope(|scope| {
        for producer in 0..4u8 {
            let log = &log;
            scope.spawn(move || {
                for seq in 0..250u8 {
                    log.capture(datagram(CLIENT, SIM, vec![producer, seq]));
                }
            });
        }
    });

    let delivered: Vec<Arc<RawMessageEntry>> = rx.try_iter().collect();
    let logged = log.snapshot();
    assert_eq!(logged.len(), 1000);
    assert_eq!(delivered.len(), 1000);
    for (seen, kept) in delivered.iter().zip(&logged) {
        assert!(Arc::ptr_eq(seen, kept));
    }

    // Each producer's entries stay in that producer's order.
    for producer in 0..4u8 {
        let seqs: Vec<u8> = logged
            .iter()
            .filter_map(|entry| match &**entry {
                RawMessageEntry::Datagram { bytes, .. } if bytes[0] == producer => Some(bytes[1]),
                _ => None,
            })
            .collect();
        assert_eq!(seqs, (0..250u8).collect::<Vec<_>>());
    }
}

#[test]
fn correlator_follows_the_log() {
    let log = CaptureLog::default();
    log.capture(request(42, "https://sim/cap/aa"));

    let correlator = Arc::new(ConversationCorrelator::default());
    let (tx, rx) = mpsc::channel();
    correlator.set_observer(Some(Box::new(move |pair: &ConversationPair| {
        let _ = tx.send(pair.clone());
    })));

    // Installing replays the logged request.
    log.set_subscriber(Some(Arc::clone(&correlator).subscriber()));
    assert!(correlator.is_pending(42));

    log.capture(start_ping(1, 5));
    log.capture(response(42, "https://sim/cap/aa"));
    log.capture(response(42, "https://sim/cap/aa"));

    let pairs: Vec<ConversationPair> = rx.try_iter().collect();
    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert_eq!(pair.request_id, 42);
    assert!(matches!(*pair.request, RawMessageEntry::HttpRequest { .. }));
    assert!(matches!(
        pair.response.as_deref(),
        Some(RawMessageEntry::HttpResponse { request_id: 42, .. })
    ));
    assert_eq!(correlator.standalone().len(), 1);
    assert_eq!(log.len(), 4);
}

#[test]
fn response_before_request_is_not_an_error() {
    let correlator = ConversationCorrelator::default();
    let early = Arc::new(response(42, "https://sim/cap/aa"));
    assert_eq!(correlator.observe(&early), Correlation::Standalone);
    assert_eq!(correlator.pending_len(), 0);
}

#[test]
fn inspector_filters_a_mixed_history() {
    let catalog = demo_catalog().unwrap();
    let caps = StaticCapabilities::new()
        .with("FetchInventory2", "https://sim/cap/aa")
        .with("FetchLib2", "https://sim/cap/aa")
        .with("EventQueueGet", "https://sim/cap/bb");
    let inspector = EntryInspector::new(&catalog, &caps).with_local(CLIENT.parse().unwrap());

    let log = CaptureLog::default();
    log.capture(start_ping(1, 5));
    log.capture(complete_ping(1, 5));
    log.capture(request(1, "https://sim/cap/aa/folder"));
    log.capture(request(2, "https://sim/cap/bb"));
    log.capture(datagram(SIM, CLIENT, vec![0, 0, 0, 0, 2, 0xFF, 0xFF, 0xFF]));
    let history = log.snapshot();

    let names: Vec<Vec<String>> = history.iter().map(|entry| inspector.names(entry)).collect();
    assert_eq!(names[0], vec!["StartPingCheck"]);
    assert_eq!(names[2], vec!["FetchInventory2", "FetchLib2"]);
    assert_eq!(names[4], vec!["Invalid"]);

    let quiet = inspector.filter(&FilterSpec::default_view(), &history);
    assert_eq!(quiet.len(), 3);
    assert!(quiet.iter().all(|entry| !entry.is_datagram() || inspector.names(entry) == ["Invalid"]));

    let spec = FilterSpec::parse("!FetchLib2 EventQueueGet");
    let only_queue = inspector.filter(&spec, &history);
    assert_eq!(only_queue.len(), 1);
    assert!(Arc::ptr_eq(only_queue[0], &history[3]));

    assert_eq!(inspector.direction(&history[0]), Direction::Incoming);
    assert_eq!(inspector.direction(&history[1]), Direction::Outgoing);

    let options = RenderOptions {
        show_header: false,
        ..RenderOptions::default()
    };
    assert_eq!(
        inspector.render(&history[1], &options),
        "out CompletePingCheck\n\n[PingID]\n    PingID = 5\n"
    );
    assert_eq!(
        inspector.render(&history[4], &options),
        "in\n00 00 00 00 02 FF FF FF"
    );
}
