//! Pairing of HTTP requests with their responses.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::entry::RawMessageEntry;
use crate::log::Subscriber;

/// Observer notified once per completed pair.
pub type PairObserver = Box<dyn FnMut(&ConversationPair) + Send>;

/// Correlator bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelatorConfig {
    /// Requests awaiting a response; the oldest is dropped beyond this.
    pub max_pending: usize,
    /// Unmatched responses kept for display.
    pub max_standalone: usize,
    /// Already-paired ids remembered to refuse a second pairing.
    pub max_paired: usize,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            max_pending: 1024,
            max_standalone: 256,
            max_paired: 4096,
        }
    }
}

/// A request and, once it arrived, its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPair {
    pub request_id: u64,
    pub request: Arc<RawMessageEntry>,
    pub response: Option<Arc<RawMessageEntry>>,
}

/// What the correlator did with an observed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// A request now awaits its response.
    Pending,
    /// A response completed a pair.
    Paired(ConversationPair),
    /// A response without a pending request, kept on its own.
    Standalone,
    /// Not an HTTP entry, or a request id already in use.
    Ignored,
}

#[derive(Default)]
struct State {
    pending: HashMap<u64, Arc<RawMessageEntry>>,
    /// Pending ids in arrival order; may hold ids that were since paired.
    pending_order: VecDeque<u64>,
    paired: HashSet<u64>,
    paired_order: VecDeque<u64>,
    standalone: VecDeque<Arc<RawMessageEntry>>,
}

/// Pairs HTTP requests and responses by request id.
///
/// Each id pairs at most once. The correlator never mutates logged
/// entries; it only observes the capture stream.
pub struct ConversationCorrelator {
    config: CorrelatorConfig,
    state: Mutex<State>,
    observer: Mutex<Option<PairObserver>>,
}

impl ConversationCorrelator {
    #[must_use]
    pub fn new(config: CorrelatorConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
            observer: Mutex::new(None),
        }
    }

    /// Replaces the pair observer.
    pub fn set_observer(&self, observer: Option<PairObserver>) {
        *self.observer.lock() = observer;
    }

    /// Feeds one captured entry.
    pub fn observe(&self, entry: &Arc<RawMessageEntry>) -> Correlation {
        let correlation = match &**entry {
            RawMessageEntry::Datagram { .. } => return Correlation::Ignored,
            RawMessageEntry::HttpRequest { request_id, .. } => {
                self.observe_request(*request_id, entry)
            }
            RawMessageEntry::HttpResponse { request_id, .. } => {
                self.observe_response(*request_id, entry)
            }
        };
        if let Correlation::Paired(pair) = &correlation {
            if let Some(observer) = self.observer.lock().as_mut() {
                observer(pair);
            }
        }
        correlation
    }

    /// Returns a capture-log subscriber that feeds this correlator.
    pub fn subscriber(self: Arc<Self>) -> Subscriber {
        Box::new(move |entry: &Arc<RawMessageEntry>| {
            self.observe(entry);
        })
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Returns whether a request with this id awaits its response.
    #[must_use]
    pub fn is_pending(&self, request_id: u64) -> bool {
        self.state.lock().pending.contains_key(&request_id)
    }

    /// Returns the retained unmatched responses, oldest first.
    #[must_use]
    pub fn standalone(&self) -> Vec<Arc<RawMessageEntry>> {
        self.state.lock().standalone.iter().cloned().collect()
    }

    /// Forgets all pending requests, pairings and standalone responses.
    pub fn clear(&self) {
        *self.state.lock() = State::default();
    }

    fn observe_request(&self, request_id: u64, entry: &Arc<RawMessageEntry>) -> Correlation {
        let mut state = self.state.lock();
        if state.paired.contains(&request_id) {
            warn!(request_id, "request id already paired, not tracking");
            return Correlation::Ignored;
        }
        if state.pending.contains_key(&request_id) {
            warn!(request_id, "duplicate pending request id, keeping the first");
            return Correlation::Ignored;
        }
        state.pending.insert(request_id, Arc::clone(entry));
        state.pending_order.push_back(request_id);
        while state.pending.len() > self.config.max_pending {
            let Some(oldest) = state.pending_order.pop_front() else {
                break;
            };
            if state.pending.remove(&oldest).is_some() {
                debug!(request_id = oldest, "dropped oldest pending request");
            }
        }
        trace!(request_id, pending = state.pending.len(), "request pending");
        Correlation::Pending
    }

    fn observe_response(&self, request_id: u64, entry: &Arc<RawMessageEntry>) -> Correlation {
        let mut state = self.state.lock();
        let Some(request) = state.pending.remove(&request_id) else {
            trace!(request_id, "response without pending request");
            state.standalone.push_back(Arc::clone(entry));
            while state.standalone.len() > self.config.max_standalone {
                state.standalone.pop_front();
            }
            return Correlation::Standalone;
        };
        state.pending_order.retain(|id| *id != request_id);
        state.paired.insert(request_id);
        state.paired_order.push_back(request_id);
        while state.paired_order.len() > self.config.max_paired {
            if let Some(oldest) = state.paired_order.pop_front() {
                state.paired.remove(&oldest);
            }
        }
        debug!(request_id, "paired request and response");
        Correlation::Paired(ConversationPair {
            request_id,
            request,
            response: Some(Arc::clone(entry)),
        })
    }
}

impl Default for ConversationCorrelator {
    fn default() -> Self {
        Self::new(CorrelatorConfig::default())
    }
}

impl std::fmt::Debug for ConversationCorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ConversationCorrelator")
            .field("config", &self.config)
            .field("pending", &state.pending.len())
            .field("standalone", &state.standalone.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{HttpMethod, HttpRequest, HttpResponse};
    use std::sync::mpsc;

    fn request(id: u64) -> Arc<RawMessageEntry> {
        Arc::new(RawMessageEntry::HttpRequest {
            request: HttpRequest::new(HttpMethod::Get, "https://sim/cap/x"),
            request_id: id,
        })
    }

    fn response(id: u64) -> Arc<RawMessageEntry> {
        Arc::new(RawMessageEntry::HttpResponse {
            response: HttpResponse::new(200),
            request_id: id,
        })
    }

    #[test]
    fn response_after_request_pairs() {
        let correlator = ConversationCorrelator::default();
        let req = request(42);
        let resp = response(42);
        assert_eq!(correlator.observe(&req), Correlation::Pending);
        assert_eq!(
            correlator.observe(&resp),
            Correlation::Paired(ConversationPair {
                request_id: 42,
                request: req,
                response: Some(resp),
            })
        );
        assert_eq!(correlator.pending_len(), 0);
    }

    #[test]
    fn response_before_request_is_standalone() {
        let correlator = ConversationCorrelator::default();
        assert_eq!(correlator.observe(&response(42)), Correlation::Standalone);
        assert_eq!(correlator.standalone().len(), 1);
        assert_eq!(correlator.observe(&request(42)), Correlation::Pending);
    }

    #[test]
    fn pairs_at_most_once() {
        let correlator = ConversationCorrelator::default();
        correlator.observe(&request(7));
        assert!(matches!(correlator.observe(&response(7)), Correlation::Paired(_)));
        assert_eq!(correlator.observe(&response(7)), Correlation::Standalone);
        assert_eq!(correlator.observe(&request(7)), Correlation::Ignored);
        assert!(!correlator.is_pending(7));
    }

    #[test]
    fn duplicate_pending_keeps_first() {
        let correlator = ConversationCorrelator::default();
        let first = request(3);
        correlator.observe(&first);
        assert_eq!(correlator.observe(&request(3)), Correlation::Ignored);
        match correlator.observe(&response(3)) {
            Correlation::Paired(pair) => assert!(Arc::ptr_eq(&pair.request, &first)),
            other => panic!("expected pair, got {other:?}"),
        }
    }

    #[test]
    fn bounds_are_enforced() {
        let correlator = ConversationCorrelator::new(CorrelatorConfig {
            max_pending: 2,
            max_standalone: 1,
            max_paired: 8,
        });
        for id in 0..3 {
            correlator.observe(&request(id));
        }
        assert_eq!(correlator.pending_len(), 2);
        assert!(!correlator.is_pending(0));
        assert!(correlator.is_pending(2));

        correlator.observe(&response(100));
        correlator.observe(&response(101));
        assert_eq!(correlator.standalone().len(), 1);
    }

    #[test]
    fn datagrams_are_ignored() {
        let correlator = ConversationCorrelator::default();
        let entry = Arc::new(RawMessageEntry::Datagram {
            from: "127.0.0.1:1".parse().unwrap(),
            to: "127.0.0.1:2".parse().unwrap(),
            bytes: Vec::new(),
        });
        assert_eq!(correlator.observe(&entry), Correlation::Ignored);
    }

    #[test]
    fn observer_sees_each_pair() {
        let correlator = ConversationCorrelator::default();
        let (tx, rx) = mpsc::channel();
        correlator.set_observer(Some(Box::new(move |pair: &ConversationPair| {
            let _ = tx.send(pair.request_id);
        })));
        correlator.observe(&request(1));
        correlator.observe(&request(2));
        correlator.observe(&response(2));
        correlator.observe(&response(1));
        correlator.observe(&response(1));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![2, 1]);
    }
}
