//! Capture pipeline for msgscope.
//!
//! Producers hand raw traffic to a [`CaptureLog`]; a single subscriber sees
//! every entry in capture order. [`FilterSpec`] narrows a history by entry
//! names, [`ConversationCorrelator`] pairs HTTP requests with responses, and
//! [`EntryInspector`] names, orients and renders entries through the codec.
//!
//! # Design Principles
//!
//! - **Bounded** - The log and the correlator evict their oldest state
//!   instead of growing or blocking producers.
//! - **Infallible** - Nothing here returns an error; undecodable datagrams
//!   stay in the log and render as hex.
//! - **Observe only** - Logged entries are immutable and shared via `Arc`.
//!
//! ```
//! use std::sync::Arc;
//! use capture::{CaptureLog, ConversationCorrelator, RawMessageEntry};
//! use codec::{HttpMethod, HttpRequest, HttpResponse};
//!
//! let log = CaptureLog::default();
//! let correlator = Arc::new(ConversationCorrelator::default());
//! log.set_subscriber(Some(Arc::clone(&correlator).subscriber()));
//!
//! log.capture(RawMessageEntry::HttpRequest {
//!     request: HttpRequest::new(HttpMethod::Get, "https://sim/cap/1"),
//!     request_id: 42,
//! });
//! assert!(correlator.is_pending(42));
//! log.capture(RawMessageEntry::HttpResponse {
//!     response: HttpResponse::new(200),
//!     request_id: 42,
//! });
//! assert_eq!(correlator.pending_len(), 0);
//! assert_eq!(log.len(), 2);
//! ```

mod correlate;
mod entry;
mod filter;
mod inspect;
mod log;
mod ring;

pub use correlate::{
    ConversationCorrelator, ConversationPair, Correlation, CorrelatorConfig, PairObserver,
};
pub use entry::RawMessageEntry;
pub use filter::{FilterSpec, DEFAULT_FILTER};
pub use inspect::{EntryInspector, INVALID_NAME, RESPONSE_NAME};
pub use log::{CaptureConfig, CaptureLog, CaptureStats, Subscriber, DEFAULT_CAPACITY};
pub use ring::RingBuffer;
