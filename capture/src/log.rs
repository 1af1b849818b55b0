//! The shared, bounded capture log.

use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::entry::RawMessageEntry;
use crate::ring::RingBuffer;

/// Ring size used when none is configured.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(2047);

/// Live consumer of captured entries.
pub type Subscriber = Box<dyn FnMut(&Arc<RawMessageEntry>) + Send>;

/// Capture log configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Number of entries kept before the oldest is evicted.
    pub capacity: NonZeroUsize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Counters describing the log since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub captured: u64,
    pub evicted: u64,
}

struct Inner {
    ring: RingBuffer<Arc<RawMessageEntry>>,
    subscriber: Option<Subscriber>,
    stats: CaptureStats,
}

/// Bounded, append-only history of captured traffic with one subscriber.
///
/// A single lock guards the history and the subscriber. The subscriber is
/// called while that lock is held, so delivery order equals capture order;
/// it must not call back into the same log.
pub struct CaptureLog {
    inner: Mutex<Inner>,
}

impl CaptureLog {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                ring: RingBuffer::new(config.capacity),
                subscriber: None,
                stats: CaptureStats::default(),
            }),
        }
    }

    /// Appends an entry, evicting the oldest when full, and hands it to the
    /// subscriber.
    pub fn capture(&self, entry: RawMessageEntry) -> Arc<RawMessageEntry> {
        let entry = Arc::new(entry);
        let mut inner = self.inner.lock();
        inner.stats.captured += 1;
        if inner.ring.push(Arc::clone(&entry)).is_some() {
            inner.stats.evicted += 1;
            trace!(evicted = inner.stats.evicted, "capture log full, evicted oldest entry");
        }
        trace!(kind = entry.kind(), len = inner.ring.len(), "captured entry");
        if let Some(subscriber) = inner.subscriber.as_mut() {
            subscriber(&entry);
        }
        entry
    }

    /// Replaces the subscriber.
    ///
    /// A new subscriber first receives every logged entry, oldest first, and
    /// then live captures. `None` detaches the current one.
    pub fn set_subscriber(&self, subscriber: Option<Subscriber>) {
        let mut inner = self.inner.lock();
        let Inner {
            ring, subscriber: slot, ..
        } = &mut *inner;
        *slot = subscriber.map(|mut subscriber| {
            for entry in ring.iter() {
                subscriber(entry);
            }
            debug!(replayed = ring.len(), "capture subscriber installed");
            subscriber
        });
    }

    /// Returns the logged entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<RawMessageEntry>> {
        self.inner.lock().ring.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().ring.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().ring.capacity()
    }

    #[must_use]
    pub fn stats(&self) -> CaptureStats {
        self.inner.lock().stats
    }

    /// Drops every logged entry; the subscriber stays attached.
    pub fn clear(&self) {
        self.inner.lock().ring.clear();
    }

    /// Clears the history and detaches the subscriber.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        inner.ring.clear();
        inner.subscriber = None;
        debug!("capture log shut down");
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

impl std::fmt::Debug for CaptureLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CaptureLog")
            .field("len", &inner.ring.len())
            .field("capacity", &inner.ring.capacity())
            .field("subscribed", &inner.subscriber.is_some())
            .field("stats", &inner.stats)
            .finish()
    }
}
