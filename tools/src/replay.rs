//! Replays a recorded trace through the capture pipeline.

use std::fmt::Write as _;
use std::sync::{mpsc, Arc};

use capture::{
    CaptureConfig, CaptureLog, CaptureStats, ConversationCorrelator, ConversationPair,
    CorrelatorConfig, EntryInspector, FilterSpec, RawMessageEntry,
};
use codec::RenderOptions;
use tracing::debug;

/// Replay settings.
#[derive(Debug, Clone, Default)]
pub struct ReplayConfig {
    pub capture: CaptureConfig,
    pub correlator: CorrelatorConfig,
    pub filter: FilterSpec,
    pub render: RenderOptions,
}

/// What a replay produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Rendered entries the filter accepted, in capture order.
    pub output: String,
    pub shown: usize,
    pub stats: CaptureStats,
    pub pairs: usize,
    pub standalone: usize,
}

/// Feeds `entries` through a capture log and correlator and renders the
/// filtered history. Requests are followed by their paired response.
pub fn replay(
    entries: Vec<RawMessageEntry>,
    inspector: &EntryInspector<'_>,
    config: &ReplayConfig,
) -> ReplayReport {
    let log = CaptureLog::new(config.capture);
    let correlator = Arc::new(ConversationCorrelator::new(config.correlator));
    let (tx, rx) = mpsc::channel();
    correlator.set_observer(Some(Box::new(move |pair: &ConversationPair| {
        let _ = tx.send(pair.clone());
    })));
    log.set_subscriber(Some(Arc::clone(&correlator).subscriber()));

    for entry in entries {
        log.capture(entry);
    }

    // Keyed by the paired request itself; a duplicate id never pairs.
    let paired: Vec<(Arc<RawMessageEntry>, Arc<RawMessageEntry>)> = rx
        .try_iter()
        .filter_map(|pair| pair.response.map(|response| (pair.request, response)))
        .collect();
    let pairs = paired.len();
    let history = log.snapshot();
    let shown = inspector.filter(&config.filter, &history);
    debug!(
        captured = history.len(),
        shown = shown.len(),
        pairs,
        "replay finished"
    );

    let mut output = String::new();
    for (idx, entry) in shown.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        let names = inspector.names(entry).join(", ");
        let _ = writeln!(output, "== {} [{names}] ==", entry.kind());
        output.push_str(&inspector.render(entry, &config.render));
        ensure_newline(&mut output);
        let response = paired
            .iter()
            .find(|(request, _)| Arc::ptr_eq(request, *entry))
            .map(|(_, response)| response);
        if let Some(response) = response {
            output.push_str("-- response --\n");
            output.push_str(&inspector.render(response, &config.render));
            ensure_newline(&mut output);
        }
    }

    let report = ReplayReport {
        output,
        shown: shown.len(),
        stats: log.stats(),
        pairs,
        standalone: correlator.standalone().len(),
    };
    log.shutdown();
    report
}

fn ensure_newline(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
}
