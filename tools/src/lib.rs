//! Command-line tooling for msgscope.
//!
//! The `msgscope` binary decodes captured datagrams, encodes edited message
//! text, prints skeletons, replays recorded traces through the capture
//! pipeline, and describes template catalogs. This library holds the pieces
//! of those commands that are worth testing on their own.
//!
//! # Design Principles
//!
//! - **Human-readable output** - Every command prints message text that the
//!   `encode` command accepts back.
//! - **Offline** - Traces and catalogs are files; nothing here touches the
//!   network.

mod replay;
mod trace;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use template::{catalog_hash, RepeatKind, TemplateCatalog};

pub use replay::{replay, ReplayConfig, ReplayReport};
pub use trace::{load_datagram, read_capabilities, read_trace, SessionFile, TraceBody, TraceRecord};

/// Loads a catalog from JSON, or the built-in demo catalog when `path` is `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<TemplateCatalog> {
    let Some(path) = path else {
        return demo_catalog::demo_catalog().context("build demo catalog");
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse catalog {}", path.display()))
}

/// One line per template: wire id, name, block layout and flags.
#[must_use]
pub fn catalog_listing(catalog: &TemplateCatalog) -> String {
    let mut templates: Vec<_> = catalog.iter().collect();
    templates.sort_by_key(|template| template.id);

    let mut out = String::new();
    for template in templates {
        let blocks: Vec<String> = template
            .blocks
            .iter()
            .map(|block| match block.repeat {
                RepeatKind::Single => block.name.clone(),
                RepeatKind::Multiple { count } => format!("{}[{count}]", block.name),
                RepeatKind::Variable => format!("{}[*]", block.name),
            })
            .collect();
        let mut flags = Vec::new();
        if template.trusted {
            flags.push("trusted");
        }
        if template.zero_coded {
            flags.push("zerocoded");
        }
        let _ = write!(out, "{:<12} {:<28} {}", template.id.to_string(), template.name, blocks.join(" "));
        if !flags.is_empty() {
            let _ = write!(out, " ({})", flags.join(", "));
        }
        out.push('\n');
    }
    out
}

/// Catalog fingerprint as printed by the CLI.
#[must_use]
pub fn catalog_fingerprint(catalog: &TemplateCatalog) -> String {
    format!("0x{:016x}", catalog_hash(catalog))
}
