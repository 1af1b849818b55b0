//! Recorded traffic traces and the side files the CLI reads.
//!
//! A trace is JSON lines, one [`TraceRecord`] per line. Blank lines and
//! lines starting with `#` are skipped.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use capture::RawMessageEntry;
use codec::{decode_hex, HttpMethod, HttpRequest, HttpResponse, StaticCapabilities, StaticSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One captured message as stored in a trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    Datagram {
        from: String,
        to: String,
        /// Datagram bytes as hex digit pairs.
        hex: String,
    },
    HttpRequest {
        request_id: u64,
        method: String,
        url: String,
        #[serde(default)]
        headers: Vec<(String, String)>,
        #[serde(default)]
        content_type: Option<String>,
        #[serde(flatten)]
        body: TraceBody,
    },
    HttpResponse {
        request_id: u64,
        status: u16,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        headers: Vec<(String, String)>,
        #[serde(default)]
        content_type: Option<String>,
        #[serde(flatten)]
        body: TraceBody,
    },
}

/// An HTTP body given as text or as hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_hex: Option<String>,
}

impl TraceBody {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match (self.body, self.body_hex) {
            (Some(_), Some(_)) => bail!("give either body or body_hex, not both"),
            (Some(text), None) => Ok(text.into_bytes()),
            (None, Some(hex)) => decode_hex(&hex).map_err(|reason| anyhow!("body_hex: {reason}")),
            (None, None) => Ok(Vec::new()),
        }
    }
}

impl TraceRecord {
    /// Converts the record into a capture entry.
    pub fn into_entry(self) -> Result<RawMessageEntry> {
        match self {
            Self::Datagram { from, to, hex } => Ok(RawMessageEntry::Datagram {
                from: from.parse().with_context(|| format!("bad source address {from}"))?,
                to: to.parse().with_context(|| format!("bad destination address {to}"))?,
                bytes: decode_hex(&hex).map_err(|reason| anyhow!("datagram hex: {reason}"))?,
            }),
            Self::HttpRequest {
                request_id,
                method,
                url,
                headers,
                content_type,
                body,
            } => {
                let method = HttpMethod::from_token(&method)
                    .ok_or_else(|| anyhow!("unknown HTTP method {method}"))?;
                let mut request = HttpRequest::new(method, url);
                request.headers = headers;
                request.content_type = content_type;
                request.body = body.into_bytes()?;
                Ok(RawMessageEntry::HttpRequest {
                    request,
                    request_id,
                })
            }
            Self::HttpResponse {
                request_id,
                status,
                url,
                headers,
                content_type,
                body,
            } => {
                let mut response = HttpResponse::new(status);
                response.url = url;
                response.headers = headers;
                response.content_type = content_type;
                response.body = body.into_bytes()?;
                Ok(RawMessageEntry::HttpResponse {
                    response,
                    request_id,
                })
            }
        }
    }
}

/// Parses a JSON-lines trace into capture entries.
pub fn read_trace(text: &str) -> Result<Vec<RawMessageEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: TraceRecord =
            serde_json::from_str(line).with_context(|| format!("trace line {}", idx + 1))?;
        let entry = record
            .into_entry()
            .with_context(|| format!("trace line {}", idx + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Session values for symbolic tokens, as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFile {
    pub session_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub connection_code: Option<u32>,
    pub region_handle: Option<u64>,
    pub position: Option<[f32; 3]>,
}

impl From<SessionFile> for StaticSession {
    fn from(file: SessionFile) -> Self {
        Self {
            session_id: file.session_id,
            agent_id: file.agent_id,
            connection_code: file.connection_code,
            region_handle: file.region_handle,
            position: file.position,
        }
    }
}

/// Parses a capability table given as a JSON object of name to URL.
pub fn read_capabilities(text: &str) -> Result<StaticCapabilities> {
    let urls: BTreeMap<String, String> =
        serde_json::from_str(text).context("parse capabilities json")?;
    Ok(urls
        .into_iter()
        .fold(StaticCapabilities::new(), |caps, (name, url)| caps.with(name, url)))
}

/// Reads datagram file contents, accepting raw bytes or a hex dump.
///
/// Contents count as a hex dump when they are non-empty text made only of
/// hex digits and whitespace.
pub fn load_datagram(contents: &[u8]) -> Result<Vec<u8>> {
    let Ok(text) = std::str::from_utf8(contents) else {
        return Ok(contents.to_vec());
    };
    let is_hex = text.chars().any(|ch| ch.is_ascii_hexdigit())
        && text
            .chars()
            .all(|ch| ch.is_ascii_hexdigit() || ch.is_ascii_whitespace());
    if !is_hex {
        return Ok(contents.to_vec());
    }
    let compact: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    decode_hex(&compact).map_err(|reason| anyhow!("hex dump: {reason}"))
}
