//! Deterministic text rendering of decoded datagrams and HTTP messages.

use std::fmt::{self, Write as _};

use crate::decode::DecodedMessage;
use crate::field::{hex_dump, render_summary, Rendered};
use crate::http::{classify_content_type, find_header, BodyClass, HttpRequest, HttpResponse};
use crate::pretty::beautify;

/// Section name of the datagram header in message text.
pub const HEADER_SECTION: &str = "Header";

/// Which way a datagram travelled, as seen from the local client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the local client (`out`).
    Outgoing,
    /// Received by the local client (`in`).
    Incoming,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "out",
            Self::Incoming => "in",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "out" => Some(Self::Outgoing),
            "in" => Some(Self::Incoming),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit the `[Header]` section for datagrams.
    pub show_header: bool,
    /// Reformat XML and HTML bodies.
    pub beautify: bool,
    /// Use the lossy one-line blob rendering of list views.
    pub summary: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            beautify: false,
            summary: false,
        }
    }
}

/// Renders a decoded datagram.
///
/// Output is a pure function of the inputs. Without `summary` it parses
/// back to the same message body.
#[must_use]
pub fn render_message(message: &DecodedMessage, direction: Direction, options: &RenderOptions) -> String {
    let mut out = format!("{direction} {}\n\n", message.name);

    if options.show_header {
        let flags = message.flags();
        let _ = writeln!(out, "[{HEADER_SECTION}]");
        let _ = writeln!(out, "    SequenceID = {}", message.sequence());
        let _ = writeln!(out, "    ZeroCoded = {}", flags.is_zero_coded());
        let _ = writeln!(out, "    Reliable = {}", flags.is_reliable());
        let _ = writeln!(out, "    Resent = {}", flags.is_resent());
        let _ = writeln!(out, "    AckAppended = {}", flags.has_acks());
        if !message.acks.is_empty() {
            let acks: Vec<String> = message.acks.iter().map(u32::to_string).collect();
            let _ = writeln!(out, "    Acks = {}", acks.join(", "));
        }
    }

    for block in &message.blocks {
        let _ = writeln!(out, "[{}]", block.name);
        for field in &block.fields {
            let Rendered { text, hex } = if options.summary {
                render_summary(field.kind, &field.raw)
            } else {
                Rendered {
                    text: field.text.clone(),
                    hex: field.hex,
                }
            };
            let marker = if hex { "=|" } else { "=" };
            let _ = writeln!(out, "    {} {marker} {text}", field.name);
        }
    }
    out
}

/// Renders an undecodable datagram as its direction and a hex dump.
#[must_use]
pub fn render_hex_dump(direction: Direction, bytes: &[u8]) -> String {
    format!("{direction}\n{}", hex_dump(bytes))
}

/// Renders an HTTP request as `VERB URL`, headers, a blank line and the body.
#[must_use]
pub fn render_http_request(request: &HttpRequest, options: &RenderOptions) -> String {
    let mut out = format!("{} {}\n", request.method, request.url);
    write_http_tail(
        &mut out,
        request.content_type.as_deref(),
        &request.headers,
        &request.body,
        options,
    );
    out
}

/// Renders an HTTP response as its status code, headers, a blank line and the body.
#[must_use]
pub fn render_http_response(response: &HttpResponse, options: &RenderOptions) -> String {
    let mut out = format!("{}\n", response.status);
    write_http_tail(
        &mut out,
        response.content_type.as_deref(),
        &response.headers,
        &response.body,
        options,
    );
    out
}

fn write_http_tail(
    out: &mut String,
    content_type: Option<&str>,
    headers: &[(String, String)],
    body: &[u8],
    options: &RenderOptions,
) {
    if let Some(content_type) = content_type {
        if find_header(headers, "Content-Type").is_none() {
            let _ = writeln!(out, "Content-Type: {content_type}");
        }
    }
    for (name, value) in headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    out.push('\n');
    out.push_str(&render_body(content_type, body, options));
}

fn render_body(content_type: Option<&str>, body: &[u8], options: &RenderOptions) -> String {
    match content_type.map(classify_content_type) {
        Some(BodyClass::Binary) => hex_dump(body),
        Some(BodyClass::Markup(markup)) if options.beautify => std::str::from_utf8(body)
            .ok()
            .and_then(|text| beautify(text, markup))
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}
