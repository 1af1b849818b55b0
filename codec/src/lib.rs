//! Template message codec for msgscope.
//!
//! Ties together bytestream, wire and template to turn captured datagrams
//! into structured messages and line-oriented text, and to turn edited text
//! back into wire bytes.
//!
//! # Features
//!
//! - Datagram decoding against any [`template::TemplateRegistry`]
//! - Deterministic text rendering of datagrams and HTTP messages
//! - Text parsing with strict template matching
//! - Symbolic session tokens (`$SessionId`, `$Position`, ...)
//! - Optional XML/HTML reformatting of HTTP bodies
//! - Editable message skeletons
//!
//! # Design Principles
//!
//! - **Fail closed** - Truncated, oversized or trailing input is rejected.
//! - **Pure** - Decode, render and parse touch only their inputs.
//! - **Round-trippable** - Rendered text parses back to the same bytes.
//!
//! ```
//! use codec::{decode_message, render_message, CodecLimits, Direction, RenderOptions};
//! use template::{BlockDef, FieldKind, Template, TemplateCatalog, WireId};
//!
//! let catalog = TemplateCatalog::new(vec![Template::new("Ping", WireId::high(1))
//!     .block(BlockDef::single("PingID").field("PingID", FieldKind::U8))])
//! .unwrap();
//! let msg = decode_message(&catalog, &[0, 0, 0, 0, 3, 1, 7], &CodecLimits::default()).unwrap();
//! let options = RenderOptions { show_header: false, ..RenderOptions::default() };
//! let text = render_message(&msg, Direction::Outgoing, &options);
//! assert_eq!(text, "out Ping\n\n[PingID]\n    PingID = 7\n");
//! ```

mod decode;
mod error;
mod field;
mod http;
mod limits;
mod parse;
mod pretty;
mod session;
mod skeleton;
mod text;

pub use decode::{decode_message, BlockInstance, DecodedMessage};
pub use error::{CodecError, CodecResult, FieldReason, TextReason};
pub use field::{
    decode_hex, encode_value, hex_dump, read_raw, render, render_summary, write_raw, FieldValue,
    Rendered,
};
pub use http::{
    base_capability_url, classify_content_type, BodyClass, CapabilityResolver, HttpMethod,
    HttpRequest, HttpResponse, NoCapabilities, StaticCapabilities,
};
pub use limits::CodecLimits;
pub use parse::{
    parse_datagram_text, parse_http_text, parse_message, ParseContext, ParsedDatagram,
    ParsedMessage,
};
pub use pretty::{beautify, Markup};
pub use session::{NoSession, SessionContext, StaticSession};
pub use skeleton::skeleton;
pub use text::{
    render_hex_dump, render_http_request, render_http_response, render_message, Direction,
    RenderOptions, HEADER_SECTION,
};
pub use wire::Limits as WireLimits;
