//! Parsing of edited message text back into wire bytes.
//!
//! Datagram text is matched against its template block by block and field by
//! field; nothing is inferred or reordered. HTTP text is split into request
//! line, headers and body.

use std::iter::Peekable;

use bytestream::{ByteError, ByteWriter};
use template::{BlockDef, FieldKind, RepeatKind, TemplateRegistry};
use tracing::trace;
use wire::{encode_datagram, EncodeError, PacketFlags, PacketHeader, HEADER_SIZE};

use crate::error::{CodecError, CodecResult, FieldReason, TextReason};
use crate::field::{encode_value, write_raw};
use crate::http::{CapabilityResolver, HttpMethod, HttpRequest};
use crate::limits::CodecLimits;
use crate::session::SessionContext;
use crate::text::{Direction, HEADER_SECTION};

/// A datagram parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDatagram {
    pub direction: Direction,
    /// Template name.
    pub name: String,
    /// Header from the `[Header]` section, with the zero-coded and ack flags
    /// cleared.
    pub header: PacketHeader,
    /// Wire id followed by block data, in template order.
    pub message: Vec<u8>,
}

impl ParsedDatagram {
    /// Prepends the header, producing a sendable datagram without
    /// zero-coding or ack trailer.
    pub fn to_datagram(&self, limits: &CodecLimits) -> Result<Vec<u8>, EncodeError> {
        encode_datagram(self.header, &self.message, &limits.wire)
    }
}

/// Result of parsing arbitrary message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Datagram(ParsedDatagram),
    Http(HttpRequest),
}

/// Collaborators needed to turn text into bytes.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub registry: &'a dyn TemplateRegistry,
    pub session: &'a dyn SessionContext,
    pub capabilities: &'a dyn CapabilityResolver,
    pub limits: &'a CodecLimits,
}

/// Parses datagram or HTTP request text, chosen by the first token.
pub fn parse_message(ctx: &ParseContext<'_>, text: &str) -> CodecResult<ParsedMessage> {
    check_size(text, ctx.limits)?;
    let first = text
        .split_whitespace()
        .next()
        .ok_or(CodecError::MalformedText(TextReason::Empty))?;
    if Direction::from_token(first).is_some() {
        parse_datagram_text(ctx.registry, ctx.session, text, ctx.limits).map(ParsedMessage::Datagram)
    } else if HttpMethod::from_token(first).is_some() {
        parse_http_text(ctx.capabilities, text, ctx.limits).map(ParsedMessage::Http)
    } else {
        Err(TextReason::UnknownVerb {
            verb: first.to_string(),
        }
        .into())
    }
}

/// Parses datagram text into header and message bytes.
pub fn parse_datagram_text<R: TemplateRegistry + ?Sized>(
    registry: &R,
    session: &dyn SessionContext,
    text: &str,
    limits: &CodecLimits,
) -> CodecResult<ParsedDatagram> {
    check_size(text, limits)?;
    let mut lines = text
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty());
    let first = lines.next().ok_or(CodecError::MalformedText(TextReason::Empty))?;
    let tokens: Vec<&str> = first.split_whitespace().collect();
    let &[verb, name] = tokens.as_slice() else {
        return Err(TextReason::BadFirstLine {
            line: first.to_string(),
        }
        .into());
    };
    let direction = Direction::from_token(verb).ok_or_else(|| TextReason::UnknownVerb {
        verb: verb.to_string(),
    })?;
    let template = registry
        .resolve_by_name(name)
        .ok_or_else(|| CodecError::UnknownMessageType {
            message: name.to_string(),
        })?;

    let mut sections = split_sections(lines)?.into_iter().peekable();
    let mut header = PacketHeader::default();
    if template.find_block(HEADER_SECTION).is_none() {
        if let Some(section) = sections.next_if(|section| section.name == HEADER_SECTION) {
            header = parse_header(&section, session)?;
        }
    }

    let body_limit = limits.wire.max_buffer_bytes.saturating_sub(HEADER_SIZE);
    let mut writer = ByteWriter::with_limit(body_limit);
    writer
        .write_bytes(&template.id.to_bytes())
        .map_err(|err| overflow(err, limits))?;

    for block in &template.blocks {
        match block.repeat {
            RepeatKind::Single => {
                let section = expect_section(&mut sections, block)?;
                write_section(&mut writer, block, &section, session, limits)?;
            }
            RepeatKind::Multiple { count } => {
                for _ in 0..count {
                    let section = expect_section(&mut sections, block)?;
                    write_section(&mut writer, block, &section, session, limits)?;
                }
            }
            RepeatKind::Variable => {
                let mut instances = Vec::new();
                while let Some(section) = sections.next_if(|section| section.name == block.name) {
                    instances.push(section);
                }
                let count = u8::try_from(instances.len()).map_err(|_| TextReason::TooManyInstances {
                    block: block.name.clone(),
                    count: instances.len(),
                })?;
                writer.write_u8(count).map_err(|err| overflow(err, limits))?;
                for section in &instances {
                    write_section(&mut writer, block, section, session, limits)?;
                }
            }
        }
    }

    if let Some(extra) = sections.next() {
        return Err(TextReason::UnexpectedBlock {
            block: extra.name.to_string(),
        }
        .into());
    }

    header.flags = header.flags.plain();
    let message = writer.finish();
    trace!(template = %template.name, bytes = message.len(), "parsed datagram text");
    Ok(ParsedDatagram {
        direction,
        name: template.name.clone(),
        header,
        message,
    })
}

/// Parses HTTP request text, resolving a capability name in place of an
/// absolute URL.
pub fn parse_http_text(
    capabilities: &dyn CapabilityResolver,
    text: &str,
    limits: &CodecLimits,
) -> CodecResult<HttpRequest> {
    check_size(text, limits)?;
    let mut rest = text;
    let first = loop {
        let line = take_line(&mut rest).ok_or(CodecError::MalformedText(TextReason::Empty))?;
        if !line.trim().is_empty() {
            break line.trim();
        }
    };
    let tokens: Vec<&str> = first.split_whitespace().collect();
    let &[verb, target] = tokens.as_slice() else {
        return Err(TextReason::BadFirstLine {
            line: first.to_string(),
        }
        .into());
    };
    let method = HttpMethod::from_token(verb).ok_or_else(|| TextReason::UnknownVerb {
        verb: verb.to_string(),
    })?;
    let url = resolve_target(capabilities, target)?;

    let mut request = HttpRequest::new(method, url);
    while let Some(line) = take_line(&mut rest) {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| TextReason::MalformedHeader {
            line: line.to_string(),
        })?;
        request
            .headers
            .push((name.trim().to_string(), value.trim().to_string()));
    }
    request.content_type = request.header("Content-Type").map(str::to_string);
    request.body = rest.as_bytes().to_vec();
    Ok(request)
}

struct Section<'a> {
    name: &'a str,
    fields: Vec<FieldLine<'a>>,
}

struct FieldLine<'a> {
    name: &'a str,
    value: &'a str,
    hex: bool,
}

fn split_sections<'a>(lines: impl Iterator<Item = &'a str>) -> CodecResult<Vec<Section<'a>>> {
    let mut sections: Vec<Section<'a>> = Vec::new();
    for line in lines {
        if let Some(inner) = line.trim_end().strip_prefix('[') {
            let name = inner.strip_suffix(']').unwrap_or(inner).trim();
            sections.push(Section {
                name,
                fields: Vec::new(),
            });
            continue;
        }
        let Some(section) = sections.last_mut() else {
            return Err(TextReason::FieldOutsideBlock {
                line: line.to_string(),
            }
            .into());
        };
        let (name, value) = line.split_once('=').ok_or_else(|| TextReason::MissingEquals {
            line: line.to_string(),
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TextReason::MissingFieldName {
                line: line.to_string(),
            }
            .into());
        }
        // Only the separator space after `=` is dropped; blob text keeps the rest.
        let (value, hex) = match value.strip_prefix('|') {
            Some(hex) => (hex.trim(), true),
            None => (value.strip_prefix(' ').unwrap_or(value), false),
        };
        section.fields.push(FieldLine { name, value, hex });
    }
    Ok(sections)
}

fn parse_header(section: &Section<'_>, session: &dyn SessionContext) -> CodecResult<PacketHeader> {
    let mut header = PacketHeader::default();
    for line in &section.fields {
        let parse = |kind: FieldKind| {
            encode_value(kind, line.value, line.hex, session).map_err(|reason| CodecError::FieldParseError {
                block: HEADER_SECTION.to_string(),
                field: line.name.to_string(),
                reason,
            })
        };
        let bit = match line.name {
            "SequenceID" => {
                let bytes = parse(FieldKind::U32)?;
                header.sequence = bytes
                    .iter()
                    .rev()
                    .fold(0u32, |acc, &byte| acc << 8 | u32::from(byte));
                continue;
            }
            "Acks" => {
                // Ack ids belong to the transport; they are validated and dropped.
                for id in line.value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                    encode_value(FieldKind::U32, id, false, session).map_err(|reason| {
                        CodecError::FieldParseError {
                            block: HEADER_SECTION.to_string(),
                            field: line.name.to_string(),
                            reason,
                        }
                    })?;
                }
                continue;
            }
            "ZeroCoded" => PacketFlags::ZERO_CODED,
            "Reliable" => PacketFlags::RELIABLE,
            "Resent" => PacketFlags::RESENT,
            "AckAppended" => PacketFlags::ACK_APPENDED,
            other => {
                return Err(TextReason::BadHeaderField {
                    field: other.to_string(),
                }
                .into());
            }
        };
        let on = parse(FieldKind::Bool)?.first().is_some_and(|&byte| byte != 0);
        header.flags = header.flags.with(bit, on);
    }
    Ok(header)
}

fn expect_section<'a, I>(sections: &mut Peekable<I>, block: &BlockDef) -> CodecResult<Section<'a>>
where
    I: Iterator<Item = Section<'a>>,
{
    match sections.next_if(|section| section.name == block.name) {
        Some(section) => Ok(section),
        None => Err(CodecError::UnknownBlock {
            expected: block.name.clone(),
            found: sections.peek().map(|section| section.name.to_string()),
        }),
    }
}

fn write_section(
    writer: &mut ByteWriter,
    block: &BlockDef,
    section: &Section<'_>,
    session: &dyn SessionContext,
    limits: &CodecLimits,
) -> CodecResult<()> {
    for (idx, def) in block.fields.iter().enumerate() {
        let line = section
            .fields
            .get(idx)
            .filter(|line| line.name == def.name)
            .ok_or_else(|| CodecError::UnknownField {
                block: block.name.clone(),
                expected: def.name.clone(),
                found: section.fields.get(idx).map(|line| line.name.to_string()),
            })?;
        let field_error = |reason| CodecError::FieldParseError {
            block: block.name.clone(),
            field: def.name.clone(),
            reason,
        };
        let raw = encode_value(def.kind, line.value, line.hex, session).map_err(field_error)?;
        write_raw(writer, def.kind, &raw).map_err(|err| match err {
            ByteError::LengthOverflow { length, prefix_bytes } => field_error(FieldReason::TooLong {
                max: if prefix_bytes == 1 {
                    usize::from(u8::MAX)
                } else {
                    usize::from(u16::MAX)
                },
                actual: length,
            }),
            other => overflow(other, limits),
        })?;
    }
    if let Some(extra) = section.fields.get(block.fields.len()) {
        return Err(TextReason::UnexpectedField {
            block: block.name.clone(),
            field: extra.name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn overflow(err: ByteError, limits: &CodecLimits) -> CodecError {
    let limit = limits.wire.max_buffer_bytes;
    let needed = match err {
        ByteError::BufferOverflow { attempted, .. } => attempted.saturating_add(HEADER_SIZE),
        _ => limit.saturating_add(1),
    };
    CodecError::Encode(EncodeError::BufferTooLarge { needed, limit })
}

fn check_size(text: &str, limits: &CodecLimits) -> CodecResult<()> {
    if text.len() > limits.max_text_bytes {
        return Err(TextReason::TooLarge {
            limit: limits.max_text_bytes,
            actual: text.len(),
        }
        .into());
    }
    Ok(())
}

/// Splits the next line off `rest`, dropping the newline and any `\r`.
fn take_line<'a>(rest: &mut &'a str) -> Option<&'a str> {
    if rest.is_empty() {
        return None;
    }
    let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
    *rest = tail;
    Some(line.trim_end_matches('\r'))
}

fn resolve_target(capabilities: &dyn CapabilityResolver, target: &str) -> CodecResult<String> {
    if target.contains(':') {
        return Ok(target.to_string());
    }
    let relative = target.trim_start_matches('/');
    let (name, tail) = match relative.find(['/', '?']) {
        Some(idx) => relative.split_at(idx),
        None => (relative, ""),
    };
    let base = capabilities
        .resolve(name)
        .ok_or_else(|| CodecError::UnknownCapability {
            name: name.to_string(),
        })?;
    Ok(format!("{base}{tail}"))
}
