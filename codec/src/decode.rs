//! Template-directed datagram decoding.

use bytestream::{ByteError, ByteReader};
use template::{BlockDef, RepeatKind, TemplateRegistry, WireId};
use tracing::{debug, trace};
use wire::{decode_datagram, PacketFlags, PacketHeader};

use crate::error::{CodecError, CodecResult};
use crate::field::{hex_dump, read_raw, FieldValue};
use crate::limits::CodecLimits;

/// A decoded datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Template name.
    pub name: String,
    /// Header exactly as captured.
    pub header: PacketHeader,
    /// Ack ids stripped from the trailer.
    pub acks: Vec<u32>,
    /// Block instances in template order, one per repetition.
    pub blocks: Vec<BlockInstance>,
}

impl DecodedMessage {
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.header.sequence
    }

    #[must_use]
    pub const fn flags(&self) -> PacketFlags {
        self.header.flags
    }

    /// Returns every instance of the named block, in order.
    pub fn instances<'a>(&'a self, block: &'a str) -> impl Iterator<Item = &'a BlockInstance> + 'a {
        self.blocks.iter().filter(move |instance| instance.name == block)
    }

    /// Returns a field of the first instance of `block`.
    #[must_use]
    pub fn field(&self, block: &str, field: &str) -> Option<&FieldValue> {
        self.blocks
            .iter()
            .find(|instance| instance.name == block)?
            .field(field)
    }
}

/// One repetition of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInstance {
    pub name: String,
    /// Field values in template order.
    pub fields: Vec<FieldValue>,
}

impl BlockInstance {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Decodes a captured datagram against a template registry.
///
/// Framing (ack trailer, zero-code expansion) is undone first; block data
/// must then match the template exactly, with no bytes left over.
pub fn decode_message<R: TemplateRegistry + ?Sized>(
    registry: &R,
    buf: &[u8],
    limits: &CodecLimits,
) -> CodecResult<DecodedMessage> {
    let datagram = decode_datagram(buf, &limits.wire).map_err(|err| {
        debug!(%err, len = buf.len(), "datagram framing rejected");
        CodecError::from(err)
    })?;

    let Some(template) = registry.resolve_by_wire_id(&datagram.message) else {
        let message = describe_wire_id(&datagram.message);
        debug!(%message, "no template for datagram");
        return Err(CodecError::UnknownMessageType { message });
    };

    let body = datagram
        .message
        .get(template.id.encoded_len()..)
        .unwrap_or_default();
    let mut reader = ByteReader::new(body);
    let mut blocks = Vec::with_capacity(template.blocks.len());
    for block in &template.blocks {
        let count = match block.repeat {
            RepeatKind::Single => 1,
            RepeatKind::Multiple { count } => usize::from(count),
            RepeatKind::Variable => usize::from(
                reader
                    .read_u8()
                    .map_err(|source| truncated(block, None, source))?,
            ),
        };
        for _ in 0..count {
            blocks.push(decode_block(&mut reader, block)?);
        }
    }

    if !reader.is_empty() {
        debug!(
            template = %template.name,
            remaining = reader.remaining(),
            "trailing bytes after last block"
        );
        return Err(CodecError::TrailingData {
            remaining: reader.remaining(),
        });
    }

    trace!(
        template = %template.name,
        sequence = datagram.header.sequence,
        instances = blocks.len(),
        "decoded datagram"
    );
    Ok(DecodedMessage {
        name: template.name.clone(),
        header: datagram.header,
        acks: datagram.acks,
        blocks,
    })
}

fn decode_block(reader: &mut ByteReader<'_>, block: &BlockDef) -> CodecResult<BlockInstance> {
    let mut fields = Vec::with_capacity(block.fields.len());
    for def in &block.fields {
        let raw = read_raw(reader, def.kind)
            .map_err(|source| truncated(block, Some(&def.name), source))?;
        fields.push(FieldValue::decode(def.name.clone(), def.kind, raw));
    }
    Ok(BlockInstance {
        name: block.name.clone(),
        fields,
    })
}

fn truncated(block: &BlockDef, field: Option<&str>, source: ByteError) -> CodecError {
    CodecError::BlockDataTruncated {
        block: block.name.clone(),
        field: field.map(str::to_string),
        source,
    }
}

fn describe_wire_id(message: &[u8]) -> String {
    match WireId::read(message) {
        Some(id) => id.to_string(),
        None => {
            let prefix = &message[..message.len().min(4)];
            format!("unreadable id [{}]", hex_dump(prefix))
        }
    }
}
