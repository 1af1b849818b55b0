//! Error types for codec operations.

use std::fmt;

use bytestream::ByteError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding, rendering input, or parsing text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Wire framing error (oversized buffer, malformed packet).
    Wire(wire::DecodeError),

    /// Encoded output exceeds the buffer limit.
    Encode(wire::EncodeError),

    /// No template matches the wire id or name.
    UnknownMessageType { message: String },

    /// Block data ended before every declared field was read.
    BlockDataTruncated {
        block: String,
        /// `None` when the variable-block count byte itself is missing.
        field: Option<String>,
        source: ByteError,
    },

    /// Bytes remain after the last declared block.
    TrailingData { remaining: usize },

    /// A field value could not be converted to or from text.
    FieldParseError {
        block: String,
        field: String,
        reason: FieldReason,
    },

    /// Text supplied a different block than the template expects here.
    UnknownBlock {
        expected: String,
        found: Option<String>,
    },

    /// Text supplied a different field than the template expects here.
    UnknownField {
        block: String,
        expected: String,
        found: Option<String>,
    },

    /// Text is structurally invalid.
    MalformedText(TextReason),

    /// A relative HTTP target names a capability the resolver does not know.
    UnknownCapability { name: String },
}

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldReason {
    /// Literal does not parse as the declared kind.
    InvalidLiteral { kind: &'static str, text: String },

    /// Value is empty and the kind has no empty form.
    Empty { kind: &'static str },

    /// Kind can be decoded but not encoded.
    Unsupported { kind: &'static str },

    /// The `=|` hex marker was used on a non-blob kind.
    HexNotAllowed { kind: &'static str },

    /// Hex text contains a character that is neither a digit nor a space.
    InvalidHexDigit { ch: char },

    /// Hex text has an unpaired trailing digit.
    OddHexDigits,

    /// Blob is longer than its kind allows.
    TooLong { max: usize, actual: usize },

    /// A symbolic token needs session state that is not available.
    NoSessionContext { token: &'static str },
}

/// Why message text was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextReason {
    /// Text is empty.
    Empty,

    /// Text exceeds the configured size limit.
    TooLarge { limit: usize, actual: usize },

    /// First token is neither a direction nor an HTTP verb.
    UnknownVerb { verb: String },

    /// First line has the wrong number of tokens.
    BadFirstLine { line: String },

    /// A field line appears before any `[Block]` line.
    FieldOutsideBlock { line: String },

    /// A field line has no `=`.
    MissingEquals { line: String },

    /// A field line has nothing before `=`.
    MissingFieldName { line: String },

    /// Unknown key in the `[Header]` section.
    BadHeaderField { field: String },

    /// A block appears after the template is exhausted.
    UnexpectedBlock { block: String },

    /// A block has more fields than the template declares.
    UnexpectedField { block: String, field: String },

    /// A variable block is repeated more than a count byte can express.
    TooManyInstances { block: String, count: usize },

    /// An HTTP header line is not `Name: value`.
    MalformedHeader { line: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::UnknownMessageType { message } => {
                write!(f, "unknown message type {message}")
            }
            Self::BlockDataTruncated {
                block,
                field,
                source,
            } => match field {
                Some(field) => write!(f, "block {block} truncated at field {field}: {source}"),
                None => write!(f, "block {block} truncated at instance count: {source}"),
            },
            Self::TrailingData { remaining } => {
                write!(f, "{remaining} bytes of trailing data after last block")
            }
            Self::FieldParseError {
                block,
                field,
                reason,
            } => write!(f, "invalid value for {field} in {block} block: {reason}"),
            Self::UnknownBlock { expected, found } => match found {
                Some(found) => write!(f, "expected block {expected}, found {found}"),
                None => write!(f, "expected block {expected}"),
            },
            Self::UnknownField {
                block,
                expected,
                found,
            } => match found {
                Some(found) => {
                    write!(f, "expected field {expected} in {block} block, found {found}")
                }
                None => write!(f, "expected field {expected} in {block} block"),
            },
            Self::MalformedText(reason) => write!(f, "malformed text: {reason}"),
            Self::UnknownCapability { name } => write!(f, "unknown capability {name}"),
        }
    }
}

impl fmt::Display for FieldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLiteral { kind, text } => write!(f, "{text:?} is not a valid {kind}"),
            Self::Empty { kind } => write!(f, "empty value for {kind}"),
            Self::Unsupported { kind } => write!(f, "{kind} values cannot be encoded"),
            Self::HexNotAllowed { kind } => write!(f, "hex form is not allowed for {kind}"),
            Self::InvalidHexDigit { ch } => write!(f, "invalid hex digit {ch:?}"),
            Self::OddHexDigits => write!(f, "odd number of hex digits"),
            Self::TooLong { max, actual } => {
                write!(f, "blob of {actual} bytes exceeds maximum {max}")
            }
            Self::NoSessionContext { token } => {
                write!(f, "{token} needs a session context")
            }
        }
    }
}

impl fmt::Display for TextReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty message"),
            Self::TooLarge { limit, actual } => {
                write!(f, "text of {actual} bytes exceeds limit {limit}")
            }
            Self::UnknownVerb { verb } => write!(f, "unrecognized verb {verb:?}"),
            Self::BadFirstLine { line } => write!(f, "bad first line {line:?}"),
            Self::FieldOutsideBlock { line } => {
                write!(f, "field before the start of a block: {line:?}")
            }
            Self::MissingEquals { line } => write!(f, "missing an equal sign: {line:?}"),
            Self::MissingFieldName { line } => write!(f, "missing name of field: {line:?}"),
            Self::BadHeaderField { field } => write!(f, "unknown header field {field}"),
            Self::UnexpectedBlock { block } => write!(f, "unexpected block at end: {block}"),
            Self::UnexpectedField { block, field } => {
                write!(f, "unexpected field {field} at end of {block} block")
            }
            Self::TooManyInstances { block, count } => {
                write!(f, "block {block} repeated {count} times")
            }
            Self::MalformedHeader { line } => write!(f, "malformed header {line:?}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::BlockDataTruncated { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<TextReason> for CodecError {
    fn from(reason: TextReason) -> Self {
        Self::MalformedText(reason)
    }
}
