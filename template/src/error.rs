//! Template and catalog validation errors.

use std::fmt;

use crate::WireId;

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur when building or validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateError {
    /// Template name is empty.
    EmptyName,

    /// Two templates share a name.
    DuplicateName { name: String },

    /// Two templates share a wire id.
    DuplicateWireId {
        id: WireId,
        first: String,
        second: String,
    },

    /// Wire id is not encodable in its frequency class.
    InvalidWireId { template: String, id: WireId },

    /// Block name is empty or repeated within a template.
    DuplicateBlock { template: String, block: String },

    /// Field name is empty or repeated within a block.
    DuplicateField {
        template: String,
        block: String,
        field: String,
    },

    /// Multiple-repeat block declares zero instances.
    InvalidRepeatCount { template: String, block: String },

    /// Variable blob prefix is neither 1 nor 2 bytes.
    InvalidLengthPrefix { field: String, len_bytes: u8 },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "template name is empty"),
            Self::DuplicateName { name } => write!(f, "duplicate template name {name}"),
            Self::DuplicateWireId { id, first, second } => {
                write!(f, "wire id {id} used by both {first} and {second}")
            }
            Self::InvalidWireId { template, id } => {
                write!(f, "template {template} has invalid wire id {id}")
            }
            Self::DuplicateBlock { template, block } => {
                write!(f, "template {template} has duplicate or empty block {block:?}")
            }
            Self::DuplicateField {
                template,
                block,
                field,
            } => {
                write!(
                    f,
                    "block {template}.{block} has duplicate or empty field {field:?}"
                )
            }
            Self::InvalidRepeatCount { template, block } => {
                write!(f, "block {template}.{block} repeats zero times")
            }
            Self::InvalidLengthPrefix { field, len_bytes } => {
                write!(f, "field {field} has {len_bytes}-byte length prefix")
            }
        }
    }
}

impl std::error::Error for TemplateError {}
