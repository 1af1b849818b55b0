//! Templates and their blocks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TemplateError, TemplateResult};
use crate::{FieldDef, FieldKind, WireId};

/// How many instances of a block a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RepeatKind {
    /// Exactly one instance.
    Single,
    /// A template-declared number of instances.
    Multiple { count: u8 },
    /// A one-byte count precedes the instances.
    Variable,
}

/// A named group of fields within a template.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockDef {
    pub name: String,
    pub repeat: RepeatKind,
    pub fields: Vec<FieldDef>,
}

impl BlockDef {
    /// Creates a block with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>, repeat: RepeatKind) -> Self {
        Self {
            name: name.into(),
            repeat,
            fields: Vec::new(),
        }
    }

    /// Creates a single-instance block.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, RepeatKind::Single)
    }

    /// Creates a block repeated exactly `count` times.
    #[must_use]
    pub fn multiple(name: impl Into<String>, count: u8) -> Self {
        Self::new(name, RepeatKind::Multiple { count })
    }

    /// Creates a counted block.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, RepeatKind::Variable)
    }

    /// Adds a field to the block.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Adds a prepared field definition.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// A message template: name, wire id and ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Template {
    pub name: String,
    pub id: WireId,
    /// Trusted messages only flow from the region to the client.
    #[cfg_attr(feature = "serde", serde(default))]
    pub trusted: bool,
    /// Sender normally zero-codes this message.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zero_coded: bool,
    pub blocks: Vec<BlockDef>,
}

impl Template {
    /// Creates a template with no blocks.
    #[must_use]
    pub fn new(name: impl Into<String>, id: WireId) -> Self {
        Self {
            name: name.into(),
            id,
            trusted: false,
            zero_coded: false,
            blocks: Vec::new(),
        }
    }

    /// Marks the template as trusted.
    #[must_use]
    pub const fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    /// Marks the template as normally zero-coded.
    #[must_use]
    pub const fn zero_coded(mut self) -> Self {
        self.zero_coded = true;
        self
    }

    /// Adds a block to the template.
    #[must_use]
    pub fn block(mut self, block: BlockDef) -> Self {
        self.blocks.push(block);
        self
    }

    /// Looks up a block by name.
    #[must_use]
    pub fn find_block(&self, name: &str) -> Option<&BlockDef> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// Validates template invariants.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if !self.id.is_valid() {
            return Err(TemplateError::InvalidWireId {
                template: self.name.clone(),
                id: self.id,
            });
        }
        let mut seen_blocks = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if block.name.is_empty() || seen_blocks.contains(&block.name.as_str()) {
                return Err(TemplateError::DuplicateBlock {
                    template: self.name.clone(),
                    block: block.name.clone(),
                });
            }
            seen_blocks.push(block.name.as_str());
            if block.repeat == (RepeatKind::Multiple { count: 0 }) {
                return Err(TemplateError::InvalidRepeatCount {
                    template: self.name.clone(),
                    block: block.name.clone(),
                });
            }
            self.validate_fields(block)?;
        }
        Ok(())
    }

    fn validate_fields(&self, block: &BlockDef) -> TemplateResult<()> {
        let mut seen = Vec::with_capacity(block.fields.len());
        for field in &block.fields {
            if field.name.is_empty() || seen.contains(&field.name.as_str()) {
                return Err(TemplateError::DuplicateField {
                    template: self.name.clone(),
                    block: block.name.clone(),
                    field: field.name.clone(),
                });
            }
            seen.push(field.name.as_str());
            if let FieldKind::Variable { len_bytes } = field.kind {
                if len_bytes != 1 && len_bytes != 2 {
                    return Err(TemplateError::InvalidLengthPrefix {
                        field: field.name.clone(),
                        len_bytes,
                    });
                }
            }
        }
        Ok(())
    }
}
