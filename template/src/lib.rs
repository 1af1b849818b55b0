//! Message template model and catalog for the msgscope codec.
//!
//! This crate defines how template datagrams are described:
//! - Templates with a name, a frequency-classed wire id and ordered blocks
//! - Blocks with a repeat kind and ordered, typed fields
//! - The [`TemplateRegistry`] query interface the codec consumes
//! - An in-memory [`TemplateCatalog`] and a deterministic catalog hash
//!
//! # Design Principles
//!
//! - **Closed kinds** - Field and repeat kinds are enums, dispatched with `match`.
//! - **Explicit catalogs** - Templates are data; nothing is registered globally.
//! - **Deterministic hashing** - The catalog hash is stable given the same templates.

mod catalog;
mod error;
mod field;
mod hash;
mod registry;
mod template;
mod wire_id;

pub use catalog::{CatalogBuilder, TemplateCatalog};
pub use error::{TemplateError, TemplateResult};
pub use field::{FieldDef, FieldKind};
pub use hash::catalog_hash;
pub use registry::TemplateRegistry;
pub use template::{BlockDef, RepeatKind, Template};
pub use wire_id::{Frequency, WireId};
