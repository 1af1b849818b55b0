//! Template lookup interface consumed by the codec.

use crate::{Template, WireId};

/// Query interface over a template catalog.
///
/// The codec only ever asks two questions: which template starts these
/// bytes, and which template has this name.
pub trait TemplateRegistry {
    /// Resolves the template whose wire id prefixes `bytes`.
    ///
    /// `bytes` starts immediately after the datagram header.
    fn resolve_by_wire_id(&self, bytes: &[u8]) -> Option<&Template> {
        WireId::read(bytes).and_then(|id| self.resolve_id(id))
    }

    /// Resolves a template by exact wire id.
    fn resolve_id(&self, id: WireId) -> Option<&Template>;

    /// Resolves a template by name.
    fn resolve_by_name(&self, name: &str) -> Option<&Template>;
}

impl<R: TemplateRegistry + ?Sized> TemplateRegistry for &R {
    fn resolve_by_wire_id(&self, bytes: &[u8]) -> Option<&Template> {
        (**self).resolve_by_wire_id(bytes)
    }

    fn resolve_id(&self, id: WireId) -> Option<&Template> {
        (**self).resolve_id(id)
    }

    fn resolve_by_name(&self, name: &str) -> Option<&Template> {
        (**self).resolve_by_name(name)
    }
}
