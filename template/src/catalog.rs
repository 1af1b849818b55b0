//! In-memory template catalog.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TemplateError, TemplateResult};
use crate::{Template, TemplateRegistry, WireId};

/// A validated set of templates indexed by name and wire id.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "CatalogFile", into = "CatalogFile")
)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<WireId, usize>,
}

/// On-disk shape of a catalog.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    templates: Vec<Template>,
}

#[cfg(feature = "serde")]
impl TryFrom<CatalogFile> for TemplateCatalog {
    type Error = TemplateError;

    fn try_from(file: CatalogFile) -> TemplateResult<Self> {
        Self::new(file.templates)
    }
}

#[cfg(feature = "serde")]
impl From<TemplateCatalog> for CatalogFile {
    fn from(catalog: TemplateCatalog) -> Self {
        Self {
            templates: catalog.templates,
        }
    }
}

impl TemplateCatalog {
    /// Creates a catalog from templates after validation.
    pub fn new(templates: Vec<Template>) -> TemplateResult<Self> {
        let mut by_name = HashMap::with_capacity(templates.len());
        let mut by_id = HashMap::with_capacity(templates.len());
        for (idx, template) in templates.iter().enumerate() {
            template.validate()?;
            if by_name.insert(template.name.clone(), idx).is_some() {
                return Err(TemplateError::DuplicateName {
                    name: template.name.clone(),
                });
            }
            if let Some(prev) = by_id.insert(template.id, idx) {
                return Err(TemplateError::DuplicateWireId {
                    id: template.id,
                    first: templates[prev].name.clone(),
                    second: template.name.clone(),
                });
            }
        }
        Ok(Self {
            templates,
            by_name,
            by_id,
        })
    }

    /// Creates a catalog builder.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Returns the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if the catalog has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates templates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }
}

impl TemplateRegistry for TemplateCatalog {
    fn resolve_id(&self, id: WireId) -> Option<&Template> {
        self.by_id.get(&id).map(|&idx| &self.templates[idx])
    }

    fn resolve_by_name(&self, name: &str) -> Option<&Template> {
        self.by_name.get(name).map(|&idx| &self.templates[idx])
    }
}

/// Builder for `TemplateCatalog`.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    templates: Vec<Template>,
}

impl CatalogBuilder {
    /// Adds a template.
    #[must_use]
    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    /// Builds the catalog after validation.
    pub fn build(self) -> TemplateResult<TemplateCatalog> {
        TemplateCatalog::new(self.templates)
    }
}
