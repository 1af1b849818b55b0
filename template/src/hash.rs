//! Deterministic catalog hashing.

use blake3::Hasher;

use crate::{FieldKind, Frequency, RepeatKind, Template, TemplateCatalog};

/// Computes a deterministic 64-bit fingerprint of a catalog.
///
/// Templates are hashed in wire-id order, so two catalogs with the same
/// templates hash equally regardless of declaration order.
#[must_use]
pub fn catalog_hash(catalog: &TemplateCatalog) -> u64 {
    let mut templates: Vec<&Template> = catalog.iter().collect();
    templates.sort_by_key(|template| template.id);

    let mut hasher = Hasher::new();
    write_len(&mut hasher, templates.len());
    for template in templates {
        write_template(&mut hasher, template);
    }

    let hash = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(out)
}

fn write_template(hasher: &mut Hasher, template: &Template) {
    write_str(hasher, &template.name);
    let frequency = match template.id.frequency {
        Frequency::High => 0,
        Frequency::Medium => 1,
        Frequency::Low => 2,
        Frequency::Fixed => 3,
    };
    hasher.update(&[frequency]);
    hasher.update(&template.id.number.to_le_bytes());
    hasher.update(&[u8::from(template.trusted), u8::from(template.zero_coded)]);

    write_len(hasher, template.blocks.len());
    for block in &template.blocks {
        write_str(hasher, &block.name);
        match block.repeat {
            RepeatKind::Single => hasher.update(&[0]),
            RepeatKind::Multiple { count } => hasher.update(&[1, count]),
            RepeatKind::Variable => hasher.update(&[2]),
        };
        write_len(hasher, block.fields.len());
        for field in &block.fields {
            write_str(hasher, &field.name);
            write_kind(hasher, field.kind);
        }
    }
}

fn write_kind(hasher: &mut Hasher, kind: FieldKind) {
    write_str(hasher, kind.name());
    match kind {
        FieldKind::Variable { len_bytes } => {
            hasher.update(&[len_bytes]);
        }
        FieldKind::Fixed { size } => write_len(hasher, size),
        _ => {}
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn write_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}
