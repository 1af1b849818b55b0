//! Editable default text for a template.

use std::fmt::Write as _;

use template::{BlockDef, FieldDef, FieldKind, RepeatKind, Template};
use uuid::Uuid;

use crate::text::Direction;

/// Produces message text with a plausible default for every field.
///
/// Trusted templates are simulator-to-client messages, so their skeleton
/// starts with `in`. Multiple blocks are written their declared number of
/// times, every other block once. Session-bound fields use symbolic tokens.
#[must_use]
pub fn skeleton(template: &Template) -> String {
    let direction = if template.trusted {
        Direction::Incoming
    } else {
        Direction::Outgoing
    };
    let mut out = format!("{direction} {}\n\n", template.name);
    for block in &template.blocks {
        let repeats = match block.repeat {
            RepeatKind::Multiple { count } => usize::from(count),
            RepeatKind::Single | RepeatKind::Variable => 1,
        };
        for _ in 0..repeats {
            let _ = writeln!(out, "[{}]", block.name);
            for field in &block.fields {
                let _ = writeln!(out, "    {} = {}", field.name, default_value(block, field));
            }
        }
    }
    out
}

fn default_value(block: &BlockDef, field: &FieldDef) -> String {
    let name = field.name.as_str();
    match field.kind {
        FieldKind::U64 if matches!(name, "RegionHandle" | "Handle") => "$RegionHandle".to_string(),
        FieldKind::U32
            if matches!(name, "CircuitCode" | "ViewerCircuitCode")
                || (name == "Code" && block.name == "CircuitCode") =>
        {
            "$ConnectionCode".to_string()
        }
        FieldKind::U8
        | FieldKind::U16
        | FieldKind::U32
        | FieldKind::U64
        | FieldKind::S8
        | FieldKind::S16
        | FieldKind::S32
        | FieldKind::S64 => match name {
            "PCode" => "9",
            "PathCurve" => "16",
            "ProfileCurve" => "1",
            "PathScaleX" | "PathScaleY" => "100",
            "BypassRaycast" => "1",
            _ => "0",
        }
        .to_string(),
        FieldKind::F32 | FieldKind::F64 => "0.0".to_string(),
        FieldKind::Vector3 | FieldKind::Vector3d | FieldKind::Quaternion => match name {
            "Position" | "RayStart" | "RayEnd" if field.kind != FieldKind::Quaternion => {
                "$Position".to_string()
            }
            "Scale" => "<0.5, 0.5, 0.5>".to_string(),
            _ => "<0, 0, 0>".to_string(),
        },
        FieldKind::Vector4 => "<0, 0, 0, 0>".to_string(),
        FieldKind::Uuid => match name {
            "AgentID" => "$AgentId".to_string(),
            "SessionID" => "$SessionId".to_string(),
            _ => Uuid::nil().hyphenated().to_string(),
        },
        FieldKind::Bool => "false".to_string(),
        FieldKind::IpAddr => "0.0.0.0".to_string(),
        FieldKind::IpPort => "0".to_string(),
        FieldKind::Variable { .. } => "Hello, world!".to_string(),
        FieldKind::Fixed { size } => "a".repeat(size),
    }
}
