//! Type-directed conversion between field bytes and text.
//!
//! Every [`FieldKind`] has one canonical text form produced by [`render`] and
//! accepted by [`encode_value`]. Blob kinds additionally have a hex form,
//! marked with `=|` in message text. Dispatch is a `match` over the closed
//! kind enum; there is no per-kind registration.

use std::net::Ipv4Addr;
use std::str::FromStr;

use bytestream::{ByteReader, ByteResult, ByteWriter};
use template::FieldKind;
use uuid::Uuid;

use crate::error::FieldReason;
use crate::session::SessionContext;

/// Blobs longer than this are truncated in summary rendering.
const SUMMARY_TEXT_LIMIT: usize = 64;
/// Characters kept before the `...` marker of a truncated summary.
const SUMMARY_TEXT_KEEP: usize = 60;
/// Bytes shown in a summary hex dump.
const SUMMARY_HEX_BYTES: usize = 8;
/// Quaternions whose squared magnitude is this close to 1 are taken as-is.
const QUAT_NORMALIZE_EPSILON: f64 = 1e-4;

/// A decoded field: raw bytes plus their canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    pub kind: FieldKind,
    /// Field bytes without any length prefix.
    pub raw: Vec<u8>,
    pub text: String,
    /// `true` when `text` is a hex dump and must be written with `=|`.
    pub hex: bool,
}

impl FieldValue {
    /// Builds a field value by rendering `raw` as `kind`.
    #[must_use]
    pub fn decode(name: impl Into<String>, kind: FieldKind, raw: Vec<u8>) -> Self {
        let Rendered { text, hex } = render(kind, &raw);
        Self {
            name: name.into(),
            kind,
            raw,
            text,
            hex,
        }
    }
}

/// Text form of a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub hex: bool,
}

impl Rendered {
    fn plain(text: impl ToString) -> Self {
        Self {
            text: text.to_string(),
            hex: false,
        }
    }

    fn hex(bytes: &[u8]) -> Self {
        Self {
            text: hex_dump(bytes),
            hex: true,
        }
    }
}

/// Reads one field's bytes, consuming a length prefix for variable blobs.
pub fn read_raw(reader: &mut ByteReader<'_>, kind: FieldKind) -> ByteResult<Vec<u8>> {
    let len = if let FieldKind::Variable { len_bytes } = kind {
        reader.read_length_prefix(len_bytes)?
    } else {
        kind.wire_size().unwrap_or_default()
    };
    Ok(reader.read_bytes(len)?.to_vec())
}

/// Writes one field's bytes, emitting a length prefix for variable blobs.
pub fn write_raw(writer: &mut ByteWriter, kind: FieldKind, raw: &[u8]) -> ByteResult<()> {
    if let FieldKind::Variable { len_bytes } = kind {
        writer.write_length_prefix(raw.len(), len_bytes)?;
    }
    writer.write_bytes(raw)
}

/// Renders field bytes in canonical, round-trippable text.
#[must_use]
pub fn render(kind: FieldKind, raw: &[u8]) -> Rendered {
    match kind {
        FieldKind::U8 => Rendered::plain(u8::from_le_bytes(arr(raw))),
        FieldKind::U16 => Rendered::plain(u16::from_le_bytes(arr(raw))),
        FieldKind::U32 => Rendered::plain(u32::from_le_bytes(arr(raw))),
        FieldKind::U64 => Rendered::plain(u64::from_le_bytes(arr(raw))),
        FieldKind::S8 => Rendered::plain(i8::from_le_bytes(arr(raw))),
        FieldKind::S16 => Rendered::plain(i16::from_le_bytes(arr(raw))),
        FieldKind::S32 => Rendered::plain(i32::from_le_bytes(arr(raw))),
        FieldKind::S64 => Rendered::plain(i64::from_le_bytes(arr(raw))),
        FieldKind::F32 => Rendered::plain(f32::from_le_bytes(arr(raw))),
        FieldKind::F64 => Rendered::plain(f64::from_le_bytes(arr(raw))),
        FieldKind::Vector3 => {
            let [x, y, z] = f32s::<3>(raw);
            Rendered::plain(format!("<{x}, {y}, {z}>"))
        }
        FieldKind::Vector3d => {
            let [x, y, z] = f64s::<3>(raw);
            Rendered::plain(format!("<{x}, {y}, {z}>"))
        }
        FieldKind::Vector4 => {
            let [x, y, z, w] = f32s::<4>(raw);
            Rendered::plain(format!("<{x}, {y}, {z}, {w}>"))
        }
        FieldKind::Quaternion => {
            let [x, y, z] = f32s::<3>(raw);
            let w = quaternion_w(x, y, z);
            Rendered::plain(format!("<{x}, {y}, {z}, {w}>"))
        }
        FieldKind::Uuid => Rendered::plain(Uuid::from_bytes(arr(raw)).hyphenated()),
        FieldKind::Bool => match raw.first().copied().unwrap_or_default() {
            0 => Rendered::plain("false"),
            1 => Rendered::plain("true"),
            other => Rendered::plain(other),
        },
        FieldKind::IpAddr => Rendered::plain(Ipv4Addr::from(arr::<4>(raw))),
        FieldKind::IpPort => Rendered::plain(u16::from_be_bytes(arr(raw))),
        FieldKind::Variable { .. } | FieldKind::Fixed { .. } => render_blob(raw),
    }
}

/// Renders field bytes for one-line list views.
///
/// Scalars render as in [`render`]. Blobs use a lenient readability vote,
/// truncate long text to 60 characters plus `...`, and show at most eight
/// bytes of hex. The result is not meant to be parsed back.
#[must_use]
pub fn render_summary(kind: FieldKind, raw: &[u8]) -> Rendered {
    if !kind.is_blob() {
        return render(kind, raw);
    }
    if raw.is_empty() {
        return Rendered::plain("");
    }

    let window = &raw[..raw.len().min(SUMMARY_TEXT_LIMIT)];
    let mut readable = 0usize;
    let mut unreadable = 0usize;
    for (idx, &byte) in window.iter().enumerate() {
        if byte == 0 {
            if idx + 1 != window.len() {
                unreadable = usize::MAX;
                break;
            }
        } else if is_printable(byte) {
            readable += 1;
        } else {
            unreadable += 1;
        }
    }

    if readable >= unreadable {
        let text: String = window
            .iter()
            .take_while(|&&byte| byte != 0)
            .map(|&byte| if is_printable(byte) { char::from(byte) } else { '.' })
            .collect();
        if raw.len() > SUMMARY_TEXT_LIMIT {
            let kept: String = text.chars().take(SUMMARY_TEXT_KEEP).collect();
            return Rendered::plain(format!("{kept}..."));
        }
        return Rendered::plain(text);
    }

    let shown = &raw[..raw.len().min(SUMMARY_HEX_BYTES)];
    let mut text = hex_dump(shown);
    if raw.len() > SUMMARY_HEX_BYTES {
        text.push_str(" ...");
    }
    Rendered { text, hex: true }
}

/// Converts field text into field bytes (without a length prefix).
///
/// `hex` selects the `=|` form, valid only for blob kinds. Symbolic tokens
/// (`$SessionId`, `$AgentId`, `$ConnectionCode`, `$RegionHandle`,
/// `$Position`, `$FreshId`) are expanded through `session` first.
pub fn encode_value(
    kind: FieldKind,
    text: &str,
    hex: bool,
    session: &dyn SessionContext,
) -> Result<Vec<u8>, FieldReason> {
    // Blob text keeps its edge spaces; everything else is trimmed.
    let text = if kind.is_blob() && !hex { text } else { text.trim() };
    if hex {
        if !kind.is_blob() {
            return Err(FieldReason::HexNotAllowed { kind: kind.name() });
        }
        return finish_blob(kind, decode_hex(text)?, false);
    }

    let expanded = expand_token(text, session)?;
    let text = expanded.as_deref().unwrap_or(text);
    if text.is_empty() && !matches!(kind, FieldKind::Variable { .. }) {
        return Err(FieldReason::Empty { kind: kind.name() });
    }

    let bytes = match kind {
        FieldKind::U8 => parse_num::<u8>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::U16 => parse_num::<u16>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::U32 => parse_num::<u32>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::U64 => parse_num::<u64>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::S8 => parse_num::<i8>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::S16 => parse_num::<i16>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::S32 => parse_num::<i32>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::S64 => return Err(FieldReason::Unsupported { kind: kind.name() }),
        FieldKind::F32 => parse_num::<f32>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::F64 => parse_num::<f64>(kind, text)?.to_le_bytes().to_vec(),
        FieldKind::Vector3 => f32_bytes(&parse_components::<f32, 3>(kind, text)?),
        FieldKind::Vector3d => parse_components::<f64, 3>(kind, text)?
            .iter()
            .flat_map(|c| c.to_le_bytes())
            .collect(),
        FieldKind::Vector4 => f32_bytes(&parse_components::<f32, 4>(kind, text)?),
        FieldKind::Quaternion => f32_bytes(&parse_quaternion(kind, text)?),
        FieldKind::Uuid => Uuid::parse_str(text)
            .map_err(|_| invalid(kind, text))?
            .as_bytes()
            .to_vec(),
        FieldKind::Bool => match text.to_ascii_lowercase().as_str() {
            "true" => vec![1],
            "false" => vec![0],
            _ => vec![parse_num::<u8>(kind, text)?],
        },
        FieldKind::IpAddr => parse_num::<Ipv4Addr>(kind, text)?.octets().to_vec(),
        FieldKind::IpPort => parse_num::<u16>(kind, text)?.to_be_bytes().to_vec(),
        FieldKind::Variable { .. } | FieldKind::Fixed { .. } => {
            return finish_blob(kind, text.as_bytes().to_vec(), true);
        }
    };
    Ok(bytes)
}

/// Formats bytes as space-separated uppercase hex pairs.
#[must_use]
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Parses hex digit pairs, skipping spaces.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, FieldReason> {
    let mut out = Vec::with_capacity(text.len() / 2);
    let mut pending: Option<u8> = None;
    for ch in text.chars() {
        if ch == ' ' {
            continue;
        }
        let nibble = ch
            .to_digit(16)
            .ok_or(FieldReason::InvalidHexDigit { ch })? as u8;
        match pending.take() {
            Some(high) => out.push(high << 4 | nibble),
            None => pending = Some(nibble),
        }
    }
    if pending.is_some() {
        return Err(FieldReason::OddHexDigits);
    }
    Ok(out)
}

fn render_blob(raw: &[u8]) -> Rendered {
    if !is_text_blob(raw) {
        return Rendered::hex(raw);
    }
    let body = raw.strip_suffix(&[0]).unwrap_or(raw);
    Rendered::plain(body.iter().map(|&byte| char::from(byte)).collect::<String>())
}

/// Printable ASCII with at most one trailing NUL. Empty blobs stay hex.
fn is_text_blob(raw: &[u8]) -> bool {
    let body = raw.strip_suffix(&[0]).unwrap_or(raw);
    !body.is_empty() && body.iter().all(|&byte| is_printable(byte))
}

const fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E)
}

fn finish_blob(kind: FieldKind, mut bytes: Vec<u8>, from_text: bool) -> Result<Vec<u8>, FieldReason> {
    match kind {
        FieldKind::Variable { len_bytes } => {
            if from_text {
                bytes.push(0);
            }
            let max = if len_bytes == 1 {
                usize::from(u8::MAX)
            } else {
                usize::from(u16::MAX)
            };
            if bytes.len() > max {
                return Err(FieldReason::TooLong {
                    max,
                    actual: bytes.len(),
                });
            }
            Ok(bytes)
        }
        FieldKind::Fixed { size } => {
            if bytes.len() > size {
                return Err(FieldReason::TooLong {
                    max: size,
                    actual: bytes.len(),
                });
            }
            bytes.resize(size, 0);
            Ok(bytes)
        }
        _ => Err(FieldReason::HexNotAllowed { kind: kind.name() }),
    }
}

fn expand_token(text: &str, session: &dyn SessionContext) -> Result<Option<String>, FieldReason> {
    if !text.starts_with('$') {
        return Ok(None);
    }
    let (token, value) = match text.to_ascii_lowercase().as_str() {
        "$sessionid" => ("$SessionId", session.session_id().map(|id| id.to_string())),
        "$agentid" => ("$AgentId", session.agent_id().map(|id| id.to_string())),
        "$connectioncode" | "$circuitcode" => (
            "$ConnectionCode",
            session.connection_code().map(|code| code.to_string()),
        ),
        "$regionhandle" => (
            "$RegionHandle",
            session.region_handle().map(|handle| handle.to_string()),
        ),
        "$position" | "$pos" => (
            "$Position",
            session
                .position()
                .map(|[x, y, z]| format!("<{x}, {y}, {z}>")),
        ),
        "$freshid" | "$uuid" => return Ok(Some(session.fresh_id().to_string())),
        _ => return Ok(None),
    };
    value
        .map(Some)
        .ok_or(FieldReason::NoSessionContext { token })
}

fn invalid(kind: FieldKind, text: &str) -> FieldReason {
    FieldReason::InvalidLiteral {
        kind: kind.name(),
        text: text.to_string(),
    }
}

fn parse_num<T: FromStr>(kind: FieldKind, text: &str) -> Result<T, FieldReason> {
    text.parse().map_err(|_| invalid(kind, text))
}

fn component_list<T: FromStr>(kind: FieldKind, text: &str) -> Result<Vec<T>, FieldReason> {
    let inner = text
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| invalid(kind, text))?;
    inner
        .split(',')
        .map(|part| part.trim().parse().map_err(|_| invalid(kind, text)))
        .collect()
}

fn parse_components<T: FromStr + Copy + Default, const N: usize>(
    kind: FieldKind,
    text: &str,
) -> Result<[T; N], FieldReason> {
    let parts = component_list::<T>(kind, text)?;
    if parts.len() != N {
        return Err(invalid(kind, text));
    }
    let mut out = [T::default(); N];
    out.copy_from_slice(&parts);
    Ok(out)
}

/// Parses `<x, y, z>` or `<x, y, z, w>` into the packed x, y, z of a unit
/// quaternion with non-negative w.
fn parse_quaternion(kind: FieldKind, text: &str) -> Result<[f32; 3], FieldReason> {
    match component_list::<f32>(kind, text)?.as_slice() {
        &[x, y, z] => Ok(unpack_xyz(x, y, z)),
        &[x, y, z, w] => Ok(normalize_xyzw([x, y, z, w])),
        _ => Err(invalid(kind, text)),
    }
}

fn unpack_xyz(x: f32, y: f32, z: f32) -> [f32; 3] {
    let mag2 = [x, y, z].iter().map(|&c| f64::from(c).powi(2)).sum::<f64>();
    if mag2 > 1.0 {
        let mag = mag2.sqrt();
        return [x, y, z].map(|c| (f64::from(c) / mag) as f32);
    }
    [x, y, z]
}

fn normalize_xyzw(q: [f32; 4]) -> [f32; 3] {
    let mut q = q.map(f64::from);
    let mag2 = q.iter().map(|c| c * c).sum::<f64>();
    if mag2 == 0.0 {
        return [0.0; 3];
    }
    if (mag2 - 1.0).abs() > QUAT_NORMALIZE_EPSILON {
        let mag = mag2.sqrt();
        q = q.map(|c| c / mag);
    }
    if q[3] < 0.0 {
        q = q.map(|c| -c);
    }
    [q[0] as f32, q[1] as f32, q[2] as f32]
}

fn quaternion_w(x: f32, y: f32, z: f32) -> f32 {
    let rest = 1.0 - (x * x + y * y + z * z);
    if rest > 0.0 {
        rest.sqrt()
    } else {
        0.0
    }
}

fn arr<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let len = raw.len().min(N);
    out[..len].copy_from_slice(&raw[..len]);
    out
}

fn f32s<const N: usize>(raw: &[u8]) -> [f32; N] {
    let mut out = [0.0f32; N];
    for (slot, chunk) in out.iter_mut().zip(raw.chunks_exact(4)) {
        *slot = f32::from_le_bytes(arr(chunk));
    }
    out
}

fn f64s<const N: usize>(raw: &[u8]) -> [f64; N] {
    let mut out = [0.0f64; N];
    for (slot, chunk) in out.iter_mut().zip(raw.chunks_exact(8)) {
        *slot = f64::from_le_bytes(arr(chunk));
    }
    out
}

fn f32_bytes(components: &[f32]) -> Vec<u8> {
    components.iter().flat_map(|c| c.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{NoSession, StaticSession};

    fn enc(kind: FieldKind, text: &str) -> Result<Vec<u8>, FieldReason> {
        encode_value(kind, text, false, &NoSession)
    }

    fn text_of(kind: FieldKind, raw: &[u8]) -> String {
        render(kind, raw).text
    }

    #[test]
    fn integers_render_decimal() {
        assert_eq!(text_of(FieldKind::U8, &[200]), "200");
        assert_eq!(text_of(FieldKind::U16, &[0x34, 0x12]), "4660");
        assert_eq!(text_of(FieldKind::S8, &[0xFF]), "-1");
        assert_eq!(text_of(FieldKind::S32, &(-5i32).to_le_bytes()), "-5");
        assert_eq!(text_of(FieldKind::U64, &u64::MAX.to_le_bytes()), u64::MAX.to_string());
    }

    #[test]
    fn integers_parse_strictly() {
        assert_eq!(enc(FieldKind::U16, "4660").unwrap(), vec![0x34, 0x12]);
        assert_eq!(enc(FieldKind::S16, "-2").unwrap(), vec![0xFE, 0xFF]);
        assert!(matches!(
            enc(FieldKind::U8, "256"),
            Err(FieldReason::InvalidLiteral { kind: "U8", .. })
        ));
        assert!(enc(FieldKind::U32, "-1").is_err());
        assert!(matches!(enc(FieldKind::U32, "  "), Err(FieldReason::Empty { .. })));
    }

    #[test]
    fn signed_64_decodes_but_does_not_encode() {
        let raw = (-7i64).to_le_bytes();
        assert_eq!(text_of(FieldKind::S64, &raw), "-7");
        assert_eq!(
            enc(FieldKind::S64, "-7"),
            Err(FieldReason::Unsupported { kind: "S64" })
        );
    }

    #[test]
    fn floats_roundtrip_exactly() {
        for value in [0.1f32, -3.25, 1.0e-30, f32::MAX] {
            let text = text_of(FieldKind::F32, &value.to_le_bytes());
            assert_eq!(enc(FieldKind::F32, &text).unwrap(), value.to_le_bytes());
        }
        let text = text_of(FieldKind::F64, &std::f64::consts::PI.to_le_bytes());
        assert_eq!(text, std::f64::consts::PI.to_string());
    }

    #[test]
    fn vectors_require_exact_shape() {
        let raw = f32_bytes(&[1.0, -2.5, 128.0]);
        assert_eq!(text_of(FieldKind::Vector3, &raw), "<1, -2.5, 128>");
        assert_eq!(enc(FieldKind::Vector3, "< 1 ,-2.5, 128 >").unwrap(), raw);
        assert!(enc(FieldKind::Vector3, "<1, 2>").is_err());
        assert!(enc(FieldKind::Vector3, "1, 2, 3").is_err());
        assert!(enc(FieldKind::Vector4, "<1, 2, 3>").is_err());
        assert_eq!(enc(FieldKind::Vector4, "<0, 0, 0, 1>").unwrap().len(), 16);
        assert_eq!(enc(FieldKind::Vector3d, "<1, 2, 3>").unwrap().len(), 24);
    }

    #[test]
    fn quaternion_reconstructs_w() {
        let raw = f32_bytes(&[0.0, 0.0, 0.0]);
        assert_eq!(text_of(FieldKind::Quaternion, &raw), "<0, 0, 0, 1>");
        let raw = f32_bytes(&[1.0, 0.0, 0.0]);
        assert_eq!(text_of(FieldKind::Quaternion, &raw), "<1, 0, 0, 0>");
        let raw = f32_bytes(&[2.0, 0.0, 0.0]);
        assert_eq!(text_of(FieldKind::Quaternion, &raw), "<2, 0, 0, 0>");
    }

    #[test]
    fn quaternion_parses_three_and_four_components() {
        assert_eq!(
            enc(FieldKind::Quaternion, "<0, 0, 0>").unwrap(),
            f32_bytes(&[0.0, 0.0, 0.0])
        );
        assert_eq!(
            enc(FieldKind::Quaternion, "<0.6, 0, 0, 0.8>").unwrap(),
            f32_bytes(&[0.6, 0.0, 0.0])
        );
        // Negative w flips the whole quaternion.
        assert_eq!(
            enc(FieldKind::Quaternion, "<0.6, 0, 0, -0.8>").unwrap(),
            f32_bytes(&[-0.6, -0.0, -0.0])
        );
        // Non-unit input is normalized.
        assert_eq!(
            enc(FieldKind::Quaternion, "<0, 0, 0, 2>").unwrap(),
            f32_bytes(&[0.0, 0.0, 0.0])
        );
        assert_eq!(
            enc(FieldKind::Quaternion, "<2, 0, 0>").unwrap(),
            f32_bytes(&[1.0, 0.0, 0.0])
        );
        assert!(enc(FieldKind::Quaternion, "<1, 2>").is_err());
    }

    #[test]
    fn uuid_renders_hyphenated_lowercase() {
        let id = Uuid::from_u128(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
        let text = text_of(FieldKind::Uuid, id.as_bytes());
        assert_eq!(text, "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(enc(FieldKind::Uuid, &text.to_uppercase()).unwrap(), id.as_bytes());
        assert!(enc(FieldKind::Uuid, "not-a-uuid").is_err());
    }

    #[test]
    fn bool_forms() {
        assert_eq!(text_of(FieldKind::Bool, &[0]), "false");
        assert_eq!(text_of(FieldKind::Bool, &[1]), "true");
        assert_eq!(text_of(FieldKind::Bool, &[7]), "7");
        assert_eq!(enc(FieldKind::Bool, "TRUE").unwrap(), vec![1]);
        assert_eq!(enc(FieldKind::Bool, "0").unwrap(), vec![0]);
        assert_eq!(enc(FieldKind::Bool, "7").unwrap(), vec![7]);
        assert!(enc(FieldKind::Bool, "yes").is_err());
    }

    #[test]
    fn network_kinds() {
        assert_eq!(text_of(FieldKind::IpAddr, &[127, 0, 0, 1]), "127.0.0.1");
        assert_eq!(enc(FieldKind::IpAddr, "10.1.2.3").unwrap(), vec![10, 1, 2, 3]);
        assert!(enc(FieldKind::IpAddr, "10.1.2").is_err());
        assert_eq!(text_of(FieldKind::IpPort, &[0x32, 0xCD]), "13005");
        assert_eq!(enc(FieldKind::IpPort, "13005").unwrap(), vec![0x32, 0xCD]);
    }

    #[test]
    fn printable_blob_renders_as_text() {
        let kind = FieldKind::Variable { len_bytes: 2 };
        let rendered = render(kind, b"Hello, world!\0");
        assert_eq!(rendered.text, "Hello, world!");
        assert!(!rendered.hex);
        assert!(!render(kind, b"no terminator").hex);
    }

    #[test]
    fn unprintable_blob_renders_as_hex() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        let cases: [&[u8]; 5] = [b"ab\x01", b"a\0b", b"ab\0\0", b"", b"\0"];
        for raw in cases {
            let rendered = render(kind, raw);
            assert!(rendered.hex, "{raw:?} should render as hex");
        }
        assert_eq!(render(kind, &[0x01, 0xAB]).text, "01 AB");
    }

    #[test]
    fn edge_spaces_and_pipes_stay_text() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        for raw in [&b"|pipe\0"[..], b" padded\0", b"trailing \0", b"  \0"] {
            let rendered = render(kind, raw);
            assert!(!rendered.hex, "{raw:?} should render as text");
            assert_eq!(enc(kind, &rendered.text).unwrap(), raw.to_vec());
        }
        assert_eq!(render(kind, b" padded\0").text, " padded");
    }

    #[test]
    fn variable_text_appends_nul_and_hex_does_not() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        assert_eq!(enc(kind, "hi").unwrap(), b"hi\0".to_vec());
        assert_eq!(enc(kind, "").unwrap(), vec![0]);
        assert_eq!(
            encode_value(kind, "68 69", true, &NoSession).unwrap(),
            b"hi".to_vec()
        );
        assert_eq!(encode_value(kind, "", true, &NoSession).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn variable_length_is_bounded_by_prefix() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        let long = "x".repeat(255);
        assert!(matches!(
            enc(kind, &long),
            Err(FieldReason::TooLong { max: 255, actual: 256 })
        ));
        assert!(enc(FieldKind::Variable { len_bytes: 2 }, &long).is_ok());
    }

    #[test]
    fn fixed_blobs_pad_and_reject_overflow() {
        let kind = FieldKind::Fixed { size: 4 };
        assert_eq!(enc(kind, "ab").unwrap(), vec![b'a', b'b', 0, 0]);
        assert_eq!(
            encode_value(kind, "FF", true, &NoSession).unwrap(),
            vec![0xFF, 0, 0, 0]
        );
        assert!(matches!(
            enc(kind, "abcde"),
            Err(FieldReason::TooLong { max: 4, actual: 5 })
        ));
    }

    #[test]
    fn hex_parsing_rules() {
        assert_eq!(decode_hex("de AD  be ef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode_hex("dead").unwrap(), vec![0xDE, 0xAD]);
        assert_eq!(decode_hex("abc"), Err(FieldReason::OddHexDigits));
        assert_eq!(
            decode_hex("zz"),
            Err(FieldReason::InvalidHexDigit { ch: 'z' })
        );
    }

    #[test]
    fn hex_marker_rejected_for_scalars() {
        assert_eq!(
            encode_value(FieldKind::U32, "01 00 00 00", true, &NoSession),
            Err(FieldReason::HexNotAllowed { kind: "U32" })
        );
    }

    #[test]
    fn session_tokens_expand_case_insensitively() {
        let session_id = Uuid::from_u128(7);
        let ctx = StaticSession {
            session_id: Some(session_id),
            connection_code: Some(99),
            region_handle: Some(1_099_511_628_032_000),
            position: Some([128.0, 64.5, 22.0]),
            ..StaticSession::default()
        };
        assert_eq!(
            encode_value(FieldKind::Uuid, "$sessionID", false, &ctx).unwrap(),
            session_id.as_bytes()
        );
        assert_eq!(
            encode_value(FieldKind::U32, "$ConnectionCode", false, &ctx).unwrap(),
            99u32.to_le_bytes()
        );
        assert_eq!(
            encode_value(FieldKind::U64, "$RegionHandle", false, &ctx).unwrap(),
            1_099_511_628_032_000u64.to_le_bytes()
        );
        assert_eq!(
            encode_value(FieldKind::Vector3, "$pos", false, &ctx).unwrap(),
            f32_bytes(&[128.0, 64.5, 22.0])
        );
        let fresh = encode_value(FieldKind::Uuid, "$FreshId", false, &NoSession).unwrap();
        assert_eq!(fresh.len(), 16);
    }

    #[test]
    fn session_tokens_without_context_fail() {
        assert_eq!(
            enc(FieldKind::Uuid, "$AgentId"),
            Err(FieldReason::NoSessionContext { token: "$AgentId" })
        );
        assert_eq!(
            enc(FieldKind::Vector3, "$Position"),
            Err(FieldReason::NoSessionContext { token: "$Position" })
        );
    }

    #[test]
    fn unknown_dollar_text_is_literal() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        assert_eq!(enc(kind, "$5 off").unwrap(), b"$5 off\0".to_vec());
    }

    #[test]
    fn summary_truncates_long_text() {
        let kind = FieldKind::Variable { len_bytes: 2 };
        let raw = "a".repeat(100);
        let rendered = render_summary(kind, raw.as_bytes());
        assert_eq!(rendered.text, format!("{}...", "a".repeat(60)));
        assert!(!rendered.hex);
    }

    #[test]
    fn summary_tolerates_minority_garbage() {
        let kind = FieldKind::Variable { len_bytes: 1 };
        let rendered = render_summary(kind, b"abc\x01de\0");
        assert_eq!(rendered.text, "abc.de");
        assert!(!rendered.hex);
    }

    #[test]
    fn summary_hex_shows_eight_bytes() {
        let kind = FieldKind::Fixed { size: 12 };
        let rendered = render_summary(kind, &[0u8; 12]);
        assert!(rendered.hex);
        assert_eq!(rendered.text, "00 00 00 00 00 00 00 00 ...");
    }

    #[test]
    fn read_and_write_raw_with_prefix() {
        let kind = FieldKind::Variable { len_bytes: 2 };
        let mut writer = ByteWriter::new();
        write_raw(&mut writer, kind, b"abc").unwrap();
        write_raw(&mut writer, FieldKind::U8, &[9]).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![3, 0, b'a', b'b', b'c', 9]);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_raw(&mut reader, kind).unwrap(), b"abc".to_vec());
        assert_eq!(read_raw(&mut reader, FieldKind::U8).unwrap(), vec![9]);
        assert!(read_raw(&mut reader, FieldKind::U32).is_err());
    }
}
