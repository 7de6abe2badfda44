//! TIFF tag value rendering.
//!
//! Decodes raw field payloads into human-readable text for the flattened
//! row projection. Every TIFF 6.0 type has a rendering rule; numeric arrays
//! are comma-joined and truncated past a display cap so a pathological
//! MakerNote cannot flood the table.

use super::parser::{ByteOrder, Field};
use super::tags::FieldType;

/// Display cap for array values.
const MAX_DESCRIBED_ELEMENTS: usize = 16;

/// Decode an ASCII payload into text.
///
/// The payload is NUL-terminated (possibly NUL-padded); everything from the
/// first NUL on is dropped. Non-ASCII bytes are replaced rather than failing
/// the read, since files in the wild routinely carry Latin-1 in ASCII tags.
pub fn ascii_text(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

/// Encode text as a TIFF ASCII payload (bytes plus NUL terminator).
pub fn encode_ascii(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// Render a field's value as display text.
///
/// ASCII decodes to its text; every other type renders element-wise with the
/// stream's byte order.
pub fn describe(field: &Field, byte_order: ByteOrder) -> String {
    let value = &field.value[..];
    match field.field_type {
        FieldType::Ascii => ascii_text(value),
        FieldType::Byte | FieldType::Undefined => {
            render_elements(value, 1, |b| b[0].to_string())
        }
        FieldType::SByte => render_elements(value, 1, |b| (b[0] as i8).to_string()),
        FieldType::Short => render_elements(value, 2, |b| byte_order.read_u16(b).to_string()),
        FieldType::SShort => {
            render_elements(value, 2, |b| (byte_order.read_u16(b) as i16).to_string())
        }
        FieldType::Long => render_elements(value, 4, |b| byte_order.read_u32(b).to_string()),
        FieldType::SLong => {
            render_elements(value, 4, |b| (byte_order.read_u32(b) as i32).to_string())
        }
        FieldType::Rational => render_elements(value, 8, |b| {
            format!(
                "{}/{}",
                byte_order.read_u32(b),
                byte_order.read_u32(&b[4..])
            )
        }),
        FieldType::SRational => render_elements(value, 8, |b| {
            format!(
                "{}/{}",
                byte_order.read_u32(b) as i32,
                byte_order.read_u32(&b[4..]) as i32
            )
        }),
        FieldType::Float => render_elements(value, 4, |b| {
            f32::from_bits(byte_order.read_u32(b)).to_string()
        }),
        FieldType::Double => render_elements(value, 8, |b| {
            f64::from_bits(byte_order.read_u64(b)).to_string()
        }),
    }
}

/// Comma-join fixed-width elements, truncating past the display cap.
fn render_elements<F>(payload: &[u8], width: usize, render: F) -> String
where
    F: Fn(&[u8]) -> String,
{
    let total = payload.len() / width;
    let shown = total.min(MAX_DESCRIBED_ELEMENTS);

    let mut parts = Vec::with_capacity(shown);
    for i in 0..shown {
        parts.push(render(&payload[i * width..(i + 1) * width]));
    }

    let mut out = parts.join(", ");
    if total > shown {
        out.push_str(&format!(", ... ({total} values)"));
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
