//! Two-pass TIFF serialization.
//!
//! Re-serializes an [`OutputSet`] into a fresh TIFF blob with every offset,
//! entry count and directory-chain pointer recomputed:
//!
//! 1. **Layout pass**: decide inline vs offset-indirected storage for each
//!    field (the 4-byte rule), size every directory table, and assign
//!    offsets for tables, external payloads (2-byte aligned) and the
//!    thumbnail blob.
//! 2. **Write pass**: emit header, tables and data area into one buffer
//!    using the precomputed offsets. Nothing is patched after the fact.
//!
//! Directory-pointer entries and the thumbnail interchange pair are
//! synthesized here; they never survive from the source file. Entries are
//! written in ascending tag order per directory, as TIFF 6.0 requires.

use bytes::Bytes;
use tracing::debug;

use crate::format::tiff::{
    ByteOrder, DirectoryKind, FieldType, IFD_ENTRY_SIZE, TAG_EXIF_IFD_POINTER,
    TAG_GPS_IFD_POINTER, TAG_INTEROP_IFD_POINTER, TAG_JPEG_INTERCHANGE_FORMAT,
    TAG_JPEG_INTERCHANGE_FORMAT_LENGTH, TIFF_HEADER_SIZE,
};

use super::builder::{OutputDirectory, OutputField, OutputSet};

/// One planned IFD entry: either a literal field or a synthesized
/// offset-carrying entry resolved during the write pass.
#[derive(Clone)]
enum Proto {
    Literal(OutputField),
    ExifPointer,
    GpsPointer,
    InteropPointer,
    ThumbnailOffset,
    ThumbnailLength,
}

impl Proto {
    fn tag(&self) -> u16 {
        match self {
            Proto::Literal(f) => f.tag,
            Proto::ExifPointer => TAG_EXIF_IFD_POINTER,
            Proto::GpsPointer => TAG_GPS_IFD_POINTER,
            Proto::InteropPointer => TAG_INTEROP_IFD_POINTER,
            Proto::ThumbnailOffset => TAG_JPEG_INTERCHANGE_FORMAT,
            Proto::ThumbnailLength => TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
        }
    }
}

fn table_size(entries: usize) -> usize {
    2 + entries * IFD_ENTRY_SIZE + 4
}

/// Serialize an output set into a standalone TIFF blob.
///
/// An empty set produces a minimal valid TIFF (header plus an empty IFD0).
pub fn serialize(set: &OutputSet) -> Vec<u8> {
    let byte_order = set.byte_order;

    let dir_of = |kind: DirectoryKind| set.directories.iter().find(|d| d.kind == kind);
    let exif = dir_of(DirectoryKind::Exif);
    let gps = dir_of(DirectoryKind::Gps);
    let interop = dir_of(DirectoryKind::Interop);
    let thumb = dir_of(DirectoryKind::Thumbnail);
    let thumbnail: Option<&Bytes> = set.thumbnail.as_ref();
    let emit_thumb = thumb.is_some() || thumbnail.is_some();

    // Assemble each emitted table's entries, sorted by tag. IFD0 is always
    // emitted, even empty, so the blob stays a valid TIFF.
    let literal_fields = |d: Option<&OutputDirectory>| -> Vec<Proto> {
        d.map(|d| d.fields.iter().cloned().map(Proto::Literal).collect())
            .unwrap_or_default()
    };

    let mut tables: Vec<(DirectoryKind, Vec<Proto>)> = Vec::new();

    let mut ifd0_protos = literal_fields(dir_of(DirectoryKind::Ifd0));
    if exif.is_some() {
        ifd0_protos.push(Proto::ExifPointer);
    }
    if gps.is_some() {
        ifd0_protos.push(Proto::GpsPointer);
    }
    tables.push((DirectoryKind::Ifd0, ifd0_protos));

    if let Some(dir) = exif {
        let mut protos = literal_fields(Some(dir));
        if interop.is_some() {
            protos.push(Proto::InteropPointer);
        }
        tables.push((DirectoryKind::Exif, protos));
    }
    if let Some(dir) = gps {
        tables.push((DirectoryKind::Gps, literal_fields(Some(dir))));
    }
    if let Some(dir) = interop {
        tables.push((DirectoryKind::Interop, literal_fields(Some(dir))));
    }
    if emit_thumb {
        let mut protos = literal_fields(thumb);
        if thumbnail.is_some() {
            protos.push(Proto::ThumbnailOffset);
            protos.push(Proto::ThumbnailLength);
        }
        tables.push((DirectoryKind::Thumbnail, protos));
    }

    for (_, protos) in &mut tables {
        protos.sort_by_key(Proto::tag);
    }

    // Layout pass: table offsets, then external payload offsets, then the
    // thumbnail blob, each payload aligned to a word boundary.
    let mut cursor = TIFF_HEADER_SIZE;
    let mut table_offsets = Vec::with_capacity(tables.len());
    for (_, protos) in &tables {
        table_offsets.push(cursor as u32);
        cursor += table_size(protos.len());
    }

    let mut external_offsets: Vec<Vec<Option<u32>>> = Vec::with_capacity(tables.len());
    for (_, protos) in &tables {
        let mut offsets = Vec::with_capacity(protos.len());
        for proto in protos {
            match proto {
                Proto::Literal(f) if f.value.len() > FieldType::INLINE_THRESHOLD => {
                    if cursor % 2 != 0 {
                        cursor += 1;
                    }
                    offsets.push(Some(cursor as u32));
                    cursor += f.value.len();
                }
                _ => offsets.push(None),
            }
        }
        external_offsets.push(offsets);
    }

    let thumbnail_offset = thumbnail.map(|blob| {
        if cursor % 2 != 0 {
            cursor += 1;
        }
        let offset = cursor as u32;
        cursor += blob.len();
        offset
    });

    let offset_of_kind = |kind: DirectoryKind| -> u32 {
        tables
            .iter()
            .position(|(k, _)| *k == kind)
            .map(|i| table_offsets[i])
            .unwrap_or(0)
    };

    // Write pass.
    let mut out = Vec::with_capacity(cursor);
    out.extend_from_slice(match byte_order {
        ByteOrder::LittleEndian => b"II",
        ByteOrder::BigEndian => b"MM",
    });
    byte_order.put_u16(&mut out, 42);
    byte_order.put_u32(&mut out, TIFF_HEADER_SIZE as u32);

    for (i, (kind, protos)) in tables.iter().enumerate() {
        byte_order.put_u16(&mut out, protos.len() as u16);

        for (j, proto) in protos.iter().enumerate() {
            match proto {
                Proto::Literal(field) => {
                    byte_order.put_u16(&mut out, field.tag);
                    byte_order.put_u16(&mut out, field.field_type as u16);
                    byte_order.put_u32(&mut out, field.count);
                    match external_offsets[i][j] {
                        Some(offset) => byte_order.put_u32(&mut out, offset),
                        None => {
                            out.extend_from_slice(&field.value);
                            out.resize(out.len() + 4 - field.value.len(), 0);
                        }
                    }
                }
                Proto::ExifPointer => {
                    put_long_entry(
                        &mut out,
                        byte_order,
                        TAG_EXIF_IFD_POINTER,
                        offset_of_kind(DirectoryKind::Exif),
                    );
                }
                Proto::GpsPointer => {
                    put_long_entry(
                        &mut out,
                        byte_order,
                        TAG_GPS_IFD_POINTER,
                        offset_of_kind(DirectoryKind::Gps),
                    );
                }
                Proto::InteropPointer => {
                    put_long_entry(
                        &mut out,
                        byte_order,
                        TAG_INTEROP_IFD_POINTER,
                        offset_of_kind(DirectoryKind::Interop),
                    );
                }
                Proto::ThumbnailOffset => {
                    put_long_entry(
                        &mut out,
                        byte_order,
                        TAG_JPEG_INTERCHANGE_FORMAT,
                        thumbnail_offset.unwrap_or(0),
                    );
                }
                Proto::ThumbnailLength => {
                    put_long_entry(
                        &mut out,
                        byte_order,
                        TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
                        thumbnail.map(|b| b.len() as u32).unwrap_or(0),
                    );
                }
            }
        }

        let next = if *kind == DirectoryKind::Ifd0 && emit_thumb {
            offset_of_kind(DirectoryKind::Thumbnail)
        } else {
            0
        };
        byte_order.put_u32(&mut out, next);
    }

    // Data area: external payloads in table order, then the thumbnail.
    for (i, (_, protos)) in tables.iter().enumerate() {
        for (j, proto) in protos.iter().enumerate() {
            if let (Proto::Literal(field), Some(offset)) = (proto, external_offsets[i][j]) {
                if out.len() % 2 != 0 {
                    out.push(0);
                }
                debug_assert_eq!(out.len(), offset as usize);
                out.extend_from_slice(&field.value);
            }
        }
    }
    if let (Some(blob), Some(offset)) = (thumbnail, thumbnail_offset) {
        if out.len() % 2 != 0 {
            out.push(0);
        }
        debug_assert_eq!(out.len(), offset as usize);
        out.extend_from_slice(blob);
    }

    debug!(
        tables = tables.len(),
        bytes = out.len(),
        "serialized output set"
    );
    out
}

/// Emit a synthesized single-value Long entry (pointers, interchange pair).
fn put_long_entry(out: &mut Vec<u8>, byte_order: ByteOrder, tag: u16, value: u32) {
    byte_order.put_u16(out, tag);
    byte_order.put_u16(out, FieldType::Long as u16);
    byte_order.put_u32(out, 1);
    byte_order.put_u32(out, value);
}

// =============================================================================
// Tests
// =============================================================================
