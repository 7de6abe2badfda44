//! TIFF header and directory-tree parsing.
//!
//! This module decodes the TIFF blob carried by a JPEG APP1/Exif segment
//! into a [`MetadataTree`] of typed fields, which is the foundation for the
//! row projection and for lossless rewriting.
//!
//! # TIFF Header Structure (8 bytes)
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Magic (42 = 0x002A)
//! Bytes 4-7: Offset to IFD0 (4 bytes)
//! ```
//!
//! # IFD Structure
//!
//! ```text
//! Bytes 0-1: Entry count N
//! N entries of 12 bytes each: tag (2), type (2), count (4), value/offset (4)
//! Last 4 bytes: offset of the next IFD in the chain, 0 if none
//! ```
//!
//! A value whose total payload is at most 4 bytes is stored inline in the
//! entry; anything larger is stored at an absolute offset into the blob.

use bytes::Bytes;
use tracing::debug;

use crate::error::{CorruptKind, ExifError};

use super::tags::{
    pointer_target, DirectoryKind, FieldType, TAG_JPEG_INTERCHANGE_FORMAT,
    TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
};

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// TIFF magic number
const TIFF_MAGIC: u16 = 42;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry in bytes (tag + type + count + value/offset)
pub const IFD_ENTRY_SIZE: usize = 12;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF stream.
///
/// Declared by the first two bytes of the header; every multi-byte value in
/// the stream must be read and written respecting this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes([bytes[0], bytes[1]]),
            ByteOrder::BigEndian => u16::from_be_bytes([bytes[0], bytes[1]]),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => {
                u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            }
            ByteOrder::BigEndian => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }

    /// Read a u64 from a byte slice using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            ByteOrder::BigEndian => u64::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        }
    }

    /// Append a u16 to a buffer using this byte order.
    #[inline]
    pub fn put_u16(self, buf: &mut Vec<u8>, value: u16) {
        match self {
            ByteOrder::LittleEndian => buf.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    /// Append a u32 to a buffer using this byte order.
    #[inline]
    pub fn put_u32(self, buf: &mut Vec<u8>, value: u32) {
        match self {
            ByteOrder::LittleEndian => buf.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the stream
    pub byte_order: ByteOrder,

    /// Offset of IFD0 within the stream
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from the start of a blob.
    ///
    /// # Errors
    /// - `TooSmall` if fewer than 8 bytes are available
    /// - `ByteOrder` if the byte-order mark is neither II nor MM
    /// - `Magic` if the magic number is not 42
    /// - `IfdOffset` if IFD0 would start outside the blob
    pub fn parse(blob: &[u8]) -> Result<Self, CorruptKind> {
        if blob.len() < TIFF_HEADER_SIZE {
            return Err(CorruptKind::TooSmall {
                required: TIFF_HEADER_SIZE,
                actual: blob.len(),
            });
        }

        // The byte-order mark reads the same in either order; pick LE here
        // just to get a number to compare.
        let mark = u16::from_le_bytes([blob[0], blob[1]]);
        let byte_order = match mark {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(CorruptKind::ByteOrder(mark)),
        };

        let magic = byte_order.read_u16(&blob[2..4]);
        if magic != TIFF_MAGIC {
            return Err(CorruptKind::Magic(magic));
        }

        let first_ifd_offset = byte_order.read_u32(&blob[4..8]);
        if first_ifd_offset as usize >= blob.len() {
            return Err(CorruptKind::IfdOffset {
                offset: first_ifd_offset,
                size: blob.len(),
            });
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// Field and Directory
// =============================================================================

/// A single decoded IFD entry.
///
/// The payload is the raw value bytes in the stream's byte order, with any
/// offset indirection already resolved. Invariant: `value.len()` equals
/// `count * field_type.size_in_bytes()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Tag number within the directory's namespace
    pub tag: u16,

    /// Decoded field type
    pub field_type: FieldType,

    /// Number of elements of `field_type` in the payload
    pub count: u32,

    /// Raw payload bytes, offset indirection resolved
    pub value: Bytes,
}

/// A named group of fields sharing one directory kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// What role this directory plays in the Exif tree
    pub kind: DirectoryKind,

    /// Offset of the directory table within the TIFF stream
    pub offset: u32,

    /// Fields in encounter order; tag numbers unique in well-formed files
    pub fields: Vec<Field>,
}

// =============================================================================
// MetadataTree
// =============================================================================

/// The fully parsed Exif metadata of one image.
///
/// Directories appear in traversal order: IFD0, then each sub-IFD at the
/// encounter point of its pointer tag, then the thumbnail IFD reached
/// through the next-IFD chain. The tree lives for one read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTree {
    /// Byte order of the source stream, preserved on rewrite
    pub byte_order: ByteOrder,

    /// Parsed directories in traversal order
    pub directories: Vec<Directory>,

    /// Embedded JPEG thumbnail blob, when the thumbnail IFD describes one
    pub thumbnail: Option<Bytes>,
}

impl MetadataTree {
    /// Parse a complete metadata tree from a TIFF blob.
    ///
    /// Parsing is all-or-nothing: any structural violation fails the whole
    /// read and no partial tree is returned.
    pub fn parse(blob: &[u8]) -> Result<Self, ExifError> {
        let header = TiffHeader::parse(blob)?;

        let mut directories = Vec::new();
        let mut visited = Vec::new();

        let next = parse_directory(
            blob,
            header.byte_order,
            header.first_ifd_offset,
            DirectoryKind::Ifd0,
            &mut directories,
            &mut visited,
        )?;

        // The chain off IFD0 conventionally holds one more top-level IFD
        // describing the thumbnail.
        if next != 0 {
            let after = parse_directory(
                blob,
                header.byte_order,
                next,
                DirectoryKind::Thumbnail,
                &mut directories,
                &mut visited,
            )?;
            if after != 0 {
                debug!(offset = after, "ignoring IFDs past the thumbnail IFD");
            }
        }

        let thumbnail = extract_thumbnail(blob, header.byte_order, &directories)?;

        Ok(MetadataTree {
            byte_order: header.byte_order,
            directories,
            thumbnail,
        })
    }

    /// Number of editable fields across all directories.
    ///
    /// Structural tags (directory pointers, thumbnail interchange pair) are
    /// not counted; their values are physical offsets regenerated on write.
    pub fn field_count(&self) -> usize {
        self.directories
            .iter()
            .flat_map(|d| &d.fields)
            .filter(|f| !super::tags::is_structural(f.tag))
            .count()
    }
}

/// Parse one IFD table, recursing into sub-IFDs at their pointer tags.
///
/// Returns the next-IFD offset from the end of the table (0 if none). The
/// `visited` list guards against offset cycles in corrupt files.
fn parse_directory(
    blob: &[u8],
    byte_order: ByteOrder,
    offset: u32,
    kind: DirectoryKind,
    directories: &mut Vec<Directory>,
    visited: &mut Vec<u32>,
) -> Result<u32, CorruptKind> {
    if visited.contains(&offset) {
        return Err(CorruptKind::CircularIfd(offset));
    }
    visited.push(offset);

    let table = offset as usize;
    if table + 2 > blob.len() {
        return Err(CorruptKind::IfdOffset {
            offset,
            size: blob.len(),
        });
    }

    let entry_count = byte_order.read_u16(&blob[table..]);
    let entries_end = table + 2 + entry_count as usize * IFD_ENTRY_SIZE;
    if entries_end + 4 > blob.len() {
        return Err(CorruptKind::TruncatedIfd {
            offset,
            entries: entry_count,
        });
    }

    let mut fields = Vec::with_capacity(entry_count as usize);
    let mut sub_ifds: Vec<(DirectoryKind, u32)> = Vec::new();

    for i in 0..entry_count as usize {
        let entry = table + 2 + i * IFD_ENTRY_SIZE;
        let tag = byte_order.read_u16(&blob[entry..]);
        let type_raw = byte_order.read_u16(&blob[entry + 2..]);
        let count = byte_order.read_u32(&blob[entry + 4..]);

        let field_type = FieldType::from_u16(type_raw).ok_or(CorruptKind::FieldType {
            tag,
            field_type: type_raw,
        })?;

        let size = field_type.size_in_bytes() as u64 * count as u64;
        let value = if field_type.fits_inline(count) {
            Bytes::copy_from_slice(&blob[entry + 8..entry + 8 + size as usize])
        } else {
            let value_offset = byte_order.read_u32(&blob[entry + 8..]);
            let start = value_offset as u64;
            if start + size > blob.len() as u64 {
                return Err(CorruptKind::ValueOutOfBounds {
                    tag,
                    offset: value_offset,
                    len: size.min(u32::MAX as u64) as u32,
                });
            }
            Bytes::copy_from_slice(&blob[start as usize..(start + size) as usize])
        };

        // Pointer tags spawn sub-directories. Only a well-formed pointer
        // (Long, single value) is followed; anything else stays an ordinary
        // field so the read does not loop on garbage.
        if let Some(target) = pointer_target(tag) {
            if field_type == FieldType::Long && count == 1 {
                sub_ifds.push((target, byte_order.read_u32(&value)));
            }
        }

        fields.push(Field {
            tag,
            field_type,
            count,
            value,
        });
    }

    let next = byte_order.read_u32(&blob[entries_end..]);

    debug!(
        kind = kind.label(),
        offset,
        entries = entry_count,
        "parsed IFD"
    );

    directories.push(Directory {
        kind,
        offset,
        fields,
    });

    for (sub_kind, sub_offset) in sub_ifds {
        // Sub-IFDs are leaves of the chain; their next-IFD offset is unused.
        parse_directory(blob, byte_order, sub_offset, sub_kind, directories, visited)?;
    }

    Ok(next)
}

/// Capture the embedded thumbnail blob described by the thumbnail IFD's
/// JPEGInterchangeFormat/JPEGInterchangeFormatLength pair.
fn extract_thumbnail(
    blob: &[u8],
    byte_order: ByteOrder,
    directories: &[Directory],
) -> Result<Option<Bytes>, CorruptKind> {
    let Some(dir) = directories
        .iter()
        .find(|d| d.kind == DirectoryKind::Thumbnail)
    else {
        return Ok(None);
    };

    let lookup = |tag: u16| {
        dir.fields
            .iter()
            .find(|f| f.tag == tag)
            .and_then(|f| first_u32(f, byte_order))
    };

    let (Some(offset), Some(len)) = (
        lookup(TAG_JPEG_INTERCHANGE_FORMAT),
        lookup(TAG_JPEG_INTERCHANGE_FORMAT_LENGTH),
    ) else {
        return Ok(None);
    };

    let start = offset as u64;
    if start + len as u64 > blob.len() as u64 {
        return Err(CorruptKind::ValueOutOfBounds {
            tag: TAG_JPEG_INTERCHANGE_FORMAT,
            offset,
            len,
        });
    }

    Ok(Some(Bytes::copy_from_slice(
        &blob[start as usize..(start + len as u64) as usize],
    )))
}

/// Read a single-valued Short or Long field as u32.
fn first_u32(field: &Field, byte_order: ByteOrder) -> Option<u32> {
    if field.count != 1 {
        return None;
    }
    match field.field_type {
        FieldType::Short => Some(byte_order.read_u16(&field.value) as u32),
        FieldType::Long => Some(byte_order.read_u32(&field.value)),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
