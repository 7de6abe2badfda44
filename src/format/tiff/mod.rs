//! TIFF structure parsing for Exif metadata.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF streams declare their endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values must be read and
//!   written respecting this order.
//!
//! - **IFD (Image File Directory)**: a table of tag/value entries. Exif lays
//!   out a shallow tree of them: IFD0, the Exif/GPS/Interop sub-IFDs reached
//!   through pointer tags, and the thumbnail IFD chained after IFD0.
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored inline
//!   in the IFD entry, larger values at an offset pointed to by the entry.

mod parser;
mod tags;
mod values;

pub use parser::{
    ByteOrder, Directory, Field, MetadataTree, TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE,
};
pub use tags::{
    is_structural, pointer_target, tag_name, DirectoryKind, FieldType, TAG_EXIF_IFD_POINTER,
    TAG_GPS_IFD_POINTER, TAG_INTEROP_IFD_POINTER, TAG_JPEG_INTERCHANGE_FORMAT,
    TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
};
pub use values::{ascii_text, describe, encode_ascii};
