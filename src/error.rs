use thiserror::Error;

/// Structural corruption detected while decoding a JPEG or TIFF stream.
///
/// These are the low-level reasons a metadata segment cannot be trusted.
/// They surface to callers wrapped in [`ExifError::Corrupt`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptKind {
    /// The file does not start with a JPEG SOI marker
    #[error("not a JPEG stream (missing SOI marker)")]
    NotJpeg,

    /// A segment header or body extends past the end of the file
    #[error("truncated JPEG segment (marker 0x{marker:02X} at offset {offset})")]
    TruncatedSegment { marker: u8, offset: usize },

    /// Invalid TIFF byte-order mark (not II or MM)
    #[error("invalid TIFF byte-order mark: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    ByteOrder(u16),

    /// Invalid TIFF magic number
    #[error("invalid TIFF magic: expected 42, got {0}")]
    Magic(u16),

    /// The TIFF blob is too small to contain a header
    #[error("TIFF data too small: need at least {required} bytes, got {actual}")]
    TooSmall { required: usize, actual: usize },

    /// An IFD offset points outside the TIFF data
    #[error("IFD offset {offset} outside TIFF data of {size} bytes")]
    IfdOffset { offset: u32, size: usize },

    /// An IFD declares more entries than the remaining data can hold
    #[error("IFD at offset {offset} declares {entries} entries past end of data")]
    TruncatedIfd { offset: u32, entries: u16 },

    /// An IFD offset was visited twice while walking the directory tree
    #[error("circular IFD chain at offset {0}")]
    CircularIfd(u32),

    /// An entry carries a field type outside the TIFF 6.0 set
    #[error("unknown field type {field_type} for tag 0x{tag:04X}")]
    FieldType { tag: u16, field_type: u16 },

    /// An offset-indirected value lies outside the TIFF data
    #[error("value for tag 0x{tag:04X} ({len} bytes at offset {offset}) outside TIFF data")]
    ValueOutOfBounds { tag: u16, offset: u32, len: u32 },
}

/// Errors returned by the editor facade and the codec layers beneath it.
#[derive(Debug, Error)]
pub enum ExifError {
    /// The file carries no recognizable metadata segment at all
    #[error("no metadata found")]
    NoMetadata,

    /// A metadata segment exists but none of it is Exif/TIFF structured
    #[error("no Exif data found")]
    NoExifData,

    /// The metadata segment is structurally invalid
    #[error("corrupt metadata: {0}")]
    Corrupt(#[from] CorruptKind),

    /// The replacement-value list does not match the editable field count
    #[error("expected {expected} replacement values, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// Filesystem or stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rebuilt Exif blob does not fit the APP1 segment length field
    #[error("Exif segment too large for APP1: {size} bytes (max {max})")]
    SegmentTooLarge { size: usize, max: usize },

    /// Source and destination paths resolve to the same file
    #[error("source and destination are the same file")]
    SameFile,
}
