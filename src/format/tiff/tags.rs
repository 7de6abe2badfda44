//! TIFF tag and field type definitions.
//!
//! This module defines the vocabulary for Exif/TIFF parsing and rewriting:
//! - Field types that determine how values are encoded
//! - Directory kinds and their display labels
//! - Static tag-number to tag-name tables, scoped per directory kind
//!
//! All tables are immutable process-wide data; lookups are pure functions.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a fixed element size in bytes, which is critical for:
/// - Determining if a value fits inline in an IFD entry
/// - Validating that a payload matches its declared count
///
/// The full TIFF 6.0 set is supported; an out-of-range type code is a
/// structural error, not an ignorable condition, because the rewriter could
/// not re-serialize a field it cannot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit character; NUL-terminated/padded text (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Pair of unsigned 32-bit integers, numerator/denominator (8 bytes)
    Rational = 5,

    /// Signed 8-bit integer (1 byte)
    SByte = 6,

    /// Opaque byte data (1 byte per element)
    Undefined = 7,

    /// Signed 16-bit integer (2 bytes)
    SShort = 8,

    /// Signed 32-bit integer (4 bytes)
    SLong = 9,

    /// Pair of signed 32-bit integers, numerator/denominator (8 bytes)
    SRational = 10,

    /// IEEE 754 single-precision float (4 bytes)
    Float = 11,

    /// IEEE 754 double-precision float (8 bytes)
    Double = 12,
}

impl FieldType {
    /// Size of a single element of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for type codes outside the TIFF 6.0 set.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Maximum bytes that can be stored inline in an IFD entry.
    ///
    /// Classic TIFF stores values of up to 4 bytes directly in the
    /// value/offset field; anything larger lives at an offset.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Check if a value with this type and count fits inline in an IFD entry.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.size_in_bytes() as u64 * count as u64 <= Self::INLINE_THRESHOLD as u64
    }

    /// Get a human-readable name for the field type.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "Byte",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "Short",
            FieldType::Long => "Long",
            FieldType::Rational => "Rational",
            FieldType::SByte => "SByte",
            FieldType::Undefined => "Undefined",
            FieldType::SShort => "SShort",
            FieldType::SLong => "SLong",
            FieldType::SRational => "SRational",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
        }
    }
}

// =============================================================================
// Directory Kinds
// =============================================================================

/// The kind of an Exif directory within the TIFF structure.
///
/// Directories form a shallow tree: IFD0 is the root, the Exif and GPS
/// sub-IFDs hang off it via pointer tags, Interop hangs off the Exif
/// sub-IFD, and the thumbnail IFD (IFD1) follows IFD0 in the next-IFD chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Primary image directory (IFD0)
    Ifd0,
    /// Exif sub-IFD (camera attributes)
    Exif,
    /// GPS sub-IFD
    Gps,
    /// Interoperability sub-IFD
    Interop,
    /// Thumbnail directory (IFD1)
    Thumbnail,
}

impl DirectoryKind {
    /// Display label used in the flattened row projection.
    pub const fn label(self) -> &'static str {
        match self {
            DirectoryKind::Ifd0 => "IFD0",
            DirectoryKind::Exif => "Exif",
            DirectoryKind::Gps => "GPS",
            DirectoryKind::Interop => "Interop",
            DirectoryKind::Thumbnail => "IFD1",
        }
    }
}

// =============================================================================
// Structural Tags
// =============================================================================

/// Pointer from IFD0 to the Exif sub-IFD.
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

/// Pointer from IFD0 to the GPS sub-IFD.
pub const TAG_GPS_IFD_POINTER: u16 = 0x8825;

/// Pointer from the Exif sub-IFD to the interoperability sub-IFD.
pub const TAG_INTEROP_IFD_POINTER: u16 = 0xA005;

/// Offset of the embedded JPEG thumbnail (thumbnail IFD).
pub const TAG_JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;

/// Length of the embedded JPEG thumbnail (thumbnail IFD).
pub const TAG_JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;

/// The directory kind a pointer tag leads to, if it is a pointer tag.
pub fn pointer_target(tag: u16) -> Option<DirectoryKind> {
    match tag {
        TAG_EXIF_IFD_POINTER => Some(DirectoryKind::Exif),
        TAG_GPS_IFD_POINTER => Some(DirectoryKind::Gps),
        TAG_INTEROP_IFD_POINTER => Some(DirectoryKind::Interop),
        _ => None,
    }
}

/// Whether a tag is physical plumbing rather than an editable metadata field.
///
/// Structural tags (directory pointers and the thumbnail interchange pair)
/// carry offsets that only make sense for one specific physical layout. The
/// serializer regenerates them on every write, so they are excluded from the
/// row projection and from the replacement-value count.
pub fn is_structural(tag: u16) -> bool {
    matches!(
        tag,
        TAG_EXIF_IFD_POINTER
            | TAG_GPS_IFD_POINTER
            | TAG_INTEROP_IFD_POINTER
            | TAG_JPEG_INTERCHANGE_FORMAT
            | TAG_JPEG_INTERCHANGE_FORMAT_LENGTH
    )
}

// =============================================================================
// Tag Name Tables
// =============================================================================
//
// Tables are sorted by tag number so lookups can binary-search. IFD0 and the
// thumbnail IFD share the baseline TIFF table; the Exif, GPS and Interop
// sub-IFDs each have their own namespace.

const TIFF_TAG_NAMES: &[(u16, &str)] = &[
    (0x0100, "ImageWidth"),
    (0x0101, "ImageLength"),
    (0x0102, "BitsPerSample"),
    (0x0103, "Compression"),
    (0x0106, "PhotometricInterpretation"),
    (0x010E, "ImageDescription"),
    (0x010F, "Make"),
    (0x0110, "Model"),
    (0x0111, "StripOffsets"),
    (0x0112, "Orientation"),
    (0x0115, "SamplesPerPixel"),
    (0x0116, "RowsPerStrip"),
    (0x0117, "StripByteCounts"),
    (0x011A, "XResolution"),
    (0x011B, "YResolution"),
    (0x011C, "PlanarConfiguration"),
    (0x0128, "ResolutionUnit"),
    (0x012D, "TransferFunction"),
    (0x0131, "Software"),
    (0x0132, "DateTime"),
    (0x013B, "Artist"),
    (0x013E, "WhitePoint"),
    (0x013F, "PrimaryChromaticities"),
    (0x0201, "JPEGInterchangeFormat"),
    (0x0202, "JPEGInterchangeFormatLength"),
    (0x0211, "YCbCrCoefficients"),
    (0x0212, "YCbCrSubSampling"),
    (0x0213, "YCbCrPositioning"),
    (0x0214, "ReferenceBlackWhite"),
    (0x8298, "Copyright"),
    (0x8769, "ExifIFDPointer"),
    (0x8825, "GPSInfoIFDPointer"),
];

const EXIF_TAG_NAMES: &[(u16, &str)] = &[
    (0x829A, "ExposureTime"),
    (0x829D, "FNumber"),
    (0x8822, "ExposureProgram"),
    (0x8824, "SpectralSensitivity"),
    (0x8827, "ISOSpeedRatings"),
    (0x9000, "ExifVersion"),
    (0x9003, "DateTimeOriginal"),
    (0x9004, "DateTimeDigitized"),
    (0x9101, "ComponentsConfiguration"),
    (0x9102, "CompressedBitsPerPixel"),
    (0x9201, "ShutterSpeedValue"),
    (0x9202, "ApertureValue"),
    (0x9203, "BrightnessValue"),
    (0x9204, "ExposureBiasValue"),
    (0x9205, "MaxApertureValue"),
    (0x9206, "SubjectDistance"),
    (0x9207, "MeteringMode"),
    (0x9208, "LightSource"),
    (0x9209, "Flash"),
    (0x920A, "FocalLength"),
    (0x927C, "MakerNote"),
    (0x9286, "UserComment"),
    (0x9290, "SubSecTime"),
    (0x9291, "SubSecTimeOriginal"),
    (0x9292, "SubSecTimeDigitized"),
    (0xA000, "FlashpixVersion"),
    (0xA001, "ColorSpace"),
    (0xA002, "PixelXDimension"),
    (0xA003, "PixelYDimension"),
    (0xA004, "RelatedSoundFile"),
    (0xA005, "InteropIFDPointer"),
    (0xA20E, "FocalPlaneXResolution"),
    (0xA20F, "FocalPlaneYResolution"),
    (0xA210, "FocalPlaneResolutionUnit"),
    (0xA215, "ExposureIndex"),
    (0xA217, "SensingMethod"),
    (0xA300, "FileSource"),
    (0xA301, "SceneType"),
    (0xA302, "CFAPattern"),
    (0xA401, "CustomRendered"),
    (0xA402, "ExposureMode"),
    (0xA403, "WhiteBalance"),
    (0xA404, "DigitalZoomRatio"),
    (0xA405, "FocalLengthIn35mmFilm"),
    (0xA406, "SceneCaptureType"),
    (0xA407, "GainControl"),
    (0xA408, "Contrast"),
    (0xA409, "Saturation"),
    (0xA40A, "Sharpness"),
    (0xA420, "ImageUniqueID"),
];

const GPS_TAG_NAMES: &[(u16, &str)] = &[
    (0x0000, "GPSVersionID"),
    (0x0001, "GPSLatitudeRef"),
    (0x0002, "GPSLatitude"),
    (0x0003, "GPSLongitudeRef"),
    (0x0004, "GPSLongitude"),
    (0x0005, "GPSAltitudeRef"),
    (0x0006, "GPSAltitude"),
    (0x0007, "GPSTimeStamp"),
    (0x0008, "GPSSatellites"),
    (0x0009, "GPSStatus"),
    (0x0012, "GPSMapDatum"),
    (0x001B, "GPSProcessingMethod"),
    (0x001D, "GPSDateStamp"),
];

const INTEROP_TAG_NAMES: &[(u16, &str)] = &[
    (0x0001, "InteroperabilityIndex"),
    (0x0002, "InteroperabilityVersion"),
    (0x1001, "RelatedImageWidth"),
    (0x1002, "RelatedImageLength"),
];

/// Look up the human-readable name of a tag within a directory kind.
///
/// Returns `None` for tags outside the table; unknown tags are not an error,
/// the caller renders them numerically.
pub fn tag_name(kind: DirectoryKind, tag: u16) -> Option<&'static str> {
    let table = match kind {
        DirectoryKind::Ifd0 | DirectoryKind::Thumbnail => TIFF_TAG_NAMES,
        DirectoryKind::Exif => EXIF_TAG_NAMES,
        DirectoryKind::Gps => GPS_TAG_NAMES,
        DirectoryKind::Interop => INTEROP_TAG_NAMES,
    };
    table
        .binary_search_by_key(&tag, |&(t, _)| t)
        .ok()
        .map(|i| table[i].1)
}

// =============================================================================
// Tests
// =============================================================================
