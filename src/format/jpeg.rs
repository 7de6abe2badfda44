//! JPEG marker-segment handling.
//!
//! This module provides the JPEG half of the codec: scanning a file into its
//! marker segments, locating the APP1 segment that carries Exif data, and
//! splicing a rebuilt (or no) Exif segment back into the stream.
//!
//! # Segment Structure
//!
//! A JPEG file is SOI, a run of marker segments (APPn, DQT, DHT, SOF, ...),
//! then the scan: SOS followed by entropy-coded data and EOI. Every segment
//! after SOI carries a 2-byte big-endian length that includes the length
//! field itself but not the marker.
//!
//! # Lossless Rewriting
//!
//! The splice operations never touch segment bodies other than the Exif
//! APP1. Everything from the SOS marker to the end of the file is copied
//! through as one opaque byte range, so compressed scan data is preserved
//! bit for bit.

use std::io::Write;

use crate::error::{CorruptKind, ExifError};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker byte
const MARKER_EOI: u8 = 0xD9;

/// Start Of Scan marker byte
const MARKER_SOS: u8 = 0xDA;

/// Application segment 1 marker byte (Exif, XMP)
const MARKER_APP1: u8 = 0xE1;

/// Temporary marker byte (standalone, no length field)
const MARKER_TEM: u8 = 0x01;

/// Signature prefixing Exif data inside an APP1 segment
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Maximum value of a segment's length field (covers the field itself).
const MAX_SEGMENT_LENGTH: usize = 0xFFFF;

// =============================================================================
// Segment Model
// =============================================================================

/// One marker segment located in the source bytes.
///
/// `start..start + len` spans the whole segment: marker (2 bytes), length
/// field (2 bytes), body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRef {
    /// Second marker byte (0xE1 for APP1, 0xDB for DQT, ...)
    pub marker: u8,

    /// Byte offset of the 0xFF marker byte
    pub start: usize,

    /// Total segment length including marker and length field
    pub len: usize,
}

impl SegmentRef {
    /// The segment body (bytes after the length field).
    pub fn body<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start + 4..self.start + self.len]
    }
}

/// The marker-segment structure of a JPEG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegStructure {
    /// Header segments between SOI and the scan, in file order
    pub segments: Vec<SegmentRef>,

    /// Offset of the SOS (or EOI) marker; everything from here on is copied
    /// through verbatim on rewrite
    pub trailer_start: usize,
}

/// Scan a JPEG byte stream into its marker segments.
///
/// Stops at the first SOS or EOI marker; the scan data is not interpreted.
///
/// # Errors
/// - `NotJpeg` if the stream does not begin with SOI
/// - `TruncatedSegment` if a marker or segment extends past the end
pub fn scan_segments(data: &[u8]) -> Result<JpegStructure, ExifError> {
    if data.len() < 2 || data[0..2] != SOI {
        return Err(CorruptKind::NotJpeg.into());
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos + 2 > data.len() {
            return Err(CorruptKind::TruncatedSegment {
                marker: 0,
                offset: pos,
            }
            .into());
        }
        if data[pos] != 0xFF {
            return Err(CorruptKind::TruncatedSegment {
                marker: data[pos],
                offset: pos,
            }
            .into());
        }

        // Fill bytes: any run of 0xFF before the marker byte is legal.
        let mut marker_pos = pos + 1;
        while marker_pos < data.len() && data[marker_pos] == 0xFF {
            marker_pos += 1;
        }
        if marker_pos >= data.len() {
            return Err(CorruptKind::TruncatedSegment {
                marker: 0xFF,
                offset: pos,
            }
            .into());
        }
        let marker = data[marker_pos];
        pos = marker_pos - 1;

        match marker {
            MARKER_SOS | MARKER_EOI => {
                return Ok(JpegStructure {
                    segments,
                    trailer_start: pos,
                });
            }
            // Standalone markers carry no length field.
            MARKER_TEM | 0xD0..=0xD7 => {
                pos += 2;
            }
            _ => {
                if pos + 4 > data.len() {
                    return Err(CorruptKind::TruncatedSegment {
                        marker,
                        offset: pos,
                    }
                    .into());
                }
                let declared = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
                if declared < 2 || pos + 2 + declared > data.len() {
                    return Err(CorruptKind::TruncatedSegment {
                        marker,
                        offset: pos,
                    }
                    .into());
                }
                segments.push(SegmentRef {
                    marker,
                    start: pos,
                    len: 2 + declared,
                });
                pos += 2 + declared;
            }
        }
    }
}

/// Whether a segment is the APP1 segment carrying Exif data.
pub fn is_exif_app1(data: &[u8], segment: &SegmentRef) -> bool {
    segment.marker == MARKER_APP1 && segment.body(data).starts_with(EXIF_SIGNATURE)
}

/// Locate the TIFF blob inside the Exif APP1 segment.
///
/// # Errors
/// - `NoExifData` if APP1 segments exist but none carries the Exif signature
/// - `NoMetadata` if the file has no APP1 segment at all
pub fn locate_exif<'a>(data: &'a [u8], structure: &JpegStructure) -> Result<&'a [u8], ExifError> {
    let mut saw_app1 = false;

    for segment in &structure.segments {
        if segment.marker != MARKER_APP1 {
            continue;
        }
        if is_exif_app1(data, segment) {
            return Ok(&segment.body(data)[EXIF_SIGNATURE.len()..]);
        }
        saw_app1 = true;
    }

    if saw_app1 {
        Err(ExifError::NoExifData)
    } else {
        Err(ExifError::NoMetadata)
    }
}

// =============================================================================
// Lossless Splicing
// =============================================================================

/// Write the source JPEG with its Exif segment replaced by `tiff`.
///
/// The new APP1 takes the position of the old Exif APP1; if the source had
/// none, it is inserted directly after SOI (the Exif placement rule). Any
/// additional Exif APP1 segments beyond the first are dropped rather than
/// duplicated. All other segments and the whole scan are copied verbatim.
///
/// # Errors
/// `SegmentTooLarge` if the wrapped blob exceeds the 16-bit segment length;
/// `Io` on destination failures. The destination is undefined after an error.
pub fn write_with_exif<W: Write>(
    data: &[u8],
    structure: &JpegStructure,
    tiff: &[u8],
    out: &mut W,
) -> Result<(), ExifError> {
    let body_len = EXIF_SIGNATURE.len() + tiff.len();
    if body_len + 2 > MAX_SEGMENT_LENGTH {
        return Err(ExifError::SegmentTooLarge {
            size: body_len + 2,
            max: MAX_SEGMENT_LENGTH,
        });
    }

    out.write_all(&SOI)?;

    let had_exif = structure.segments.iter().any(|s| is_exif_app1(data, s));
    if !had_exif {
        emit_exif_app1(tiff, body_len, out)?;
    }

    let mut replaced = false;
    for segment in &structure.segments {
        if is_exif_app1(data, segment) {
            if !replaced {
                emit_exif_app1(tiff, body_len, out)?;
                replaced = true;
            }
            continue;
        }
        out.write_all(&data[segment.start..segment.start + segment.len])?;
    }

    out.write_all(&data[structure.trailer_start..])?;
    Ok(())
}

/// Write the source JPEG with every Exif APP1 segment removed.
pub fn write_without_exif<W: Write>(
    data: &[u8],
    structure: &JpegStructure,
    out: &mut W,
) -> Result<(), ExifError> {
    out.write_all(&SOI)?;

    for segment in &structure.segments {
        if is_exif_app1(data, segment) {
            continue;
        }
        out.write_all(&data[segment.start..segment.start + segment.len])?;
    }

    out.write_all(&data[structure.trailer_start..])?;
    Ok(())
}

fn emit_exif_app1<W: Write>(tiff: &[u8], body_len: usize, out: &mut W) -> Result<(), ExifError> {
    out.write_all(&[0xFF, MARKER_APP1])?;
    out.write_all(&((body_len + 2) as u16).to_be_bytes())?;
    out.write_all(EXIF_SIGNATURE)?;
    out.write_all(tiff)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
