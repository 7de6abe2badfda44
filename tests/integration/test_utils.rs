//! Test utilities for integration tests.
//!
//! Fixture synthesis: hand-assembled TIFF blobs and JPEG containers with
//! known contents, so row expectations can be written out explicitly.

use exifedit::format::jpeg::{scan_segments, EXIF_SIGNATURE, SOI};

/// DateTimeOriginal value carried by the standard fixture (19 chars + NUL).
pub const FIXTURE_DATETIME: &str = "2024:01:15 10:30:00";

fn le16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn le32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn entry_offset(out: &mut Vec<u8>, tag: u16, type_code: u16, count: u32, offset: u32) {
    le16(out, tag);
    le16(out, type_code);
    le32(out, count);
    le32(out, offset);
}

fn entry_inline(out: &mut Vec<u8>, tag: u16, type_code: u16, count: u32, inline: [u8; 4]) {
    le16(out, tag);
    le16(out, type_code);
    le32(out, count);
    out.extend_from_slice(&inline);
}

/// A little-endian TIFF blob with a parameterized Make plus fixed fields:
///
/// ```text
/// IFD0: Make (ASCII), Orientation = 1 (Short), ExifIFDPointer
/// Exif: DateTimeOriginal (ASCII), Flash = 1 (Short)
/// ```
pub fn exif_tiff(make: &str) -> Vec<u8> {
    let mut make_bytes = make.as_bytes().to_vec();
    make_bytes.push(0);
    assert!(
        make_bytes.len() > 4,
        "fixture expects an offset-stored Make value"
    );

    // header (8) + IFD0 table (2 + 3*12 + 4 = 42) = 50
    let make_offset: u32 = 50;
    let exif_offset: u32 = make_offset + make_bytes.len() as u32;
    // Exif table is 2 + 2*12 + 4 = 30 bytes
    let datetime_offset: u32 = exif_offset + 30;

    let mut blob = Vec::new();
    blob.extend_from_slice(b"II");
    le16(&mut blob, 42);
    le32(&mut blob, 8);

    le16(&mut blob, 3);
    entry_offset(&mut blob, 0x010F, 2, make_bytes.len() as u32, make_offset);
    entry_inline(&mut blob, 0x0112, 3, 1, [0x01, 0x00, 0x00, 0x00]);
    entry_offset(&mut blob, 0x8769, 4, 1, exif_offset);
    le32(&mut blob, 0);

    blob.extend_from_slice(&make_bytes);

    le16(&mut blob, 2);
    entry_offset(&mut blob, 0x9003, 2, 20, datetime_offset);
    entry_inline(&mut blob, 0x9209, 3, 1, [0x01, 0x00, 0x00, 0x00]);
    le32(&mut blob, 0);

    blob.extend_from_slice(FIXTURE_DATETIME.as_bytes());
    blob.push(0);

    blob
}

/// Wrap a body in a marker segment.
pub fn segment(marker: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((body.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// Wrap a TIFF blob in an Exif APP1 segment.
pub fn exif_segment(tiff: &[u8]) -> Vec<u8> {
    let mut body = EXIF_SIGNATURE.to_vec();
    body.extend_from_slice(tiff);
    segment(0xE1, &body)
}

fn assemble_jpeg(header_segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = SOI.to_vec();
    for seg in header_segments {
        out.extend_from_slice(seg);
    }
    // minimal SOS header, entropy-coded bytes, EOI
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x04, 0x01, 0x00]);
    out.extend_from_slice(&[0x3A, 0x7F, 0x00, 0xC4, 0x19, 0x84, 0x2B]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// The equivalent of the `withExif.jpg` sample: APP0, Exif APP1, DQT, scan.
pub fn jpeg_with_exif(make: &str) -> Vec<u8> {
    assemble_jpeg(&[
        segment(0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00"),
        exif_segment(&exif_tiff(make)),
        segment(0xDB, &[0x00, 0x10, 0x0B, 0x0C, 0x0E, 0x0C, 0x0A, 0x10]),
    ])
}

/// A JPEG with no APP1 segment at all (`withoutExif.jpg` equivalent).
pub fn jpeg_without_metadata() -> Vec<u8> {
    assemble_jpeg(&[
        segment(0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00"),
        segment(0xDB, &[0x00, 0x10, 0x0B, 0x0C, 0x0E, 0x0C, 0x0A, 0x10]),
    ])
}

/// A JPEG whose only APP1 segment carries XMP, not Exif.
pub fn jpeg_with_xmp_only() -> Vec<u8> {
    assemble_jpeg(&[
        segment(0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00"),
        segment(0xE1, b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta/>"),
    ])
}

/// The verbatim-copied tail of a JPEG: SOS, entropy data and EOI.
pub fn scan_tail(data: &[u8]) -> Vec<u8> {
    let structure = scan_segments(data).expect("fixture must be a valid JPEG");
    data[structure.trailer_start..].to_vec()
}
