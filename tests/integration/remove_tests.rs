//! Remove-path tests: stripping the Exif segment losslessly.

use std::fs;

use exifedit::format::jpeg::scan_segments;
use exifedit::{read_exif, remove_exif, ExifError};
use tempfile::tempdir;

use super::test_utils::{jpeg_with_exif, jpeg_without_metadata, scan_tail};

#[test]
fn test_remove_strips_exif_segment() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("withExif.jpg");
    let dest = dir.path().join("stripped.jpg");
    let src_bytes = jpeg_with_exif("Canon");
    fs::write(&src, &src_bytes).unwrap();

    remove_exif(&src, &dest).unwrap();

    // a subsequent read finds no metadata
    assert!(matches!(read_exif(&dest), Err(ExifError::NoMetadata)));

    // the scan data is byte-identical
    let dest_bytes = fs::read(&dest).unwrap();
    assert_eq!(scan_tail(&src_bytes), scan_tail(&dest_bytes));

    // all non-Exif segments survive in order
    let before = scan_segments(&src_bytes).unwrap();
    let after = scan_segments(&dest_bytes).unwrap();
    assert_eq!(after.segments.len(), before.segments.len() - 1);
    let markers: Vec<u8> = after.segments.iter().map(|s| s.marker).collect();
    assert_eq!(markers, vec![0xE0, 0xDB]);
}

#[test]
fn test_remove_on_file_without_exif_copies_through() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.jpg");
    let dest = dir.path().join("copy.jpg");
    let src_bytes = jpeg_without_metadata();
    fs::write(&src, &src_bytes).unwrap();

    remove_exif(&src, &dest).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), src_bytes);
}

#[test]
fn test_remove_rejects_same_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    assert!(matches!(
        remove_exif(&src, &src),
        Err(ExifError::SameFile)
    ));
}

#[test]
fn test_remove_non_image_fails() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("notes.txt");
    let dest = dir.path().join("dest.jpg");
    fs::write(&src, b"not an image").unwrap();

    assert!(matches!(
        remove_exif(&src, &dest),
        Err(ExifError::Corrupt(_))
    ));
}
