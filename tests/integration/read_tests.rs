//! Read-path tests: row projection and error taxonomy.

use std::fs;

use exifedit::{read_exif, CorruptKind, ExifError, ExifRow};
use tempfile::tempdir;

use super::test_utils::{
    jpeg_with_exif, jpeg_with_xmp_only, jpeg_without_metadata, FIXTURE_DATETIME,
};

fn row(directory: &str, tag: &str, value: &str) -> ExifRow {
    ExifRow {
        directory: directory.to_string(),
        tag: tag.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_read_returns_expected_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("withExif.jpg");
    fs::write(&path, jpeg_with_exif("Canon")).unwrap();

    let rows = read_exif(&path).unwrap();

    assert_eq!(
        rows,
        vec![
            row("IFD0", "Make", "Canon"),
            row("IFD0", "Orientation", "1"),
            row("Exif", "DateTimeOriginal", FIXTURE_DATETIME),
            row("Exif", "Flash", "1"),
        ]
    );
}

#[test]
fn test_read_no_metadata_segment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("withoutExif.jpg");
    fs::write(&path, jpeg_without_metadata()).unwrap();

    assert!(matches!(read_exif(&path), Err(ExifError::NoMetadata)));
}

#[test]
fn test_read_app1_present_but_not_exif() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xmpOnly.jpg");
    fs::write(&path, jpeg_with_xmp_only()).unwrap();

    assert!(matches!(read_exif(&path), Err(ExifError::NoExifData)));
}

#[test]
fn test_read_non_image_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notSupportedExt.txt");
    fs::write(&path, b"just some text, definitely not a JPEG").unwrap();

    assert!(matches!(
        read_exif(&path),
        Err(ExifError::Corrupt(CorruptKind::NotJpeg))
    ));
}

#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doesNotExist.jpg");

    assert!(matches!(read_exif(&path), Err(ExifError::Io(_))));
}

#[test]
fn test_read_corrupt_exif_segment() {
    // valid JPEG shell, garbage TIFF inside the Exif APP1
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.jpg");

    let mut data = exifedit::format::jpeg::SOI.to_vec();
    data.extend_from_slice(&super::test_utils::exif_segment(b"XXXXGARBAGE"));
    data.extend_from_slice(&[0xFF, 0xD9]);
    fs::write(&path, data).unwrap();

    assert!(matches!(read_exif(&path), Err(ExifError::Corrupt(_))));
}
