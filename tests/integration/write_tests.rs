//! Write-path tests: positional edits, round-trip stability, failure modes.

use std::fs;

use exifedit::format::jpeg::{locate_exif, scan_segments};
use exifedit::{read_exif, write_exif, ExifError, FieldType, MetadataTree};
use tempfile::tempdir;

use super::test_utils::{jpeg_with_exif, jpeg_without_metadata, scan_tail};

fn values_of(rows: &[exifedit::ExifRow]) -> Vec<String> {
    rows.iter().map(|r| r.value.clone()).collect()
}

fn parse_tree(data: &[u8]) -> MetadataTree {
    let structure = scan_segments(data).unwrap();
    MetadataTree::parse(locate_exif(data, &structure).unwrap()).unwrap()
}

#[test]
fn test_write_rejects_short_replacement_list() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    let dest = dir.path().join("dest.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let result = write_exif(&src, &dest, &["only one".to_string()]);
    assert!(matches!(
        result,
        Err(ExifError::ArgumentCount {
            expected: 4,
            actual: 1
        })
    ));
    // the destination must not be created by a rejected write
    assert!(!dest.exists());
}

#[test]
fn test_write_rejects_long_replacement_list() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    let dest = dir.path().join("dest.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let values: Vec<String> = (0..5).map(|i| i.to_string()).collect();
    let result = write_exif(&src, &dest, &values);
    assert!(matches!(
        result,
        Err(ExifError::ArgumentCount {
            expected: 4,
            actual: 5
        })
    ));
    assert!(!dest.exists());
}

#[test]
fn test_write_rejects_same_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let result = write_exif(&src, &src, &[]);
    assert!(matches!(result, Err(ExifError::SameFile)));
}

#[test]
fn test_noop_write_round_trip() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    let dest = dir.path().join("dest.jpg");
    let src_bytes = jpeg_with_exif("Canon");
    fs::write(&src, &src_bytes).unwrap();

    let rows = read_exif(&src).unwrap();
    write_exif(&src, &dest, &values_of(&rows)).unwrap();

    // a no-op edit reads back identically
    assert_eq!(read_exif(&dest).unwrap(), rows);

    // non-ASCII payloads are byte-identical to the source
    let dest_bytes = fs::read(&dest).unwrap();
    let before = parse_tree(&src_bytes);
    let after = parse_tree(&dest_bytes);
    for (dir_before, dir_after) in before.directories.iter().zip(&after.directories) {
        assert_eq!(dir_before.kind, dir_after.kind);
        for field in &dir_before.fields {
            if field.field_type == FieldType::Ascii || exifedit::format::tiff::is_structural(field.tag) {
                continue;
            }
            let counterpart = dir_after
                .fields
                .iter()
                .find(|f| f.tag == field.tag)
                .expect("field lost in rewrite");
            assert_eq!(counterpart.value, field.value, "tag 0x{:04X}", field.tag);
            assert_eq!(counterpart.count, field.count);
        }
    }

    // the compressed scan is untouched
    assert_eq!(scan_tail(&src_bytes), scan_tail(&dest_bytes));
}

#[test]
fn test_write_replaces_make_canon_with_nikon() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("withExif.jpg");
    let dest = dir.path().join("edited.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let rows = read_exif(&src).unwrap();
    assert_eq!(rows[0].value, "Canon");

    let mut values = values_of(&rows);
    values[0] = "Nikon".to_string();
    write_exif(&src, &dest, &values).unwrap();

    let new_rows = read_exif(&dest).unwrap();
    assert_eq!(new_rows[0].directory, "IFD0");
    assert_eq!(new_rows[0].tag, "Make");
    assert_eq!(new_rows[0].value, "Nikon");

    // every other row is unchanged
    assert_eq!(&new_rows[1..], &rows[1..]);
}

#[test]
fn test_write_accommodates_longer_ascii_value() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    let dest = dir.path().join("dest.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let rows = read_exif(&src).unwrap();
    let mut values = values_of(&rows);
    values[0] = "A Considerably Longer Camera Maker Name".to_string();
    write_exif(&src, &dest, &values).unwrap();

    let new_rows = read_exif(&dest).unwrap();
    assert_eq!(new_rows[0].value, "A Considerably Longer Camera Maker Name");
    assert_eq!(&new_rows[1..], &rows[1..]);

    // the new count follows the new length
    let tree = parse_tree(&fs::read(&dest).unwrap());
    let make = tree.directories[0]
        .fields
        .iter()
        .find(|f| f.tag == 0x010F)
        .unwrap();
    assert_eq!(make.count as usize, values[0].len() + 1);
}

#[test]
fn test_write_source_without_exif_gains_empty_segment() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.jpg");
    let dest = dir.path().join("dest.jpg");
    let src_bytes = jpeg_without_metadata();
    fs::write(&src, &src_bytes).unwrap();

    write_exif(&src, &dest, &[]).unwrap();

    // the destination now has an (empty) Exif segment and zero rows
    let rows = read_exif(&dest).unwrap();
    assert!(rows.is_empty());

    // image bytes still untouched
    let dest_bytes = fs::read(&dest).unwrap();
    assert_eq!(scan_tail(&src_bytes), scan_tail(&dest_bytes));
}

#[test]
fn test_write_source_without_exif_rejects_values() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("plain.jpg");
    let dest = dir.path().join("dest.jpg");
    fs::write(&src, jpeg_without_metadata()).unwrap();

    let result = write_exif(&src, &dest, &["Nikon".to_string()]);
    assert!(matches!(
        result,
        Err(ExifError::ArgumentCount {
            expected: 0,
            actual: 1
        })
    ));
    assert!(!dest.exists());
}

#[test]
fn test_write_twice_is_stable() {
    // rewriting a rewritten file reproduces it byte for byte
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.jpg");
    let once = dir.path().join("once.jpg");
    let twice = dir.path().join("twice.jpg");
    fs::write(&src, jpeg_with_exif("Canon")).unwrap();

    let rows = read_exif(&src).unwrap();
    write_exif(&src, &once, &values_of(&rows)).unwrap();
    let rows_once = read_exif(&once).unwrap();
    write_exif(&once, &twice, &values_of(&rows_once)).unwrap();

    assert_eq!(fs::read(&once).unwrap(), fs::read(&twice).unwrap());
}
