//! Editor facade: the three stateless operations the shell calls.
//!
//! Each operation opens its own files, runs to completion and drops every
//! intermediate structure on exit. There is no shared state between calls;
//! concurrent external modification of the source between a read and a
//! write is the caller's problem (last writer wins).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::ExifError;
use crate::format::jpeg;
use crate::format::tiff::{ascii_text, describe, is_structural, tag_name, FieldType, MetadataTree};
use crate::output::{serialize, OutputSet};

/// One row of the flattened metadata projection.
///
/// Rows are display-only string snapshots: one per editable field, in tree
/// traversal order. Edits are bound to rows by position, so a write takes
/// exactly one replacement value per row of the preceding read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExifRow {
    /// Directory label ("IFD0", "Exif", "GPS", ...)
    pub directory: String,

    /// Tag name, or `Unknown (0xNNNN)` for tags outside the tables
    pub tag: String,

    /// Decoded text for ASCII fields, type-specific rendering otherwise
    pub value: String,
}

/// Read and flatten the Exif metadata of a JPEG file.
///
/// # Errors
/// - [`ExifError::NoMetadata`] if the file has no APP1 segment
/// - [`ExifError::NoExifData`] if no APP1 segment carries Exif data
/// - [`ExifError::Corrupt`] on structural violations; no partial result
/// - [`ExifError::Io`] on filesystem failures
pub fn read_exif(path: impl AsRef<Path>) -> Result<Vec<ExifRow>, ExifError> {
    let data = fs::read(path.as_ref())?;
    let tree = parse_tree(&data)?;
    let rows = project_rows(&tree);
    debug!(path = %path.as_ref().display(), rows = rows.len(), "read Exif metadata");
    Ok(rows)
}

/// Rewrite a JPEG with edited metadata, losslessly.
///
/// `replacements` carries one value per row of the preceding read, in row
/// order. ASCII fields take their replacement; all other fields, the image
/// segments and the compressed scan are preserved byte for byte.
///
/// A source without Exif data is accepted with an empty replacement list
/// and gains a minimal empty Exif segment.
///
/// # Errors
/// [`ExifError::ArgumentCount`] on a count mismatch, before the destination
/// is touched; [`ExifError::SameFile`] if `dest` equals `src`. After an I/O
/// failure mid-write the destination contents are undefined.
pub fn write_exif(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    replacements: &[String],
) -> Result<(), ExifError> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    if is_same_file(src, dest) {
        return Err(ExifError::SameFile);
    }

    let data = fs::read(src)?;
    let structure = jpeg::scan_segments(&data)?;

    let set = match jpeg::locate_exif(&data, &structure) {
        Ok(blob) => {
            let tree = MetadataTree::parse(blob)?;
            OutputSet::from_tree(&tree, replacements)?
        }
        Err(ExifError::NoMetadata) | Err(ExifError::NoExifData) => {
            if !replacements.is_empty() {
                return Err(ExifError::ArgumentCount {
                    expected: 0,
                    actual: replacements.len(),
                });
            }
            OutputSet::empty()
        }
        Err(err) => return Err(err),
    };

    let tiff = serialize(&set);

    let mut out = BufWriter::new(File::create(dest)?);
    jpeg::write_with_exif(&data, &structure, &tiff, &mut out)?;
    out.flush()?;

    debug!(src = %src.display(), dest = %dest.display(), "rewrote Exif metadata");
    Ok(())
}

/// Copy a JPEG with its Exif segment removed.
///
/// All other segments and the compressed scan are preserved byte for byte.
pub fn remove_exif(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<(), ExifError> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    if is_same_file(src, dest) {
        return Err(ExifError::SameFile);
    }

    let data = fs::read(src)?;
    let structure = jpeg::scan_segments(&data)?;

    let mut out = BufWriter::new(File::create(dest)?);
    jpeg::write_without_exif(&data, &structure, &mut out)?;
    out.flush()?;

    debug!(src = %src.display(), dest = %dest.display(), "removed Exif metadata");
    Ok(())
}

/// Scan a JPEG byte buffer and parse its Exif segment into a tree.
fn parse_tree(data: &[u8]) -> Result<MetadataTree, ExifError> {
    let structure = jpeg::scan_segments(data)?;
    let blob = jpeg::locate_exif(data, &structure)?;
    MetadataTree::parse(blob)
}

/// Flatten a tree into display rows, one per editable field.
fn project_rows(tree: &MetadataTree) -> Vec<ExifRow> {
    let mut rows = Vec::new();
    for dir in &tree.directories {
        for field in &dir.fields {
            if is_structural(field.tag) {
                continue;
            }
            let tag = match tag_name(dir.kind, field.tag) {
                Some(name) => name.to_string(),
                None => format!("Unknown (0x{:04X})", field.tag),
            };
            let value = if field.field_type == FieldType::Ascii {
                ascii_text(&field.value)
            } else {
                describe(field, tree.byte_order)
            };
            rows.push(ExifRow {
                directory: dir.kind.label().to_string(),
                tag,
                value,
            });
        }
    }
    rows
}

/// Conservative same-file check: exact path equality, or equal canonical
/// paths when both targets exist.
fn is_same_file(src: &Path, dest: &Path) -> bool {
    if src == dest {
        return true;
    }
    match (src.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
