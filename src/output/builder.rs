//! Output set construction.
//!
//! An [`OutputSet`] is the mutable mirror of a parsed [`MetadataTree`],
//! shaped for re-serialization. It fixes field contents only; byte layout,
//! offsets and the directory chain are the serializer's job.

use bytes::Bytes;
use tracing::debug;

use crate::error::ExifError;
use crate::format::tiff::{
    encode_ascii, is_structural, ByteOrder, DirectoryKind, FieldType, MetadataTree,
};

/// A field staged for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    /// Tag number within the directory's namespace
    pub tag: u16,

    /// Field type, unchanged from the source field
    pub field_type: FieldType,

    /// Element count; recomputed for edited ASCII fields
    pub count: u32,

    /// Payload bytes in the output set's byte order
    pub value: Bytes,
}

/// An ordered group of output fields of one directory kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    /// What role this directory plays in the Exif tree
    pub kind: DirectoryKind,

    /// Staged fields; at most one per tag
    pub fields: Vec<OutputField>,
}

impl OutputDirectory {
    /// Create an empty directory of the given kind.
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Add a field, removing any stale prior registration of its tag first.
    pub fn add_field(&mut self, field: OutputField) {
        self.fields.retain(|f| f.tag != field.tag);
        self.fields.push(field);
    }

    /// Find a staged field by tag.
    pub fn find_field(&self, tag: u16) -> Option<&OutputField> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

/// A complete metadata set staged for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSet {
    /// Byte order the serializer will write in
    pub byte_order: ByteOrder,

    /// Staged directories in traversal order
    pub directories: Vec<OutputDirectory>,

    /// Thumbnail blob to re-embed, if any
    pub thumbnail: Option<Bytes>,
}

impl OutputSet {
    /// An empty shell for sources that carried no Exif segment.
    ///
    /// Serializes to a minimal TIFF with an empty IFD0, little-endian.
    pub fn empty() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
            directories: Vec::new(),
            thumbnail: None,
        }
    }

    /// Build an output set from a parsed tree, applying textual edits.
    ///
    /// `replacements` carries one value per editable field in the tree's
    /// traversal order (the same order the row projection uses). Each value
    /// is paired with its field by position; ASCII fields take the re-encoded
    /// replacement, every other field carries its original payload through
    /// unchanged. Structural tags are dropped here and regenerated by the
    /// serializer.
    ///
    /// # Errors
    /// `ArgumentCount` if the replacement count does not equal the editable
    /// field count; nothing is produced in that case.
    pub fn from_tree(tree: &MetadataTree, replacements: &[String]) -> Result<Self, ExifError> {
        let expected = tree.field_count();
        if replacements.len() != expected {
            return Err(ExifError::ArgumentCount {
                expected,
                actual: replacements.len(),
            });
        }

        let mut directories = Vec::with_capacity(tree.directories.len());
        let mut next_value = 0usize;
        let mut edited = 0usize;

        for dir in &tree.directories {
            let mut out_dir = OutputDirectory::new(dir.kind);

            for field in &dir.fields {
                if is_structural(field.tag) {
                    continue;
                }

                // Length was validated above, so the index stays in bounds.
                let text = &replacements[next_value];
                next_value += 1;

                if field.field_type == FieldType::Ascii {
                    let bytes = encode_ascii(text);
                    if bytes[..] != field.value[..] {
                        edited += 1;
                    }
                    out_dir.add_field(OutputField {
                        tag: field.tag,
                        field_type: FieldType::Ascii,
                        count: bytes.len() as u32,
                        value: Bytes::from(bytes),
                    });
                } else {
                    out_dir.add_field(OutputField {
                        tag: field.tag,
                        field_type: field.field_type,
                        count: field.count,
                        value: field.value.clone(),
                    });
                }
            }

            directories.push(out_dir);
        }

        debug!(
            fields = expected,
            edited, "staged output set from parsed tree"
        );

        Ok(Self {
            byte_order: tree.byte_order,
            directories,
            thumbnail: tree.thumbnail.clone(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
