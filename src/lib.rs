//! # exifedit
//!
//! A lossless Exif/TIFF metadata editor for JPEG files.
//!
//! The codec parses a JPEG's APP1/Exif segment into a typed directory tree,
//! lets textual (ASCII) tag values be replaced, and rewrites the file with
//! updated or removed metadata. Everything outside the metadata segment,
//! including the compressed scan data, is copied byte for byte; no pixel
//! decoding or re-encoding ever happens.
//!
//! ## Architecture
//!
//! - [`format::jpeg`] - JPEG marker-segment scanning and lossless splicing
//! - [`format::tiff`] - TIFF header/IFD parsing, field model, value rendering
//! - [`output`] - mutable output set and two-pass TIFF serialization
//! - [`editor`] - the three facade operations (read, write, remove)
//! - [`config`] - CLI argument types for the `exifedit` binary
//! - [`error`] - error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use exifedit::{read_exif, write_exif};
//!
//! let rows = read_exif("photo.jpg")?;
//! for row in &rows {
//!     println!("{} / {} = {}", row.directory, row.tag, row.value);
//! }
//!
//! // a write takes one value per row; ASCII rows take the new text
//! let values: Vec<String> = rows.iter().map(|r| r.value.clone()).collect();
//! write_exif("photo.jpg", "edited.jpg", &values)?;
//! # Ok::<(), exifedit::ExifError>(())
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod output;

// Re-export commonly used types
pub use editor::{read_exif, remove_exif, write_exif, ExifRow};
pub use error::{CorruptKind, ExifError};
pub use format::tiff::{
    ByteOrder, Directory, DirectoryKind, Field, FieldType, MetadataTree, TiffHeader,
};
pub use output::{serialize, OutputDirectory, OutputField, OutputSet};
