//! Format layer: JPEG segment handling and Exif/TIFF structure parsing.
//!
//! The JPEG side treats the file as an opaque sequence of marker segments
//! and never interprets image data; the TIFF side decodes the directory
//! tree carried inside the APP1/Exif segment.

pub mod jpeg;
pub mod tiff;
