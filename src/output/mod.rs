//! Output side of the codec: building a mutable mirror of the metadata tree
//! and serializing it back into a fresh TIFF blob.

mod builder;
mod serializer;

pub use builder::{OutputDirectory, OutputField, OutputSet};
pub use serializer::serialize;
