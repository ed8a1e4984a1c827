//! Blob geometry, colour and per-cue grid generation.

pub mod color;
pub mod generator;
pub mod path;
pub mod shape;

pub use color::{Hsb, TriadicColours};
pub use generator::{generate_cue_blobs, BlobDescriptor};
pub use path::{parse_svg_path, to_path_commands, PathCommand};
pub use shape::{blob_path, blob_svg_path, BlobSpec};
