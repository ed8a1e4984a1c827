//! Blobs No. 1 - generative blob animation synchronised to a MIDI score

pub mod assets;
pub mod audio;
pub mod blob;
pub mod cli;
pub mod cue;
pub mod error;
pub mod midi;
pub mod params;
pub mod playback;
pub mod render;
pub mod sketch;

pub use error::{Error, Result};
