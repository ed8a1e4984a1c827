//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers of the sketch live here with:
//! - Units (pixels, milliseconds, seconds)
//! - Documented ranges and meanings
//! - Defaults matching the published animation

mod render;
mod sketch;

// Re-export all types
pub use render::{RecordingConfig, RenderConfig};
pub use sketch::{SketchParams, GRID_DIVISORS};
