//! Blob generation and drawing parameters.

use std::ops::Range;

/// Grid densities a cue picks from (canvas width / divisor = grid step)
pub const GRID_DIVISORS: [u32; 7] = [8, 12, 16, 24, 32, 48, 64];

/// Parameters controlling cue scheduling and blob synthesis
#[derive(Debug, Clone)]
pub struct SketchParams {
    /// Candidate grid divisors, one picked uniformly per cue
    pub divisors: Vec<u32>,

    /// Blob growth range (half-open, truncated to integer)
    /// Growth 10 means the inner radius equals the outer radius.
    pub growth_range: Range<u32>,

    /// Blob edge-count range (half-open)
    pub edges_range: Range<u32>,

    /// Size ratios for the three concentric outlines.
    /// Outline `k` is `canvas_width / (divisor * size_ratios[k])` pixels wide.
    pub size_ratios: [f32; 3],

    /// Fill opacity (0..1); strokes are always opaque
    pub fill_alpha: f32,

    /// Stroke width (pixels)
    pub stroke_weight: f32,

    /// Seed for the blob silhouette generator.
    /// Fixed so that a shape depends only on edges, growth and size.
    pub shape_seed: u32,

    /// MIDI track whose notes become cues
    pub note_track: usize,

    /// One cue per note instead of one per distinct tick
    pub polyphonic: bool,

    /// Cancel pending blob draws when a new cue fires or playback resets
    pub cancel_stale_draws: bool,

    /// Seed for per-cue randomness (None = entropy)
    pub rng_seed: Option<u64>,
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            divisors: GRID_DIVISORS.to_vec(),
            growth_range: 3..9,
            edges_range: 4..16,
            size_ratios: [0.9, 1.2, 1.5],
            fill_alpha: 0.5,
            stroke_weight: 2.0,
            shape_seed: 1,
            note_track: 2, // "Synth 1 - Init Patch"
            polyphonic: false,
            cancel_stale_draws: true,
            rng_seed: None,
        }
    }
}

impl SketchParams {
    /// Create the per-cue random source
    pub fn make_rng(&self) -> fastrand::Rng {
        match self.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }

    /// Validate configuration (non-empty ranges, usable divisors)
    pub fn validate(&self) -> Result<(), String> {
        if self.divisors.is_empty() || self.divisors.contains(&0) {
            return Err(format!("Invalid grid divisors: {:?}", self.divisors));
        }
        if self.growth_range.is_empty() {
            return Err(format!("Empty growth range: {:?}", self.growth_range));
        }
        if self.edges_range.is_empty() || self.edges_range.start < 3 {
            return Err(format!(
                "Edge range must be non-empty and start at 3 or more, got {:?}",
                self.edges_range
            ));
        }
        Ok(())
    }
}
