//! The animation: cues fire blob bursts, bursts schedule delayed blob draws.

use crate::blob::generator::{draw_offsets_ms, outline_sizes};
use crate::blob::{generate_cue_blobs, BlobDescriptor, BlobSpec};
use crate::cue::{schedule_cue_set, CueTimeline};
use crate::error::Result;
use crate::midi::NoteEvent;
use crate::params::SketchParams;
use crate::render::{Canvas, DrawTimers, BLACK};

/// Actions a cue can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchCue {
    /// Regenerate the blob grid and draw it over the note's duration
    BlobBurst,
}

/// Canvas plus the cue timeline and pending draws that paint it
pub struct Sketch {
    canvas: Canvas,
    params: SketchParams,
    rng: fastrand::Rng,
    timeline: CueTimeline<SketchCue>,
    timers: DrawTimers<BlobDescriptor>,
    /// Descriptor set of the most recent cue
    blobs: Vec<BlobDescriptor>,
}

impl Sketch {
    pub fn new(width: u32, height: u32, params: SketchParams) -> Result<Self> {
        let mut canvas = Canvas::new(width, height)?;
        canvas.stroke_weight(params.stroke_weight);
        let rng = params.make_rng();

        Ok(Self {
            canvas,
            params,
            rng,
            timeline: CueTimeline::new(),
            timers: DrawTimers::new(),
            blobs: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn params(&self) -> &SketchParams {
        &self.params
    }

    pub fn cue_count(&self) -> usize {
        self.timeline.len()
    }

    pub fn pending_draws(&self) -> usize {
        self.timers.len()
    }

    pub fn blobs(&self) -> &[BlobDescriptor] {
        &self.blobs
    }

    /// Register one blob burst per cue-worthy note
    pub fn schedule(&mut self, notes: &[NoteEvent]) {
        let cues = schedule_cue_set(notes, SketchCue::BlobBurst, self.params.polyphonic);
        log::debug!("Scheduled {} cues from {} notes", cues.len(), notes.len());
        self.timeline.add_cues(cues);
    }

    /// Fire cues due at the audio position, then perform the draws due at `now_ms`
    pub fn update(&mut self, position_s: f64, now_ms: f64) {
        self.fire_cues(position_s, now_ms);
        self.draw_due(now_ms);
    }

    /// Fire the cues the audio position has reached since the last call
    pub fn fire_cues(&mut self, position_s: f64, now_ms: f64) {
        let fired: Vec<_> = self.timeline.advance(position_s).to_vec();
        for cue in fired {
            match cue.action {
                SketchCue::BlobBurst => self.execute_blob_cue(&cue.note, now_ms),
            }
        }
    }

    /// Perform every pending blob draw due at `now_ms`
    pub fn draw_due(&mut self, now_ms: f64) {
        for blob in self.timers.drain_due(now_ms) {
            self.draw_descriptor(&blob);
        }
    }

    /// Clear the canvas, regenerate the grid and spread its draws over the note
    pub fn execute_blob_cue(&mut self, note: &NoteEvent, now_ms: f64) {
        if self.params.cancel_stale_draws {
            self.timers.cancel_all();
        }
        self.canvas.background(BLACK);

        self.blobs = generate_cue_blobs(
            self.canvas.width(),
            self.canvas.height(),
            &self.params,
            &mut self.rng,
        );
        log::debug!(
            "Cue {:?}: {} blobs on a 1/{} grid",
            note.cue_index,
            self.blobs.len(),
            self.blobs.first().map_or(0, |b| b.divisor)
        );

        let offsets = draw_offsets_ms(note.duration_ms(), self.blobs.len());
        for (blob, offset) in self.blobs.iter().zip(offsets) {
            self.timers.schedule(now_ms + offset, *blob);
        }
    }

    /// Playback restarted from the beginning
    pub fn reset(&mut self) {
        if self.params.cancel_stale_draws {
            self.timers.cancel_all();
        }
        self.timeline.rewind(0.0);
    }

    /// Reallocate the canvas; its content is lost
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas.resize(width, height)
    }

    /// Three concentric outlines in the descriptor's triad
    fn draw_descriptor(&mut self, blob: &BlobDescriptor) {
        let sizes = outline_sizes(self.canvas.width(), blob.divisor, &self.params.size_ratios);
        for (size, colour) in sizes.into_iter().zip(blob.colours.0) {
            let spec = BlobSpec {
                size,
                growth: blob.growth,
                edges: blob.edges,
                seed: self.params.shape_seed,
            };
            self.canvas
                .draw_blob(blob.x, blob.y, &spec, colour, self.params.fill_alpha);
        }
    }
}
