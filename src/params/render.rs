//! Rendering and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Window title, also reported as the page title in analytics events
    pub title: String,

    /// Overlay fade duration (milliseconds)
    pub fade_ms: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            title: "Blobs No. 1".to_string(),
            fade_ms: 800.0,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds, 0 = whole track)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
        }
    }

    /// Recording length, falling back to the track length when unbounded
    pub fn effective_duration(&self, track_duration_s: f64) -> f64 {
        if self.duration_secs > 0.0 {
            (self.duration_secs as f64).min(track_duration_s)
        } else {
            track_duration_s
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self, track_duration_s: f64) -> usize {
        (self.effective_duration(track_duration_s) * self.fps as f64).ceil() as usize
    }

    /// Seconds per frame
    pub fn frame_interval_s(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of one numbered frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }
}
