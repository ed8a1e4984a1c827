//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::assets::AssetPaths;
use crate::error::{Error, Result};
use crate::params::{RecordingConfig, RenderConfig, SketchParams};
use crate::playback::StartSignal;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "blobs")]
#[command(about = "Generative blob animation synchronised to a MIDI score", long_about = None)]
pub struct Args {
    /// Audio rendition of the piece (WAV)
    #[arg(long, value_name = "PATH", default_value = "assets/blobs-no-1.wav")]
    pub audio: PathBuf,

    /// MIDI score of the piece
    #[arg(long, value_name = "PATH", default_value = "assets/blobs-no-1.mid")]
    pub midi: PathBuf,

    /// MIDI track whose notes become cues
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub track: usize,

    /// One cue per note instead of one per distinct tick
    #[arg(long)]
    pub poly: bool,

    /// Seed for blob generation (reproducible runs)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Window / canvas width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Window / canvas height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Render PNG frames headless instead of playing (seconds, 0 = whole track)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Recording frame rate
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub fps: u32,

    /// Recording output directory
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,

    /// Append analytics events to this file (JSON lines)
    #[arg(long, value_name = "FILE")]
    pub analytics: Option<PathBuf>,

    /// Let blob draws of earlier cues keep landing after a new cue
    #[arg(long)]
    pub keep_stale_draws: bool,

    /// Emit the "start playing" event on every play, not only the first
    #[arg(long)]
    pub every_play_signal: bool,
}

impl Args {
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            audio: self.audio.clone(),
            midi: self.midi.clone(),
        }
    }

    /// Sketch parameters with command-line overrides applied
    pub fn sketch_params(&self) -> Result<SketchParams> {
        let params = SketchParams {
            note_track: self.track,
            polyphonic: self.poly,
            cancel_stale_draws: !self.keep_stale_draws,
            rng_seed: self.seed,
            ..SketchParams::default()
        };
        params.validate().map_err(Error::Params)?;
        Ok(params)
    }

    pub fn render_config(&self) -> Result<RenderConfig> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Params(format!(
                "Canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        })
    }

    pub fn start_signal(&self) -> StartSignal {
        if self.every_play_signal {
            StartSignal::EveryPlay
        } else {
            StartSignal::FirstPlayOnly
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        if duration < 0.0 || self.fps == 0 {
            return Err(Error::Params(format!(
                "Recording needs a non-negative duration and fps > 0, got {}s @ {}",
                duration, self.fps
            )));
        }

        let config = RecordingConfig {
            output_dir: self.output.clone(),
            fps: self.fps,
            ..RecordingConfig::new(duration)
        };

        // Create output directories
        std::fs::create_dir_all(config.frames_dir())?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("blobs").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.asset_paths(), AssetPaths::default());
        assert_eq!(args.track, 2);
        assert!(args.record.is_none());
        assert_eq!(args.start_signal(), StartSignal::FirstPlayOnly);

        let params = args.sketch_params().unwrap();
        assert!(params.cancel_stale_draws);
        assert!(!params.polyphonic);

        let render = args.render_config().unwrap();
        assert_eq!((render.window_width, render.window_height), (1280, 720));
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--track",
            "1",
            "--poly",
            "--seed",
            "9",
            "--keep-stale-draws",
            "--every-play-signal",
            "--width",
            "640",
            "--height",
            "480",
        ]);
        let params = args.sketch_params().unwrap();
        assert_eq!(params.note_track, 1);
        assert!(params.polyphonic);
        assert!(!params.cancel_stale_draws);
        assert_eq!(params.rng_seed, Some(9));
        assert_eq!(args.start_signal(), StartSignal::EveryPlay);
        assert_eq!(args.render_config().unwrap().window_width, 640);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(parse(&["--width", "0"]).render_config().is_err());
    }

    #[test]
    fn test_recording_config() {
        let dir = std::env::temp_dir().join(format!("blobs-cli-{}", std::process::id()));
        let output = dir.to_string_lossy().into_owned();
        let args = parse(&["--record", "5", "--fps", "30", "--output", &output]);

        let config = args.create_recording_config().unwrap().unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.duration_secs, 5.0);
        assert!(config.frames_dir().is_dir());
    }

    #[test]
    fn test_no_recording_without_flag() {
        assert!(parse(&[]).create_recording_config().unwrap().is_none());
    }
}
