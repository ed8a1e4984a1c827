//! Audio output: plays a decoded track through the default cpal device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::clock::PlaybackClock;
use super::track::AudioTrack;
use crate::error::{Error, Result};

/// Playhead shared with the audio callback
#[derive(Debug, Default)]
struct Playhead {
    /// Position in source frames, as f64 bits
    frame_bits: AtomicU64,
    playing: AtomicBool,
}

impl Playhead {
    fn frame(&self) -> f64 {
        f64::from_bits(self.frame_bits.load(Ordering::Acquire))
    }

    fn set_frame(&self, frame: f64) {
        self.frame_bits.store(frame.to_bits(), Ordering::Release);
    }
}

/// Source track plus the resampling state the output callback reads
struct TrackFeed {
    playhead: Arc<Playhead>,
    samples: Arc<Vec<f32>>,
    in_channels: usize,
    in_frames: usize,
    out_channels: usize,
    /// Source frames consumed per output frame (nearest-neighbour resampling)
    step: f64,
}

impl TrackFeed {
    /// Fill one output buffer, converting to the device's sample type
    fn fill<T>(&self, data: &mut [T])
    where
        T: Sample + FromSample<f32>,
    {
        if !self.playhead.playing.load(Ordering::Acquire) {
            data.fill(T::EQUILIBRIUM);
            return;
        }

        let mut frame = self.playhead.frame();
        for out in data.chunks_mut(self.out_channels) {
            let idx = frame as usize;
            if idx >= self.in_frames {
                out.fill(T::EQUILIBRIUM);
                continue;
            }
            let base = idx * self.in_channels;
            for (c, sample) in out.iter_mut().enumerate() {
                *sample = T::from_sample(self.samples[base + c % self.in_channels]);
            }
            frame += self.step;
        }

        if frame as usize >= self.in_frames {
            frame = self.in_frames as f64;
            self.playhead.playing.store(false, Ordering::Release);
        }
        self.playhead.set_frame(frame);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    feed: TrackFeed,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| feed.fill(data),
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| Error::AudioDevice(format!("Failed to build audio stream: {}", e)))
}

/// Audio system streaming one track to the output device
pub struct AudioSystem {
    playhead: Arc<Playhead>,
    sample_rate: u32,
    duration_s: f64,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and prepare `track` for playback (paused)
    pub fn new(track: &AudioTrack) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioDevice("No audio output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| Error::AudioDevice(format!("Failed to get audio config: {}", e)))?;

        let out_rate = config.sample_rate().0;
        let out_channels = config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz ({} channels, {:?}), source {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            out_rate,
            out_channels,
            config.sample_format(),
            track.sample_rate
        );

        let playhead = Arc::new(Playhead::default());
        let feed = TrackFeed {
            playhead: Arc::clone(&playhead),
            samples: Arc::clone(&track.samples),
            in_channels: track.channels as usize,
            in_frames: track.frames(),
            out_channels,
            step: track.sample_rate as f64 / out_rate as f64,
        };

        let stream_config: cpal::StreamConfig = config.config();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, feed),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, feed),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, feed),
            other => Err(Error::AudioDevice(format!(
                "Unsupported output sample format {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| Error::AudioDevice(format!("Failed to start audio stream: {}", e)))?;

        Ok(Self {
            playhead,
            sample_rate: track.sample_rate,
            duration_s: track.duration_s(),
            _stream: stream,
        })
    }
}

impl PlaybackClock for AudioSystem {
    fn play(&mut self) {
        if self.position_s() < self.duration_s {
            self.playhead.playing.store(true, Ordering::Release);
        }
    }

    fn pause(&mut self) {
        self.playhead.playing.store(false, Ordering::Release);
    }

    fn stop(&mut self) {
        self.pause();
        self.playhead.set_frame(0.0);
    }

    fn seek(&mut self, position_s: f64) {
        let position_s = position_s.clamp(0.0, self.duration_s);
        self.playhead.set_frame(position_s * self.sample_rate as f64);
    }

    fn is_playing(&self) -> bool {
        self.playhead.playing.load(Ordering::Acquire)
    }

    fn position_s(&self) -> f64 {
        self.playhead.frame() / self.sample_rate as f64
    }

    fn duration_s(&self) -> f64 {
        self.duration_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(samples: Vec<f32>, in_channels: usize, out_channels: usize, step: f64) -> TrackFeed {
        let in_frames = samples.len() / in_channels;
        TrackFeed {
            playhead: Arc::new(Playhead::default()),
            samples: Arc::new(samples),
            in_channels,
            in_frames,
            out_channels,
            step,
        }
    }

    #[test]
    fn test_paused_feed_writes_silence() {
        let feed = feed(vec![0.5; 8], 1, 1, 1.0);
        let mut data = [7_u16; 4];
        feed.fill(&mut data);
        assert_eq!(data, [u16::EQUILIBRIUM; 4]);
        assert_eq!(feed.playhead.frame(), 0.0);
    }

    #[test]
    fn test_feed_converts_to_integer_samples() {
        let feed = feed(vec![1.0, -1.0, 0.0], 1, 1, 1.0);
        feed.playhead.playing.store(true, Ordering::Release);

        let mut data = [0_i16; 3];
        feed.fill(&mut data);
        assert_eq!(data, [i16::MAX, i16::MIN, 0]);
    }

    #[test]
    fn test_mono_source_is_copied_to_every_output_channel() {
        let feed = feed(vec![0.25, 0.75], 1, 2, 1.0);
        feed.playhead.playing.store(true, Ordering::Release);

        let mut data = [0.0_f32; 4];
        feed.fill(&mut data);
        assert_eq!(data, [0.25, 0.25, 0.75, 0.75]);
    }

    #[test]
    fn test_feed_stops_at_end_of_track() {
        // 2x source rate: every other source frame is played
        let feed = feed(vec![0.1, 0.2, 0.3, 0.4], 1, 1, 2.0);
        feed.playhead.playing.store(true, Ordering::Release);

        let mut data = [1.0_f32; 4];
        feed.fill(&mut data);
        assert_eq!(data, [0.1, 0.3, 0.0, 0.0]);
        assert!(!feed.playhead.playing.load(Ordering::Acquire));
        assert_eq!(feed.playhead.frame(), 4.0);
    }
}
