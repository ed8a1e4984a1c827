//! Decoded audio asset.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Interleaved f32 samples of a decoded audio file
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Interleaved samples in [-1, 1]
    pub samples: Arc<Vec<f32>>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioTrack {
    /// Decode a WAV file (integer PCM or 32-bit float)
    pub fn from_wav_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        Self::from_wav_reader(reader)
    }

    pub fn from_wav_reader<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(Error::UnsupportedAudio(format!(
                "{} channels @ {}Hz",
                spec.channels, spec.sample_rate
            )));
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        Ok(Self {
            samples: Arc::new(samples),
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_s(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// Encode a silent 16-bit stereo WAV of the given length
    pub(crate) fn silent_wav(seconds: f32, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            let frames = (seconds * sample_rate as f32) as usize;
            for _ in 0..frames {
                writer.write_sample(0_i16).unwrap();
                writer.write_sample(0_i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_int_wav() {
        let bytes = silent_wav(0.5, 8000);
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let track = AudioTrack::from_wav_reader(reader).unwrap();

        assert_eq!(track.channels, 2);
        assert_eq!(track.frames(), 4000);
        assert!((track.duration_s() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_int_samples_are_normalized() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            writer.write_sample(i16::MIN).unwrap();
            writer.write_sample(16384_i16).unwrap();
            writer.finalize().unwrap();
        }
        let reader = hound::WavReader::new(Cursor::new(cursor.into_inner())).unwrap();
        let track = AudioTrack::from_wav_reader(reader).unwrap();

        assert_eq!(track.samples.as_slice(), &[-1.0, 0.5]);
    }
}
