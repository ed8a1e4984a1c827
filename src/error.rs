//! Crate error type.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI parse: {0}")]
    Midi(#[from] midly::Error),

    #[error("MIDI track {index} not found ({available} tracks available)")]
    TrackNotFound { index: usize, available: usize },

    #[error("WAV decode: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported audio: {0}")]
    UnsupportedAudio(String),

    #[error("Audio device: {0}")]
    AudioDevice(String),

    #[error("Render: {0}")]
    Render(String),

    #[error("Image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Analytics: {0}")]
    Analytics(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    Params(String),
}
