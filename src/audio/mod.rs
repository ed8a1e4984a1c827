//! Audio decoding, playback clock and device output.

mod clock;
mod system;
mod track;

pub use clock::{ManualClock, PlaybackClock};
pub use system::AudioSystem;
pub use track::AudioTrack;

#[cfg(test)]
pub(crate) use track::tests::silent_wav;
