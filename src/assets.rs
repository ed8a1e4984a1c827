//! Asset loading: the audio track first, then the MIDI file, on a background thread.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::Receiver;

use crate::audio::AudioTrack;
use crate::error::Result;
use crate::midi::{MidiFile, NoteEvent};

/// Where the assets live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub audio: PathBuf,
    pub midi: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            audio: PathBuf::from("assets/blobs-no-1.wav"),
            midi: PathBuf::from("assets/blobs-no-1.mid"),
        }
    }
}

impl AssetPaths {
    /// `file://` URL of the MIDI asset
    pub fn midi_location(&self) -> String {
        let path = std::fs::canonicalize(&self.midi).unwrap_or_else(|_| self.midi.clone());
        format!("file://{}", path.display())
    }
}

/// Everything the animation needs before it can play
#[derive(Debug, Clone)]
pub struct Assets {
    pub audio: AudioTrack,
    pub midi: MidiFile,
    /// Index of the note track
    pub track: usize,
    /// Notes of the note track, in start order
    pub notes: Vec<NoteEvent>,
}

/// Result of a background load (sent exactly once)
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(Assets),
    Failed(crate::error::Error),
}

/// Load synchronously: audio, then MIDI, then the note track
pub fn load_assets(paths: &AssetPaths, track: usize) -> Result<Assets> {
    let audio = AudioTrack::from_wav_path(&paths.audio)?;
    let midi = MidiFile::from_path(&paths.midi)?;
    let notes = midi.track(track)?.notes.clone();
    Ok(Assets {
        audio,
        midi,
        track,
        notes,
    })
}

/// Start loading on a worker thread; the receiver yields one `LoadEvent`
pub fn spawn_loader(paths: AssetPaths, track: usize) -> Receiver<LoadEvent> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let event = match load_assets(&paths, track) {
            Ok(assets) => LoadEvent::Loaded(assets),
            Err(e) => LoadEvent::Failed(e),
        };
        // Receiver gone means the app is already shutting down
        let _ = tx.send(event);
    });
    rx
}

/// One-line summary for the load log
pub fn describe(assets: &Assets, audio_path: &Path) -> String {
    let name = assets
        .midi
        .tracks
        .get(assets.track)
        .and_then(|t| t.name.as_deref())
        .unwrap_or("unnamed");
    format!(
        "Loaded {} ({:.1} s) and track {} '{}' with {} notes",
        audio_path.display(),
        assets.audio.duration_s(),
        assets.track,
        name,
        assets.notes.len()
    )
}
