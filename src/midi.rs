//! Standard MIDI File parsing into timed note events.
//!
//! Tick positions are converted to seconds through a tempo map merged from
//! every track, so notes of any track line up with the audio rendition.

use std::collections::{HashMap, VecDeque};

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{Error, Result};

/// Default tempo when a file carries no tempo event (120 bpm)
const DEFAULT_TEMPO_US_PER_QN: u32 = 500_000;

/// One note of a track with both tick and wall-clock positions
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
    /// Start position (MIDI ticks)
    pub ticks: u64,
    /// Length (MIDI ticks)
    pub duration_ticks: u64,
    /// Start position (seconds from the beginning of the file)
    pub time_s: f64,
    /// Length (seconds)
    pub duration_s: f64,
    /// 1-based cue index, assigned when the note is registered as a cue
    pub cue_index: Option<u32>,
}

impl NoteEvent {
    /// Note length in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration_s * 1000.0
    }
}

/// Notes and name of one track
#[derive(Debug, Clone, Default)]
pub struct MidiTrack {
    pub name: Option<String>,
    pub notes: Vec<NoteEvent>,
}

/// Parsed MIDI file
#[derive(Debug, Clone)]
pub struct MidiFile {
    pub tracks: Vec<MidiTrack>,
    /// Pulses per quarter note (None for SMPTE timecode files)
    pub ppq: Option<u16>,
    /// End of the last note (seconds)
    pub duration_s: f64,
}

impl MidiFile {
    /// Parse a Standard MIDI File from raw bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;
        let tempo_map = TempoMap::from_smf(&smf);

        let tracks: Vec<MidiTrack> = smf
            .tracks
            .iter()
            .map(|track| read_track(track, &tempo_map))
            .collect();

        let duration_s = tracks
            .iter()
            .flat_map(|t| t.notes.iter())
            .map(|n| n.time_s + n.duration_s)
            .fold(0.0, f64::max);

        let ppq = match smf.header.timing {
            Timing::Metrical(ticks_per_beat) => Some(ticks_per_beat.as_int()),
            Timing::Timecode(_, _) => None,
        };

        Ok(Self {
            tracks,
            ppq,
            duration_s,
        })
    }

    /// Read and parse a MIDI file from disk
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Track by index, or `TrackNotFound`
    pub fn track(&self, index: usize) -> Result<&MidiTrack> {
        self.tracks.get(index).ok_or(Error::TrackNotFound {
            index,
            available: self.tracks.len(),
        })
    }
}

/// Converts tick positions to seconds
#[derive(Debug, Clone)]
enum TempoMap {
    /// Tempo segments sorted by start tick
    Metrical {
        ppq: f64,
        segments: Vec<TempoSegment>,
    },
    /// Fixed ticks per second (SMPTE)
    Timecode { ticks_per_second: f64 },
}

#[derive(Debug, Clone, Copy)]
struct TempoSegment {
    start_tick: u64,
    start_s: f64,
    us_per_qn: u32,
}

impl TempoMap {
    fn from_smf(smf: &Smf) -> Self {
        match smf.header.timing {
            Timing::Metrical(ticks_per_beat) => {
                let mut changes: Vec<(u64, u32)> = Vec::new();
                for track in &smf.tracks {
                    let mut tick: u64 = 0;
                    for event in track {
                        tick += event.delta.as_int() as u64;
                        if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                            changes.push((tick, tempo.as_int()));
                        }
                    }
                }
                Self::metrical(ticks_per_beat.as_int(), changes)
            }
            Timing::Timecode(fps, subframes) => Self::Timecode {
                ticks_per_second: fps.as_f32() as f64 * subframes as f64,
            },
        }
    }

    fn metrical(ppq: u16, mut changes: Vec<(u64, u32)>) -> Self {
        // Stable sort keeps the last change of a tick last
        changes.sort_by_key(|(tick, _)| *tick);

        let ppq = ppq.max(1) as f64;
        let mut segments = vec![TempoSegment {
            start_tick: 0,
            start_s: 0.0,
            us_per_qn: DEFAULT_TEMPO_US_PER_QN,
        }];

        for (tick, us_per_qn) in changes {
            let last = segments[segments.len() - 1];
            if tick == last.start_tick {
                if let Some(segment) = segments.last_mut() {
                    segment.us_per_qn = us_per_qn;
                }
                continue;
            }
            let start_s = last.start_s
                + (tick - last.start_tick) as f64 * last.us_per_qn as f64 / 1_000_000.0 / ppq;
            segments.push(TempoSegment {
                start_tick: tick,
                start_s,
                us_per_qn,
            });
        }

        Self::Metrical { ppq, segments }
    }

    fn seconds_at(&self, tick: u64) -> f64 {
        match self {
            Self::Metrical { ppq, segments } => {
                let idx = segments.partition_point(|s| s.start_tick <= tick);
                let segment = segments[idx.saturating_sub(1)];
                segment.start_s
                    + (tick - segment.start_tick) as f64 * segment.us_per_qn as f64
                        / 1_000_000.0
                        / ppq
            }
            Self::Timecode { ticks_per_second } => {
                if *ticks_per_second > 0.0 {
                    tick as f64 / ticks_per_second
                } else {
                    0.0
                }
            }
        }
    }
}

/// Note-on waiting for its note-off
struct OpenNote {
    tick: u64,
    velocity: u8,
    order: usize,
}

fn read_track(track: &[midly::TrackEvent], tempo_map: &TempoMap) -> MidiTrack {
    let mut name = None;
    let mut open: HashMap<(u8, u8), VecDeque<OpenNote>> = HashMap::new();
    // (note-on order, note) so that notes starting on one tick keep file order
    let mut closed: Vec<(usize, NoteEvent)> = Vec::new();
    let mut tick: u64 = 0;
    let mut order = 0;

    let close = |key: (u8, u8), start: OpenNote, end_tick: u64| {
        let time_s = tempo_map.seconds_at(start.tick);
        let end_s = tempo_map.seconds_at(end_tick);
        (
            start.order,
            NoteEvent {
                pitch: key.1,
                velocity: start.velocity,
                channel: key.0,
                ticks: start.tick,
                duration_ticks: end_tick - start.tick,
                time_s,
                duration_s: end_s - time_s,
                cue_index: None,
            },
        )
    };

    for event in track {
        tick += event.delta.as_int() as u64;
        match event.kind {
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        open.entry((channel, key.as_int()))
                            .or_default()
                            .push_back(OpenNote {
                                tick,
                                velocity: vel.as_int(),
                                order,
                            });
                        order += 1;
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let k = (channel, key.as_int());
                        if let Some(start) = open.get_mut(&k).and_then(|q| q.pop_front()) {
                            closed.push(close(k, start, tick));
                        }
                    }
                    _ => {}
                }
            }
            TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                name = Some(String::from_utf8_lossy(bytes).into_owned());
            }
            _ => {}
        }
    }

    // Dangling note-ons end with the track
    for (k, queue) in open {
        for start in queue {
            closed.push(close(k, start, tick));
        }
    }

    closed.sort_by_key(|(order, note)| (note.ticks, *order));

    MidiTrack {
        name,
        notes: closed.into_iter().map(|(_, note)| note).collect(),
    }
}
