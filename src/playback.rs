//! Playback controller: play/pause/replay state machine and analytics events.

use serde::Serialize;
use std::io::Write;

use crate::audio::PlaybackClock;
use crate::error::Result;

pub const CREDITS: &str = "Music By: http://labcat.nz/\nAnimation By: https://github.com/LABCAT/";

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotReady,
    ReadyPaused,
    Playing,
    Ended,
}

/// When the "start playing" event is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartSignal {
    /// Only on the very first play
    #[default]
    FirstPlayOnly,
    /// On every play from a paused state (the started flag is never latched)
    EveryPlay,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not ready yet
    Ignored,
    Paused,
    /// Started or resumed from the current position
    Playing,
    /// Rewound to the start after the track ended, then playing
    Replayed,
}

/// Page identity attached to analytics events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationInfo {
    pub title: String,
    pub location: String,
    pub action: String,
}

/// Event pushed to the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub animation: AnimationInfo,
}

impl AnalyticsEvent {
    pub const START_PLAYING: &'static str = "start playing";
    pub const REPLAYING: &'static str = "replaying";

    pub fn play_animation(page: &PageInfo, action: &str) -> Self {
        Self {
            event: "play-animation".to_string(),
            animation: AnimationInfo {
                title: page.title.clone(),
                location: page.location.clone(),
                action: action.to_string(),
            },
        }
    }
}

/// Host-provided event queue
pub trait DataLayer {
    fn push(&mut self, event: AnalyticsEvent) -> Result<()>;
}

impl DataLayer for Vec<AnalyticsEvent> {
    fn push(&mut self, event: AnalyticsEvent) -> Result<()> {
        Vec::push(self, event);
        Ok(())
    }
}

/// Writes one JSON object per line
pub struct JsonLinesDataLayer<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesDataLayer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DataLayer for JsonLinesDataLayer<W> {
    fn push(&mut self, event: AnalyticsEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Play/pause/replay state with one-shot flags
pub struct PlaybackController {
    state: PlaybackState,
    has_started: bool,
    credits_logged: bool,
    start_signal: StartSignal,
    page: PageInfo,
    data_layer: Option<Box<dyn DataLayer>>,
}

impl PlaybackController {
    pub fn new(page: PageInfo, start_signal: StartSignal) -> Self {
        Self {
            state: PlaybackState::NotReady,
            has_started: false,
            credits_logged: false,
            start_signal,
            page,
            data_layer: None,
        }
    }

    /// Attach the event queue; without one, events are dropped
    pub fn with_data_layer(mut self, data_layer: Box<dyn DataLayer>) -> Self {
        self.data_layer = Some(data_layer);
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state != PlaybackState::NotReady
    }

    pub fn credits_logged(&self) -> bool {
        self.credits_logged
    }

    /// Assets loaded
    pub fn mark_ready(&mut self) {
        if self.state == PlaybackState::NotReady {
            self.state = PlaybackState::ReadyPaused;
        }
    }

    /// User click or tap
    pub fn click(&mut self, clock: &mut dyn PlaybackClock) -> ClickOutcome {
        match self.state {
            PlaybackState::NotReady => ClickOutcome::Ignored,
            PlaybackState::Playing => {
                clock.pause();
                self.state = PlaybackState::ReadyPaused;
                ClickOutcome::Paused
            }
            PlaybackState::ReadyPaused | PlaybackState::Ended => {
                let replay = self.state == PlaybackState::Ended || at_end(clock);
                if replay {
                    clock.seek(0.0);
                    self.emit(AnalyticsEvent::REPLAYING);
                }

                clock.play();
                self.state = PlaybackState::Playing;

                if !self.has_started {
                    self.emit(AnalyticsEvent::START_PLAYING);
                    self.has_started = self.start_signal == StartSignal::FirstPlayOnly;
                }

                if replay {
                    ClickOutcome::Replayed
                } else {
                    ClickOutcome::Playing
                }
            }
        }
    }

    /// Detect the natural end of the track; returns true on the transition
    pub fn poll(&mut self, clock: &mut dyn PlaybackClock) -> bool {
        if self.state != PlaybackState::Playing || clock.is_playing() {
            return false;
        }
        self.state = PlaybackState::Ended;
        self.log_credits(clock);
        true
    }

    fn log_credits(&mut self, clock: &mut dyn PlaybackClock) {
        if self.credits_logged {
            return;
        }
        self.credits_logged = true;
        log::info!("{}", CREDITS);
        clock.stop();
    }

    fn emit(&mut self, action: &str) {
        let Some(data_layer) = self.data_layer.as_mut() else {
            return;
        };
        let event = AnalyticsEvent::play_animation(&self.page, action);
        if let Err(e) = data_layer.push(event) {
            log::warn!("Dropped analytics event '{}': {}", action, e);
        }
    }
}

/// Whole-second position has reached the whole-second duration
fn at_end(clock: &dyn PlaybackClock) -> bool {
    clock.position_s().trunc() >= clock.duration_s().trunc()
}
