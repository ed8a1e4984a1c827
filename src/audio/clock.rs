//! Playback clock abstraction.

/// A playable audio timeline the controller and cue timeline read from
pub trait PlaybackClock {
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop and rewind to the start
    fn stop(&mut self);
    fn seek(&mut self, position_s: f64);
    fn is_playing(&self) -> bool;
    /// Current playback position (seconds)
    fn position_s(&self) -> f64;
    /// Total length (seconds)
    fn duration_s(&self) -> f64;
}

/// Clock advanced by hand: recording mode and tests
#[derive(Debug, Clone)]
pub struct ManualClock {
    position_s: f64,
    duration_s: f64,
    playing: bool,
}

impl ManualClock {
    pub fn new(duration_s: f64) -> Self {
        Self {
            position_s: 0.0,
            duration_s,
            playing: false,
        }
    }

    /// Move forward by `dt_s` if playing; stops itself at the end
    pub fn tick(&mut self, dt_s: f64) {
        if !self.playing {
            return;
        }
        self.position_s += dt_s;
        if self.position_s >= self.duration_s {
            self.position_s = self.duration_s;
            self.playing = false;
        }
    }
}

impl PlaybackClock for ManualClock {
    fn play(&mut self) {
        if self.position_s < self.duration_s {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position_s = 0.0;
    }

    fn seek(&mut self, position_s: f64) {
        self.position_s = position_s.clamp(0.0, self.duration_s);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn position_s(&self) -> f64 {
        self.position_s
    }

    fn duration_s(&self) -> f64 {
        self.duration_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_only_moves_while_playing() {
        let mut clock = ManualClock::new(2.0);
        clock.tick(0.5);
        assert_eq!(clock.position_s(), 0.0);

        clock.play();
        clock.tick(0.5);
        assert_eq!(clock.position_s(), 0.5);

        clock.pause();
        clock.tick(0.5);
        assert_eq!(clock.position_s(), 0.5);
    }

    #[test]
    fn test_manual_clock_stops_at_end() {
        let mut clock = ManualClock::new(1.0);
        clock.play();
        clock.tick(1.5);
        assert!(!clock.is_playing());
        assert_eq!(clock.position_s(), 1.0);

        // Playing from the end needs a seek first
        clock.play();
        assert!(!clock.is_playing());
        clock.seek(0.0);
        clock.play();
        assert!(clock.is_playing());
    }
}
