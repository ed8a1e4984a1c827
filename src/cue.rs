//! Cue scheduling: MIDI notes become timed actions fired by the playback clock.

use crate::midi::NoteEvent;

/// One registered cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue<A> {
    /// Playback position at which the cue fires (seconds)
    pub time_s: f64,
    /// The note that produced the cue, with `cue_index` assigned
    pub note: NoteEvent,
    /// What the cue does when it fires
    pub action: A,
}

/// Build one cue per distinct tick (first note wins), or per note when `poly`.
///
/// Cue indices are 1-based and sequential over the accepted notes.
pub fn schedule_cue_set<A: Clone>(notes: &[NoteEvent], action: A, poly: bool) -> Vec<Cue<A>> {
    let mut cues = Vec::with_capacity(notes.len());
    let mut last_ticks: Option<u64> = None;
    let mut current_cue = 1;

    for note in notes {
        if poly || last_ticks != Some(note.ticks) {
            let mut note = note.clone();
            note.cue_index = Some(current_cue);
            cues.push(Cue {
                time_s: note.time_s,
                note,
                action: action.clone(),
            });
            last_ticks = Some(cues[cues.len() - 1].note.ticks);
            current_cue += 1;
        }
    }

    cues
}

/// Registered cues fired in time order against a playback position
#[derive(Debug, Clone)]
pub struct CueTimeline<A> {
    cues: Vec<Cue<A>>,
    /// Index of the next cue to fire
    cursor: usize,
    /// Position seen by the last `advance`
    last_position_s: f64,
}

impl<A> Default for CueTimeline<A> {
    fn default() -> Self {
        Self {
            cues: Vec::new(),
            cursor: 0,
            last_position_s: 0.0,
        }
    }
}

impl<A> CueTimeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register cues; the timeline stays sorted by time
    pub fn add_cues(&mut self, cues: impl IntoIterator<Item = Cue<A>>) {
        self.cues.extend(cues);
        self.cues.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        self.rewind(self.last_position_s);
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Cues due at `position_s` that have not fired yet, in time order.
    ///
    /// A position earlier than the previous one (seek or reset) rewinds the
    /// timeline first, so cues at or after the new position fire again.
    pub fn advance(&mut self, position_s: f64) -> &[Cue<A>] {
        if position_s < self.last_position_s {
            self.rewind(position_s);
        }
        self.last_position_s = position_s;

        let start = self.cursor;
        while self.cursor < self.cues.len() && self.cues[self.cursor].time_s <= position_s {
            self.cursor += 1;
        }
        &self.cues[start..self.cursor]
    }

    /// Move the cursor to the first cue at or after `position_s`
    pub fn rewind(&mut self, position_s: f64) {
        self.cursor = self.cues.partition_point(|c| c.time_s < position_s);
        self.last_position_s = position_s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(ticks: u64, time_s: f64) -> NoteEvent {
        NoteEvent {
            pitch: 60,
            velocity: 100,
            channel: 0,
            ticks,
            duration_ticks: 240,
            time_s,
            duration_s: 0.25,
            cue_index: None,
        }
    }

    fn chordy_notes() -> Vec<NoteEvent> {
        vec![
            note(0, 0.0),
            note(0, 0.0),
            note(480, 0.5),
            note(960, 1.0),
            note(960, 1.0),
            note(960, 1.0),
            note(1440, 1.5),
        ]
    }

    #[test]
    fn test_one_cue_per_distinct_tick() {
        let cues = schedule_cue_set(&chordy_notes(), (), false);
        let ticks: Vec<u64> = cues.iter().map(|c| c.note.ticks).collect();
        assert_eq!(ticks, vec![0, 480, 960, 1440]);
    }

    #[test]
    fn test_poly_schedules_every_note() {
        let cues = schedule_cue_set(&chordy_notes(), (), true);
        assert_eq!(cues.len(), 7);
    }

    #[test]
    fn test_cue_indices_are_one_based_and_sequential() {
        let cues = schedule_cue_set(&chordy_notes(), (), false);
        let indices: Vec<Option<u32>> = cues.iter().map(|c| c.note.cue_index).collect();
        assert_eq!(indices, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_repeated_tick_after_gap_gets_new_cue() {
        // Dedup compares against the previous accepted tick only
        let notes = vec![note(0, 0.0), note(480, 0.5), note(0, 0.0)];
        let cues = schedule_cue_set(&notes, (), false);
        assert_eq!(cues.len(), 3);
    }

    #[test]
    fn test_first_note_on_a_tick_wins() {
        let mut notes = chordy_notes();
        notes[0].pitch = 48;
        notes[1].pitch = 72;
        let cues = schedule_cue_set(&notes, (), false);
        assert_eq!(cues[0].note.pitch, 48);
    }

    #[test]
    fn test_action_is_carried_by_every_cue() {
        #[derive(Debug, Clone, PartialEq)]
        enum Action {
            Burst,
        }
        let cues = schedule_cue_set(&chordy_notes(), Action::Burst, false);
        assert!(cues.iter().all(|c| c.action == Action::Burst));
    }

    #[test]
    fn test_timeline_fires_each_cue_once_in_order() {
        let mut timeline = CueTimeline::new();
        timeline.add_cues(schedule_cue_set(&chordy_notes(), (), false));

        assert_eq!(timeline.advance(0.0).len(), 1);
        assert!(timeline.advance(0.2).is_empty());

        let fired: Vec<u64> = timeline.advance(1.2).iter().map(|c| c.note.ticks).collect();
        assert_eq!(fired, vec![480, 960]);

        assert_eq!(timeline.advance(5.0).len(), 1);
        assert!(timeline.advance(6.0).is_empty());
    }

    #[test]
    fn test_timeline_rewinds_on_backward_seek() {
        let mut timeline = CueTimeline::new();
        timeline.add_cues(schedule_cue_set(&chordy_notes(), (), false));

        assert_eq!(timeline.advance(2.0).len(), 4);
        // Reset to the start: every cue fires again
        assert_eq!(timeline.advance(0.0).len(), 1);
        assert_eq!(timeline.advance(2.0).len(), 3);
    }

    #[test]
    fn test_empty_timeline() {
        let mut timeline: CueTimeline<()> = CueTimeline::new();
        assert!(timeline.is_empty());
        assert!(timeline.advance(10.0).is_empty());
    }
}
