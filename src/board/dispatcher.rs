use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::board::flash::FlashTracker;
use crate::board::layout::PadLayout;

/// Playback side of a trigger. `SampleBank` is the production
/// implementation; tests substitute a recording fake.
pub trait NotePlayer {
    /// Restarts the sample bound to `note` from the beginning. Returns false
    /// when the note has no handle.
    fn restart(&mut self, note: &str) -> bool;
}

/// Keys handled by the focus-based activation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKey {
    /// Enter or Space: trigger the focused pad.
    Activate,
    /// Tab / right arrow: move focus forward.
    Next,
    /// Left arrow: move focus back.
    Prev,
}

/// Routes interactions to note playback and visual feedback.
///
/// All state lives on the event-loop thread; triggers are independent,
/// stateless actions and the only quasi-state is each pad's flash, which is
/// reset on every new trigger.
pub struct NoteDispatcher<P> {
    layout: PadLayout,
    player: P,
    flashes: FlashTracker,
    focus: Option<usize>,
}

impl<P: NotePlayer> NoteDispatcher<P> {
    pub fn new(layout: PadLayout, player: P, flash_duration: Duration) -> Self {
        let flashes = FlashTracker::new(layout.len(), flash_duration);
        NoteDispatcher {
            layout,
            player,
            flashes,
            focus: None,
        }
    }

    /// The trigger operation: restart the pad's sample, then restart its
    /// flash. A pad whose note has no handle is inert, flash included.
    pub fn play_pad(&mut self, index: usize, now: Instant) {
        let Some(pad) = self.layout.pad(index) else {
            return;
        };
        if !self.player.restart(&pad.note) {
            debug!(note = %pad.note, "trigger on a note with no handle");
            return;
        }
        trace!(note = %pad.note, "triggered");
        self.flashes.activate(index, now);
    }

    /// Pointer-down at normalized window coordinates. Positions that land on
    /// no pad are ignored.
    pub fn pointer_down(&mut self, x: f32, y: f32, now: Instant) {
        if let Some(index) = self.layout.pad_at(x, y).map(|pad| pad.index) {
            self.play_pad(index, now);
        }
    }

    /// A key-press edge from the global listener. Unmapped keys are ignored.
    pub fn global_key(&mut self, key: char, now: Instant) {
        if let Some(index) = self.layout.pad_for_key(key).map(|pad| pad.index) {
            self.play_pad(index, now);
        }
    }

    /// Focus-based activation. Returns true when the key was consumed, so
    /// the caller stops any further handling of the event.
    pub fn focus_key(&mut self, key: FocusKey, now: Instant) -> bool {
        match key {
            FocusKey::Activate => match self.focus {
                Some(index) => {
                    self.play_pad(index, now);
                    true
                }
                None => false,
            },
            FocusKey::Next => {
                self.move_focus(1);
                true
            }
            FocusKey::Prev => {
                self.move_focus(-1);
                true
            }
        }
    }

    fn move_focus(&mut self, step: isize) {
        if self.layout.is_empty() {
            return;
        }
        let len = self.layout.len() as isize;
        let next = match self.focus {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.focus = Some(next as usize);
    }

    /// Per-frame upkeep: report flash completions for effects that ran out.
    pub fn frame(&mut self, now: Instant) {
        self.flashes.sweep(now);
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn layout(&self) -> &PadLayout {
        &self.layout
    }

    pub fn flashes(&self) -> &FlashTracker {
        &self.flashes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::config::{BoardConfig, PadConfig};

    const FLASH: Duration = Duration::from_millis(180);

    /// Records restart calls; only notes in `known` have handles.
    struct RecordingPlayer {
        known: Vec<String>,
        played: Vec<String>,
    }

    impl RecordingPlayer {
        fn knowing(notes: &[&str]) -> Self {
            RecordingPlayer {
                known: notes.iter().map(|note| note.to_string()).collect(),
                played: Vec::new(),
            }
        }
    }

    impl NotePlayer for RecordingPlayer {
        fn restart(&mut self, note: &str) -> bool {
            if !self.known.iter().any(|known| known == note) {
                return false;
            }
            self.played.push(note.to_string());
            true
        }
    }

    fn two_pad_dispatcher(known: &[&str]) -> NoteDispatcher<RecordingPlayer> {
        let board = BoardConfig {
            columns: 2,
            pads: vec![
                PadConfig {
                    note: "C".to_string(),
                    key: Some('a'),
                    label: None,
                },
                PadConfig {
                    note: "D".to_string(),
                    key: Some('s'),
                    label: None,
                },
            ],
        };
        let layout = PadLayout::from_config(&board);
        NoteDispatcher::new(layout, RecordingPlayer::knowing(known), FLASH)
    }

    #[test]
    fn mapped_keys_play_their_notes_and_unmapped_keys_play_nothing() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        let now = Instant::now();
        dispatcher.global_key('a', now);
        dispatcher.global_key('z', now);
        dispatcher.global_key('s', now);
        assert_eq!(dispatcher.player.played, ["C", "D"]);
    }

    #[test]
    fn pointer_down_resolves_the_pad_under_it() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        let now = Instant::now();
        let (x, y) = dispatcher.layout().pad(1).unwrap().rect.center();
        dispatcher.pointer_down(x, y, now);
        assert_eq!(dispatcher.player.played, ["D"]);
        assert!(dispatcher.flashes().is_active(1));
        assert!(!dispatcher.flashes().is_active(0));
    }

    #[test]
    fn pointer_down_on_a_gap_triggers_nothing() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        dispatcher.pointer_down(0.01, 0.01, Instant::now());
        assert!(dispatcher.player.played.is_empty());
    }

    #[test]
    fn a_note_without_a_handle_is_inert() {
        let mut dispatcher = two_pad_dispatcher(&["C"]);
        let now = Instant::now();
        dispatcher.global_key('s', now);
        assert!(dispatcher.player.played.is_empty());
        assert!(!dispatcher.flashes().is_active(1));
    }

    #[test]
    fn retriggering_restarts_playback_every_time() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        let now = Instant::now();
        dispatcher.global_key('a', now);
        dispatcher.global_key('a', now + Duration::from_millis(10));
        dispatcher.global_key('a', now + Duration::from_millis(20));
        assert_eq!(dispatcher.player.played, ["C", "C", "C"]);
        assert!(dispatcher.flashes().is_active(0));
    }

    #[test]
    fn activate_without_focus_is_not_consumed() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        assert!(!dispatcher.focus_key(FocusKey::Activate, Instant::now()));
        assert!(dispatcher.player.played.is_empty());
    }

    #[test]
    fn focus_traversal_wraps_and_activates() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        let now = Instant::now();
        assert!(dispatcher.focus_key(FocusKey::Next, now));
        assert_eq!(dispatcher.focus(), Some(0));
        assert!(dispatcher.focus_key(FocusKey::Next, now));
        assert!(dispatcher.focus_key(FocusKey::Next, now));
        assert_eq!(dispatcher.focus(), Some(0));
        dispatcher.focus_key(FocusKey::Prev, now);
        assert_eq!(dispatcher.focus(), Some(1));
        assert!(dispatcher.focus_key(FocusKey::Activate, now));
        assert_eq!(dispatcher.player.played, ["D"]);
    }

    #[test]
    fn out_of_range_pad_index_is_a_no_op() {
        let mut dispatcher = two_pad_dispatcher(&["C", "D"]);
        dispatcher.play_pad(7, Instant::now());
        assert!(dispatcher.player.played.is_empty());
    }
}
