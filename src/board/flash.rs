use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Flash {
    started: Instant,
    generation: u64,
}

/// Per-pad trigger highlight state.
///
/// Every trigger restarts the pad's flash and stamps it with a fresh
/// generation. Completions are only honored when they carry the live
/// generation, so a cleanup scheduled by an earlier trigger can never cut a
/// later trigger's flash short. Callers pass `Instant`s in explicitly, which
/// keeps the timing behavior deterministic under test.
#[derive(Debug)]
pub struct FlashTracker {
    duration: Duration,
    slots: Vec<Option<Flash>>,
    next_generation: u64,
}

impl FlashTracker {
    pub fn new(pad_count: usize, duration: Duration) -> Self {
        FlashTracker {
            duration,
            slots: vec![None; pad_count],
            next_generation: 0,
        }
    }

    /// Restarts the flash on `pad`, replacing whatever was live there.
    /// Returns the generation of this activation.
    pub fn activate(&mut self, pad: usize, now: Instant) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(slot) = self.slots.get_mut(pad) {
            *slot = Some(Flash {
                started: now,
                generation,
            });
        }
        generation
    }

    /// Reports that the visual effect for `generation` has finished. Stale
    /// generations are ignored.
    pub fn complete(&mut self, pad: usize, generation: u64) {
        if let Some(slot) = self.slots.get_mut(pad) {
            if slot.map(|flash| flash.generation) == Some(generation) {
                *slot = None;
            }
        }
    }

    /// Frame upkeep: reports a completion for every flash whose effect has
    /// run to its end by `now`.
    pub fn sweep(&mut self, now: Instant) {
        let expired: Vec<(usize, u64)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(pad, slot)| {
                let flash = (*slot)?;
                (now.duration_since(flash.started) >= self.duration)
                    .then_some((pad, flash.generation))
            })
            .collect();
        for (pad, generation) in expired {
            self.complete(pad, generation);
        }
    }

    /// Effect progress in `[0, 1]`, or `None` while the pad is dark.
    pub fn progress(&self, pad: usize, now: Instant) -> Option<f32> {
        let flash = (*self.slots.get(pad)?)?;
        let elapsed = now.duration_since(flash.started).as_secs_f32();
        Some((elapsed / self.duration.as_secs_f32()).min(1.0))
    }

    pub fn is_active(&self, pad: usize) -> bool {
        matches!(self.slots.get(pad), Some(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLASH: Duration = Duration::from_millis(180);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn flash_survives_until_the_effect_ends() {
        let mut tracker = FlashTracker::new(1, FLASH);
        let t0 = Instant::now();
        tracker.activate(0, t0);
        tracker.sweep(t0 + ms(100));
        assert!(tracker.is_active(0));
        tracker.sweep(t0 + ms(180));
        assert!(!tracker.is_active(0));
    }

    #[test]
    fn rapid_retriggers_keep_the_flash_lit_continuously() {
        // Triggers at t=0, t=50 and t=170 with a 180ms effect: the marker
        // must stay present until the t=170 trigger's effect completes.
        let mut tracker = FlashTracker::new(1, FLASH);
        let t0 = Instant::now();
        tracker.activate(0, t0);
        tracker.activate(0, t0 + ms(50));
        tracker.activate(0, t0 + ms(170));
        for elapsed in [60, 180, 230, 340] {
            tracker.sweep(t0 + ms(elapsed));
            assert!(tracker.is_active(0), "flash cut off at t={elapsed}ms");
        }
        tracker.sweep(t0 + ms(350));
        assert!(!tracker.is_active(0));
    }

    #[test]
    fn stale_completions_are_ignored() {
        let mut tracker = FlashTracker::new(1, FLASH);
        let t0 = Instant::now();
        let first = tracker.activate(0, t0);
        let second = tracker.activate(0, t0 + ms(50));
        tracker.complete(0, first);
        assert!(tracker.is_active(0));
        tracker.complete(0, second);
        assert!(!tracker.is_active(0));
    }

    #[test]
    fn progress_tracks_the_most_recent_activation() {
        let mut tracker = FlashTracker::new(1, FLASH);
        let t0 = Instant::now();
        tracker.activate(0, t0);
        tracker.activate(0, t0 + ms(90));
        let progress = tracker.progress(0, t0 + ms(90)).unwrap();
        assert!(progress < 0.01, "restart did not reset progress: {progress}");
        assert!(tracker.progress(0, t0 + ms(360)).unwrap() >= 1.0);
    }

    #[test]
    fn pads_are_independent_and_out_of_range_is_tolerated() {
        let mut tracker = FlashTracker::new(2, FLASH);
        let t0 = Instant::now();
        tracker.activate(0, t0);
        assert!(tracker.is_active(0));
        assert!(!tracker.is_active(1));
        assert!(tracker.progress(1, t0).is_none());
        // A pad index the board does not have is a quiet no-op.
        tracker.activate(9, t0);
        tracker.complete(9, 1);
        assert!(tracker.progress(9, t0).is_none());
    }
}
