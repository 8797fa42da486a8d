//! Sit-up repetition counting.
//!
//! The input signal is the torso angle (shoulder-hip-knee, averaged over
//! both sides): open (large) when lying down, closed (small) when sitting
//! up. A stage change is accepted only after `debounce_frames` consecutive
//! samples past its threshold. A rep is counted on the debounced
//! `down -> up` transition, and only from `down`, so a rep always needs a
//! full cycle.

use serde::{Deserialize, Serialize};

/// Debounced sit-up stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitupStage {
    /// No debounced stage yet this session.
    #[default]
    None,
    /// Lying down (torso open).
    Down,
    /// Sitting up (torso closed).
    Up,
}

/// Sit-up thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SitupConfig {
    /// Torso angle above which a sample counts as "down" (degrees).
    pub down_threshold_deg: f64,
    /// Torso angle below which a sample counts as "up" (degrees).
    pub up_threshold_deg: f64,
    /// Consecutive samples required to accept a stage.
    pub debounce_frames: u32,
}

impl Default for SitupConfig {
    fn default() -> Self {
        Self {
            down_threshold_deg: 150.0,
            up_threshold_deg: 90.0,
            debounce_frames: 3,
        }
    }
}

/// Running state of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepetitionCounterState {
    pub stage: SitupStage,
    pub down_streak: u32,
    pub up_streak: u32,
    pub count: u32,
}

/// Debounced sit-up state machine.
#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    config: SitupConfig,
    state: RepetitionCounterState,
}

impl RepetitionCounter {
    pub fn new(config: SitupConfig) -> Self {
        Self {
            config,
            state: RepetitionCounterState::default(),
        }
    }

    pub fn state(&self) -> RepetitionCounterState {
        self.state
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    pub fn stage(&self) -> SitupStage {
        self.state.stage
    }

    /// Feed one torso-angle sample. Returns `true` if this sample completed a rep.
    pub fn update(&mut self, torso_angle: f64) -> bool {
        let s = &mut self.state;

        if torso_angle > self.config.down_threshold_deg {
            s.down_streak = s.down_streak.saturating_add(1);
            s.up_streak = 0;
            if s.down_streak >= self.config.debounce_frames && s.stage != SitupStage::Down {
                tracing::debug!(torso_angle, "Sit-up stage: down");
                s.stage = SitupStage::Down;
            }
            false
        } else if torso_angle < self.config.up_threshold_deg && s.stage == SitupStage::Down {
            s.up_streak = s.up_streak.saturating_add(1);
            s.down_streak = 0;
            if s.up_streak >= self.config.debounce_frames {
                s.stage = SitupStage::Up;
                s.count = s.count.saturating_add(1);
                tracing::debug!(count = s.count, torso_angle, "Sit-up counted");
                return true;
            }
            false
        } else {
            s.down_streak = 0;
            s.up_streak = 0;
            false
        }
    }

    /// Clear stage and streaks, keeping the count.
    pub fn reset_stage(&mut self) {
        self.state = RepetitionCounterState {
            count: self.state.count,
            ..RepetitionCounterState::default()
        };
    }

    /// Back to the start-of-session state, count included.
    pub fn reset(&mut self) {
        self.state = RepetitionCounterState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DOWN: f64 = 160.0;
    const UP: f64 = 80.0;
    const DEAD: f64 = 120.0;

    fn feed(counter: &mut RepetitionCounter, angle: f64, frames: usize) {
        for _ in 0..frames {
            counter.update(angle);
        }
    }

    #[test]
    fn test_two_and_two_does_not_count() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 2);
        feed(&mut counter, UP, 2);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.stage(), SitupStage::None);
    }

    #[test]
    fn test_three_and_three_counts_once() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 3);
        assert_eq!(counter.stage(), SitupStage::Down);
        feed(&mut counter, UP, 3);
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.stage(), SitupStage::Up);
    }

    #[test]
    fn test_two_full_cycles_count_twice() {
        let mut counter = RepetitionCounter::default();
        for _ in 0..2 {
            feed(&mut counter, DOWN, 3);
            feed(&mut counter, UP, 3);
        }
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_holding_up_does_not_double_count() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 3);
        feed(&mut counter, UP, 20);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_up_without_down_never_counts() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, UP, 10);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.state().up_streak, 0);
    }

    #[test]
    fn test_dead_zone_resets_streaks() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 3);
        feed(&mut counter, UP, 2);
        feed(&mut counter, DEAD, 1);
        feed(&mut counter, UP, 2);
        assert_eq!(counter.count(), 0);
        feed(&mut counter, UP, 1);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_update_reports_completed_rep() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 3);
        assert!(!counter.update(UP));
        assert!(!counter.update(UP));
        assert!(counter.update(UP));
    }

    #[test]
    fn test_threshold_values_are_exclusive() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, 150.0, 5);
        assert_eq!(counter.stage(), SitupStage::None);
        feed(&mut counter, DOWN, 3);
        feed(&mut counter, 90.0, 5);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_reset_stage_keeps_count() {
        let mut counter = RepetitionCounter::default();
        feed(&mut counter, DOWN, 3);
        feed(&mut counter, UP, 3);
        counter.reset_stage();
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.stage(), SitupStage::None);

        counter.reset();
        assert_eq!(counter.state(), RepetitionCounterState::default());
    }

    proptest! {
        #[test]
        fn prop_count_is_monotonic(angles in proptest::collection::vec(0.0f64..180.0, 0..300)) {
            let mut counter = RepetitionCounter::default();
            let mut last = 0;
            for angle in angles {
                let counted = counter.update(angle);
                prop_assert!(counter.count() >= last);
                prop_assert_eq!(counter.count() - last, u32::from(counted));
                last = counter.count();
            }
        }
    }
}
