//! Vertical jump tracking.
//!
//! The signal is the hip midpoint's pixel y. Screen y grows downward, so a
//! jump shows up as the hip y *decreasing* below the standing baseline.
//!
//! - In `Down`, the baseline (`max_hip_pixel_y`) follows the lowest hip
//!   position seen. When the hip rises more than the rise threshold above
//!   it, the tracker enters `Up`.
//! - In `Up`, the apex (`min_hip_pixel_y`) follows the highest hip position.
//!   When the hip comes back within `landing_fraction` of the rise threshold
//!   of the baseline, the jump height is recorded and both extrema restart
//!   from the landing sample.
//!
//! Both thresholds scale with the calibrated hip-to-ankle span; without a
//! positive span the tracker is inert.

use serde::{Deserialize, Serialize};

/// Jump detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpConfig {
    /// Rise threshold as a fraction of the hip-to-ankle pixel span.
    pub rise_fraction: f64,
    /// Landing threshold as a fraction of the rise threshold.
    pub landing_fraction: f64,
    /// The user's real hip-to-ankle length in centimeters.
    pub user_hip_to_ankle_cm: f64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            rise_fraction: 0.2,
            landing_fraction: 0.3,
            user_hip_to_ankle_cm: 90.0,
        }
    }
}

/// Jump stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpStage {
    /// Standing on the ground.
    #[default]
    Down,
    /// Airborne.
    Up,
}

/// Running state of the tracker.
///
/// Extrema are `None` until the first sample after calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JumpTrackerState {
    pub stage: JumpStage,
    pub min_hip_pixel_y: Option<i32>,
    pub max_hip_pixel_y: Option<i32>,
    pub last_jump_height_pixels: Option<i32>,
}

/// Hip-height hysteresis tracker.
#[derive(Debug, Clone, Default)]
pub struct JumpTracker {
    config: JumpConfig,
    state: JumpTrackerState,
    jumps_landed: u32,
}

impl JumpTracker {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            config,
            state: JumpTrackerState::default(),
            jumps_landed: 0,
        }
    }

    pub fn state(&self) -> JumpTrackerState {
        self.state
    }

    pub fn stage(&self) -> JumpStage {
        self.state.stage
    }

    /// Number of landings recorded this session.
    pub fn jumps_landed(&self) -> u32 {
        self.jumps_landed
    }

    /// Rise threshold in pixels, truncated, for a calibrated span.
    pub fn rise_threshold_px(&self, span_px: i32) -> i32 {
        (self.config.rise_fraction * span_px as f64) as i32
    }

    /// Feed one hip sample.
    ///
    /// `span_px` is the calibrated hip-to-ankle span. With no span, or a
    /// non-positive one, the sample is ignored and state is left untouched.
    /// Returns the jump height in pixels if this sample was a landing.
    pub fn update(&mut self, hip_pixel_y: i32, span_px: Option<i32>) -> Option<i32> {
        let span_px = span_px.filter(|span| *span > 0)?;
        let rise_threshold = self.rise_threshold_px(span_px);
        let landing_threshold = rise_threshold as f64 * self.config.landing_fraction;

        let s = &mut self.state;
        let (mut min_y, mut max_y) = match (s.min_hip_pixel_y, s.max_hip_pixel_y) {
            (Some(min_y), Some(max_y)) => (min_y, max_y),
            _ => (hip_pixel_y, hip_pixel_y),
        };

        let mut landed = None;
        match s.stage {
            JumpStage::Down => {
                max_y = max_y.max(hip_pixel_y);
                min_y = hip_pixel_y;
                if max_y.saturating_sub(hip_pixel_y) > rise_threshold {
                    tracing::debug!(hip_pixel_y, baseline = max_y, rise_threshold, "Jump takeoff");
                    s.stage = JumpStage::Up;
                }
            }
            JumpStage::Up => {
                min_y = min_y.min(hip_pixel_y);
                if (max_y.saturating_sub(hip_pixel_y) as f64) < landing_threshold {
                    let height = max_y.saturating_sub(min_y);
                    tracing::debug!(height_px = height, apex = min_y, baseline = max_y, "Jump landed");
                    s.last_jump_height_pixels = Some(height);
                    s.stage = JumpStage::Down;
                    min_y = hip_pixel_y;
                    max_y = hip_pixel_y;
                    landed = Some(height);
                }
            }
        }

        s.min_hip_pixel_y = Some(min_y);
        s.max_hip_pixel_y = Some(max_y);
        if landed.is_some() {
            self.jumps_landed += 1;
        }
        landed
    }

    /// Most recent jump height converted to centimeters.
    ///
    /// `0.0` before the first landing or without a positive span.
    pub fn jump_height_cm(&self, span_px: Option<i32>) -> f64 {
        match (self.state.last_jump_height_pixels, span_px) {
            (Some(height_px), Some(span_px)) if span_px > 0 => {
                height_px as f64 * (self.config.user_hip_to_ankle_cm / span_px as f64)
            }
            _ => 0.0,
        }
    }

    /// Back to the start-of-session state.
    pub fn reset(&mut self) {
        self.state = JumpTrackerState::default();
        self.jumps_landed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPAN: Option<i32> = Some(72);

    fn feed(tracker: &mut JumpTracker, samples: &[i32], span: Option<i32>) -> Vec<i32> {
        samples
            .iter()
            .filter_map(|y| tracker.update(*y, span))
            .collect()
    }

    #[test]
    fn test_rise_threshold_truncates() {
        let tracker = JumpTracker::default();
        assert_eq!(tracker.rise_threshold_px(72), 14);
        assert_eq!(tracker.rise_threshold_px(270), 54);
    }

    #[test]
    fn test_single_jump_height() {
        let mut tracker = JumpTracker::default();
        let landings = feed(&mut tracker, &[360, 300, 260, 300, 360], SPAN);

        assert_eq!(landings, vec![100]);
        assert_eq!(tracker.stage(), JumpStage::Down);
        assert_eq!(tracker.state().last_jump_height_pixels, Some(100));
        assert_eq!(tracker.state().min_hip_pixel_y, Some(360));
        assert_eq!(tracker.state().max_hip_pixel_y, Some(360));
        assert!((tracker.jump_height_cm(SPAN) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_samples_saturate() {
        let mut tracker = JumpTracker::default();
        let landings = feed(&mut tracker, &[360, i32::MIN, 360], SPAN);
        assert_eq!(landings, vec![i32::MAX]);
        assert!(tracker.jump_height_cm(SPAN).is_finite());

        let mut tracker = JumpTracker::default();
        assert!(feed(&mut tracker, &[i32::MAX, i32::MIN, i32::MAX, 0], SPAN)
            .iter()
            .all(|height| *height >= 0));
    }

    #[test]
    fn test_stage_sequence() {
        let mut tracker = JumpTracker::default();
        let mut stages = vec![];
        for y in [360, 300, 260, 300, 360] {
            tracker.update(y, SPAN);
            stages.push(tracker.stage());
        }
        use JumpStage::*;
        assert_eq!(stages, vec![Down, Up, Up, Up, Down]);
    }

    #[test]
    fn test_small_bob_is_not_a_jump() {
        let mut tracker = JumpTracker::default();
        let landings = feed(&mut tracker, &[360, 350, 347, 355, 360], SPAN);
        assert!(landings.is_empty());
        assert_eq!(tracker.stage(), JumpStage::Down);
        assert_eq!(tracker.jump_height_cm(SPAN), 0.0);
    }

    #[test]
    fn test_baseline_follows_lowest_standing_position() {
        let mut tracker = JumpTracker::default();
        // Crouch before takeoff lowers the baseline to 380.
        let landings = feed(&mut tracker, &[360, 380, 340, 300, 378], SPAN);
        assert_eq!(landings, vec![80]);
    }

    #[test]
    fn test_uncalibrated_is_inert() {
        let mut tracker = JumpTracker::default();
        assert!(feed(&mut tracker, &[360, 300, 260, 300, 360], None).is_empty());
        assert_eq!(tracker.state(), JumpTrackerState::default());

        assert!(feed(&mut tracker, &[360, 300, 260, 300, 360], Some(0)).is_empty());
        assert_eq!(tracker.state(), JumpTrackerState::default());
        assert_eq!(tracker.jump_height_cm(Some(0)), 0.0);
        assert_eq!(tracker.jump_height_cm(None), 0.0);
    }

    #[test]
    fn test_last_height_is_kept_between_jumps() {
        let mut tracker = JumpTracker::default();
        feed(&mut tracker, &[360, 300, 260, 300, 360], SPAN);
        feed(&mut tracker, &[360, 361, 359], SPAN);
        assert_eq!(tracker.state().last_jump_height_pixels, Some(100));

        let landings = feed(&mut tracker, &[330, 310, 340, 359], SPAN);
        assert_eq!(landings, vec![51]);
        assert_eq!(tracker.jumps_landed(), 2);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tracker = JumpTracker::default();
        feed(&mut tracker, &[360, 300, 260, 300, 360], SPAN);
        tracker.reset();
        assert_eq!(tracker.state(), JumpTrackerState::default());
        assert_eq!(tracker.jumps_landed(), 0);
        assert_eq!(tracker.jump_height_cm(SPAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_jump_height_non_negative(
            samples in proptest::collection::vec(0i32..720, 0..400),
            span in 1i32..400,
        ) {
            let mut tracker = JumpTracker::default();
            for y in samples {
                if let Some(height) = tracker.update(y, Some(span)) {
                    prop_assert!(height >= 0);
                }
                if let Some(height) = tracker.state().last_jump_height_pixels {
                    prop_assert!(height >= 0);
                }
                prop_assert!(tracker.jump_height_cm(Some(span)) >= 0.0);
            }
        }
    }
}
