//! Per-session frame processing.
//!
//! A [`Session`] owns all running state for one exercise session. Frames
//! must be fed in arrival order, one call per frame: every tracker's next
//! state depends on its previous one.
//!
//! Per detected frame:
//! 1. Derive angle features and evaluate anomaly rules (always).
//! 2. Offer the frame to the calibration gate.
//! 3. If the gate was already open, update the sit-up counter and the jump
//!    tracker. The frame that latches calibration does not feed them.
//! 4. Publish a fresh [`MetricsSnapshot`].
//!
//! A frame with no detection changes nothing and returns the previous
//! snapshot.

use serde::{Deserialize, Serialize};

use repsense_common::config::TrackingDefaults;
use repsense_pose_model::{FeatureSet, LandmarkFrame, MetricsSnapshot};

use crate::angle::{derive_features, torso_angle};
use crate::anomaly::{check_anomaly, default_rules, AnomalyRule};
use crate::calibration::{CalibrationGate, CalibrationState, GateOutcome, GuideZones};
use crate::jump::{JumpConfig, JumpTracker, JumpTrackerState};
use crate::situp::{RepetitionCounter, RepetitionCounterState, SitupConfig};

/// Everything that parameterizes a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub situp: SitupConfig,
    pub jump: JumpConfig,
    pub zones: GuideZones,
    pub rules: Vec<AnomalyRule>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            situp: SitupConfig::default(),
            jump: JumpConfig::default(),
            zones: GuideZones::default(),
            rules: default_rules(),
        }
    }
}

impl SessionConfig {
    /// Default session with the user-tunable values taken from app config.
    pub fn from_tracking(tracking: &TrackingDefaults) -> Self {
        Self {
            situp: SitupConfig {
                down_threshold_deg: tracking.situp_down_threshold_deg,
                up_threshold_deg: tracking.situp_up_threshold_deg,
                debounce_frames: tracking.debounce_frames,
            },
            jump: JumpConfig {
                rise_fraction: tracking.jump_rise_fraction,
                landing_fraction: tracking.jump_landing_fraction,
                user_hip_to_ankle_cm: tracking.user_hip_to_ankle_cm,
            },
            ..Self::default()
        }
    }
}

/// End-of-session (or point-in-time) report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub snapshot: MetricsSnapshot,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub calibration: CalibrationState,
    pub jumps_landed: u32,
}

/// Running state for one exercise session.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    gate: CalibrationGate,
    situps: RepetitionCounter,
    jump: JumpTracker,
    snapshot: MetricsSnapshot,
    last_features: Option<FeatureSet>,
    frames_processed: u64,
    frames_skipped: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            gate: CalibrationGate::new(config.zones),
            situps: RepetitionCounter::new(config.situp),
            jump: JumpTracker::new(config.jump),
            config,
            snapshot: MetricsSnapshot::default(),
            last_features: None,
            frames_processed: 0,
            frames_skipped: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Process one detected frame and return the refreshed snapshot.
    ///
    /// Calling this twice with the same frame advances state twice.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> MetricsSnapshot {
        self.frames_processed += 1;

        let features = derive_features(frame);
        let anomaly_detected = check_anomaly(&features, &self.config.rules);

        if let GateOutcome::Open = self.gate.offer(frame) {
            let span = self.gate.state().span();
            self.situps.update(torso_angle(&features));
            self.jump.update(frame.hip_pixel_y(), span);
        }

        self.snapshot = MetricsSnapshot {
            situp_count: self.situps.count(),
            jump_height_cm: self.jump.jump_height_cm(self.gate.state().span()),
            anomaly_detected,
        };
        self.last_features = Some(features);
        self.snapshot
    }

    /// Record a frame with no detection. No state changes.
    pub fn skip_frame(&mut self) -> MetricsSnapshot {
        self.frames_skipped += 1;
        self.snapshot
    }

    /// Process a frame from a source that may have detected nothing.
    pub fn process(&mut self, frame: Option<&LandmarkFrame>) -> MetricsSnapshot {
        match frame {
            Some(frame) => self.process_frame(frame),
            None => self.skip_frame(),
        }
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot
    }

    /// Angle features from the latest processed frame.
    pub fn last_features(&self) -> Option<&FeatureSet> {
        self.last_features.as_ref()
    }

    pub fn calibration(&self) -> CalibrationState {
        self.gate.state()
    }

    pub fn situp_state(&self) -> RepetitionCounterState {
        self.situps.state()
    }

    pub fn jump_state(&self) -> JumpTrackerState {
        self.jump.state()
    }

    /// Drop calibration so the next framed pose re-latches.
    ///
    /// Jump history is cleared because it is only meaningful against the old
    /// span. The sit-up count is kept.
    pub fn reset_calibration(&mut self) {
        self.gate.reset();
        self.jump.reset();
        self.situps.reset_stage();
        self.snapshot.jump_height_cm = 0.0;
    }

    /// Start a new session with the same configuration.
    pub fn reset(&mut self) {
        tracing::info!(
            situp_count = self.snapshot.situp_count,
            frames = self.frames_processed,
            "Session reset"
        );
        *self = Self::new(self.config.clone());
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            snapshot: self.snapshot,
            frames_processed: self.frames_processed,
            frames_skipped: self.frames_skipped,
            calibration: self.gate.state(),
            jumps_landed: self.jump.jumps_landed(),
        }
    }
}

/// Batch mode: run a closed frame sequence through a fresh session.
///
/// The result carries the final sit-up count, the last computed jump
/// height, and the anomaly flag of the last detected frame.
pub fn analyze_frames<I>(config: SessionConfig, frames: I) -> SessionSummary
where
    I: IntoIterator<Item = Option<LandmarkFrame>>,
{
    let mut session = Session::new(config);
    for frame in frames {
        session.process(frame.as_ref());
    }
    let summary = session.summary();
    tracing::info!(
        situp_count = summary.snapshot.situp_count,
        jump_height_cm = summary.snapshot.jump_height_cm,
        anomaly = summary.snapshot.anomaly_detected,
        processed = summary.frames_processed,
        skipped = summary.frames_skipped,
        "Batch analysis complete"
    );
    summary
}
