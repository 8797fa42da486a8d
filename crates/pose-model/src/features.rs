//! Per-frame angle features and the published metrics record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::landmark::BodyPart;

/// Named joint-angle metrics, in degrees `[0, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AngleMetric {
    #[serde(rename = "left_knee_angle")]
    LeftKnee,
    #[serde(rename = "right_knee_angle")]
    RightKnee,
    #[serde(rename = "left_elbow_angle")]
    LeftElbow,
    #[serde(rename = "right_elbow_angle")]
    RightElbow,
    #[serde(rename = "left_torso_angle")]
    LeftTorso,
    #[serde(rename = "right_torso_angle")]
    RightTorso,
}

impl AngleMetric {
    pub const ALL: [AngleMetric; 6] = [
        AngleMetric::LeftKnee,
        AngleMetric::RightKnee,
        AngleMetric::LeftElbow,
        AngleMetric::RightElbow,
        AngleMetric::LeftTorso,
        AngleMetric::RightTorso,
    ];

    /// Stable metric name, as used in config files and logs.
    pub fn name(&self) -> &'static str {
        match self {
            AngleMetric::LeftKnee => "left_knee_angle",
            AngleMetric::RightKnee => "right_knee_angle",
            AngleMetric::LeftElbow => "left_elbow_angle",
            AngleMetric::RightElbow => "right_elbow_angle",
            AngleMetric::LeftTorso => "left_torso_angle",
            AngleMetric::RightTorso => "right_torso_angle",
        }
    }

    /// The `(a, vertex, c)` joints whose interior angle at `vertex` this metric measures.
    pub fn joints(&self) -> (BodyPart, BodyPart, BodyPart) {
        use BodyPart::*;
        match self {
            AngleMetric::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            AngleMetric::RightKnee => (RightHip, RightKnee, RightAnkle),
            AngleMetric::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            AngleMetric::RightElbow => (RightShoulder, RightElbow, RightWrist),
            AngleMetric::LeftTorso => (LeftShoulder, LeftHip, LeftKnee),
            AngleMetric::RightTorso => (RightShoulder, RightHip, RightKnee),
        }
    }
}

impl std::fmt::Display for AngleMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Angle measurements derived from a single frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    angles: BTreeMap<AngleMetric, f64>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: AngleMetric, degrees: f64) {
        self.angles.insert(metric, degrees);
    }

    pub fn remove(&mut self, metric: AngleMetric) -> Option<f64> {
        self.angles.remove(&metric)
    }

    pub fn get(&self, metric: AngleMetric) -> Option<f64> {
        self.angles.get(&metric).copied()
    }

    /// Value for `metric`, with a missing metric read as `0.0`.
    pub fn get_or_zero(&self, metric: AngleMetric) -> f64 {
        self.get(metric).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngleMetric, f64)> + '_ {
        self.angles.iter().map(|(m, v)| (*m, *v))
    }
}

impl FromIterator<(AngleMetric, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (AngleMetric, f64)>>(iter: I) -> Self {
        Self {
            angles: iter.into_iter().collect(),
        }
    }
}

/// The externally visible metrics record, refreshed every processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Completed sit-up repetitions this session.
    pub situp_count: u32,

    /// Height of the most recent landed jump, in centimeters (0 before any landing).
    pub jump_height_cm: f64,

    /// Whether the latest processed frame violated any anomaly rule.
    pub anomaly_detected: bool,
}
