//! Posture anomaly rules.
//!
//! A frame is anomalous if any rule's angle falls outside its closed
//! `[low, high]` range. A metric missing from the feature set reads as
//! `0.0`, which is below every default range, so incomplete features always
//! flag an anomaly.

use serde::{Deserialize, Serialize};

use repsense_pose_model::{AngleMetric, FeatureSet};

/// Acceptable closed interval for one angle metric, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRule {
    pub metric: AngleMetric,
    pub low: f64,
    pub high: f64,
}

impl AnomalyRule {
    pub const fn new(metric: AngleMetric, low: f64, high: f64) -> Self {
        Self { metric, low, high }
    }

    /// Whether `features` violates this rule. A non-finite value always does.
    pub fn is_violated(&self, features: &FeatureSet) -> bool {
        let value = features.get_or_zero(self.metric);
        !(self.low..=self.high).contains(&value)
    }

    /// Range midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Default rule set: knees within `[70, 180]`, elbows within `[30, 170]`.
pub const DEFAULT_RULES: [AnomalyRule; 4] = [
    AnomalyRule::new(AngleMetric::LeftKnee, 70.0, 180.0),
    AnomalyRule::new(AngleMetric::RightKnee, 70.0, 180.0),
    AnomalyRule::new(AngleMetric::LeftElbow, 30.0, 170.0),
    AnomalyRule::new(AngleMetric::RightElbow, 30.0, 170.0),
];

pub fn default_rules() -> Vec<AnomalyRule> {
    DEFAULT_RULES.to_vec()
}

/// `true` if any rule is violated.
pub fn check_anomaly(features: &FeatureSet, rules: &[AnomalyRule]) -> bool {
    rules.iter().any(|rule| rule.is_violated(features))
}
