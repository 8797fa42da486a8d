//! Joint angle geometry.

use repsense_pose_model::{AngleMetric, FeatureSet, Landmark, LandmarkFrame};

/// Interior angle at `b` between rays `b→a` and `b→c`, in degrees `[0, 180]`.
///
/// Uses `atan2(cross, dot)`, which stays accurate near 0° and 180° where
/// `acos` loses precision. Returns `0.0` when either ray has zero length or
/// a coordinate is not finite.
pub fn angle_at(a: Landmark, b: Landmark, c: Landmark) -> f64 {
    let (v1x, v1y) = (a.x - b.x, a.y - b.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);

    let mag1 = v1x.hypot(v1y);
    let mag2 = v2x.hypot(v2y);
    let product = mag1 * mag2;
    if product == 0.0 || !product.is_finite() {
        return 0.0;
    }

    let dot = v1x * v2x + v1y * v2y;
    let cross = v1x * v2y - v1y * v2x;
    cross.atan2(dot).to_degrees().abs()
}

/// Angle for a named metric in a frame.
pub fn metric_angle(frame: &LandmarkFrame, metric: AngleMetric) -> f64 {
    let (a, b, c) = metric.joints();
    angle_at(frame.landmark(a), frame.landmark(b), frame.landmark(c))
}

/// Every [`AngleMetric`] for a frame.
pub fn derive_features(frame: &LandmarkFrame) -> FeatureSet {
    AngleMetric::ALL
        .into_iter()
        .map(|metric| (metric, metric_angle(frame, metric)))
        .collect()
}

/// Mean of the left and right shoulder-hip-knee angles.
pub fn torso_angle(features: &FeatureSet) -> f64 {
    (features.get_or_zero(AngleMetric::LeftTorso) + features.get_or_zero(AngleMetric::RightTorso))
        / 2.0
}
