pub mod analyze;
pub mod config;
pub mod live;
pub mod synth;

use repsense_common::AppConfig;

/// Apply a `--user-cm` override.
pub fn apply_user_cm(config: &mut AppConfig, user_cm: Option<f64>) -> anyhow::Result<()> {
    if let Some(cm) = user_cm {
        if !cm.is_finite() || cm <= 0.0 {
            anyhow::bail!("--user-cm must be a positive length, got {cm}");
        }
        config.tracking.user_hip_to_ankle_cm = cm;
    }
    Ok(())
}
