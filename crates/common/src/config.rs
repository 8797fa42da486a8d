//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RepsenseError, RepsenseResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// User-tunable tracking parameters.
    #[serde(default)]
    pub tracking: TrackingDefaults,
}

/// Tracking parameters a user is expected to adjust.
///
/// Guide-zone geometry and anomaly rules are fixed per session and live in
/// the metrics core's `SessionConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingDefaults {
    /// The user's real hip-to-ankle length in centimeters.
    pub user_hip_to_ankle_cm: f64,

    /// Consecutive frames required before a sit-up stage change is accepted.
    pub debounce_frames: u32,

    /// Torso angle above which the user is lying down (degrees).
    pub situp_down_threshold_deg: f64,

    /// Torso angle below which the user is sitting up (degrees).
    pub situp_up_threshold_deg: f64,

    /// Fraction of the hip-to-ankle span the hip must rise to start a jump.
    pub jump_rise_fraction: f64,

    /// Fraction of the rise threshold under which a landing is detected.
    pub jump_landing_fraction: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "repsense=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for TrackingDefaults {
    fn default() -> Self {
        Self {
            user_hip_to_ankle_cm: 90.0,
            debounce_frames: 3,
            situp_down_threshold_deg: 150.0,
            situp_up_threshold_deg: 90.0,
            jump_rise_fraction: 0.2,
            jump_landing_fraction: 0.3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config");
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> RepsenseResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RepsenseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> RepsenseResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the trackers cannot work with.
    pub fn validate(&self) -> RepsenseResult<()> {
        let t = &self.tracking;
        if t.user_hip_to_ankle_cm.is_nan() || t.user_hip_to_ankle_cm <= 0.0 {
            return Err(RepsenseError::config("user_hip_to_ankle_cm must be positive"));
        }
        if t.debounce_frames == 0 {
            return Err(RepsenseError::config("debounce_frames must be at least 1"));
        }
        if t.situp_up_threshold_deg >= t.situp_down_threshold_deg {
            return Err(RepsenseError::config(format!(
                "situp_up_threshold_deg ({}) must be below situp_down_threshold_deg ({})",
                t.situp_up_threshold_deg, t.situp_down_threshold_deg
            )));
        }
        if t.jump_rise_fraction.is_nan()
            || t.jump_rise_fraction <= 0.0
            || !(0.0..=1.0).contains(&t.jump_landing_fraction)
        {
            return Err(RepsenseError::config(
                "jump fractions must be positive and landing fraction at most 1.0",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("repsense").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracking.user_hip_to_ankle_cm, 90.0);
        assert_eq!(config.tracking.debounce_frames, 3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"tracking":{"user_hip_to_ankle_cm":82.5}}"#).unwrap();
        assert_eq!(config.tracking.user_hip_to_ankle_cm, 82.5);
        assert_eq!(config.tracking.situp_down_threshold_deg, 150.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.tracking.situp_up_threshold_deg = 160.0;
        assert!(matches!(
            config.validate(),
            Err(RepsenseError::Config { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = AppConfig::load_from("/nonexistent/repsense/config.json").unwrap_err();
        assert!(matches!(err, RepsenseError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("repsense-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"logging":{"level":"debug","json":true}}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        std::fs::remove_dir_all(&dir).ok();
    }
}
