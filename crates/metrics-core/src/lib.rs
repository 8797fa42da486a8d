//! RepSense Metrics Core
//!
//! Turns a per-frame stream of body landmarks into exercise metrics:
//! - **Angles:** Interior joint angles from three landmarks
//! - **Anomaly:** Per-angle acceptable ranges checked every frame
//! - **Calibration:** One-shot framing gate that fixes the body scale
//! - **Sit-ups:** Debounced torso-angle state machine counting reps
//! - **Jumps:** Hip-height hysteresis tracker with pixel-to-cm conversion
//!
//! Apart from the [`SharedMetrics`] cell, this crate is pure computation with
//! no I/O and no clocks. Every input, however degenerate, maps to a defined
//! output.

pub mod angle;
pub mod anomaly;
pub mod calibration;
pub mod jump;
pub mod session;
pub mod shared;
pub mod situp;

pub use anomaly::AnomalyRule;
pub use calibration::{CalibrationGate, CalibrationState, GuideZones};
pub use jump::JumpTracker;
pub use session::{analyze_frames, Session, SessionConfig, SessionSummary};
pub use shared::SharedMetrics;
pub use situp::RepetitionCounter;
