//! Framing check and body-scale calibration.
//!
//! Until the subject stands with the nose inside the head guide and both
//! ankles inside the foot guide, the rep counter and jump tracker receive no
//! samples. On the first frame that satisfies all three conditions the gate
//! latches the hip-to-ankle pixel span and stays latched for the session.

use serde::{Deserialize, Serialize};

use repsense_pose_model::{to_pixel, BodyPart, LandmarkFrame};

/// A guide rectangle expressed as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ZoneBounds {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Pixel rectangle `(left, top, right, bottom)` for a frame size.
    pub fn to_pixels(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        (
            to_pixel(self.left, width),
            to_pixel(self.top, height),
            to_pixel(self.right, width),
            to_pixel(self.bottom, height),
        )
    }

    /// Whether a body part's pixel position lies inside the zone (edges included).
    pub fn contains(&self, frame: &LandmarkFrame, part: BodyPart) -> bool {
        let (left, top, right, bottom) = self.to_pixels(frame.width, frame.height);
        let x = frame.pixel_x(part);
        let y = frame.pixel_y(part);
        (left..=right).contains(&x) && (top..=bottom).contains(&y)
    }
}

/// Where the head and feet must be for calibration to latch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideZones {
    pub head: ZoneBounds,
    pub feet: ZoneBounds,
}

impl Default for GuideZones {
    fn default() -> Self {
        Self {
            head: ZoneBounds::new(0.40, 0.60, 0.05, 0.20),
            feet: ZoneBounds::new(0.35, 0.65, 0.80, 0.95),
        }
    }
}

impl GuideZones {
    /// Nose in the head zone and both ankles in the foot zone.
    pub fn is_framed(&self, frame: &LandmarkFrame) -> bool {
        self.head.contains(frame, BodyPart::Nose)
            && self.feet.contains(frame, BodyPart::LeftAnkle)
            && self.feet.contains(frame, BodyPart::RightAnkle)
    }
}

/// Calibration result.
///
/// `hip_to_ankle_pixel_span` is only ever `Some` with a positive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalibrationState {
    pub is_calibrated: bool,
    pub hip_to_ankle_pixel_span: Option<i32>,
}

impl CalibrationState {
    /// The latched span, if calibrated.
    pub fn span(&self) -> Option<i32> {
        self.hip_to_ankle_pixel_span.filter(|span| *span > 0)
    }
}

/// Outcome of offering a frame to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Not yet calibrated; downstream trackers must not update.
    Waiting,
    /// This frame latched calibration; downstream trackers start next frame.
    Latched { span_px: i32 },
    /// Already calibrated; pass the frame through.
    Open,
}

/// One-shot calibration latch.
#[derive(Debug, Clone, Default)]
pub struct CalibrationGate {
    zones: GuideZones,
    state: CalibrationState,
}

impl CalibrationGate {
    pub fn new(zones: GuideZones) -> Self {
        Self {
            zones,
            state: CalibrationState::default(),
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn zones(&self) -> &GuideZones {
        &self.zones
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.is_calibrated
    }

    /// Offer a frame to the gate.
    ///
    /// Once latched this is a no-op returning [`GateOutcome::Open`]. A framed
    /// pose whose ankles are not below the hips does not latch.
    pub fn offer(&mut self, frame: &LandmarkFrame) -> GateOutcome {
        if self.state.is_calibrated {
            return GateOutcome::Open;
        }
        if !self.zones.is_framed(frame) {
            return GateOutcome::Waiting;
        }

        let span_px = frame.ankle_pixel_y().saturating_sub(frame.hip_pixel_y());
        if span_px <= 0 {
            tracing::debug!(span_px, "Framed pose has non-positive hip-to-ankle span, not latching");
            return GateOutcome::Waiting;
        }

        self.state = CalibrationState {
            is_calibrated: true,
            hip_to_ankle_pixel_span: Some(span_px),
        };
        tracing::info!(span_px, width = frame.width, height = frame.height, "Calibration latched");
        GateOutcome::Latched { span_px }
    }

    /// Return to the uncalibrated state.
    pub fn reset(&mut self) {
        if self.state.is_calibrated {
            tracing::info!("Calibration reset");
        }
        self.state = CalibrationState::default();
    }
}
