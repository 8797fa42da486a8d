//! Body landmark types.
//!
//! A [`LandmarkFrame`] is the per-frame input to the metrics core. It is
//! ephemeral: the core derives its features from it and never retains it.

use serde::{Deserialize, Serialize};

/// The closed set of body parts the metrics core consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const ALL: [BodyPart; 13] = [
        BodyPart::Nose,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];
}

/// A single normalized 2-D joint position.
///
/// `(0.0, 0.0)` is the top-left of the source frame; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel position, truncated toward zero.
    pub fn pixel_x(&self, width: u32) -> i32 {
        to_pixel(self.x, width)
    }

    /// Vertical pixel position, truncated toward zero.
    pub fn pixel_y(&self, height: u32) -> i32 {
        to_pixel(self.y, height)
    }
}

/// Convert a normalized coordinate to an integer pixel, truncating toward zero.
pub fn to_pixel(normalized: f64, extent: u32) -> i32 {
    (normalized * extent as f64) as i32
}

/// One landmark per [`BodyPart`].
///
/// Every part is always present, so lookups cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Skeleton {
    pub nose: Landmark,
    pub left_shoulder: Landmark,
    pub right_shoulder: Landmark,
    pub left_elbow: Landmark,
    pub right_elbow: Landmark,
    pub left_wrist: Landmark,
    pub right_wrist: Landmark,
    pub left_hip: Landmark,
    pub right_hip: Landmark,
    pub left_knee: Landmark,
    pub right_knee: Landmark,
    pub left_ankle: Landmark,
    pub right_ankle: Landmark,
}

impl Skeleton {
    /// Look up a landmark by part.
    pub fn get(&self, part: BodyPart) -> Landmark {
        match part {
            BodyPart::Nose => self.nose,
            BodyPart::LeftShoulder => self.left_shoulder,
            BodyPart::RightShoulder => self.right_shoulder,
            BodyPart::LeftElbow => self.left_elbow,
            BodyPart::RightElbow => self.right_elbow,
            BodyPart::LeftWrist => self.left_wrist,
            BodyPart::RightWrist => self.right_wrist,
            BodyPart::LeftHip => self.left_hip,
            BodyPart::RightHip => self.right_hip,
            BodyPart::LeftKnee => self.left_knee,
            BodyPart::RightKnee => self.right_knee,
            BodyPart::LeftAnkle => self.left_ankle,
            BodyPart::RightAnkle => self.right_ankle,
        }
    }

    /// Mutable access by part, for building skeletons programmatically.
    pub fn get_mut(&mut self, part: BodyPart) -> &mut Landmark {
        match part {
            BodyPart::Nose => &mut self.nose,
            BodyPart::LeftShoulder => &mut self.left_shoulder,
            BodyPart::RightShoulder => &mut self.right_shoulder,
            BodyPart::LeftElbow => &mut self.left_elbow,
            BodyPart::RightElbow => &mut self.right_elbow,
            BodyPart::LeftWrist => &mut self.left_wrist,
            BodyPart::RightWrist => &mut self.right_wrist,
            BodyPart::LeftHip => &mut self.left_hip,
            BodyPart::RightHip => &mut self.right_hip,
            BodyPart::LeftKnee => &mut self.left_knee,
            BodyPart::RightKnee => &mut self.right_knee,
            BodyPart::LeftAnkle => &mut self.left_ankle,
            BodyPart::RightAnkle => &mut self.right_ankle,
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, part: BodyPart, landmark: Landmark) -> Self {
        *self.get_mut(part) = landmark;
        self
    }
}

/// All landmarks detected in one frame plus the frame's pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkFrame {
    pub width: u32,
    pub height: u32,
    pub skeleton: Skeleton,
}

impl LandmarkFrame {
    pub fn new(width: u32, height: u32, skeleton: Skeleton) -> Self {
        Self {
            width,
            height,
            skeleton,
        }
    }

    /// Landmark for a body part.
    pub fn landmark(&self, part: BodyPart) -> Landmark {
        self.skeleton.get(part)
    }

    /// Pixel y of a single part.
    pub fn pixel_y(&self, part: BodyPart) -> i32 {
        self.landmark(part).pixel_y(self.height)
    }

    /// Pixel x of a single part.
    pub fn pixel_x(&self, part: BodyPart) -> i32 {
        self.landmark(part).pixel_x(self.width)
    }

    /// Pixel y of the midpoint of two parts (normalized average, then scaled).
    pub fn mid_pixel_y(&self, a: BodyPart, b: BodyPart) -> i32 {
        let y = (self.landmark(a).y + self.landmark(b).y) / 2.0;
        to_pixel(y, self.height)
    }

    /// Pixel y of the hip midpoint.
    pub fn hip_pixel_y(&self) -> i32 {
        self.mid_pixel_y(BodyPart::LeftHip, BodyPart::RightHip)
    }

    /// Pixel y of the ankle midpoint.
    pub fn ankle_pixel_y(&self) -> i32 {
        self.mid_pixel_y(BodyPart::LeftAnkle, BodyPart::RightAnkle)
    }
}
