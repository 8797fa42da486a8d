//! Synthetic workout frame streams.
//!
//! Layout: a few frames with no subject, one framed standing pose that
//! latches calibration, the requested sit-ups (lying then sitting, with a
//! dropped detection between reps), then the requested jumps from a
//! standing baseline.

use std::path::PathBuf;

use repsense_pose_model::{
    serialize_frame_stream, BodyPart, FrameRecord, FrameStream, FrameStreamHeader, Landmark,
    Skeleton,
};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FPS: f64 = 30.0;

/// Standing hip height in pixels.
const HIP_BASELINE_PX: u32 = 360;

/// Frames held per sit-up phase; must exceed the default debounce.
const HOLD_FRAMES: usize = 4;

pub fn run(output: PathBuf, situps: u32, jumps: u32, jump_px: u32) -> anyhow::Result<()> {
    let mut stream = generate(situps, jumps, jump_px);
    stream.header.recorded_at = Some(chrono::Utc::now().to_rfc3339());

    let jsonl = serialize_frame_stream(&stream)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, jsonl)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!("Wrote {} frames to {}", stream.records.len(), output.display());
    println!("  Sit-ups: {situps}");
    println!("  Jumps: {jumps} x {jump_px} px");
    Ok(())
}

/// Build the stream without touching the filesystem.
pub fn generate(situps: u32, jumps: u32, jump_px: u32) -> FrameStream {
    let mut poses: Vec<Option<Skeleton>> = vec![None, None];
    poses.push(Some(standing()));

    for _ in 0..situps {
        poses.extend(std::iter::repeat(Some(lying())).take(HOLD_FRAMES));
        poses.push(None);
        poses.extend(std::iter::repeat(Some(sitting())).take(HOLD_FRAMES));
    }

    let apex = HIP_BASELINE_PX.saturating_sub(jump_px);
    let half = HIP_BASELINE_PX.saturating_sub(jump_px / 2);
    for _ in 0..jumps {
        for hip_px in [HIP_BASELINE_PX, HIP_BASELINE_PX, half, apex, half, HIP_BASELINE_PX] {
            poses.push(Some(with_hip_px(standing(), hip_px)));
        }
    }
    poses.push(Some(standing()));

    let mut stream = FrameStream::new(FrameStreamHeader::new(WIDTH, HEIGHT, FPS));
    stream.records = poses
        .into_iter()
        .enumerate()
        .map(|(i, pose)| match pose {
            Some(skeleton) => FrameRecord::detected(i as u64, skeleton),
            None => FrameRecord::missing(i as u64),
        })
        .collect();
    stream
}

/// Upright pose inside both guides.
fn standing() -> Skeleton {
    Skeleton::default()
        .with(BodyPart::Nose, Landmark::new(0.5, 0.125))
        .with(BodyPart::LeftShoulder, Landmark::new(0.45, 0.25))
        .with(BodyPart::RightShoulder, Landmark::new(0.55, 0.25))
        .with(BodyPart::LeftElbow, Landmark::new(0.40, 0.375))
        .with(BodyPart::RightElbow, Landmark::new(0.60, 0.375))
        .with(BodyPart::LeftWrist, Landmark::new(0.45, 0.5))
        .with(BodyPart::RightWrist, Landmark::new(0.55, 0.5))
        .with(BodyPart::LeftHip, Landmark::new(0.45, 0.5))
        .with(BodyPart::RightHip, Landmark::new(0.55, 0.5))
        .with(BodyPart::LeftKnee, Landmark::new(0.45, 0.6875))
        .with(BodyPart::RightKnee, Landmark::new(0.55, 0.6875))
        .with(BodyPart::LeftAnkle, Landmark::new(0.45, 0.875))
        .with(BodyPart::RightAnkle, Landmark::new(0.55, 0.875))
}

/// Shoulder, hip, and knee level: torso angle 180°.
fn lying() -> Skeleton {
    with_torso(Landmark::new(0.3, 0.5))
}

/// Shoulder forward over the knees: torso angle about 63°.
fn sitting() -> Skeleton {
    with_torso(Landmark::new(0.6, 0.3))
}

fn with_torso(shoulder: Landmark) -> Skeleton {
    let hip = Landmark::new(0.5, 0.5);
    let knee = Landmark::new(0.7, 0.5);
    standing()
        .with(BodyPart::LeftShoulder, shoulder)
        .with(BodyPart::RightShoulder, shoulder)
        .with(BodyPart::LeftHip, hip)
        .with(BodyPart::RightHip, hip)
        .with(BodyPart::LeftKnee, knee)
        .with(BodyPart::RightKnee, knee)
}

fn with_hip_px(skeleton: Skeleton, hip_px: u32) -> Skeleton {
    // Centered in the pixel row so truncation lands on `hip_px`.
    let y = (hip_px as f64 + 0.5) / HEIGHT as f64;
    skeleton
        .with(BodyPart::LeftHip, Landmark::new(0.45, y))
        .with(BodyPart::RightHip, Landmark::new(0.55, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repsense_metrics_core::{analyze_frames, SessionConfig};
    use repsense_pose_model::parse_frame_stream;

    #[test]
    fn test_generated_stream_counts_back() {
        let stream = generate(4, 2, 80);
        let summary = analyze_frames(SessionConfig::default(), stream.frames());

        assert_eq!(summary.calibration.span(), Some(270));
        assert_eq!(summary.snapshot.situp_count, 4);
        assert_eq!(summary.jumps_landed, 2);
        // 80 px at 90 cm per 270 px.
        assert!((summary.snapshot.jump_height_cm - 80.0 * 90.0 / 270.0).abs() < 1e-9);
        assert!(!summary.snapshot.anomaly_detected);
        assert_eq!(summary.frames_skipped, 2 + 4);
    }

    #[test]
    fn test_small_jumps_stay_below_threshold() {
        // Rise threshold is 20% of 270 px.
        let stream = generate(0, 3, 50);
        let summary = analyze_frames(SessionConfig::default(), stream.frames());
        assert_eq!(summary.jumps_landed, 0);
        assert_eq!(summary.snapshot.jump_height_cm, 0.0);
    }

    #[test]
    fn test_stream_survives_serialization() {
        let stream = generate(1, 1, 80);
        let jsonl = serialize_frame_stream(&stream).unwrap();
        let parsed = parse_frame_stream(&jsonl).unwrap();
        assert_eq!(parsed.records.len(), stream.records.len());
        assert_eq!(parsed.detected_count(), stream.detected_count());
    }

    #[test]
    fn test_hip_px_truncates_exactly() {
        for hip_px in [0, 1, 280, 300, 359, 360, 719] {
            let skeleton = with_hip_px(standing(), hip_px);
            assert_eq!(skeleton.get(BodyPart::LeftHip).pixel_y(HEIGHT), hip_px as i32);
        }
    }
}
