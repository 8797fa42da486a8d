//! Batch analysis of a recorded frame stream.

use std::path::PathBuf;

use repsense_common::AppConfig;
use repsense_metrics_core::{analyze_frames, SessionConfig};
use repsense_pose_model::parse_frame_stream;

pub fn run(path: PathBuf, json: bool, config: &AppConfig) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let stream = parse_frame_stream(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse frame stream: {e}"))?;

    tracing::debug!(
        records = stream.records.len(),
        detected = stream.detected_count(),
        "Frame stream loaded"
    );

    let summary = analyze_frames(SessionConfig::from_tracking(&config.tracking), stream.frames());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Analyzed: {}", path.display());
    println!(
        "  Source: {}x{} @ {}fps",
        stream.header.width, stream.header.height, stream.header.fps
    );
    println!(
        "  Frames: {} processed, {} without detection",
        summary.frames_processed, summary.frames_skipped
    );
    match summary.calibration.span() {
        Some(span) => println!("  Calibration: {span} px hip-to-ankle"),
        None => println!("  Calibration: never latched (subject not framed)"),
    }
    println!();

    println!("Results:");
    println!("  Sit-ups: {}", summary.snapshot.situp_count);
    println!(
        "  Jump height: {:.1} cm ({} jumps landed)",
        summary.snapshot.jump_height_cm, summary.jumps_landed
    );
    println!(
        "  Posture anomaly on last frame: {}",
        if summary.snapshot.anomaly_detected { "yes" } else { "no" }
    );

    Ok(())
}
