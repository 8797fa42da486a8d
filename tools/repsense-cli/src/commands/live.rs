//! Replay a frame stream through the live tracker.
//!
//! The tracker runs on its own task and publishes a snapshot per frame; this
//! task only ever reads through [`SharedMetrics`], the same way a UI or
//! network endpoint would.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use repsense_common::AppConfig;
use repsense_live_tracker::sources::ReplaySource;
use repsense_live_tracker::LiveTracker;
use repsense_metrics_core::{Session, SessionConfig, SharedMetrics};

pub async fn run(
    path: PathBuf,
    realtime: bool,
    poll_ms: u64,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let source = ReplaySource::from_path(&path)
        .map_err(|e| anyhow::anyhow!("Failed to open frame stream: {e}"))?;
    let frame_interval = if realtime { source.frame_interval() } else { None };

    println!("Replaying: {}", path.display());
    println!("  Frames: {}", source.remaining());
    println!(
        "  Pacing: {}",
        match frame_interval {
            Some(interval) => format!("{:.1} ms/frame", interval.as_secs_f64() * 1000.0),
            None => "as fast as possible".to_string(),
        }
    );
    println!("Press Ctrl+C to stop...");
    println!();

    let shared = SharedMetrics::new();
    let session = Session::new(SessionConfig::from_tracking(&config.tracking));
    let mut tracker = LiveTracker::new(Box::new(source), session, shared.clone());
    if let Some(interval) = frame_interval {
        tracker = tracker.with_frame_interval(interval);
    }
    let stop = tracker.stop_flag();

    let mut handle = tokio::spawn(async move {
        let stats = tracker.run().await;
        (stats, tracker.into_session())
    });

    let mut poll = tokio::time::interval(Duration::from_millis(poll_ms.max(1)));
    let mut last_generation = 0;
    let (stats, session) = loop {
        tokio::select! {
            joined = &mut handle => {
                let (stats, session) = joined?;
                break (stats?, session);
            }
            _ = poll.tick() => {
                let (snapshot, generation) = shared.read_with_generation();
                if generation != last_generation {
                    last_generation = generation;
                    println!(
                        "[{generation:>6}] situps={:<3} jump={:>6.1} cm anomaly={}",
                        snapshot.situp_count, snapshot.jump_height_cm, snapshot.anomaly_detected
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopping...");
                stop.store(true, Ordering::SeqCst);
            }
        }
    };

    let summary = session.summary();
    println!();
    println!(
        "Done: {} frames processed, {} skipped, {} source errors",
        stats.frames_processed, stats.frames_skipped, stats.source_errors
    );
    println!("  Sit-ups: {}", summary.snapshot.situp_count);
    println!(
        "  Jump height: {:.1} cm ({} jumps landed)",
        summary.snapshot.jump_height_cm, summary.jumps_landed
    );
    println!("  Anomaly: {}", summary.snapshot.anomaly_detected);

    Ok(())
}
