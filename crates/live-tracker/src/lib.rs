//! RepSense Live Tracker
//!
//! Pulls frames from a pluggable [`FrameSource`] one at a time, runs each
//! through a [`Session`], and publishes the resulting snapshot to a
//! [`SharedMetrics`] handle that other tasks or threads can read at any time.
//!
//! Sources:
//! - **Replay:** A recorded JSONL frame stream, optionally paced to its fps
//! - Any external pose pipeline implementing [`FrameSource`]

pub mod sources;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use repsense_common::error::{RepsenseError, RepsenseResult};
use repsense_metrics_core::{Session, SharedMetrics};
use repsense_pose_model::LandmarkFrame;

/// What a source produced for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFrame {
    /// A subject was detected.
    Detected(LandmarkFrame),
    /// A frame was captured but no subject was detected in it.
    NoDetection,
    /// The source has no more frames.
    EndOfStream,
}

/// Trait for frame sources.
pub trait FrameSource: Send {
    /// Produce the next frame.
    fn next_frame(&mut self) -> RepsenseResult<SourceFrame>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveStats {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub source_errors: u64,
}

/// Give up after this many source errors in a row.
const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 30;

/// Drives a session from a frame source.
pub struct LiveTracker {
    source: Box<dyn FrameSource>,
    session: Session,
    shared: SharedMetrics,
    frame_interval: Option<Duration>,
    max_consecutive_errors: u32,
    stop_flag: Arc<AtomicBool>,
    recalibrate_flag: Arc<AtomicBool>,
    stats: LiveStats,
}

impl LiveTracker {
    pub fn new(source: Box<dyn FrameSource>, session: Session, shared: SharedMetrics) -> Self {
        Self {
            source,
            session,
            shared,
            frame_interval: None,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
            stop_flag: Arc::new(AtomicBool::new(false)),
            recalibrate_flag: Arc::new(AtomicBool::new(false)),
            stats: LiveStats::default(),
        }
    }

    /// Wait this long between frames (real-time playback).
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval).filter(|i| !i.is_zero());
        self
    }

    pub fn with_max_consecutive_errors(mut self, max: u32) -> Self {
        self.max_consecutive_errors = max.max(1);
        self
    }

    /// Run until the source ends or the stop flag is set.
    pub async fn run(&mut self) -> RepsenseResult<LiveStats> {
        tracing::info!(source = %self.source.name(), "Live tracker started");

        let mut ticker = self.frame_interval.map(|interval| {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker
        });
        let mut consecutive_errors = 0u32;

        while !self.stop_flag.load(Ordering::Relaxed) {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }

            if self.recalibrate_flag.swap(false, Ordering::SeqCst) {
                tracing::info!("Recalibration requested");
                self.session.reset_calibration();
                self.shared.publish(self.session.snapshot());
            }

            let snapshot = match self.source.next_frame() {
                Ok(SourceFrame::Detected(frame)) => {
                    consecutive_errors = 0;
                    self.stats.frames_processed += 1;
                    self.session.process_frame(&frame)
                }
                Ok(SourceFrame::NoDetection) => {
                    consecutive_errors = 0;
                    self.stats.frames_skipped += 1;
                    self.session.skip_frame()
                }
                Ok(SourceFrame::EndOfStream) => break,
                Err(e) => {
                    self.stats.source_errors += 1;
                    consecutive_errors += 1;
                    tracing::warn!(error = %e, consecutive_errors, "Frame source error");
                    if consecutive_errors >= self.max_consecutive_errors {
                        return Err(RepsenseError::frame_source(format!(
                            "{} consecutive errors from {}, last: {e}",
                            consecutive_errors,
                            self.source.name()
                        )));
                    }
                    self.stats.frames_skipped += 1;
                    self.session.skip_frame()
                }
            };
            self.shared.publish(snapshot);

            if ticker.is_none() {
                tokio::task::yield_now().await;
            }
        }

        tracing::info!(
            processed = self.stats.frames_processed,
            skipped = self.stats.frames_skipped,
            errors = self.stats.source_errors,
            "Live tracker stopped"
        );
        Ok(self.stats)
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Flag that makes the loop drop calibration before its next frame.
    pub fn recalibrate_flag(&self) -> Arc<AtomicBool> {
        self.recalibrate_flag.clone()
    }

    pub fn shared(&self) -> SharedMetrics {
        self.shared.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn stats(&self) -> LiveStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use repsense_pose_model::{BodyPart, Landmark, Skeleton};

    struct ScriptedSource {
        frames: VecDeque<RepsenseResult<SourceFrame>>,
    }

    impl ScriptedSource {
        fn boxed(frames: Vec<RepsenseResult<SourceFrame>>) -> Box<dyn FrameSource> {
            Box::new(Self {
                frames: frames.into(),
            })
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> RepsenseResult<SourceFrame> {
            self.frames.pop_front().unwrap_or(Ok(SourceFrame::EndOfStream))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn framed() -> LandmarkFrame {
        let skeleton = Skeleton::default()
            .with(BodyPart::Nose, Landmark::new(0.5, 0.125))
            .with(BodyPart::LeftHip, Landmark::new(0.45, 0.5))
            .with(BodyPart::RightHip, Landmark::new(0.55, 0.5))
            .with(BodyPart::LeftAnkle, Landmark::new(0.45, 0.875))
            .with(BodyPart::RightAnkle, Landmark::new(0.55, 0.875));
        LandmarkFrame::new(1280, 720, skeleton)
    }

    #[tokio::test]
    async fn test_runs_to_end_of_stream() {
        let source = ScriptedSource::boxed(vec![
            Ok(SourceFrame::NoDetection),
            Ok(SourceFrame::Detected(framed())),
            Ok(SourceFrame::Detected(framed())),
        ]);
        let shared = SharedMetrics::new();
        let mut tracker = LiveTracker::new(source, Session::default(), shared.clone());

        let stats = tracker.run().await.unwrap();
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_skipped, 1);
        assert!(tracker.session().calibration().is_calibrated);

        let (snapshot, generation) = shared.read_with_generation();
        assert_eq!(generation, 3);
        assert_eq!(snapshot, tracker.session().snapshot());
    }

    #[tokio::test]
    async fn test_source_errors_are_skipped() {
        let source = ScriptedSource::boxed(vec![
            Err(RepsenseError::frame_source("dropped frame")),
            Ok(SourceFrame::Detected(framed())),
        ]);
        let mut tracker = LiveTracker::new(source, Session::default(), SharedMetrics::new());

        let stats = tracker.run().await.unwrap();
        assert_eq!(stats.source_errors, 1);
        assert_eq!(stats.frames_skipped, 1);
        assert_eq!(stats.frames_processed, 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_consecutive_errors() {
        let source = ScriptedSource::boxed(
            (0..5)
                .map(|_| Err(RepsenseError::frame_source("camera gone")))
                .collect(),
        );
        let mut tracker = LiveTracker::new(source, Session::default(), SharedMetrics::new())
            .with_max_consecutive_errors(3);

        let err = tracker.run().await.unwrap_err();
        assert!(matches!(err, RepsenseError::FrameSource { .. }));
        assert_eq!(tracker.stats().source_errors, 3);
    }

    #[tokio::test]
    async fn test_stop_flag_halts_before_first_frame() {
        let source = ScriptedSource::boxed(vec![Ok(SourceFrame::Detected(framed()))]);
        let mut tracker = LiveTracker::new(source, Session::default(), SharedMetrics::new());
        tracker.stop();

        let stats = tracker.run().await.unwrap();
        assert_eq!(stats, LiveStats::default());
    }

    #[tokio::test]
    async fn test_recalibrate_flag_resets_gate() {
        let source = ScriptedSource::boxed(vec![Ok(SourceFrame::Detected(framed()))]);
        let mut tracker = LiveTracker::new(source, Session::default(), SharedMetrics::new());
        tracker.run().await.unwrap();
        assert!(tracker.session().calibration().is_calibrated);

        tracker.recalibrate_flag().store(true, Ordering::SeqCst);
        tracker.run().await.unwrap();
        assert!(!tracker.session().calibration().is_calibrated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_playback_waits_between_frames() {
        let source = ScriptedSource::boxed(vec![
            Ok(SourceFrame::NoDetection),
            Ok(SourceFrame::NoDetection),
            Ok(SourceFrame::NoDetection),
        ]);
        let mut tracker = LiveTracker::new(source, Session::default(), SharedMetrics::new())
            .with_frame_interval(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        tracker.run().await.unwrap();
        // First tick is immediate; one more tick per frame after it.
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
