//! Thread-safe handle to the latest metrics.
//!
//! The processing loop publishes a whole [`MetricsSnapshot`] per frame and
//! readers copy a whole one out, each under a single lock acquisition, so a
//! reader never mixes fields from two frames.

use std::sync::{Arc, RwLock};

use repsense_pose_model::MetricsSnapshot;

/// Cloneable, last-writer-wins metrics cell.
#[derive(Debug, Clone, Default)]
pub struct SharedMetrics {
    inner: Arc<RwLock<Published>>,
}

#[derive(Debug, Default)]
struct Published {
    snapshot: MetricsSnapshot,
    generation: u64,
}

impl SharedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: MetricsSnapshot) {
        // A writer can't leave the cell half-updated, so a poisoned lock still
        // holds a consistent value.
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.snapshot = snapshot;
        guard.generation += 1;
    }

    /// Copy of the latest snapshot.
    pub fn read(&self) -> MetricsSnapshot {
        self.read_with_generation().0
    }

    /// Latest snapshot plus how many times one has been published.
    pub fn read_with_generation(&self) -> (MetricsSnapshot, u64) {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        (guard.snapshot, guard.generation)
    }
}
