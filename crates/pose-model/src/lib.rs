//! RepSense Pose Model
//!
//! Defines the core data contracts shared by every RepSense crate:
//! - **Landmarks:** Named body joints for one frame, as produced by an
//!   external pose-estimation model
//! - **Features:** Named joint angles derived from a frame
//! - **Metrics:** The externally visible per-frame metrics record
//! - **Frame streams:** JSONL recordings of landmark frames for batch
//!   analysis and replay
//!
//! All landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! source frame so they survive resolution changes between sources.

pub mod features;
pub mod frame_stream;
pub mod landmark;

pub use features::*;
pub use frame_stream::*;
pub use landmark::*;
