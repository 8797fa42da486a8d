//! Error types shared across RepSense crates.
//!
//! The metrics core never fails on frame data; these errors only surface at
//! I/O boundaries (config files, frame streams, frame sources).

use std::path::PathBuf;

/// Top-level error type for RepSense operations.
#[derive(Debug, thiserror::Error)]
pub enum RepsenseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame source error: {message}")]
    FrameSource { message: String },

    #[error("Frame stream error: {message}")]
    FrameStream { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RepsenseError.
pub type RepsenseResult<T> = Result<T, RepsenseError>;

impl RepsenseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn frame_source(msg: impl Into<String>) -> Self {
        Self::FrameSource {
            message: msg.into(),
        }
    }

    pub fn frame_stream(msg: impl Into<String>) -> Self {
        Self::FrameStream {
            message: msg.into(),
        }
    }
}
