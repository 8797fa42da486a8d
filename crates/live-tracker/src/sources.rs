//! Built-in frame sources.

use std::path::Path;
use std::time::Duration;

use repsense_common::error::{RepsenseError, RepsenseResult};
use repsense_pose_model::{parse_frame_stream, FrameStream, LandmarkFrame};

use crate::{FrameSource, SourceFrame};

/// Plays back a recorded frame stream.
pub struct ReplaySource {
    name: String,
    stream: FrameStream,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(name: impl Into<String>, stream: FrameStream) -> Self {
        Self {
            name: name.into(),
            stream,
            cursor: 0,
        }
    }

    /// Load a JSONL frame stream from disk.
    pub fn from_path(path: impl AsRef<Path>) -> RepsenseResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RepsenseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let stream = parse_frame_stream(&content)
            .map_err(|e| RepsenseError::frame_stream(format!("{}: {e}", path.display())))?;

        tracing::debug!(
            path = %path.display(),
            records = stream.records.len(),
            width = stream.header.width,
            height = stream.header.height,
            "Loaded frame stream"
        );
        Ok(Self::new(format!("replay:{}", path.display()), stream))
    }

    /// Nominal time between frames, if the header carries a usable fps.
    pub fn frame_interval(&self) -> Option<Duration> {
        let fps = self.stream.header.fps;
        (fps.is_finite() && fps > 0.0).then(|| Duration::from_secs_f64(1.0 / fps))
    }

    pub fn header(&self) -> &repsense_pose_model::FrameStreamHeader {
        &self.stream.header
    }

    /// Frames not yet played.
    pub fn remaining(&self) -> usize {
        self.stream.records.len() - self.cursor
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> RepsenseResult<SourceFrame> {
        let Some(record) = self.stream.records.get(self.cursor) else {
            return Ok(SourceFrame::EndOfStream);
        };
        self.cursor += 1;

        let header = &self.stream.header;
        Ok(match record.landmarks {
            Some(skeleton) => SourceFrame::Detected(LandmarkFrame::new(
                header.width,
                header.height,
                skeleton,
            )),
            None => SourceFrame::NoDetection,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
