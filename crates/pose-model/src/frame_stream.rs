//! Recorded landmark streams in JSONL format.
//!
//! The first line is a `# `-prefixed JSON header carrying the source frame
//! size; each following line is one frame record. A record with
//! `"landmarks": null` is a frame in which no subject was detected.
//!
//! ```text
//! # {"schema_version":"1.0","width":1280,"height":720,"fps":30.0}
//! {"i":0,"landmarks":{"nose":{"x":0.5,"y":0.1}, ...}}
//! {"i":1,"landmarks":null}
//! ```

use serde::{Deserialize, Serialize};

use crate::landmark::{LandmarkFrame, Skeleton};

/// Current frame stream schema version.
pub const FRAME_STREAM_SCHEMA_VERSION: &str = "1.0";

/// Metadata describing the source of a frame stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Source frame width in pixels.
    pub width: u32,

    /// Source frame height in pixels.
    pub height: u32,

    /// Nominal frame rate of the source.
    pub fps: f64,

    /// Wall-clock time the stream was recorded (ISO 8601), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl FrameStreamHeader {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            schema_version: FRAME_STREAM_SCHEMA_VERSION.to_string(),
            width,
            height,
            fps,
            recorded_at: None,
        }
    }
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame index within the source.
    #[serde(rename = "i")]
    pub index: u64,

    /// Detected landmarks, or `None` if no subject was detected.
    pub landmarks: Option<Skeleton>,
}

impl FrameRecord {
    pub fn detected(index: u64, skeleton: Skeleton) -> Self {
        Self {
            index,
            landmarks: Some(skeleton),
        }
    }

    pub fn missing(index: u64) -> Self {
        Self {
            index,
            landmarks: None,
        }
    }
}

/// A parsed frame stream.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStream {
    pub header: FrameStreamHeader,
    pub records: Vec<FrameRecord>,
}

impl FrameStream {
    pub fn new(header: FrameStreamHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// Frames in recorded order, `None` where nothing was detected.
    pub fn frames(&self) -> impl Iterator<Item = Option<LandmarkFrame>> + '_ {
        let (width, height) = (self.header.width, self.header.height);
        self.records.iter().map(move |record| {
            record
                .landmarks
                .map(|skeleton| LandmarkFrame::new(width, height, skeleton))
        })
    }

    /// Number of records with a detection.
    pub fn detected_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.landmarks.is_some())
            .count()
    }
}

/// Errors produced while reading a frame stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameStreamError {
    #[error("frame stream has no '# ' header line")]
    MissingHeader,

    #[error("invalid frame size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a frame stream from JSONL content.
pub fn parse_frame_stream(jsonl: &str) -> Result<FrameStream, FrameStreamError> {
    let mut lines = jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header_text) = lines.next().ok_or(FrameStreamError::MissingHeader)?;
    let header_json = header_text
        .strip_prefix('#')
        .ok_or(FrameStreamError::MissingHeader)?;
    let header: FrameStreamHeader =
        serde_json::from_str(header_json.trim()).map_err(|source| FrameStreamError::Parse {
            line: header_line,
            source,
        })?;

    if header.width == 0 || header.height == 0 {
        return Err(FrameStreamError::InvalidDimensions {
            width: header.width,
            height: header.height,
        });
    }

    let records = lines
        .filter(|(_, line)| !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| FrameStreamError::Parse { line, source })
        })
        .collect::<Result<Vec<FrameRecord>, _>>()?;

    Ok(FrameStream { header, records })
}

/// Serialize a frame stream to JSONL, header first.
pub fn serialize_frame_stream(stream: &FrameStream) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&serde_json::to_string(&stream.header)?);
    output.push('\n');
    for record in &stream.records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{BodyPart, Landmark};

    fn sample_stream() -> FrameStream {
        let skeleton = Skeleton::default().with(BodyPart::Nose, Landmark::new(0.5, 0.1));
        let mut stream = FrameStream::new(FrameStreamHeader::new(1280, 720, 30.0));
        stream.records.push(FrameRecord::detected(0, skeleton));
        stream.records.push(FrameRecord::missing(1));
        stream.records.push(FrameRecord::detected(2, skeleton));
        stream
    }

    #[test]
    fn test_stream_roundtrip() {
        let stream = sample_stream();
        let jsonl = serialize_frame_stream(&stream).unwrap();
        assert!(jsonl.starts_with("# {"));
        let parsed = parse_frame_stream(&jsonl).unwrap();
        assert_eq!(parsed, stream);
    }

    #[test]
    fn test_frames_carry_header_dimensions() {
        let stream = sample_stream();
        let frames: Vec<_> = stream.frames().collect();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].is_none());
        let first = frames[0].unwrap();
        assert_eq!((first.width, first.height), (1280, 720));
        assert_eq!(first.pixel_y(BodyPart::Nose), 72);
        assert_eq!(stream.detected_count(), 2);
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let err = parse_frame_stream("{\"i\":0,\"landmarks\":null}\n").unwrap_err();
        assert!(matches!(err, FrameStreamError::MissingHeader));

        let err = parse_frame_stream("\n\n").unwrap_err();
        assert!(matches!(err, FrameStreamError::MissingHeader));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"width\":0,\"height\":720,\"fps\":30.0}\n";
        let err = parse_frame_stream(jsonl).unwrap_err();
        assert!(matches!(
            err,
            FrameStreamError::InvalidDimensions {
                width: 0,
                height: 720
            }
        ));
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"width\":640,\"height\":480,\"fps\":30.0}\n\
                     {\"i\":0,\"landmarks\":null}\n\
                     {\"i\":1,\"landmarks\":\n";
        let err = parse_frame_stream(jsonl).unwrap_err();
        match err {
            FrameStreamError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_recorded_at_is_optional() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"width\":640,\"height\":480,\"fps\":25.0}\n";
        let parsed = parse_frame_stream(jsonl).unwrap();
        assert_eq!(parsed.header.recorded_at, None);
        assert!(parsed.records.is_empty());
    }
}
