//! Unified error type for reelsplice.
//!
//! Every crate in the workspace funnels its failures into [`Error`]. The
//! variants mirror the failure classes of the split/merge pipeline so callers
//! can decide which ones abort a run and which ones are aggregated.

use std::path::PathBuf;

/// Common error type for reelsplice.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest is missing, unreadable, or contains an invalid record.
    #[error("Manifest error [{}]: {message}", path.display())]
    Manifest {
        /// Path of the manifest (or `<inline>` for in-memory documents).
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// An interval id is not a non-negative integer.
    #[error("Invalid segment id '{0}': expected a numeric value")]
    SegmentId(String),

    /// Labeled intervals overlap or extend past the media duration.
    #[error("Unsorted or overlapping intervals: {0}")]
    UnsortedOrOverlapping(String),

    /// A set of intervals does not tile the timeline.
    #[error("Coverage error: {0}")]
    Coverage(String),

    /// Merge inputs do not share one codec/resolution profile.
    #[error("Incompatible video format: {} has {found}, expected {expected}", path.display())]
    FormatMismatch {
        /// The offending clip.
        path: PathBuf,
        /// Profile established by the first clip.
        expected: String,
        /// Profile of the offending clip.
        found: String,
    },

    /// An external tool (ffmpeg, ffprobe) failed to run or exited non-zero.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// No subtitle style is configured for the language.
    #[error("No subtitle style configured for language '{0}'")]
    StyleConfig(String),

    /// A subtitle file could not be parsed or its cues cannot form a timeline.
    #[error("Subtitle error{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Subtitle {
        /// 1-based line number in the source file, when known.
        line: Option<usize>,
        /// Human-readable error description.
        message: String,
    },

    /// Probe output was missing required information.
    #[error("Probe error: {0}")]
    Probe(String),

    /// A temporary workspace could not be created or finalized.
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// A required file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new Manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new Tool error.
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a new Subtitle error pointing at a source line.
    pub fn subtitle(line: usize, message: impl Into<String>) -> Self {
        Self::Subtitle {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Create a new Subtitle error about cue ordering.
    pub fn subtitle_order(message: impl Into<String>) -> Self {
        Self::Subtitle {
            line: None,
            message: message.into(),
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error should abort the whole run rather than a single
    /// unit of work.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            Self::Manifest { .. }
                | Self::UnsortedOrOverlapping(_)
                | Self::Coverage(_)
                | Self::FormatMismatch { .. }
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::manifest("/tmp/chunks.json", "expected an array");
        assert_eq!(
            err.to_string(),
            "Manifest error [/tmp/chunks.json]: expected an array"
        );

        let err = Error::SegmentId("a1".into());
        assert_eq!(
            err.to_string(),
            "Invalid segment id 'a1': expected a numeric value"
        );

        let err = Error::tool("ffmpeg", "exited with status 1");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: exited with status 1");

        let err = Error::StyleConfig("xx".into());
        assert_eq!(err.to_string(), "No subtitle style configured for language 'xx'");

        let err = Error::subtitle(12, "bad timestamp");
        assert_eq!(err.to_string(), "Subtitle error at line 12: bad timestamp");
        let err = Error::subtitle_order("cue 3 starts before cue 2");
        assert_eq!(err.to_string(), "Subtitle error: cue 3 starts before cue 2");
    }

    #[test]
    fn test_format_mismatch_names_both_profiles() {
        let err = Error::FormatMismatch {
            path: PathBuf::from("clip_002.mp4"),
            expected: "h264 1920x1080".into(),
            found: "h264 1280x720".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("clip_002.mp4"));
        assert!(msg.contains("h264 1920x1080"));
        assert!(msg.contains("h264 1280x720"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::manifest("m.json", "bad").is_fatal_for_run());
        assert!(Error::UnsortedOrOverlapping("overlap".into()).is_fatal_for_run());
        assert!(!Error::tool("ffmpeg", "boom").is_fatal_for_run());
        assert!(!Error::SegmentId("x".into()).is_fatal_for_run());
    }
}
