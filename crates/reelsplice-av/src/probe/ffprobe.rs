//! FFprobe-based [`MediaProber`] implementation.
//!
//! Two narrow queries are issued instead of a full `-show_streams` dump:
//! `-select_streams v:0 -show_entries stream=codec_name,width,height` for the
//! stream profile and `-show_entries format=duration` for the length.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reelsplice_common::{Error, Result};
use serde::Deserialize;

use super::{MediaProber, StreamProfile};
use crate::command::{ToolCommand, DEFAULT_TIMEOUT};
use crate::tools::ToolRegistry;

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a prober from a discovered registry.
    pub fn from_registry(tools: &ToolRegistry) -> Result<Self> {
        let cfg = tools.require("ffprobe")?;
        Ok(Self {
            ffprobe_path: cfg.path.clone(),
            timeout: cfg.timeout,
        })
    }

    fn command(&self, path: &Path) -> Result<ToolCommand> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let mut cmd = ToolCommand::new(self.ffprobe_path.clone());
        cmd.timeout(self.timeout).args(["-v", "error"]);
        Ok(cmd)
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    async fn video_profile(&self, path: &Path) -> Result<StreamProfile> {
        let output = self
            .command(path)?
            .args(["-select_streams", "v:0"])
            .args(["-show_entries", "stream=codec_name,width,height"])
            .args(["-of", "json"])
            .path_arg(path)
            .execute()
            .await?;

        parse_stream_profile(&output.stdout)
            .map_err(|e| Error::Probe(format!("{}: {e}", path.display())))
    }

    async fn duration(&self, path: &Path) -> Result<Duration> {
        let output = self
            .command(path)?
            .args(["-show_entries", "format=duration"])
            .args(["-of", "json"])
            .path_arg(path)
            .execute()
            .await?;

        parse_duration(&output.stdout).map_err(|e| Error::Probe(format!("{}: {e}", path.display())))
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StreamsOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FormatOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Parse the stream-entries JSON into a profile.
pub(crate) fn parse_stream_profile(json: &str) -> std::result::Result<StreamProfile, String> {
    let parsed: StreamsOutput =
        serde_json::from_str(json).map_err(|e| format!("ffprobe JSON parse error: {e}"))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| "no video stream".to_string())?;

    match (stream.codec_name, stream.width, stream.height) {
        (Some(codec), Some(width), Some(height)) => Ok(StreamProfile {
            codec,
            width,
            height,
        }),
        _ => Err("video stream is missing codec_name, width or height".to_string()),
    }
}

/// Parse the format-entries JSON into a duration.
pub(crate) fn parse_duration(json: &str) -> std::result::Result<Duration, String> {
    let parsed: FormatOutput =
        serde_json::from_str(json).map_err(|e| format!("ffprobe JSON parse error: {e}"))?;

    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| "no container duration".to_string())?;

    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{raw}'"))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("invalid duration '{raw}'"));
    }
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_profile() {
        let json = r#"{
            "programs": [],
            "streams": [{"codec_name": "h264", "width": 1920, "height": 1080}]
        }"#;
        let profile = parse_stream_profile(json).unwrap();
        assert_eq!(profile.to_string(), "h264 1920x1080");
    }

    #[test]
    fn missing_video_stream_is_an_error() {
        assert_eq!(
            parse_stream_profile(r#"{"streams": []}"#).unwrap_err(),
            "no video stream"
        );
        assert!(parse_stream_profile(r#"{"streams": [{"codec_name": "h264"}]}"#).is_err());
        assert!(parse_stream_profile("not json").is_err());
    }

    #[test]
    fn parses_duration() {
        let d = parse_duration(r#"{"format": {"duration": "7322.480000"}}"#).unwrap();
        assert_eq!(d.as_secs(), 7322);
        assert!(parse_duration(r#"{"format": {}}"#).is_err());
        assert!(parse_duration(r#"{"format": {"duration": "N/A"}}"#).is_err());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let prober = FfprobeProber::new(PathBuf::from("ffprobe"));
        let err = prober
            .video_profile(Path::new("/nonexistent/clip_001.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
