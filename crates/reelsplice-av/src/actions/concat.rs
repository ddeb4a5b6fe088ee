//! Joining clips into one file.
//!
//! Two strategies exist. [`StreamCopyConcat`] uses the concat demuxer and
//! never touches the encoded streams, so every input must share one stream
//! profile. [`ReencodeConcat`] decodes everything through the concat filter
//! and accepts heterogeneous inputs at the cost of a full encode.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reelsplice_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;
use crate::workspace::Workspace;

/// File name of the playlist written for the concat demuxer.
pub const CONCAT_LIST_NAME: &str = "concat_list.txt";

/// A way of joining ordered inputs into `workspace.output()`.
#[async_trait]
pub trait ConcatStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether inputs must share codec and frame size.
    fn requires_uniform_streams(&self) -> bool;

    /// Join `inputs` in order into [`Workspace::output`].
    async fn concat(&self, inputs: &[PathBuf], workspace: &Workspace) -> Result<()>;
}

/// Lossless concatenation through the ffmpeg concat demuxer.
#[derive(Debug, Clone)]
pub struct StreamCopyConcat {
    ffmpeg: ToolCommand,
}

impl StreamCopyConcat {
    pub fn new(ffmpeg: ToolCommand) -> Self {
        Self { ffmpeg }
    }

    pub fn from_registry(tools: &ToolRegistry) -> Result<Self> {
        Ok(Self::new(tools.command("ffmpeg")?))
    }
}

#[async_trait]
impl ConcatStrategy for StreamCopyConcat {
    fn name(&self) -> &'static str {
        "stream_copy"
    }

    fn requires_uniform_streams(&self) -> bool {
        true
    }

    async fn concat(&self, inputs: &[PathBuf], workspace: &Workspace) -> Result<()> {
        let list_path = workspace.temp_file(CONCAT_LIST_NAME);
        write_concat_list(inputs, &list_path)?;

        let mut cmd = self.ffmpeg.clone();
        cmd.args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .path_arg(&list_path)
            .args(["-c", "copy"])
            .path_arg(&workspace.output());
        cmd.execute().await?;
        Ok(())
    }
}

/// Encoder settings for [`ReencodeConcat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReencodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for ReencodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Concatenation through the concat filter with a full re-encode.
#[derive(Debug, Clone)]
pub struct ReencodeConcat {
    ffmpeg: ToolCommand,
    settings: ReencodeSettings,
}

impl ReencodeConcat {
    pub fn new(ffmpeg: ToolCommand, settings: ReencodeSettings) -> Self {
        Self { ffmpeg, settings }
    }

    pub fn from_registry(tools: &ToolRegistry, settings: ReencodeSettings) -> Result<Self> {
        Ok(Self::new(tools.command("ffmpeg")?, settings))
    }

    /// Full argument list for joining `inputs` into `output`.
    pub fn args(&self, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        for input in inputs {
            args.push("-i".into());
            args.push(input.as_os_str().to_os_string());
        }
        let graph = concat_filter_graph(inputs.len());
        args.extend(
            [
                "-filter_complex",
                graph.as_str(),
                "-map",
                "[outv]",
                "-map",
                "[outa]",
                "-c:v",
                self.settings.video_codec.as_str(),
                "-c:a",
                self.settings.audio_codec.as_str(),
                "-b:a",
                self.settings.audio_bitrate.as_str(),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl ConcatStrategy for ReencodeConcat {
    fn name(&self) -> &'static str {
        "reencode"
    }

    fn requires_uniform_streams(&self) -> bool {
        false
    }

    async fn concat(&self, inputs: &[PathBuf], workspace: &Workspace) -> Result<()> {
        let mut cmd = self.ffmpeg.clone();
        cmd.args(self.args(inputs, &workspace.output()));
        cmd.execute().await?;
        Ok(())
    }
}

/// `[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[outv][outa]`
pub fn concat_filter_graph(n: usize) -> String {
    let mut graph = String::new();
    for i in 0..n {
        let _ = write!(graph, "[{i}:v][{i}:a]");
    }
    let _ = write!(graph, "concat=n={n}:v=1:a=1[outv][outa]");
    graph
}

/// Write an ffconcat playlist listing `inputs` relative to the list's
/// directory.
pub fn write_concat_list(inputs: &[PathBuf], list_path: &Path) -> Result<()> {
    let list_dir = list_path
        .parent()
        .ok_or_else(|| Error::invalid_input("concat list path has no parent"))?;
    let list_dir = std::fs::canonicalize(list_dir)?;

    let mut body = String::new();
    for input in inputs {
        let absolute = std::fs::canonicalize(input).map_err(|_| Error::NotFound(input.clone()))?;
        let entry = pathdiff::diff_paths(&absolute, &list_dir).unwrap_or(absolute);
        body.push_str(&concat_list_entry(&entry));
        body.push('\n');
    }

    std::fs::write(list_path, body)?;
    tracing::debug!(path = %list_path.display(), entries = inputs.len(), "wrote concat list");
    Ok(())
}

/// One `file '<path>'` line, with single quotes escaped for the demuxer.
pub fn concat_list_entry(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    format!("file '{}'", raw.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn entry_escapes_single_quotes() {
        assert_eq!(
            concat_list_entry(Path::new("../songs/it's_001.mp4")),
            r"file '../songs/it'\''s_001.mp4'"
        );
    }

    #[test]
    fn list_uses_paths_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let clips = dir.path().join("clips");
        let work = dir.path().join("work");
        fs::create_dir_all(&clips).unwrap();
        fs::create_dir_all(&work).unwrap();

        let a = clips.join("film_001_00-00-00_00-00-10.mp4");
        let b = clips.join("film_002_00-00-10_00-00-30.mp4");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let list = work.join(CONCAT_LIST_NAME);
        write_concat_list(&[a, b], &list).unwrap();

        let content = fs::read_to_string(&list).unwrap();
        assert_eq!(
            content,
            "file '../clips/film_001_00-00-00_00-00-10.mp4'\n\
             file '../clips/film_002_00-00-10_00-00-30.mp4'\n"
        );
    }

    #[test]
    fn list_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join(CONCAT_LIST_NAME);
        let err = write_concat_list(&[dir.path().join("gone.mp4")], &list).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn filter_graph_lists_every_input() {
        assert_eq!(
            concat_filter_graph(2),
            "[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[outv][outa]"
        );
    }

    #[test]
    fn reencode_args_carry_settings() {
        let strategy = ReencodeConcat::new(
            ToolCommand::new(PathBuf::from("ffmpeg")),
            ReencodeSettings::default(),
        );
        let args: Vec<String> = strategy
            .args(&[PathBuf::from("a.mp4"), PathBuf::from("b.mp4")], Path::new("out.mp4"))
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(&args[..5], &["-y", "-i", "a.mp4", "-i", "b.mp4"]);
        assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(args.windows(2).any(|w| w == ["-b:a", "192k"]));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
        assert!(!strategy.requires_uniform_streams());
    }
}
