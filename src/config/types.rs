use reelsplice_av::{ReencodeSettings, ToolsConfig};
use reelsplice_common::Label;
use serde::{Deserialize, Serialize};

use crate::subtitle::StyleTable;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub subtitles: SubtitlesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Concurrent ffmpeg cuts.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Label whose intervals the manifest lists explicitly; the other label
    /// is derived from the gaps.
    #[serde(default = "default_label")]
    pub label: Label,
}

fn default_max_workers() -> usize {
    16
}

fn default_label() -> Label {
    Label::Song
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            label: default_label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategyKind {
    /// Concat demuxer, no re-encode. Inputs must share one stream profile.
    #[default]
    StreamCopy,
    /// Concat filter with a full re-encode.
    Reencode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub strategy: MergeStrategyKind,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// File stem of the merged output.
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_output_name() -> String {
    "merged_output".to_string()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            strategy: MergeStrategyKind::default(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            output_name: default_output_name(),
        }
    }
}

impl MergeConfig {
    pub fn reencode_settings(&self) -> ReencodeSettings {
        ReencodeSettings {
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            audio_bitrate: self.audio_bitrate.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Folder name for the source language under `Input/`.
    #[serde(default = "default_base_language")]
    pub base_language: String,

    /// One `Output/<lang>` tree per entry.
    #[serde(default)]
    pub target_languages: Vec<String>,
}

fn default_base_language() -> String {
    "BaseLanguage".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            base_language: default_base_language(),
            target_languages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubtitlesConfig {
    /// Fill `[0, first cue)` with a transparent event.
    #[serde(default)]
    pub leading_filler: bool,

    /// Per-language styles. Entries here are layered over the built-in
    /// table at load time.
    #[serde(default = "StyleTable::empty")]
    pub styles: StyleTable,
}
