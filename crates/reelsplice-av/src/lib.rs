//! # reelsplice-av
//!
//! ffmpeg and ffprobe plumbing for the reelsplice pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffmpeg and ffprobe once,
//!   honoring configured overrides.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Workspace management** ([`Workspace`]) -- temp directory next to the
//!   destination with atomic finalization.
//! - **Probing** ([`probe::MediaProber`], [`probe::FfprobeProber`]) -- stream
//!   profile and duration.
//! - **Validation** ([`FormatValidator`]) -- blocks lossless merges over
//!   heterogeneous clips.
//! - **Actions** ([`actions`]) -- cut, concat, subtitle burn-in.

pub mod actions;
pub mod command;
pub mod probe;
pub mod tools;
pub mod validate;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use actions::{
    burn_subtitles, ConcatStrategy, Cutter, FfmpegCutter, ReencodeConcat, ReencodeSettings,
    StreamCopyConcat,
};
pub use command::{ToolCommand, ToolOutput};
pub use probe::{FfprobeProber, MediaProber, StreamProfile};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry, ToolsConfig};
pub use validate::FormatValidator;
pub use workspace::Workspace;
