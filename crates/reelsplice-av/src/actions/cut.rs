//! Stream-copy cutting of a single span.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use reelsplice_common::{Result, Timecode};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Cuts `[start, end)` of a source into its own file.
#[async_trait]
pub trait Cutter: Send + Sync {
    /// Write the span to `output`, overwriting any existing file.
    async fn cut(&self, source: &Path, start: Timecode, end: Timecode, output: &Path) -> Result<()>;
}

/// [`Cutter`] that runs `ffmpeg -ss .. -t .. -c copy`.
///
/// Stream copy snaps to the nearest preceding keyframe, so cuts are only as
/// accurate as the source's GOP structure allows.
#[derive(Debug, Clone)]
pub struct FfmpegCutter {
    ffmpeg: ToolCommand,
}

impl FfmpegCutter {
    pub fn new(ffmpeg: ToolCommand) -> Self {
        Self { ffmpeg }
    }

    pub fn from_registry(tools: &ToolRegistry) -> Result<Self> {
        Ok(Self::new(tools.command("ffmpeg")?))
    }
}

/// Arguments for one stream-copy cut.
pub fn cut_args(source: &Path, start: Timecode, end: Timecode, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        start.to_string().into(),
        "-i".into(),
        source.as_os_str().to_os_string(),
        "-t".into(),
        end.saturating_since(start).to_string().into(),
        "-c".into(),
        "copy".into(),
        output.as_os_str().to_os_string(),
    ]
}

#[async_trait]
impl Cutter for FfmpegCutter {
    async fn cut(&self, source: &Path, start: Timecode, end: Timecode, output: &Path) -> Result<()> {
        let mut cmd = self.ffmpeg.clone();
        cmd.args(cut_args(source, start, end, output));
        cmd.execute().await?;
        Ok(())
    }
}
