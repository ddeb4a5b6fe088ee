//! Hard-subtitle burn-in.

use std::path::{Path, PathBuf};

use reelsplice_common::{Error, Result};

use crate::tools::ToolRegistry;
use crate::workspace::Workspace;

/// Render `ass` onto `video`, copying the audio stream, and write `output`.
pub async fn burn_subtitles(
    tools: &ToolRegistry,
    video: &Path,
    ass: &Path,
    output: &Path,
) -> Result<PathBuf> {
    for input in [video, ass] {
        if !input.exists() {
            return Err(Error::NotFound(input.to_path_buf()));
        }
    }

    let workspace = Workspace::for_output(output)?;
    tracing::info!(video = %video.display(), subtitles = %ass.display(), "burning subtitles");

    let mut cmd = tools.command("ffmpeg")?;
    cmd.args(["-y", "-i"])
        .path_arg(video)
        .arg("-vf")
        .arg(format!("ass={}", escape_filter_path(ass)))
        .args(["-c:a", "copy"])
        .path_arg(&workspace.output());
    cmd.execute().await?;

    workspace.finalize()
}

/// Escape a path for use as a filter option value.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', r"\:")
        .replace('\'', r"\'")
}
