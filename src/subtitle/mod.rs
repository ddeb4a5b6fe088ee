//! SRT to ASS subtitle timeline synchronization.
//!
//! The pipeline is `parse_srt` -> [`TimelineSynchronizer::synchronize`] ->
//! [`render_ass`]. It is synchronous and shares only the time codecs with
//! the clip pipeline.

mod ass;
mod languages;
mod srt;
mod sync;

pub use ass::render_ass;
pub use languages::{known_languages, resolve_language_code, StyleTable, SubtitleStyle};
pub use srt::{parse_srt, SubtitleCue};
pub use sync::{EventKind, Timeline, TimelineEvent, TimelineSynchronizer, FILLER_TEXT};

use reelsplice_common::{Error, Result};
use std::path::Path;

/// Read `srt`, synchronize it for `language` and write the ASS document to
/// `ass`.
///
/// `language` may be a code (`"hi"`) or a known language name (`"Hindi"`).
pub fn convert_srt_file(
    srt: &Path,
    ass: &Path,
    language: &str,
    styles: &StyleTable,
) -> Result<Timeline> {
    convert_with(&TimelineSynchronizer::new(styles), srt, ass, language)
}

/// [`convert_srt_file`] with a preconfigured synchronizer.
pub fn convert_with(
    synchronizer: &TimelineSynchronizer<'_>,
    srt: &Path,
    ass: &Path,
    language: &str,
) -> Result<Timeline> {
    if !srt.exists() {
        return Err(Error::NotFound(srt.to_path_buf()));
    }

    let code = resolve_language_code(language).unwrap_or(language);
    let content = std::fs::read_to_string(srt)?;
    let cues = parse_srt(&content)?;
    let timeline = synchronizer.synchronize(&cues, code)?;

    write_ass(&timeline, ass)?;
    tracing::info!(
        srt = %srt.display(),
        ass = %ass.display(),
        language = code,
        cues = timeline.cue_count(),
        events = timeline.events.len(),
        "converted subtitles"
    );
    Ok(timeline)
}

/// Render `timeline` and write it to `path`, creating parent directories.
pub fn write_ass(timeline: &Timeline, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_ass(timeline))?;
    Ok(())
}
