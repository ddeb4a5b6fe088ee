//! Path utilities for classifying project files by extension.

use std::path::Path;

/// Extensions accepted as source media or clips.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Extensions accepted as subtitle files.
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa"];

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelsplice_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.MP4")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check if a path has a subtitle file extension.
pub fn is_subtitle_file(path: &Path) -> bool {
    has_extension(path, SUBTITLE_EXTENSIONS)
}

/// Check if a path looks like a chunk manifest.
pub fn is_manifest_file(path: &Path) -> bool {
    has_extension(path, &["json"])
}

/// The file stem used as the base of clip names, or `"media"` when the
/// path has none.
pub fn media_base_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("media")
        .to_string()
}

/// The extension clips inherit from their source, defaulting to `mp4`.
pub fn media_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("mp4")
        .to_string()
}
