//! On-disk project layout.
//!
//! ```text
//! <dir>/<movie>/
//!   Input/<movie>.<ext>, <manifest>.json
//!   Input/<base>/songs/{audio_files,song_files,srt_files}
//!   Input/<base>/story/{audio_files,story_files,srt_files}
//!   Output/<lang>/songs/{srt_files,subtitle_files,evaluation}
//!   Output/<lang>/story/{dubbed_files,srt_files,evaluation}
//! ```

use std::path::{Path, PathBuf};

use reelsplice_common::paths::{is_manifest_file, is_video_file, media_base_name, media_extension};
use reelsplice_common::{Error, Label, Result};
use walkdir::WalkDir;

use crate::manifest::Manifest;

const SONG_INPUT_DIRS: &[&str] = &["audio_files", "song_files", "srt_files"];
const STORY_INPUT_DIRS: &[&str] = &["audio_files", "story_files", "srt_files"];
const SONG_OUTPUT_DIRS: &[&str] = &["srt_files", "subtitle_files", "evaluation"];
const STORY_OUTPUT_DIRS: &[&str] = &["dubbed_files", "srt_files", "evaluation"];

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    movie_name: String,
    movie_ext: String,
    base_language: String,
    target_languages: Vec<String>,
    source_movie: Option<PathBuf>,
    source_manifest: Option<PathBuf>,
    manifest_name: Option<String>,
}

impl ProjectLayout {
    /// Layout for a movie that has not been organized yet. The project root
    /// is a sibling directory named after the movie's stem.
    pub fn new(
        movie: &Path,
        base_language: &str,
        target_languages: &[String],
        manifest: Option<&Path>,
    ) -> Self {
        let movie_name = media_base_name(movie);
        let parent = movie.parent().unwrap_or_else(|| Path::new("."));
        Self {
            root: parent.join(&movie_name),
            movie_ext: media_extension(movie),
            movie_name,
            base_language: base_language.to_string(),
            target_languages: target_languages.to_vec(),
            source_movie: Some(movie.to_path_buf()),
            source_manifest: manifest.map(Path::to_path_buf),
            manifest_name: manifest
                .and_then(|m| m.file_name())
                .map(|n| n.to_string_lossy().to_string()),
        }
    }

    /// Reopen an existing project. The first video file and the first
    /// `.json` file directly under `Input/` are taken as the movie and its
    /// manifest.
    pub fn open(root: &Path, base_language: &str) -> Result<Self> {
        let input = root.join("Input");
        if !input.is_dir() {
            return Err(Error::NotFound(input));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&input)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();

        let movie = files
            .iter()
            .find(|p| is_video_file(p))
            .ok_or_else(|| Error::NotFound(input.join("<movie>")))?;
        let manifest = files.iter().find(|p| is_manifest_file(p));

        let mut target_languages: Vec<String> = std::fs::read_dir(root.join("Output"))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        target_languages.sort();

        Ok(Self {
            root: root.to_path_buf(),
            movie_name: media_base_name(movie),
            movie_ext: media_extension(movie),
            base_language: base_language.to_string(),
            target_languages,
            source_movie: None,
            source_manifest: None,
            manifest_name: manifest
                .and_then(|m| m.file_name())
                .map(|n| n.to_string_lossy().to_string()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn movie_name(&self) -> &str {
        &self.movie_name
    }

    pub fn target_languages(&self) -> &[String] {
        &self.target_languages
    }

    pub fn input_root(&self) -> PathBuf {
        self.root.join("Input")
    }

    pub fn output_root(&self) -> PathBuf {
        self.root.join("Output")
    }

    /// Where the movie lives once the project is created.
    pub fn input_movie(&self) -> PathBuf {
        self.input_root()
            .join(format!("{}.{}", self.movie_name, self.movie_ext))
    }

    /// Where the manifest lives once the project is created.
    pub fn input_manifest(&self) -> Option<PathBuf> {
        self.manifest_name
            .as_ref()
            .map(|name| self.input_root().join(name))
    }

    pub fn song_clips_dir(&self) -> PathBuf {
        self.input_root()
            .join(&self.base_language)
            .join("songs")
            .join("song_files")
    }

    pub fn story_clips_dir(&self) -> PathBuf {
        self.input_root()
            .join(&self.base_language)
            .join("story")
            .join("story_files")
    }

    pub fn clips_dir(&self, label: Label) -> PathBuf {
        match label {
            Label::Song => self.song_clips_dir(),
            Label::Voice => self.story_clips_dir(),
        }
    }

    /// Subtitle output folder for one target language.
    pub fn subtitle_dir(&self, language: &str) -> PathBuf {
        self.output_root()
            .join(language)
            .join("songs")
            .join("subtitle_files")
    }

    /// `Output/<name>.<ext>`
    pub fn merged_output(&self, name: &str) -> PathBuf {
        self.output_root().join(format!("{name}.{}", self.movie_ext))
    }

    /// Create every folder and, when `move_files` is set, move the movie and
    /// manifest into `Input/`. Safe to run repeatedly: existing folders are
    /// kept and files already in place are not touched.
    pub fn create(&self, move_files: bool) -> Result<PathBuf> {
        let base = self.input_root().join(&self.base_language);
        create_all(&base.join("songs"), SONG_INPUT_DIRS)?;
        create_all(&base.join("story"), STORY_INPUT_DIRS)?;

        for language in &self.target_languages {
            let lang_root = self.output_root().join(language);
            create_all(&lang_root.join("songs"), SONG_OUTPUT_DIRS)?;
            create_all(&lang_root.join("story"), STORY_OUTPUT_DIRS)?;
        }

        if let Some(manifest) = self.source_manifest.as_deref().filter(|m| m.exists()) {
            match Manifest::load(manifest) {
                Ok(m) => {
                    let counts = m.chunk_counts();
                    tracing::info!(songs = counts.song, voice = counts.voice, "manifest chunks");
                }
                Err(e) => tracing::warn!("Could not read manifest for chunk counts: {}", e),
            }
        }

        if move_files {
            if let Some(movie) = &self.source_movie {
                let dest = self.input_movie();
                if !dest.exists() {
                    if !movie.exists() {
                        return Err(Error::NotFound(movie.clone()));
                    }
                    move_file(movie, &dest)?;
                }
            }

            if let (Some(manifest), Some(dest)) = (&self.source_manifest, self.input_manifest()) {
                if manifest.exists() && !dest.exists() {
                    move_file(manifest, &dest)?;
                }
            }
        }

        tracing::info!(root = %self.root.display(), "project structure ready");
        Ok(self.root.clone())
    }
}

fn create_all(base: &Path, subdirs: &[&str]) -> Result<()> {
    for sub in subdirs {
        std::fs::create_dir_all(base.join(sub))?;
    }
    Ok(())
}

/// Rename, falling back to copy and remove across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    tracing::debug!("Moved {:?} -> {:?}", from, to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let movie = dir.path().join("rishtey.mp4");
        let manifest = dir.path().join("rishtey_chunks.json");
        std::fs::write(&movie, b"movie").unwrap();
        std::fs::write(
            &manifest,
            r#"[{"id": 1, "label": "song", "start": 0, "end": 10}]"#,
        )
        .unwrap();
        (dir, movie, manifest)
    }

    #[test]
    fn creates_tree_and_moves_inputs() {
        let (dir, movie, manifest) = setup();
        let layout = ProjectLayout::new(&movie, "BaseLanguage", &["kn".to_string()], Some(&manifest));

        let root = layout.create(true).unwrap();
        assert_eq!(root, dir.path().join("rishtey"));
        assert!(root.join("Input/BaseLanguage/songs/song_files").is_dir());
        assert!(root.join("Input/BaseLanguage/story/story_files").is_dir());
        assert!(root.join("Output/kn/songs/subtitle_files").is_dir());
        assert!(root.join("Output/kn/story/dubbed_files").is_dir());
        assert!(root.join("Input/rishtey.mp4").is_file());
        assert!(root.join("Input/rishtey_chunks.json").is_file());
        assert!(!movie.exists());
    }

    #[test]
    fn create_is_idempotent() {
        let (_dir, movie, manifest) = setup();
        let layout = ProjectLayout::new(&movie, "BaseLanguage", &[], Some(&manifest));
        layout.create(true).unwrap();
        // Second run: sources are gone but the destinations exist.
        layout.create(true).unwrap();
        assert!(layout.input_movie().is_file());
    }

    #[test]
    fn create_without_move_leaves_inputs() {
        let (_dir, movie, manifest) = setup();
        let layout = ProjectLayout::new(&movie, "BaseLanguage", &[], Some(&manifest));
        layout.create(false).unwrap();
        assert!(movie.exists());
        assert!(!layout.input_movie().exists());
    }

    #[test]
    fn missing_movie_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(&dir.path().join("gone.mkv"), "BaseLanguage", &[], None);
        assert!(matches!(layout.create(true), Err(Error::NotFound(_))));
    }

    #[test]
    fn open_finds_movie_manifest_and_languages() {
        let (_dir, movie, manifest) = setup();
        let layout = ProjectLayout::new(
            &movie,
            "BaseLanguage",
            &["ta".to_string(), "kn".to_string()],
            Some(&manifest),
        );
        let root = layout.create(true).unwrap();

        let reopened = ProjectLayout::open(&root, "BaseLanguage").unwrap();
        assert_eq!(reopened.movie_name(), "rishtey");
        assert_eq!(reopened.input_movie(), root.join("Input/rishtey.mp4"));
        assert_eq!(
            reopened.input_manifest(),
            Some(root.join("Input/rishtey_chunks.json"))
        );
        assert_eq!(reopened.target_languages(), &["kn".to_string(), "ta".to_string()]);
        assert_eq!(reopened.merged_output("merged_output"), root.join("Output/merged_output.mp4"));
        assert_eq!(reopened.clips_dir(Label::Voice), reopened.story_clips_dir());
    }

    #[test]
    fn open_keeps_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("film/Input");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("film.mkv"), b"m").unwrap();

        let layout = ProjectLayout::open(&dir.path().join("film"), "BaseLanguage").unwrap();
        assert_eq!(layout.input_movie(), input.join("film.mkv"));
        assert!(layout.input_manifest().is_none());
    }
}
