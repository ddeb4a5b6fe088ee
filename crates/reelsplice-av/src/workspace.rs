//! Workspace management for output-producing operations.
//!
//! A [`Workspace`] is a temporary directory created next to the final
//! destination. Tools write into it and [`Workspace::finalize`] moves the
//! result into place with a rename, so readers never observe a partially
//! written file.

use std::path::{Path, PathBuf};

use reelsplice_common::{Error, Result};
use tempfile::TempDir;

/// Workspace for a single output file.
///
/// # Example
///
/// ```no_run
/// use reelsplice_av::Workspace;
/// use std::path::Path;
///
/// let workspace = Workspace::for_output(Path::new("/movies/merged_output.mp4"))?;
/// // ... write to workspace.output() ...
/// workspace.finalize()?;
/// # Ok::<(), reelsplice_common::Error>(())
/// ```
pub struct Workspace {
    temp_dir: TempDir,
    destination: PathBuf,
}

impl Workspace {
    /// Create a workspace whose result will land at `destination`.
    ///
    /// The parent directory of `destination` is created if missing; the
    /// temp directory lives inside it so the final move stays on one
    /// filesystem.
    pub fn for_output(destination: &Path) -> Result<Self> {
        if destination.file_name().is_none() {
            return Err(Error::invalid_input(format!(
                "output path has no file name: {}",
                destination.display()
            )));
        }

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let temp_dir = tempfile::Builder::new()
            .prefix(".reelsplice-")
            .tempdir_in(&parent)
            .map_err(|e| Error::Workspace(format!("failed to create temp dir: {e}")))?;

        Ok(Self {
            temp_dir,
            destination: destination.to_path_buf(),
        })
    }

    /// Where the result will be moved on finalize.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The output file path (same file name as the destination, inside the
    /// temp dir).
    pub fn output(&self) -> PathBuf {
        let file_name = self
            .destination
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("output"));
        self.temp_dir.path().join(file_name)
    }

    /// Path to the temporary directory.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a path for a named temporary file inside the workspace.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Move the output to the destination, replacing any existing file.
    ///
    /// An existing destination is renamed to a `.bak` sibling first and
    /// restored if the move fails.
    pub fn finalize(self) -> Result<PathBuf> {
        let output = self.output();
        let dest = &self.destination;

        if !output.exists() {
            return Err(Error::Workspace(format!(
                "output file does not exist: {}",
                output.display()
            )));
        }

        if dest.exists() {
            let backup = backup_path(dest);
            std::fs::rename(dest, &backup)
                .map_err(|e| Error::Workspace(format!("failed to back up existing output: {e}")))?;

            if let Err(e) = std::fs::rename(&output, dest) {
                let _ = std::fs::rename(&backup, dest);
                return Err(Error::Workspace(format!(
                    "failed to move output to destination: {e}"
                )));
            }

            let _ = std::fs::remove_file(&backup);
        } else {
            std::fs::rename(&output, dest).map_err(|e| {
                Error::Workspace(format!("failed to move output to destination: {e}"))
            })?;
        }

        tracing::debug!(path = %dest.display(), "workspace finalized");
        Ok(dest.clone())
    }
}

fn backup_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    dest.with_file_name(name)
}
