//! Builder for executing external tool commands with timeout support.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use reelsplice_common::{Error, Result};
use tokio::process::Command;

/// Default command timeout: 1 hour. Full-length stream copies are slow on
/// network storage.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// What a finished ffmpeg or ffprobe run left behind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    /// Lossy UTF-8. ffprobe JSON is read from here.
    pub stdout: String,
    pub stderr: String,
}

/// One external tool invocation. Cutters and concat strategies keep a
/// preconfigured instance and clone it per call.
///
/// # Example
///
/// ```no_run
/// use reelsplice_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> reelsplice_common::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffprobe"))
///     .args(["-v", "error", "-show_entries", "format=duration"])
///     .args(["-of", "json"])
///     .arg("/path/to/video.mp4")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn arg(&mut self, s: impl Into<OsString>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(&mut self, p: &Path) -> &mut Self {
        self.args.push(p.as_os_str().to_os_string());
        self
    }

    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<OsString>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Kill the process if it runs longer than `d`.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// The arguments collected so far.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Name used in error messages and logs.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run to completion, capturing both output streams.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if spawning fails, the process exits with a
    /// non-zero status (message includes stderr) or the timeout elapses. On
    /// timeout the child is killed.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self.program_name();

        tracing::debug!(
            tool = %program_name,
            args = ?self.args,
            "running external tool"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::tool(&program_name, format!("failed to spawn: {e}")))?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let tool_output = ToolOutput {
                    status: output.status,
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if !output.status.success() {
                    return Err(Error::tool(
                        program_name,
                        format!(
                            "exited with status {}: {}",
                            output.status,
                            last_lines(&tool_output.stderr, 5)
                        ),
                    ));
                }

                Ok(tool_output)
            }
            Ok(Err(e)) => Err(Error::tool(
                program_name,
                format!("I/O error waiting for process: {e}"),
            )),
            // The dropped future owns the child; kill_on_drop reaps it.
            Err(_elapsed) => Err(Error::tool(
                program_name,
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }
}

/// ffmpeg prints its banner before the actual error; keep the tail.
fn last_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.trim().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join(" | ")
}
