//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers the locations of ffmpeg and ffprobe once
//! and hands out preconfigured [`ToolCommand`]s to the rest of the crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reelsplice_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::command::{ToolCommand, DEFAULT_TIMEOUT};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// `[tools]` configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Custom ffmpeg path (uses PATH if not set).
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Custom ffprobe path (uses PATH if not set).
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Per-invocation timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ToolsConfig {
    fn custom_path(&self, name: &str) -> Option<&Path> {
        match name {
            "ffmpeg" => self.ffmpeg_path.as_deref(),
            "ffprobe" => self.ffprobe_path.as_deref(),
            _ => None,
        }
    }
}

/// A resolved tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub name: String,
    pub path: PathBuf,
    pub timeout: Duration,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// A configured path is used only if it exists; otherwise the tool is
    /// looked up with [`which::which`]. Tools that are not found are omitted
    /// and surface later through [`ToolRegistry::require`].
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let timeout = Duration::from_secs(tools_config.timeout_secs);
        let mut registry = Self::default();

        for &name in KNOWN_TOOLS {
            let resolved = match tools_config.custom_path(name) {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        tool = name,
                        path = %p.display(),
                        "configured tool path does not exist, searching PATH"
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                registry.register(name, path, timeout);
            }
        }

        registry
    }

    /// Register a tool at an explicit path.
    pub fn register(&mut self, name: &str, path: PathBuf, timeout: Duration) -> &mut Self {
        self.tools.insert(
            name.to_string(),
            ToolConfig {
                name: name.to_string(),
                path,
                timeout,
            },
        );
        self
    }

    /// Return the [`ToolConfig`] for the given tool, or [`Error::Tool`] if
    /// it was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools
            .get(name)
            .ok_or_else(|| Error::tool(name, format!("{name} not found; is it installed and in PATH?")))
    }

    /// A [`ToolCommand`] for the tool with its path and timeout applied.
    pub fn command(&self, name: &str) -> Result<ToolCommand> {
        let cfg = self.require(name)?;
        let mut cmd = ToolCommand::new(cfg.path.clone());
        cmd.timeout(cfg.timeout);
        Ok(cmd)
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(&cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_with_default_config() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        // Nothing is guaranteed to be installed; the call must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        let err = registry.require("ffmpeg").unwrap_err();
        assert!(err.to_string().contains("ffmpeg not found"));
    }

    #[test]
    fn check_all_returns_known_tools() {
        let infos = ToolRegistry::default().check_all();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ffmpeg", "ffprobe"]);
        assert!(infos.iter().all(|i| !i.available));
    }

    #[test]
    fn command_carries_configured_timeout() {
        let mut registry = ToolRegistry::default();
        registry.register("ffmpeg", PathBuf::from("/opt/ffmpeg/bin/ffmpeg"), Duration::from_secs(7));
        let cmd = registry.command("ffmpeg").unwrap();
        assert_eq!(cmd.program_name(), "ffmpeg");
        assert!(registry.command("ffprobe").is_err());
    }

    #[test]
    fn tools_config_defaults_from_toml_like_json() {
        let cfg: ToolsConfig = serde_json::from_str(r#"{"ffmpeg_path": "/usr/local/bin/ffmpeg"}"#).unwrap();
        assert_eq!(cfg.timeout_secs, 3600);
        assert!(cfg.ffprobe_path.is_none());
    }
}
