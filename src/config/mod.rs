mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::subtitle::StyleTable;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    prepare_styles(&mut config);

    Ok(config)
}

/// Parse TOML without touching the filesystem.
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./reelsplice.toml",
        "./config.toml",
        "~/.config/reelsplice/config.toml",
        "/etc/reelsplice/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Layer configured styles over the built-in table.
fn prepare_styles(config: &mut Config) {
    config.subtitles.styles = StyleTable::builtin().merged(&config.subtitles.styles);
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.extraction.max_workers == 0 {
        anyhow::bail!("extraction.max_workers must be at least 1");
    }

    if config.tools.timeout_secs == 0 {
        anyhow::bail!("tools.timeout_secs must be at least 1");
    }

    if config.merge.output_name.trim().is_empty() {
        anyhow::bail!("merge.output_name cannot be empty");
    }

    for (code, style) in config.subtitles.styles.iter() {
        if style.font_name.trim().is_empty() {
            anyhow::bail!("Subtitle style '{}' has no font name", code);
        }
        if style.font_size == 0 {
            anyhow::bail!("Subtitle style '{}' has a font size of 0", code);
        }
        if !is_ass_colour(&style.primary_color) {
            anyhow::bail!(
                "Subtitle style '{}' has colour '{}', expected &H followed by 8 hex digits",
                code,
                style.primary_color
            );
        }
    }

    for path in [&config.tools.ffmpeg_path, &config.tools.ffprobe_path]
        .into_iter()
        .flatten()
    {
        if !path.exists() {
            tracing::warn!("Configured tool path does not exist: {:?}", path);
        }
    }

    Ok(())
}

fn is_ass_colour(s: &str) -> bool {
    s.strip_prefix("&H")
        .map(|hex| hex.len() == 8 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .unwrap_or(false)
}
