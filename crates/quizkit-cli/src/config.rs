//! CLI configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use quizkit_core::adaptive::AdaptiveConfig;

/// `quizkit.toml` contents. Every section falls back to its defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Controller tuning (streak threshold, debounce window).
    pub adaptive: AdaptiveConfig,
}

/// Load config from an explicit path, or `quizkit.toml` in the working
/// directory when present, or the built-in defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<CliConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizkit.toml");
        local.exists().then_some(local)
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(CliConfig::default()),
    }
}
