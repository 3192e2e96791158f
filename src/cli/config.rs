//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sync::Strategy;

/// Default base URL of the notes API.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Base URL of the notes API
    pub api_url: Option<String>,

    /// Path of the local cache database
    pub cache: Option<PathBuf>,

    /// Commit strategy for remote-backed changes
    pub strategy: Option<Strategy>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Editor command for editing notes
    pub editor: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/memo/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memo")
            .join("config.toml")
    }

    /// Resolve the API base URL: CLI flag, then config file, then default.
    pub fn api_url(&self, cli_url: Option<&str>) -> String {
        cli_url
            .map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Resolve the cache database path.
    ///
    /// Precedence order:
    /// 1. CLI `--cache` argument
    /// 2. Config file `cache` setting
    /// 3. `<data dir>/memo/cache.db`
    pub fn cache_path(&self, cli_cache: Option<&PathBuf>) -> PathBuf {
        cli_cache
            .cloned()
            .or_else(|| self.cache.clone())
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("memo")
                    .join("cache.db")
            })
    }

    /// Resolve the commit strategy: CLI flag, then config file, then
    /// [`Strategy::Confirmed`].
    pub fn strategy(&self, cli_strategy: Option<Strategy>) -> Strategy {
        cli_strategy.or(self.strategy).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Resolve the editor command.
    ///
    /// Precedence order:
    /// 1. Config file `editor` setting
    /// 2. $EDITOR environment variable
    /// 3. $VISUAL environment variable
    /// 4. "vi" as fallback
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }
}
