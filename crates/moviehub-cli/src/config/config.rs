//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use moviehub_api::tmdb::MediaKind;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Default debounce interval for the search box.
const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Browser behaviour.
    #[serde(default)]
    pub ui: UiConfig,
}

/// TMDB connection configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key sent as the `api_key` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (defaults to TMDB v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Response language, e.g. "en-US".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Browser configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Delay after the last keystroke before a query is searched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Tab shown at startup.
    #[serde(default = "default_tab")]
    pub default_tab: MediaKind,
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_tab() -> MediaKind {
    MediaKind::Tv
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_tab: default_tab(),
        }
    }
}

impl UiConfig {
    /// Debounce interval as a `Duration`.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl TmdbConfig {
    /// Picks the API key: a non-empty environment value wins over the config file.
    #[must_use]
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|v| !v.trim().is_empty()))
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
