//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Log file written while the browser owns the terminal.
const LOG_FILE: &str = "moviehub.log";

/// Resolves the config directory.
///
/// - If `dir` is `Some`, returns it unchanged.
/// - Otherwise returns `~/.config/moviehub`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home).join(".config").join("moviehub"))
}

/// `{dir}/config.toml`.
#[must_use]
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// `{dir}/moviehub.log`.
#[must_use]
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}
