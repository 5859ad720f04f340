//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials and browser
//! preferences.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig, TmdbConfig};
pub use paths::{config_file, log_file, resolve_config_dir};
