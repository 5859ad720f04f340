//! TUI module for interactive terminal interfaces.
//!
//! Uses `ratatui` + `crossterm` for rendering.

/// Movie/TV browser TUI.
pub mod browser;
