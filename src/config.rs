//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a notemark.toml in the working directory, and if present load settings from
//! there. Command line flags override whatever it says.

use crate::outline::MarkerMatch;
use facet::Facet;
use std::fs;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "notemark.toml";

#[derive(Debug, Error)]
/// Failures turning configuration text into a [`Config`].
pub enum ConfigError {
    /// The text is not TOML of the expected shape.
    #[error("invalid {CONFIG_FILE}: {0}")]
    Parse(String),
}

#[derive(Facet, Clone)]
/// User preferences loaded from notemark.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "notes.txt".to_string())]
    /// Document opened when no path is given on the command line.
    pub document_path: String,
    #[facet(default = 100)]
    /// Maximum line width for editor text wrapping.
    pub wrap_width: usize,
    #[facet(default = 400)]
    /// Two clicks on the same tree row within this many milliseconds form a double click.
    pub double_click_ms: u64,
    #[facet(default = false)]
    /// Match markers by plain prefix, so `##1` also matches `##10`.
    pub legacy_markers: bool,
    #[facet(default = String::new())]
    /// File receiving log output while the TUI runs; empty disables it.
    pub log_file: String,
    #[facet(default = 1)]
    /// Initial zoom factor (rows per visual line).
    pub zoom: u16,
}

impl Config {
    #[must_use]
    /// Load configuration from notemark.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string(CONFIG_FILE) {
            match Self::parse(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "using default configuration"),
            }
        }
        Self::parse("").unwrap()
    }

    /// Parse configuration text, filling in defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this configuration.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    #[must_use]
    /// Marker matching policy selected by `legacy_markers`.
    pub fn marker_match(&self) -> MarkerMatch {
        if self.legacy_markers {
            MarkerMatch::Prefix
        } else {
            MarkerMatch::Exact
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
