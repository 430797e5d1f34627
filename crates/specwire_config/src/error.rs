//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Secrets file not found: {0}")]
    NotFound(PathBuf),

    #[error("Missing configuration value: {setting} (tried: {tried})")]
    Missing { setting: String, tried: String },

    #[error("Invalid configuration value for {setting}: {message}")]
    Invalid { setting: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// Build a `Missing` error listing the alias spellings that were checked.
    pub fn missing(setting: impl Into<String>, aliases: &[&str]) -> Self {
        Self::Missing {
            setting: setting.into(),
            tried: aliases.join(", "),
        }
    }
}
