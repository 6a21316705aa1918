use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Empty the document when a load fails. History is cleared either way.
    pub reset_on_load_failure: bool,
    /// Record timing for every session operation
    pub record_metrics: bool,
    /// Number of operation records kept
    pub max_metrics: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            reset_on_load_failure: true,
            record_metrics: true,
            max_metrics: 1000,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
