//! Configuration loading
//!
//! Config lives in a JSON5 file, by default
//! `<config dir>/passkeep/config.json5`. A missing file yields defaults.
//! Environment variables override the file:
//! - `PASSKEEP_CONFIG`: path to the config file
//! - `PASSKEEP_BACKEND`: `keyring`, `memory` or `disabled`
//! - `PASSKEEP_LOG`: log filter directive

use crate::credentials::BackendKind;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "PASSKEEP_CONFIG";
pub const BACKEND_ENV: &str = "PASSKEEP_BACKEND";
pub const LOG_ENV: &str = "PASSKEEP_LOG";

const CONFIG_FILE_NAME: &str = "config.json5";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Credential vault to use
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(BACKEND_ENV) {
            self.backend = raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: BACKEND_ENV.to_string(),
                message,
            })?;
        }
        if let Some(level) = lookup(LOG_ENV).filter(|l| !l.trim().is_empty()) {
            self.logging.level = level;
        }
        Ok(())
    }
}

/// Resolve the config file path.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("passkeep")
        .join(CONFIG_FILE_NAME)
}

/// Load config from the resolved path and apply environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Load config from `path` without environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(Config::default());
    }

    json5::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
