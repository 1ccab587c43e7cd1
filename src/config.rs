//! Application configuration
//!
//! Layers, later ones winning:
//! 1. Built-in defaults
//! 2. `config.toml` in the user config directory (or an explicit path)
//! 3. `SVD_EXPLORER_*` environment variables
//! 4. Command line flags (applied by `main`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::state::params::{DEFAULT_PARAMETER, MAX_PARAMETER, MIN_PARAMETER};
use crate::upload::MAX_UPLOAD_BYTES;

/// Environment variable overriding `backend_url`
pub const ENV_BACKEND_URL: &str = "SVD_EXPLORER_BACKEND_URL";

/// Environment variable overriding `debounce_ms`
pub const ENV_DEBOUNCE_MS: &str = "SVD_EXPLORER_DEBOUNCE_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config as TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for the explorer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL of the upload / image / compression backend
    pub backend_url: String,
    /// Quiet period after the last slider change before a request is sent
    pub debounce_ms: u64,
    /// Slider value on open and after Reset
    pub default_quality: u16,
    /// Largest file the upload screen accepts
    pub max_upload_bytes: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            debounce_ms: 300,
            default_quality: DEFAULT_PARAMETER,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ExplorerConfig {
    /// Load the configuration from every layer except the command line.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Get the path where the config file is looked up by default
    ///
    /// - Linux: ~/.config/svd-explorer/config.toml
    /// - macOS: ~/Library/Application Support/svd-explorer/config.toml
    /// - Windows: %APPDATA%\svd-explorer\config.toml
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("svd-explorer");
        path.push("config.toml");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|url| !url.trim().is_empty()) {
            self.backend_url = url;
        }

        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            self.debounce_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be an integer, got {:?}", ENV_DEBOUNCE_MS, raw))
            })?;
        }

        Ok(self)
    }

    /// Check value ranges once all layers are applied.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.backend_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend_url must not be empty".into()));
        }
        if !(50..=2000).contains(&self.debounce_ms) {
            return Err(ConfigError::Invalid(format!(
                "debounce_ms must be within 50..=2000, got {}",
                self.debounce_ms
            )));
        }
        if !(MIN_PARAMETER..=MAX_PARAMETER).contains(&self.default_quality) {
            return Err(ConfigError::Invalid(format!(
                "default_quality must be within {}..={}, got {}",
                MIN_PARAMETER, MAX_PARAMETER, self.default_quality
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be positive".into()));
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
