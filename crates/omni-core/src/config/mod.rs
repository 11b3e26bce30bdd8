//! Configuration management for Omni.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults, then the `USE_MOCK_RESPONSES` environment variable is applied on
//! top so deployments can flip the engine mode without editing the file.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that selects mock vs model-backed responses.
pub const USE_MOCK_ENV: &str = "USE_MOCK_RESPONSES";

/// Root configuration structure for Omni.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Request limits
    pub limits: LimitsConfig,

    /// Batch settings
    pub batch: BatchConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist. Environment
    /// overrides are applied in both cases.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the default config file, or defaults if it doesn't exist, without
    /// environment overrides.
    pub fn load_file() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment, returning what changed.
    pub fn apply_env_overrides(&mut self) -> Vec<EnvOverride> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<EnvOverride> {
        let mut applied = Vec::new();
        if let Some(value) = lookup(USE_MOCK_ENV) {
            self.engine.use_mock = parse_use_mock(&value);
            tracing::debug!("{USE_MOCK_ENV}={value} -> use_mock={}", self.engine.use_mock);
            applied.push(EnvOverride {
                section: "engine",
                key: "use_mock",
                var: USE_MOCK_ENV,
                value,
            });
        }
        applied
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.omni.omni/config.toml
    /// - Linux: ~/.config/omni/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\omni\config\config.toml
    ///
    /// Falls back to ~/.omni/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "omni", "omni")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".omni").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.engine.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// A config value replaced by an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    /// TOML table the key lives in
    pub section: &'static str,
    pub key: &'static str,
    pub var: &'static str,
    /// Raw variable value
    pub value: String,
}

/// Only a case-insensitive "true" selects mock mode.
pub fn parse_use_mock(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
