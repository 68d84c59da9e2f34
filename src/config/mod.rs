//! Configuration management for ossaudit

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::errors::ConfigError;
use crate::models::Column;

/// Application name used for config and cache directories
pub const APP_NAME: &str = "ossaudit";

/// OSS Index component report endpoint
pub const DEFAULT_API_URL: &str = "https://ossindex.sonatype.org/api/v3/component-report";

/// OSS Index refuses requests with more coordinates than this
pub const MAX_BATCH_SIZE: usize = 128;

/// Environment variable overriding the configured username
pub const USERNAME_ENV: &str = "OSSAUDIT_USERNAME";

/// Environment variable overriding the configured token
pub const TOKEN_ENV: &str = "OSSAUDIT_TOKEN";

/// Configuration provider trait
pub trait ConfigProvider {
    /// Load configuration, from `explicit` if given or the default location otherwise
    fn load_config(&self, explicit: Option<&Path>) -> Result<OssauditConfig, ConfigError>;
}

/// Main configuration for ossaudit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OssauditConfig {
    /// OSS Index username
    pub username: Option<String>,

    /// OSS Index API token
    pub token: Option<String>,

    /// Table columns, in display order
    pub columns: Vec<String>,

    /// Vulnerability ids or CVEs that are never reported
    pub ignore_ids: Vec<String>,

    /// Interpreter used to list installed packages
    pub python: Option<String>,

    /// Component report endpoint
    pub api_url: String,

    /// Hours before a cached report is refetched
    pub cache_ttl_hours: u64,

    /// Coordinates per request
    pub batch_size: usize,
}

impl Default for OssauditConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            columns: vec![
                "name".to_string(),
                "version".to_string(),
                "title".to_string(),
            ],
            ignore_ids: Vec::new(),
            python: None,
            api_url: DEFAULT_API_URL.to_string(),
            cache_ttl_hours: 24,
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl OssauditConfig {
    /// Credentials, present only when both halves are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.token.as_deref()) {
            (Some(user), Some(token)) if !user.is_empty() && !token.is_empty() => {
                Some((user, token))
            }
            _ => None,
        }
    }

    /// Replace credentials with values from `lookup` where present
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(username) = lookup(USERNAME_ENV) {
            self.username = Some(username);
        }
        if let Some(token) = lookup(TOKEN_ENV) {
            self.token = Some(token);
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "batch-size".to_string(),
                message: format!("must be between 1 and {}", MAX_BATCH_SIZE),
            });
        }

        if self.columns.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "columns".to_string(),
                message: "at least one column is required".to_string(),
            });
        }

        for column in &self.columns {
            if Column::from_str(column.trim()).is_err() {
                let known: Vec<String> = Column::iter().map(|c| c.to_string()).collect();
                warn!(
                    "Unknown column '{}' will be empty (known columns: {})",
                    column,
                    known.join(", ")
                );
            }
        }

        Ok(())
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(APP_NAME);
    path.push("config.toml");
    Some(path)
}

/// TOML configuration provider
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    /// Path used when no explicit file is given
    default_path: Option<PathBuf>,

    /// Whether credential environment variables are honored
    use_env: bool,
}

impl Default for TomlConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigProvider {
    /// Create a new TOML configuration provider
    pub fn new() -> Self {
        Self {
            default_path: default_config_path(),
            use_env: true,
        }
    }

    /// Use a different default configuration path
    pub fn with_default_path(mut self, path: Option<PathBuf>) -> Self {
        self.default_path = path;
        self
    }

    /// Enable or disable credential environment variables
    pub fn with_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    /// Read configuration from a file
    fn read_config_file(&self, path: &Path) -> Result<OssauditConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn load_config(&self, explicit: Option<&Path>) -> Result<OssauditConfig, ConfigError> {
        let mut config = match (explicit, &self.default_path) {
            (Some(path), _) => {
                debug!("Loading config from {:?}", path);
                self.read_config_file(path)?
            }
            (None, Some(path)) if path.exists() => {
                debug!("Loading default config from {:?}", path);
                self.read_config_file(path)?
            }
            _ => {
                debug!("No config file found, using defaults");
                OssauditConfig::default()
            }
        };

        if self.use_env {
            config.apply_env_overrides(|key| env::var(key).ok().filter(|v| !v.is_empty()));
        }

        config.validate()?;
        Ok(config)
    }
}
