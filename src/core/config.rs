//! Configuration file management.
//!
//! Handles reading, writing, and validating `envgroup.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "ENVGROUP_CONFIG";

/// Environment variable overriding the store location.
pub const STORE_ENV: &str = "ENVGROUP_STORE";

/// Configuration stored in `envgroup.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Metadata about the configuration file
    pub envgroup: Meta,
    /// Cluster this store serves
    pub cluster: ClusterConfig,
    /// Where versions and links are kept
    #[serde(default)]
    pub store: StoreConfig,
}

/// Metadata section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Configuration version
    pub version: String,
}

/// Cluster section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster identifier, part of every derived default group name
    pub id: u64,
}

/// Store section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: Backend,
    /// Store root for the filesystem backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Available storage backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Snapshots on local disk
    #[default]
    Filesystem,
    /// Process-local, discarded on exit
    Memory,
}

impl Config {
    /// Create a new configuration for `cluster_id` with current version
    pub fn new(cluster_id: u64) -> Self {
        Self {
            envgroup: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            cluster: ClusterConfig { id: cluster_id },
            store: StoreConfig::default(),
        }
    }

    /// Path to the configuration file.
    ///
    /// `ENVGROUP_CONFIG` if set, otherwise `envgroup.toml` in the current
    /// directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::CONFIG_FILE))
    }

    /// Check if a configuration file exists
    pub fn exists() -> bool {
        Self::config_path().exists()
    }

    /// Load configuration from the default path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            cluster = config.cluster.id,
            backend = ?config.store.backend,
            "config loaded"
        );

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - Version field is present and looks like semver
    /// - Cluster id is positive
    /// - A filesystem store path, if given, is not empty
    pub fn validate(&self) -> Result<()> {
        if self.envgroup.version.is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }

        let version_parts: Vec<&str> = self.envgroup.version.split('.').collect();
        if version_parts.len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!("not a valid semver: {}", self.envgroup.version),
            }
            .into());
        }

        if self.cluster.id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cluster.id",
                reason: "must be a positive integer".to_string(),
            }
            .into());
        }

        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "store.path",
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Resolve the filesystem store root.
    ///
    /// `ENVGROUP_STORE` wins over `store.path`, which wins over
    /// `~/.envgroup/store`.
    pub fn store_path(&self) -> Result<PathBuf> {
        self.store_path_with(std::env::var_os(STORE_ENV))
    }

    fn store_path_with(&self, env_override: Option<OsString>) -> Result<PathBuf> {
        if let Some(path) = env_override.filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(constants::STORE_DIR))
            .ok_or_else(|| {
                ConfigError::NoStorePath("unable to determine home directory".to_string()).into()
            })
    }
}
