use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::logging::LogConfig;

/// The kernel's own operating configuration: where the agent tree lives on
/// disk, how to reach the store, and how to log. Distinct from
/// `domain::models::agent_config::AgentConfig`, which is validated
/// per-agent business data, not process config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KernelConfig {
    /// Root directory under which `agents/<id>/...` is laid out.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Store connection and pool sizing.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            database: DatabaseConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

fn default_base_dir() -> String {
    ".foreman/data".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// `SQLite` connection URL, e.g. `sqlite://.foreman/foreman.db` or
    /// `sqlite::memory:` for ephemeral runs.
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://.foreman/foreman.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("base_dir cannot be empty")]
    EmptyBaseDir,

    #[error("database url cannot be empty")]
    EmptyDatabaseUrl,

    #[error("invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.foreman/config.yaml` (project config)
    /// 3. `FOREMAN_`-prefixed environment variables
    ///
    /// # Errors
    /// Returns an error if the merged configuration fails validation.
    pub fn load() -> Result<KernelConfig> {
        let config: KernelConfig = Figment::new()
            .merge(Serialized::defaults(KernelConfig::default()))
            .merge(Yaml::file(".foreman/config.yaml"))
            .merge(Env::prefixed("FOREMAN_").split("__"))
            .extract()
            .context("failed to extract kernel configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, skipping the project-local
    /// `.foreman/config.yaml` layer. Used by tests and `--config` overrides.
    ///
    /// # Errors
    /// Returns an error if the file can't be parsed or fails validation.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<KernelConfig> {
        let config: KernelConfig = Figment::new()
            .merge(Serialized::defaults(KernelConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// # Errors
    /// Returns the first validation failure found.
    pub fn validate(config: &KernelConfig) -> Result<(), ConfigError> {
        if config.base_dir.is_empty() {
            return Err(ConfigError::EmptyBaseDir);
        }
        if config.database.url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        Ok(())
    }
}
