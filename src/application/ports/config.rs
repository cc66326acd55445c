//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    /// A missing file yields an empty config.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist configuration.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the configuration file.
    fn path(&self) -> PathBuf;

    /// Whether the configuration file exists.
    fn exists(&self) -> bool;

    /// Write a file holding the defaults. Fails if one already exists.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Load, treating unreadable files as empty (logged, not fatal)
    async fn load_or_empty(&self) -> AppConfig {
        match self.load().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %self.path().display(), error = %e, "ignoring config file");
                AppConfig::empty()
            }
        }
    }
}
