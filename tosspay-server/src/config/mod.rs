//! Configuration module for tosspay-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::{FileConfig, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tosspay_sdk::config::WebhookConfig;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
}

/// Configuration loader that handles the complete loading process.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    webhook_secret_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            webhook_secret_override: None,
        }
    }

    /// Replace the webhook secret from the file (e.g. with `TOSS_WEBHOOK_SECRET`).
    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret_override = secret;
        self
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(secret) = &self.webhook_secret_override {
            file_config.webhook.secret = secret.clone();
        }

        self.validate(&file_config)?;

        Ok(LoadedConfig {
            server: file_config.server,
            webhook: file_config.webhook,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.webhook.secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "webhook secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
