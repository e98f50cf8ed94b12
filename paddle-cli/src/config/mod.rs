//! Configuration module for paddle-cli.
//!
//! Handles loading configuration from a TOML file and applying CLI /
//! environment overrides, producing the SDK's [`ClientConfig`].

pub mod file;

use crate::config::file::FileConfig;
use paddle_sdk::ClientConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line or through the environment.
///
/// They take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub vendor_id: Option<String>,
    pub auth_code: Option<String>,
    pub public_key_file: Option<PathBuf>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file yields an empty config)
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Read the public key file, if any
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let mut file_config = self.read_file()?;

        if let Some(vendor_id) = &self.overrides.vendor_id {
            file_config.vendor.id = vendor_id.clone();
        }
        if let Some(auth_code) = &self.overrides.auth_code {
            file_config.vendor.auth_code = auth_code.clone();
        }
        if let Some(path) = &self.overrides.public_key_file {
            file_config.webhook.public_key = None;
            file_config.webhook.public_key_file = Some(path.clone());
        }

        self.validate(&file_config)?;

        let webhook = &file_config.webhook;
        let public_key = match (&webhook.public_key, &webhook.public_key_file) {
            (Some(key), _) => Some(key.clone()),
            (None, Some(path)) => Some(self.read_public_key(path)?),
            (None, None) => None,
        };

        let mut config = ClientConfig::new(file_config.vendor.id, file_config.vendor.auth_code)
            .with_server(file_config.server.url);
        if let Some(key) = public_key {
            config = config.with_public_key(key);
        }
        Ok(config)
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.config_path, "config file not found, using defaults");
                Ok(FileConfig::default())
            }
            Err(source) => Err(ConfigError::IoError {
                path: self.config_path.clone(),
                source,
            }),
        }
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.webhook.public_key.is_some() && config.webhook.public_key_file.is_some() {
            return Err(ConfigError::ValidationError(
                "webhook.public_key and webhook.public_key_file are mutually exclusive".to_string(),
            ));
        }
        if config.server.url.cannot_be_a_base() {
            return Err(ConfigError::ValidationError(format!(
                "server.url {} cannot be used as a base url",
                config.server.url
            )));
        }
        Ok(())
    }

    /// Key file paths are resolved relative to the config file.
    fn read_public_key(&self, path: &Path) -> Result<String, ConfigError> {
        let path = match self.config_path.parent() {
            Some(dir) if path.is_relative() && self.overrides.public_key_file.is_none() => {
                dir.join(path)
            }
            _ => path.to_path_buf(),
        };
        std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError { path, source })
    }
}
