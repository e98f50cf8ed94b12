//! TOML file configuration structures.
//!
//! These structs directly map to the `paddle.toml` file format:
//!
//! ```toml
//! [vendor]
//! id = "12345"
//! auth_code = "0123456789abcdef"
//!
//! [webhook]
//! public_key_file = "paddle_public_key.pem"
//!
//! [server]
//! url = "https://sandbox-vendors.paddle.com/api/2.0"
//! ```

use paddle_sdk::config::default_server;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Vendor credentials section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorConfig {
    /// The vendor ID of the Paddle account.
    #[serde(default)]
    pub id: String,
    /// The API auth code of the Paddle account.
    #[serde(default)]
    pub auth_code: String,
}

/// Webhook verification section.
///
/// At most one of `public_key` and `public_key_file` may be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Inline PEM encoded public key.
    pub public_key: Option<String>,
    /// Path to a PEM file, relative to the config file.
    pub public_key_file: Option<PathBuf>,
}

/// API server section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Prefix for every request path.
    #[serde(default = "default_server")]
    pub url: Url,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server(),
        }
    }
}
