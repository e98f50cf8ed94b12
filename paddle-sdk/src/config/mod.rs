//! Client configuration.
//!
//! These types hold the validated values the SDK needs. Loading them from
//! files or the environment is left to the application (see `paddle-cli`
//! for a TOML based loader).

use url::Url;

use crate::signature::WebhookVerifier;

/// Default vendor API endpoint.
pub const DEFAULT_SERVER_URL: &str = "https://vendors.paddle.com/api/2.0";

/// Placeholder sent when a credential is not configured.
///
/// The vendor API rejects it with an authentication error, which is easier
/// to diagnose than a request that omits the field entirely.
pub const MISSING_CREDENTIAL: &str = "MISSING";

/// Settings for a [`PaddleClient`](crate::client::PaddleClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Vendor ID of the Paddle account.
    pub vendor_id: String,
    /// API auth code of the Paddle account.
    pub auth_code: String,
    /// PEM encoded public key used to verify webhooks.
    pub public_key: Option<String>,
    /// Prefix for every request path.
    pub server: Url,
}

impl ClientConfig {
    /// Create a config pointing at [`DEFAULT_SERVER_URL`].
    ///
    /// Empty credentials are replaced with [`MISSING_CREDENTIAL`].
    pub fn new(vendor_id: impl Into<String>, auth_code: impl Into<String>) -> Self {
        Self {
            vendor_id: or_missing(vendor_id.into()),
            auth_code: or_missing(auth_code.into()),
            public_key: None,
            server: default_server(),
        }
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    pub fn with_server(mut self, server: Url) -> Self {
        self.server = server;
        self
    }

    /// Webhook verifier for the configured public key, if any.
    pub fn webhook_verifier(&self) -> Option<WebhookVerifier> {
        self.public_key.as_deref().map(WebhookVerifier::new)
    }

    /// Full URL of an API path such as `/product/get_products`.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.server.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}

fn or_missing(value: String) -> String {
    if value.is_empty() {
        MISSING_CREDENTIAL.to_owned()
    } else {
        value
    }
}

/// Parsed [`DEFAULT_SERVER_URL`].
pub fn default_server() -> Url {
    Url::parse(DEFAULT_SERVER_URL).expect("valid default server url")
}
