//! HTTP client for the Paddle vendor API.
//!
//! Gated behind the `client` cargo feature so applications that only
//! verify webhooks do not pull in `reqwest`.
//!
//! Every endpoint is a `POST` whose body carries the call's parameters
//! plus the vendor credentials (`vendor_id`, `vendor_auth_code`).

mod product;
mod subscription;
mod transaction;
mod webhook;

use reqwest::{Client, StatusCode, header::USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::objects::{ApiError, Credentials};

/// `User-Agent` sent with every request.
pub const USER_AGENT_VALUE: &str = concat!("paddle-sdk/", env!("CARGO_PKG_VERSION"));

/// Errors produced by [`PaddleClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("request {url} failed with status {status}: {body}")]
    Status {
        url: Url,
        status: StatusCode,
        body: String,
    },

    /// The vendor API answered `"success": false`.
    #[error("request {url} returned an error: {error}")]
    Api { url: Url, error: ApiError },

    /// Request parameters did not serialize to an object.
    #[error("request parameters must serialize to an object")]
    InvalidParams,

    /// Request or response body could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/x-www-form-urlencoded`, used by almost every endpoint.
    #[default]
    Form,
    /// `application/json`.
    Json,
}

/// Typed HTTP client for the Paddle **vendor API**.
#[derive(Debug, Clone)]
pub struct PaddleClient {
    http: Client,
    config: ClientConfig,
}

impl PaddleClient {
    /// Create a new `PaddleClient` against the default server.
    ///
    /// * `vendor_id`: the vendor ID of the Paddle account.
    /// * `auth_code`: the API auth code of the Paddle account.
    pub fn new(vendor_id: impl Into<String>, auth_code: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(vendor_id, auth_code))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Set the public key used by
    /// [`verify_webhook_data`](Self::verify_webhook_data).
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.config = self.config.with_public_key(public_key);
        self
    }

    /// Send requests to another server, e.g. the sandbox or a mock.
    pub fn with_server(mut self, server: Url) -> Self {
        self.config = self.config.with_server(server);
        self
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST {server}{path}` with `params` merged with the vendor
    /// credentials, returning the unwrapped `response` object.
    ///
    /// This is the building block of every endpoint method and can be used
    /// for endpoints the SDK does not wrap.
    pub async fn request<T, P>(
        &self,
        path: &str,
        params: &P,
        encoding: BodyEncoding,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path)?;
        let body = self.build_body(params)?;

        tracing::debug!(%url, ?encoding, "sending paddle request");

        let request = self.http.post(url.clone()).header(USER_AGENT, USER_AGENT_VALUE);
        let request = match encoding {
            BodyEncoding::Form => request.form(&form_pairs(&body)),
            BodyEncoding::Json => request.json(&body),
        };
        let resp = request.send().await?;

        parse_response(url, resp).await
    }

    fn build_body<P: Serialize + ?Sized>(
        &self,
        params: &P,
    ) -> Result<Map<String, Value>, ClientError> {
        let mut body = match serde_json::to_value(params)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ClientError::InvalidParams),
        };
        body.retain(|_, v| !v.is_null());

        let credentials = Credentials {
            vendor_id: &self.config.vendor_id,
            vendor_auth_code: &self.config.auth_code,
        };
        if let Value::Object(credentials) = serde_json::to_value(credentials)? {
            body.extend(credentials);
        }
        Ok(body)
    }
}

/// Flatten a JSON object into form fields.
///
/// Lists become PHP-style `key[]` entries; nested objects are sent as JSON
/// text.
fn form_pairs(body: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(body.len());
    for (key, value) in body {
        match value {
            Value::Array(items) => {
                let key = format!("{key}[]");
                pairs.extend(items.iter().map(|item| (key.clone(), form_scalar(item))));
            }
            other => pairs.push((key.clone(), form_scalar(other))),
        }
    }
    pairs
}

fn form_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn parse_response<T: DeserializeOwned>(
    url: Url,
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status { url, status, body });
    }
    let bytes = resp.bytes().await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    let value = unwrap_envelope(url, body)?;
    serde_json::from_value(value).map_err(ClientError::Json)
}

/// Unwrap `{"success": true, "response": ...}`.
///
/// Bodies without a boolean `success` field are returned unchanged. A
/// successful envelope whose `response` is missing or falsy (`null`, `false`,
/// `0`, `""`) yields the whole body.
fn unwrap_envelope(url: Url, mut body: Value) -> Result<Value, ClientError> {
    match body.get("success").and_then(Value::as_bool) {
        Some(true) if body.get("response").is_some_and(is_truthy) => {
            Ok(body["response"].take())
        }
        Some(true) => Ok(body),
        Some(false) => {
            let error = body
                .get("error")
                .cloned()
                .and_then(|e| serde_json::from_value::<ApiError>(e).ok())
                .unwrap_or_else(|| ApiError {
                    code: 0,
                    message: body.to_string(),
                });
            tracing::warn!(
                %url,
                code = error.code,
                message = %error.message,
                "paddle request failed"
            );
            Err(ClientError::Api { url, error })
        }
        None => Ok(body),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
