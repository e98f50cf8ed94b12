//! Custom pay link generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request body of `POST /product/generate_pay_link`.
///
/// Sent as JSON, so `prices` keeps its list form (`["USD:19.99", "EUR:15.99"]`).
/// Fields not modelled here can be passed through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthrough: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// `POST /product/generate_pay_link` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLink {
    pub url: String,
}

/// Format a `prices` entry, e.g. `price("USD", "19.99") == "USD:19.99"`.
pub fn price(currency: &str, amount: &str) -> String {
    format!("{currency}:{amount}")
}
