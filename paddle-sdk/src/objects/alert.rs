//! Webhook ("alert") history types.

use serde::Serialize;

/// Query for `POST /alert/webhooks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_per_page: Option<u32>,
    /// Date-time (`YYYY-MM-DD HH:MM:SS`) from which to begin the history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_head: Option<String>,
}
