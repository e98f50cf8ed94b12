//! Webhook history and verification.

use serde_json::Value;

use super::{BodyEncoding, ClientError, PaddleClient};
use crate::objects::alert::WebhookHistoryQuery;
use crate::signature::WebhookPayload;

impl PaddleClient {
    /// `POST /alert/webhooks`: page through past webhook deliveries.
    pub async fn get_webhooks_history(
        &self,
        query: &WebhookHistoryQuery,
    ) -> Result<Value, ClientError> {
        self.request("/alert/webhooks", query, BodyEncoding::Form)
            .await
    }

    /// Check that a webhook payload was signed by Paddle.
    ///
    /// Returns `false` when no public key is configured or the payload does
    /// not verify for any reason.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use paddle_sdk::{PaddleClient, WebhookPayload};
    ///
    /// let client = PaddleClient::new("your-vendor-id", "your-auth-code")
    ///     .with_public_key(public_key_pem);
    ///
    /// // inside a handler receiving the form-encoded alert
    /// let payload = WebhookPayload::from_form(&body);
    /// if !client.verify_webhook_data(&payload) {
    ///     return StatusCode::FORBIDDEN;
    /// }
    /// ```
    pub fn verify_webhook_data(&self, payload: &WebhookPayload) -> bool {
        match self.config.webhook_verifier() {
            Some(verifier) => verifier.verify_webhook_data(payload),
            None => {
                tracing::warn!("webhook verification requested without a public key");
                false
            }
        }
    }
}
