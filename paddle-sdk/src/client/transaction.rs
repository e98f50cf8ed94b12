//! Transaction listing endpoints.

use serde_json::Value;

use super::{BodyEncoding, ClientError, PaddleClient};
use crate::objects::transaction::TransactionEntity;

impl PaddleClient {
    /// `POST /{entity}/{id}/transactions`: list the transactions of a
    /// resource.
    pub async fn get_transactions(
        &self,
        entity: TransactionEntity,
        id: &str,
    ) -> Result<Value, ClientError> {
        let path = format!("/{}/{}/transactions", entity.as_path(), urlencoding::encode(id));
        self.request(&path, &(), BodyEncoding::Form).await
    }

    pub async fn get_user_transactions(&self, user_id: u64) -> Result<Value, ClientError> {
        self.get_transactions(TransactionEntity::User, &user_id.to_string())
            .await
    }

    pub async fn get_subscription_transactions(
        &self,
        subscription_id: u64,
    ) -> Result<Value, ClientError> {
        self.get_transactions(TransactionEntity::Subscription, &subscription_id.to_string())
            .await
    }

    /// Order IDs look like `9876543-123`, hence the string type.
    pub async fn get_order_transactions(&self, order_id: &str) -> Result<Value, ClientError> {
        self.get_transactions(TransactionEntity::Order, order_id)
            .await
    }

    pub async fn get_checkout_transactions(&self, checkout_id: &str) -> Result<Value, ClientError> {
        self.get_transactions(TransactionEntity::Checkout, checkout_id)
            .await
    }
}
