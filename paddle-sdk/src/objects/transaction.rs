use serde::{Deserialize, Serialize};

/// Resource kinds whose transactions can be listed via
/// `POST /{entity}/{id}/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionEntity {
    #[serde(rename = "users", alias = "user")]
    User,
    Subscription,
    Order,
    Checkout,
}

impl TransactionEntity {
    /// Path segment used by the vendor API.
    pub fn as_path(&self) -> &'static str {
        match self {
            TransactionEntity::User => "users",
            TransactionEntity::Subscription => "subscription",
            TransactionEntity::Order => "order",
            TransactionEntity::Checkout => "checkout",
        }
    }
}

impl std::fmt::Display for TransactionEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

impl std::str::FromStr for TransactionEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "users" => Ok(TransactionEntity::User),
            "subscription" => Ok(TransactionEntity::Subscription),
            "order" => Ok(TransactionEntity::Order),
            "checkout" => Ok(TransactionEntity::Checkout),
            other => Err(format!("unknown transaction entity: {other}")),
        }
    }
}
