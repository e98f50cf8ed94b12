//! Request parameter and response types for the Paddle vendor API.
//!
//! Parameter structs serialize to the exact field names the vendor API
//! expects; unset optional filters are omitted from the request body.

pub mod alert;
pub mod pay_link;
pub mod product;
pub mod subscription;
pub mod transaction;

use serde::{Deserialize, Serialize};

/// Error object returned when a response envelope has `"success": false`.
///
/// ```json
/// {"success": false, "error": {"code": 107, "message": "You don't have permission to access this resource"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Vendor credentials merged into every request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub vendor_id: &'a str,
    pub vendor_auth_code: &'a str,
}
