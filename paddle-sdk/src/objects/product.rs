//! Product catalogue types.

use serde::{Deserialize, Serialize};

/// `POST /product/get_products` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub total: u64,
    pub count: u64,
    pub products: Vec<Product>,
}

/// A one-off product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<serde_json::Value>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Parameters for `POST /product/list_coupons`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListCoupons {
    pub product_id: u64,
}

/// Parameters for `POST /subscription/plans`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListPlans {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<u64>,
}
