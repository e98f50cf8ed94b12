//! Product, coupon, plan and pay link endpoints.

use serde_json::Value;

use super::{BodyEncoding, ClientError, PaddleClient};
use crate::objects::pay_link::{PayLink, PayLinkRequest};
use crate::objects::product::{ListCoupons, ListPlans, ProductList};

impl PaddleClient {
    /// `POST /product/get_products`: list the current products.
    pub async fn get_products(&self) -> Result<ProductList, ClientError> {
        self.request("/product/get_products", &(), BodyEncoding::Form)
            .await
    }

    /// `POST /product/list_coupons`: list the coupons of a product.
    pub async fn get_product_coupons(&self, product_id: u64) -> Result<Value, ClientError> {
        self.request(
            "/product/list_coupons",
            &ListCoupons { product_id },
            BodyEncoding::Form,
        )
        .await
    }

    /// `POST /subscription/plans`: list subscription plans, optionally
    /// filtered to a single plan.
    pub async fn get_product_plans(&self, plan: Option<u64>) -> Result<Value, ClientError> {
        self.request("/subscription/plans", &ListPlans { plan }, BodyEncoding::Form)
            .await
    }

    /// `POST /product/generate_pay_link`: generate a custom checkout link.
    ///
    /// This endpoint takes a JSON body, unlike the rest of the API.
    pub async fn generate_pay_link(&self, body: &PayLinkRequest) -> Result<PayLink, ClientError> {
        self.request("/product/generate_pay_link", body, BodyEncoding::Json)
            .await
    }
}
