use std::collections::BTreeMap;

use paddle_sdk::objects::pay_link::{PayLinkRequest, price};
use paddle_sdk::objects::subscription::{Pagination, PlanUsersFilter, SubscriptionState};
use paddle_sdk::{ClientError, PaddleClient, WebhookPayload};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VENDOR_ID: &str = "123";
const AUTH_CODE: &str = "auth-code";

fn client(server: &MockServer) -> PaddleClient {
    PaddleClient::new(VENDOR_ID, AUTH_CODE).with_server(Url::parse(&server.uri()).unwrap())
}

fn ok(response: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "response": response }))
}

/// Decode the form body of the only request the server received.
async fn form_body(server: &MockServer) -> BTreeMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

#[tokio::test]
async fn get_products_sends_credentials_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/get_products"))
        .and(header_regex("user-agent", r"^paddle-sdk/\d+"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ok(json!({
            "total": 1,
            "count": 1,
            "products": [{ "id": 489171, "name": "Pro plan", "base_price": 19.99, "currency": "USD" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server).get_products().await.unwrap();
    assert_eq!(products.total, 1);
    assert_eq!(products.products[0].id, 489171);
    assert_eq!(products.products[0].currency.as_deref(), Some("USD"));

    let body = form_body(&server).await;
    assert_eq!(body["vendor_id"], VENDOR_ID);
    assert_eq!(body["vendor_auth_code"], AUTH_CODE);
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn get_product_coupons_sends_product_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/list_coupons"))
        .respond_with(ok(json!([{ "coupon": "56604810", "discount_type": "percentage" }])))
        .mount(&server)
        .await;

    let coupons = client(&server).get_product_coupons(123).await.unwrap();
    assert_eq!(coupons[0]["coupon"], "56604810");
    assert_eq!(form_body(&server).await["product_id"], "123");
}

#[tokio::test]
async fn get_product_plans_omits_missing_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/plans"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    client(&server).get_product_plans(None).await.unwrap();
    assert!(!form_body(&server).await.contains_key("plan"));
}

#[tokio::test]
async fn get_plan_users_maps_filter_and_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/users"))
        .respond_with(ok(json!([{ "subscription_id": 502198, "state": "active" }])))
        .mount(&server)
        .await;

    let filter = PlanUsersFilter {
        subscription_id: Some(502198),
        state: Some(SubscriptionState::PastDue),
        ..Default::default()
    };
    let pagination = Pagination {
        page: Some(3),
        results_per_page: Some(50),
    };
    client(&server)
        .get_plan_users(&filter, &pagination)
        .await
        .unwrap();

    let body = form_body(&server).await;
    assert_eq!(body["subscription_id"], "502198");
    assert_eq!(body["state"], "past due");
    assert_eq!(body["page"], "3");
    assert_eq!(body["results_per_page"], "50");
    assert!(!body.contains_key("plan_id"));
}

#[tokio::test]
async fn update_subscription_plan_sends_prorate_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/users/update"))
        .respond_with(ok(json!({ "subscription_id": 12345, "plan_id": 525123 })))
        .mount(&server)
        .await;

    let result = client(&server)
        .update_subscription_plan(12345, 525123, true)
        .await
        .unwrap();
    assert_eq!(result["plan_id"], 525123);

    let body = form_body(&server).await;
    assert_eq!(body["subscription_id"], "12345");
    assert_eq!(body["plan_id"], "525123");
    assert_eq!(body["prorate"], "true");
}

#[tokio::test]
async fn cancel_subscription_returns_bare_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/users_cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let result = client(&server).cancel_subscription(12345).await.unwrap();
    assert_eq!(result, json!({ "success": true }));
    assert_eq!(form_body(&server).await["subscription_id"], "12345");
}

#[tokio::test]
async fn transactions_use_entity_paths() {
    let server = MockServer::start().await;
    for p in [
        "/users/7/transactions",
        "/subscription/8/transactions",
        "/order/9876543-123/transactions",
        "/checkout/abc/transactions",
    ] {
        Mock::given(method("POST"))
            .and(path(p))
            .respond_with(ok(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    client.get_user_transactions(7).await.unwrap();
    client.get_subscription_transactions(8).await.unwrap();
    client.get_order_transactions("9876543-123").await.unwrap();
    client.get_checkout_transactions("abc").await.unwrap();
}

#[tokio::test]
async fn webhooks_history_sends_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alert/webhooks"))
        .respond_with(ok(json!({ "current_page": 1, "data": [] })))
        .mount(&server)
        .await;

    let query = paddle_sdk::objects::alert::WebhookHistoryQuery {
        page: Some(1),
        alerts_per_page: Some(10),
        query_head: Some("2026-10-01 00:00:00".to_owned()),
    };
    client(&server).get_webhooks_history(&query).await.unwrap();

    let body = form_body(&server).await;
    assert_eq!(body["alerts_per_page"], "10");
    assert_eq!(body["query_head"], "2026-10-01 00:00:00");
}

#[tokio::test]
async fn generate_pay_link_sends_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/generate_pay_link"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "title": "my custom checkout",
            "custom_message": "some custom message",
            "prices": ["USD:19.99", "EUR:15.99"],
            "vendor_id": VENDOR_ID,
            "vendor_auth_code": AUTH_CODE
        })))
        .respond_with(ok(json!({ "url": "https://checkout.paddle.com/checkout/custom/eyJ0" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = PayLinkRequest {
        title: Some("my custom checkout".to_owned()),
        custom_message: Some("some custom message".to_owned()),
        prices: vec![price("USD", "19.99"), price("EUR", "15.99")],
        ..Default::default()
    };
    let link = client(&server).generate_pay_link(&request).await.unwrap();
    assert_eq!(link.url, "https://checkout.paddle.com/checkout/custom/eyJ0");
}

#[tokio::test]
async fn api_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/product/get_products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 107, "message": "You don't have permission to access this resource" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_products().await.unwrap_err();
    let ClientError::Api { url, error } = err else {
        panic!("expected api error");
    };
    assert!(url.path().ends_with("/product/get_products"));
    assert_eq!(error.code, 107);
}

#[tokio::test]
async fn http_status_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server).get_product_plans(Some(1)).await.unwrap_err();
    let ClientError::Status { status, body, .. } = err else {
        panic!("expected status error");
    };
    assert_eq!(status.as_u16(), 503);
    assert_eq!(body, "maintenance");
}

#[tokio::test]
async fn server_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/2.0/product/get_products"))
        .respond_with(ok(json!({ "total": 0, "count": 0, "products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/api/2.0", server.uri())).unwrap();
    let products = PaddleClient::new(VENDOR_ID, AUTH_CODE)
        .with_server(base)
        .get_products()
        .await
        .unwrap();
    assert!(products.products.is_empty());
}

#[test]
fn verify_webhook_data_without_key_is_false() {
    let payload: WebhookPayload = [("alert_id", "1"), ("p_signature", "AAAA")]
        .into_iter()
        .collect();
    assert!(!PaddleClient::new(VENDOR_ID, AUTH_CODE).verify_webhook_data(&payload));
}

#[test]
fn verify_webhook_data_with_key() {
    let payload: WebhookPayload = [
        ("alert_name", "subscription_created"),
        ("alert_id", "1"),
        ("p_signature", include_str!("fixtures/minimal.sig.b64").trim()),
    ]
    .into_iter()
    .collect();

    let client = PaddleClient::new(VENDOR_ID, AUTH_CODE)
        .with_public_key(include_str!("fixtures/vendor_public.pem"));
    assert!(client.verify_webhook_data(&payload));

    let other = PaddleClient::new(VENDOR_ID, AUTH_CODE)
        .with_public_key(include_str!("fixtures/other_public.pem"));
    assert!(!other.verify_webhook_data(&payload));
}
