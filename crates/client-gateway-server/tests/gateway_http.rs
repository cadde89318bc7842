// crates/client-gateway-server/tests/gateway_http.rs
// ============================================================================
// Module: Gateway HTTP Tests
// Description: End-to-end tests through the HTTP server and gate middleware.
// Purpose: Validate classification, authentication, ownership, CORS, and routing.
// Dependencies: client-gateway-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Every test spawns a real listener and speaks HTTP to it. The broker is an
//! in-memory double, so verification and backend calls can be counted.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

mod common;

use client_gateway_broker::MemoryReply;
use client_gateway_broker::Pattern;
use client_gateway_config::GatewayConfig;
use reqwest::Method;
use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;

use common::TOKEN_NO_TENANT;
use common::TOKEN_SLOW;
use common::TOKEN_T1;
use common::broker;
use common::echo;
use common::spawn;
use common::spawn_with;

fn products() -> Pattern {
    Pattern::command("find_all_products")
}

fn create_product() -> Pattern {
    Pattern::command("create_product")
}

fn find_orders() -> Pattern {
    Pattern::topic("findAllOrders")
}

fn change_order_status() -> Pattern {
    Pattern::topic("changeOrderStatus")
}

fn find_product() -> Pattern {
    Pattern::command("find_one_product")
}

const ALLOWED_ORIGIN: &str = "http://localhost:4200";

// ============================================================================
// SECTION: Excluded Routes
// ============================================================================

#[tokio::test]
async fn health_check_is_public() {
    let gateway = spawn(broker()).await;
    let response = gateway.http.get(gateway.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Client gateway is up and running!");
    assert_eq!(body["version"], "2.0.0");
    assert!(body["uptime"].is_number());
    assert!(body["timestamp"].is_string());
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn excluded_route_ignores_presented_token() {
    let gateway = spawn(echo(broker(), &Pattern::topic("createOrder"))).await;
    let response = gateway
        .http
        .post(gateway.url("/api/orders"))
        .bearer_auth("whatever")
        .json(&json!({ "businessId": "T9", "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"]["businessId"], "T9");
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn anonymous_order_creation_is_allowed() {
    let gateway = spawn(echo(broker(), &Pattern::topic("createOrder"))).await;
    let response = gateway
        .http
        .post(gateway.url("/api/orders"))
        .json(&json!({ "businessId": "T9", "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(gateway.calls(&Pattern::topic("createOrder")), 1);
}

// ============================================================================
// SECTION: Optional Routes
// ============================================================================

#[tokio::test]
async fn anonymous_listing_with_business_id_is_forwarded() {
    let gateway = spawn(echo(broker(), &products())).await;
    let response =
        gateway.http.get(gateway.url("/api/products?businessId=B1&page=1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "businessId": "B1", "page": 1 }));
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn anonymous_listing_without_business_id_is_a_bad_request() {
    let gateway = spawn(echo(broker(), &products())).await;
    let response = gateway.http.get(gateway.url("/api/products")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "businessId is required (bearer token or query parameter)");
    assert_eq!(gateway.calls(&products()), 0);
}

#[tokio::test]
async fn listing_with_token_uses_the_callers_tenant() {
    let gateway = spawn(echo(broker(), &products())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/products?businessId=B9"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"]["businessId"], "T1");
    assert_eq!(gateway.verify_calls(), 1);
}

#[tokio::test]
async fn optional_route_with_rejected_token_proceeds_anonymously() {
    let gateway = spawn(echo(broker(), &products())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/products?businessId=B1"))
        .bearer_auth("forged")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"]["businessId"], "B1");
    assert_eq!(gateway.verify_calls(), 1);
}

// ============================================================================
// SECTION: Mandatory Routes
// ============================================================================

#[tokio::test]
async fn mandatory_route_without_token_is_unauthorized() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .json(&json!({ "name": "Latte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "statusCode": 401, "message": "Token not found", "error": "Unauthorized" })
    );
    assert_eq!(gateway.verify_calls(), 0);
    assert_eq!(gateway.calls(&create_product()), 0);
}

#[tokio::test]
async fn mandatory_route_with_non_bearer_scheme_is_unauthorized() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .header("authorization", format!("Basic {TOKEN_T1}"))
        .json(&json!({ "name": "Latte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn mandatory_route_with_rejected_token_is_unauthorized() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth("forged")
        .json(&json!({ "name": "Latte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid or expired token");
    assert_eq!(gateway.verify_calls(), 1);
    assert_eq!(gateway.calls(&create_product()), 0);
}

#[tokio::test]
async fn verifier_timeout_on_mandatory_route_is_unauthorized() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth(TOKEN_SLOW)
        .json(&json!({ "name": "Latte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_product_binds_the_callers_tenant() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth(TOKEN_T1)
        .json(&json!({ "name": "Latte", "price": 3.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "name": "Latte", "price": 3.5, "businessId": "T1" }));
}

// ============================================================================
// SECTION: Ownership
// ============================================================================

#[tokio::test]
async fn foreign_tenant_path_is_forbidden() {
    let gateway = spawn(echo(broker(), &find_orders())).await;
    let response =
        gateway.http.get(gateway.url("/api/orders/T2")).bearer_auth(TOKEN_T1).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 403);
    assert_eq!(body["error"], "Forbidden");
    assert_eq!(gateway.calls(&find_orders()), 0);
}

#[tokio::test]
async fn own_tenant_path_is_forwarded() {
    let gateway = spawn(echo(broker(), &find_orders())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/orders/T1?page=2"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "page": 2, "businessId": "T1" }));
}

#[tokio::test]
async fn foreign_tenant_body_is_forbidden() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth(TOKEN_T1)
        .json(&json!({ "name": "Latte", "businessId": "T2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(gateway.calls(&create_product()), 0);
}

#[tokio::test]
async fn body_tenant_cannot_redirect_a_checked_path_tenant() {
    let gateway = spawn(echo(broker(), &change_order_status())).await;
    let response = gateway
        .http
        .patch(gateway.url("/api/orders/T1/order/7"))
        .bearer_auth(TOKEN_T1)
        .json(&json!({ "status": "PREPARING", "businessId": "T2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "businessId": "T1", "id": 7, "status": "PREPARING" }));
}

#[tokio::test]
async fn repeated_authorization_header_uses_the_first_value() {
    let gateway = spawn(echo(broker(), &find_orders())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/orders/T1"))
        .bearer_auth(TOKEN_T1)
        .header("authorization", "Bearer good-t2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"]["businessId"], "T1");
}

#[tokio::test]
async fn principal_without_tenant_cannot_reference_one() {
    let gateway = spawn(echo(broker(), &find_orders())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/orders/T1"))
        .bearer_auth(TOKEN_NO_TENANT)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_update_is_scoped_by_the_callers_tenant() {
    let pattern = Pattern::topic("roles.update");
    let gateway = spawn(echo(broker(), &pattern)).await;
    let response = gateway
        .http
        .patch(gateway.url("/api/roles/R1"))
        .bearer_auth(TOKEN_T1)
        .json(&json!({ "name": "Supervisor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "roleId": "R1", "name": "Supervisor", "businessId": "T1" }));
}

// ============================================================================
// SECTION: Token Verification Endpoint
// ============================================================================

#[tokio::test]
async fn verify_endpoint_returns_rotated_token() {
    let gateway = spawn(broker()).await;
    let response = gateway
        .http
        .get(gateway.url("/api/auth/verify"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token"], "rotated-good-t1");
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["user"]["businessId"], "T1");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn verify_endpoint_requires_a_token() {
    let gateway = spawn(broker()).await;
    let response = gateway.http.get(gateway.url("/api/auth/verify")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SECTION: Request and Backend Failures
// ============================================================================

#[tokio::test]
async fn remote_error_status_passes_through() {
    let pattern = Pattern::topic("findOneOrder");
    let broker = broker().with_handler(&pattern, |_| {
        MemoryReply::Error(json!({ "status": 404, "message": "Order not found" }))
    });
    let gateway = spawn(broker).await;
    let response = gateway
        .http
        .get(gateway.url("/api/orders/T1/7"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": 404, "message": "Order not found" }));
}

#[tokio::test]
async fn missing_backend_is_service_unavailable() {
    let gateway = spawn(broker()).await;
    let response = gateway
        .http
        .get(gateway.url("/api/customization/themes"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_json_body_is_a_bad_request() {
    let gateway = spawn(echo(broker(), &Pattern::topic("createOrder"))).await;
    let response = gateway
        .http
        .post(gateway.url("/api/orders"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(&Pattern::topic("createOrder")), 0);
}

#[tokio::test]
async fn numeric_path_id_is_forwarded_as_an_integer() {
    let gateway = spawn(echo(broker(), &find_product())).await;
    let response =
        gateway.http.get(gateway.url("/api/products/5?businessId=B1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "businessId": "B1", "id": 5 }));
}

#[tokio::test]
async fn non_integer_path_id_is_a_bad_request() {
    let gateway = spawn(echo(broker(), &find_product())).await;
    let response = gateway
        .http
        .get(gateway.url("/api/products/abc"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed (numeric string is expected)");
    assert_eq!(gateway.calls(&find_product()), 0);
}

#[tokio::test]
async fn non_positive_pagination_is_a_bad_request() {
    let gateway = spawn(echo(broker(), &products())).await;
    let response =
        gateway.http.get(gateway.url("/api/products?businessId=B1&page=0")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(&products()), 0);
}

#[tokio::test]
async fn form_encoded_body_is_forwarded() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth(TOKEN_T1)
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Flat+White&price=3500")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["echo"], json!({ "name": "Flat White", "price": "3500", "businessId": "T1" }));
}

#[tokio::test]
async fn foreign_tenant_in_form_body_is_forbidden() {
    let gateway = spawn(echo(broker(), &create_product())).await;
    let response = gateway
        .http
        .post(gateway.url("/api/products"))
        .bearer_auth(TOKEN_T1)
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Latte&businessId=T2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(gateway.calls(&create_product()), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = GatewayConfig::default();
    config.server.max_body_bytes = 64;
    let gateway = spawn_with(&config, echo(broker(), &Pattern::topic("createOrder"))).await;
    let response = gateway
        .http
        .post(gateway.url("/api/orders"))
        .json(&json!({ "note": "x".repeat(1024) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_route_is_not_found_without_verification() {
    let gateway = spawn(broker()).await;
    let response = gateway
        .http
        .get(gateway.url("/api/unknown"))
        .bearer_auth(TOKEN_T1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(gateway.verify_calls(), 0);
}

// ============================================================================
// SECTION: CORS
// ============================================================================

#[tokio::test]
async fn preflight_from_allowed_origin_skips_the_gates() {
    let gateway = spawn(broker()).await;
    let response = gateway
        .http
        .request(Method::OPTIONS, gateway.url("/api/roles"))
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "PATCH")
        .header("access-control-request-headers", "authorization,content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert!(headers["access-control-allow-methods"].to_str().unwrap().contains("PATCH"));
    assert!(
        headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase()
            .contains("authorization")
    );
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn preflight_from_unknown_origin_gets_no_allow_origin() {
    let gateway = spawn(broker()).await;
    let response = gateway
        .http
        .request(Method::OPTIONS, gateway.url("/api/products"))
        .header("origin", "https://attacker.example")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn simple_request_carries_allow_origin_only_for_listed_origins() {
    let gateway = spawn(echo(broker(), &products())).await;
    let allowed = gateway
        .http
        .get(gateway.url("/api/products?businessId=B1"))
        .header("origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(allowed.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);

    let denied = gateway
        .http
        .get(gateway.url("/api/products?businessId=B1"))
        .header("origin", "https://attacker.example")
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::OK);
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn configured_origins_replace_the_defaults() {
    let mut config = GatewayConfig::default();
    config.server.cors_origins = vec!["https://shop.example.com".to_string()];
    let gateway = spawn_with(&config, broker()).await;
    let response = gateway
        .http
        .request(Method::OPTIONS, gateway.url("/api/products"))
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());

    let response = gateway
        .http
        .request(Method::OPTIONS, gateway.url("/api/products"))
        .header("origin", "https://shop.example.com")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "https://shop.example.com");
}
