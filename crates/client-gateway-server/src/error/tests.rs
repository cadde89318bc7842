// crates/client-gateway-server/src/error/tests.rs
// ============================================================================
// Module: HTTP Error Mapping Tests
// Description: Unit tests for status and body translation.
// Purpose: Pin the status codes clients observe for each failure class.
// Dependencies: client-gateway-server, axum
// ============================================================================

//! ## Overview
//! Status mapping for gate rejections and broker failures.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use axum::http::StatusCode;
use client_gateway_broker::RpcFailure;
use client_gateway_core::GateRejection;
use serde_json::json;

use super::ApiError;
use super::remote_body;

#[test]
fn gate_rejections_keep_their_status() {
    assert_eq!(ApiError::from(GateRejection::MissingCredential).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::from(GateRejection::InvalidCredential).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::from(GateRejection::OwnershipMismatch).status(), StatusCode::FORBIDDEN);
}

#[test]
fn remote_status_passes_through() {
    let err = ApiError::from(RpcFailure::Remote(json!({ "status": 404, "message": "not found" })));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn remote_status_out_of_range_falls_back_to_bad_request() {
    let err = ApiError::from(RpcFailure::Remote(json!({ "status": 42, "message": "odd" })));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    let err = ApiError::from(RpcFailure::Remote(json!({ "status": "500" })));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn remote_strings_become_bad_request_bodies() {
    let body = remote_body(StatusCode::BAD_REQUEST, json!("Invalid payload"));
    assert_eq!(body, json!({ "status": 400, "message": "Invalid payload" }));
}

#[test]
fn remote_objects_without_status_keep_their_message() {
    let body = remote_body(StatusCode::BAD_REQUEST, json!({ "message": "duplicate name" }));
    assert_eq!(body, json!({ "status": 400, "message": "duplicate name" }));
}

#[test]
fn transport_failures_map_to_gateway_statuses() {
    assert_eq!(ApiError::from(RpcFailure::Timeout).status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        ApiError::from(RpcFailure::Unavailable("no responders".to_string())).status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        ApiError::from(RpcFailure::Malformed("bad json".to_string())).status(),
        StatusCode::BAD_GATEWAY
    );
}
