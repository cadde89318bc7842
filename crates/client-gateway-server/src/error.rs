// crates/client-gateway-server/src/error.rs
// ============================================================================
// Module: HTTP Error Mapping
// Description: Error bodies for gate rejections and backend failures.
// Purpose: Translate pipeline and broker errors into HTTP responses.
// Dependencies: axum, client-gateway-broker, client-gateway-core, serde_json
// ============================================================================

//! ## Overview
//! Gateway-generated errors render as `{ statusCode, message, error }`.
//! Backend errors carried in a reply's `err` field keep their own shape when
//! they name an HTTP status; anything else becomes a 400 with
//! `{ status, message }`.
//!
//! Security posture: error bodies never include credentials or transport
//! internals beyond the failure class.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use client_gateway_broker::RpcFailure;
use client_gateway_core::GateRejection;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by middleware and handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A gate rejected the request.
    #[error("{0}")]
    Gate(GateRejection),
    /// The request could not be interpreted.
    #[error("{message}")]
    Request {
        /// Response status.
        status: StatusCode,
        /// Client-facing message.
        message: String,
    },
    /// The gateway failed while serving the request.
    #[error("{0}")]
    Internal(String),
    /// The backend round trip failed.
    #[error("{0}")]
    Rpc(RpcFailure),
}

impl ApiError {
    /// Builds a 400 error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Request {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Returns the HTTP status the error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Gate(rejection) => StatusCode::from_u16(rejection.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Request {
                status, ..
            } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rpc(failure) => rpc_status(failure),
        }
    }
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        Self::Gate(rejection)
    }
}

impl From<RpcFailure> for ApiError {
    fn from(failure: RpcFailure) -> Self {
        Self::Rpc(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Gate(rejection) => gateway_body(status, rejection.to_string()),
            Self::Request {
                message, ..
            }
            | Self::Internal(message) => gateway_body(status, message),
            Self::Rpc(RpcFailure::Remote(err)) => remote_body(status, err),
            Self::Rpc(failure @ (RpcFailure::Timeout | RpcFailure::Unavailable(_))) => {
                warn!(failure = %failure, "backend request failed");
                gateway_body(status, failure.to_string())
            }
            Self::Rpc(RpcFailure::Malformed(reason)) => {
                warn!(reason = %reason, "backend reply malformed");
                gateway_body(status, "malformed backend reply".to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a broker failure to an HTTP status.
fn rpc_status(failure: &RpcFailure) -> StatusCode {
    match failure {
        RpcFailure::Remote(err) => remote_status(err).unwrap_or(StatusCode::BAD_REQUEST),
        RpcFailure::Timeout => StatusCode::GATEWAY_TIMEOUT,
        RpcFailure::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RpcFailure::Malformed(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Reads a usable HTTP status from a remote error object.
fn remote_status(err: &Value) -> Option<StatusCode> {
    let status = err.get("status").or_else(|| err.get("statusCode"))?.as_u64()?;
    let status = u16::try_from(status).ok()?;
    if !(100..=599).contains(&status) {
        return None;
    }
    StatusCode::from_u16(status).ok()
}

/// Renders a remote error: objects with a status pass through unchanged.
fn remote_body(status: StatusCode, err: Value) -> Value {
    if remote_status(&err).is_some() {
        return err;
    }
    let message = match err {
        Value::Object(mut map) => map.remove("message").unwrap_or(Value::Object(map)),
        other => other,
    };
    json!({ "status": status.as_u16(), "message": message })
}

/// Renders a gateway-generated error body.
fn gateway_body(status: StatusCode, message: String) -> Value {
    json!({
        "statusCode": status.as_u16(),
        "message": message,
        "error": status.canonical_reason().unwrap_or("Error"),
    })
}

#[cfg(test)]
mod tests;
