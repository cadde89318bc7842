// crates/client-gateway-server/src/middleware.rs
// ============================================================================
// Module: Gate Middleware
// Description: Runs the authorization pipeline in front of every route.
// Purpose: Build the request context, authenticate, and enforce ownership.
// Dependencies: axum, bytes, client-gateway-core, serde_json, url
// ============================================================================

//! ## Overview
//! The middleware is installed as a route layer, so it only sees requests the
//! router has matched. It buffers the body (bounded by the router's body
//! limit), builds a [`RequestContext`], then runs the authentication gate and
//! the ownership gate in that order. On success the enriched context is
//! stored in the request extensions for the handler.
//!
//! Bodies are read according to `Content-Type`: JSON (or no declared type)
//! is parsed as JSON, URL-encoded forms become a JSON object of strings, and
//! any other type is ignored.
//!
//! Security posture: any rejection short-circuits before the handler runs;
//! handlers never see a request the gates did not allow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::body::Body;
use axum::extract::FromRequest;
use axum::extract::MatchedPath;
use axum::extract::Query;
use axum::extract::RawPathParams;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use client_gateway_core::RequestContext;
use client_gateway_core::RouteKey;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::server::ServerState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying a caller-supplied request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Authenticates the request and enforces tenant ownership.
///
/// # Errors
///
/// Returns [`ApiError`] when the body cannot be read, the query or body is
/// malformed, or a gate rejects the request.
pub(crate) async fn authorize(
    State(state): State<Arc<ServerState>>,
    matched: MatchedPath,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = Bytes::from_request(Request::from_parts(parts.clone(), body), &())
        .await
        .map_err(|rejection| ApiError::Request {
            status: rejection.status(),
            message: rejection.body_text(),
        })?;

    let mut ctx = request_context(&parts, &params, &bytes)?;
    let route = RouteKey::new(parts.method.as_str(), matched.as_str());

    let outcome = state.authn.authenticate(&mut ctx).await?;
    let ownership = state.ownership.check(&route, &ctx)?;
    debug!(
        route = %route,
        authn = outcome.label(),
        ownership = ownership.label(),
        "request authorized"
    );

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the request context from the buffered request.
fn request_context(
    parts: &Parts,
    params: &RawPathParams,
    body: &[u8],
) -> Result<RequestContext, ApiError> {
    let mut ctx = RequestContext::new(parts.method.as_str(), parts.uri.path());
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            ctx.insert_header(name.as_str(), value);
        }
    }
    for (name, value) in params {
        ctx.params.insert(name.to_string(), value.to_string());
    }
    let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
        .map_err(|_| ApiError::bad_request("malformed query string"))?;
    ctx.query = query;
    let content_type = parts.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
    ctx.body = parse_body(content_type, body)?;
    ctx.request_id = ctx.header(REQUEST_ID_HEADER).map(str::to_string);
    Ok(ctx)
}

/// Body encodings the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    /// JSON, or no declared type.
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// Anything else; the body is not interpreted.
    Other,
}

/// Classifies a `Content-Type` header value.
fn body_kind(content_type: Option<&str>) -> BodyKind {
    let Some(content_type) = content_type else {
        return BodyKind::Json;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

/// Parses a request body according to its content type; an empty body is
/// absent.
fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match body_kind(content_type) {
        BodyKind::Json => serde_json::from_slice(body)
            .map(Some)
            .map_err(|_| ApiError::bad_request("request body must be valid JSON")),
        BodyKind::Form => Ok(Some(parse_form(body))),
        BodyKind::Other => Ok(None),
    }
}

/// Decodes a URL-encoded form; repeated keys collect into an array.
fn parse_form(body: &[u8]) -> Value {
    let mut fields = Map::new();
    for (name, value) in url::form_urlencoded::parse(body) {
        let value = Value::String(value.into_owned());
        match fields.get_mut(name.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                fields.insert(name.into_owned(), value);
            }
        }
    }
    Value::Object(fields)
}
