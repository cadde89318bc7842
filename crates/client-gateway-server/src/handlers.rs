// crates/client-gateway-server/src/handlers.rs
// ============================================================================
// Module: Route Handlers
// Description: Health, token verification, and backend forwarding handlers.
// Purpose: Serve requests the gates have already allowed.
// Dependencies: axum, client-gateway-broker, client-gateway-core, time
// ============================================================================

//! ## Overview
//! Handlers read the [`RequestContext`] the gate middleware stored in the
//! request extensions. Forwarding handlers assemble one JSON payload from
//! the query string, body, and path parameters (later sources override
//! earlier ones), apply the route's tenant rule, and make one broker round
//! trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use client_gateway_broker::Pattern;
use client_gateway_core::Principal;
use client_gateway_core::RequestContext;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::catalog::TenantSource;
use crate::error::ApiError;
use crate::server::ServerState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Payload field carrying the tenant identifier.
pub const TENANT_FIELD: &str = "businessId";
/// Query fields forwarded as positive integers.
const PAGINATION_FIELDS: &[&str] = &["page", "limit", "categoryId"];
/// Version reported by the health check.
const GATEWAY_VERSION: &str = "2.0.0";

// ============================================================================
// SECTION: Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub(crate) struct HealthReport {
    /// Fixed `OK` status.
    status: &'static str,
    /// Human-readable message.
    message: &'static str,
    /// Current time (RFC 3339).
    timestamp: String,
    /// Seconds since the server started.
    uptime: f64,
    /// Gateway version.
    version: &'static str,
}

/// Reports gateway liveness.
pub(crate) async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthReport> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(HealthReport {
        status: "OK",
        message: "Client gateway is up and running!",
        timestamp,
        uptime: state.started.elapsed().as_secs_f64(),
        version: GATEWAY_VERSION,
    })
}

// ============================================================================
// SECTION: Token Verification
// ============================================================================

/// Returns the verified principal and the rotated token.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the context carries no credential.
pub(crate) async fn verify_token(
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Value>, ApiError> {
    let (Some(principal), Some(credential)) = (ctx.principal(), ctx.credential()) else {
        return Err(ApiError::Internal("Token not found in request".to_string()));
    };
    Ok(Json(json!({
        "user": principal.claims(),
        "token": credential.expose(),
    })))
}

// ============================================================================
// SECTION: Forwarding
// ============================================================================

/// Backend target of a forwarded route.
#[derive(Debug, Clone)]
pub(crate) struct ForwardRoute {
    /// HTTP method the route answers.
    pub(crate) method: Method,
    /// Backend message pattern.
    pub(crate) pattern: Pattern,
    /// Tenant injection rule.
    pub(crate) tenant: TenantSource,
    /// Route parameters forwarded as integers.
    pub(crate) numeric_params: &'static [&'static str],
}

/// Forwards the request payload to the route's backend handler.
///
/// # Errors
///
/// Returns [`ApiError`] when the payload cannot be built or the backend
/// round trip fails.
pub(crate) async fn forward(
    State(state): State<Arc<ServerState>>,
    Extension(route): Extension<Arc<ForwardRoute>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    let payload = build_payload(route.tenant, route.numeric_params, &ctx)?;
    let reply = state.client.send(&route.pattern, payload).await?;
    let status = if route.method == Method::POST { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(reply)).into_response())
}

/// Assembles the backend payload and applies the tenant rule.
///
/// Query pairs go in first, then the body, then the route parameters. Route
/// parameters always win, so a tenant the ownership gate checked in the path
/// cannot be replaced from the body or query string. Parameters named in
/// `numeric_params` and the pagination fields are forwarded as integers.
///
/// # Errors
///
/// Returns [`ApiError`] when the body is not an object, a numeric value does
/// not parse, or a required tenant cannot be resolved.
pub(crate) fn build_payload(
    tenant: TenantSource,
    numeric_params: &[&str],
    ctx: &RequestContext,
) -> Result<Value, ApiError> {
    let mut payload = Map::new();
    for (name, value) in &ctx.query {
        merge_query_value(&mut payload, name, value);
    }
    coerce_pagination(&mut payload)?;
    match &ctx.body {
        None | Some(Value::Null) => {}
        Some(Value::Object(body)) => {
            payload.extend(body.iter().map(|(name, value)| (name.clone(), value.clone())));
        }
        Some(_) => return Err(ApiError::bad_request("request body must be a JSON object")),
    }
    for (name, value) in &ctx.params {
        let value = if numeric_params.contains(&name.as_str()) {
            integer_param(value)?
        } else {
            Value::String(value.clone())
        };
        payload.insert(name.clone(), value);
    }

    let caller = ctx.principal().and_then(Principal::tenant_id);
    match tenant {
        TenantSource::Passthrough => {}
        TenantSource::Caller => match caller {
            Some(tenant) => {
                payload.insert(TENANT_FIELD.to_string(), Value::String(tenant.to_string()));
            }
            None => {
                payload.remove(TENANT_FIELD);
            }
        },
        TenantSource::CallerOrExplicit => {
            if let Some(tenant) = caller {
                payload.insert(TENANT_FIELD.to_string(), Value::String(tenant.to_string()));
            } else if !has_explicit_tenant(&payload) {
                return Err(ApiError::bad_request(
                    "businessId is required (bearer token or query parameter)",
                ));
            }
        }
    }
    Ok(Value::Object(payload))
}

/// Parses an integer route parameter.
fn integer_param(value: &str) -> Result<Value, ApiError> {
    value
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| ApiError::bad_request("Validation failed (numeric string is expected)"))
}

/// Converts pagination query values to positive integers.
fn coerce_pagination(payload: &mut Map<String, Value>) -> Result<(), ApiError> {
    for field in PAGINATION_FIELDS {
        let Some(value) = payload.get_mut(*field) else {
            continue;
        };
        let parsed = value
            .as_str()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|number| *number > 0)
            .ok_or_else(|| ApiError::bad_request(format!("{field} must be a positive number")))?;
        *value = Value::from(parsed);
    }
    Ok(())
}

/// Adds a query pair; repeated keys collect into an array.
fn merge_query_value(payload: &mut Map<String, Value>, name: &str, value: &str) {
    let value = Value::String(value.to_string());
    match payload.get_mut(name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            payload.insert(name.to_string(), value);
        }
    }
}

/// Returns true when the payload carries a non-empty tenant string.
fn has_explicit_tenant(payload: &Map<String, Value>) -> bool {
    payload.get(TENANT_FIELD).and_then(Value::as_str).is_some_and(|tenant| !tenant.is_empty())
}
