// crates/client-gateway-core/src/core/context.rs
// ============================================================================
// Module: Request Context
// Description: Per-request state observed and enriched by the gates.
// Purpose: Carry request inputs and the resolved identity to handlers.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`RequestContext`] is created fresh for every inbound request and dropped
//! when the response completes. The authentication gate is the only writer of
//! the identity; the ownership gate and handlers only read it.
//!
//! Invariants:
//! - The principal and credential are stored as one pair, so a principal is
//!   never present without its credential.
//! - Header names are stored lowercased.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::identifiers::Credential;
use crate::core::principal::Principal;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Mutable per-request state shared by the gates and the route handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// HTTP method in canonical uppercase form.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Route placeholders resolved by the router.
    pub params: BTreeMap<String, String>,
    /// Parsed JSON body, if any.
    pub body: Option<Value>,
    /// Query string pairs in arrival order (keys may repeat).
    pub query: Vec<(String, String)>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
    /// Request headers keyed by lowercase name.
    headers: BTreeMap<String, String>,
    /// Identity attached by the authentication gate.
    identity: Option<Identity>,
}

/// Principal and credential resolved for the request.
#[derive(Debug, Clone)]
struct Identity {
    /// Authenticated principal.
    principal: Principal,
    /// Freshest credential returned by the verifier.
    credential: Credential,
}

impl RequestContext {
    /// Builds a context for the given method and path.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the header set (name is lowercased).
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Returns a copy with the route parameter set.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Returns a copy with the JSON body set.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns a copy with a query pair appended.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Records a header under its lowercased name. When a header repeats,
    /// the first value is kept and later ones are dropped.
    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.entry(name.to_ascii_lowercase()).or_insert_with(|| value.into());
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns every value supplied for a query key, in arrival order.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query.iter().filter(|(key, _)| key == name).map(|(_, value)| value.as_str()).collect()
    }

    /// Returns the authenticated principal, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.identity.as_ref().map(|identity| &identity.principal)
    }

    /// Returns the credential paired with the principal, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.identity.as_ref().map(|identity| &identity.credential)
    }

    /// Attaches the verified identity. Reserved for the authentication gate.
    pub(crate) fn attach_identity(&mut self, principal: Principal, credential: Credential) {
        self.identity = Some(Identity {
            principal,
            credential,
        });
    }
}
