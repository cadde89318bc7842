// crates/client-gateway-core/src/core/principal.rs
// ============================================================================
// Module: Authenticated Principal
// Description: Caller identity resolved by the authentication service.
// Purpose: Carry subject, tenant, and opaque claims to downstream handlers.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Principal`] is the `user` object returned by the authentication
//! service, kept verbatim so handlers see every claim. The gateway only
//! interprets two fields: the subject and the tenant identifier.
//!
//! Wire names: the subject is read from `id`, `sub`, or `subject`; the
//! tenant from `businessId` or `tenantId`. Only string values count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Claim names accepted for the principal subject, in lookup order.
pub const SUBJECT_CLAIMS: &[&str] = &["id", "sub", "subject"];
/// Claim names accepted for the principal tenant, in lookup order.
pub const TENANT_CLAIMS: &[&str] = &["businessId", "tenantId"];

// ============================================================================
// SECTION: Principal
// ============================================================================

/// Authenticated identity attached to a request.
///
/// # Invariants
/// - Serializes and deserializes as a JSON object of claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal {
    /// Raw claims as returned by the authentication service.
    claims: Map<String, Value>,
}

impl Principal {
    /// Builds a principal from a claims object.
    #[must_use]
    pub const fn from_claims(claims: Map<String, Value>) -> Self {
        Self {
            claims,
        }
    }

    /// Builds a principal with the given subject and optional tenant.
    #[must_use]
    pub fn new(subject: impl Into<String>, tenant: Option<TenantId>) -> Self {
        let mut claims = Map::new();
        claims.insert("id".to_string(), Value::String(subject.into()));
        if let Some(tenant) = tenant {
            claims.insert("businessId".to_string(), Value::String(tenant.as_str().to_string()));
        }
        Self::from_claims(claims)
    }

    /// Returns the subject claim when present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        first_string_claim(&self.claims, SUBJECT_CLAIMS)
    }

    /// Returns the tenant the principal belongs to, when present.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        first_string_claim(&self.claims, TENANT_CLAIMS).map(TenantId::from)
    }

    /// Returns all claims.
    #[must_use]
    pub const fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// Returns the first non-empty string claim among `names`.
fn first_string_claim<'a>(claims: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| claims.get(*name).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}
