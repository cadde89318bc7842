// crates/client-gateway-core/src/runtime/ownership.rs
// ============================================================================
// Module: Ownership Gate
// Description: Tenant ownership enforcement for authenticated callers.
// Purpose: Reject requests that reference another tenant's resources.
// Dependencies: crate::{core, interfaces}, serde_json, tracing
// ============================================================================

//! ## Overview
//! The ownership gate runs after authentication. It looks for a tenant
//! reference in the route parameters, then the JSON body, then the query
//! string, and compares the first present one against the caller's tenant.
//!
//! Presence follows loose truthiness: `null`, `false`, `0`, and the empty
//! string count as absent. Any other non-string value (object, array, `true`,
//! non-zero number, or a repeated query key) is a present reference that can
//! never equal a tenant identifier.
//!
//! Security posture: the comparison is exact; a caller without a tenant
//! matches nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::num::FpCategory;
use std::sync::Arc;

use serde_json::Number;
use serde_json::Value;
use tracing::debug;

use crate::core::context::RequestContext;
use crate::core::identifiers::RouteKey;
use crate::core::rejection::GateRejection;
use crate::interfaces::AuthAuditSink;
use crate::runtime::audit::AuthAuditEvent;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default wire name of the tenant reference.
pub const DEFAULT_TENANT_FIELD: &str = "businessId";
/// Default route parameter aliases, in lookup order.
pub const DEFAULT_PARAM_ALIASES: &[&str] = &["businessId", "id"];

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Where the ownership gate looks for tenant references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipPolicy {
    /// Route parameter names checked in order.
    pub param_aliases: Vec<String>,
    /// Top-level JSON body field.
    pub body_field: String,
    /// Query string key.
    pub query_field: String,
}

impl Default for OwnershipPolicy {
    fn default() -> Self {
        Self {
            param_aliases: DEFAULT_PARAM_ALIASES.iter().map(|alias| (*alias).to_string()).collect(),
            body_field: DEFAULT_TENANT_FIELD.to_string(),
            query_field: DEFAULT_TENANT_FIELD.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Successful ownership gate outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipOutcome {
    /// Route is registered as exempt.
    Exempt,
    /// No principal on the request.
    Anonymous,
    /// Request names no tenant.
    NoTenantReference,
    /// Referenced tenant equals the caller's tenant.
    Matched,
}

impl OwnershipOutcome {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exempt => "exempt",
            Self::Anonymous => "anonymous",
            Self::NoTenantReference => "no_tenant_reference",
            Self::Matched => "matched",
        }
    }
}

/// A tenant reference found in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TenantReference<'a> {
    /// Non-empty string reference.
    Text(&'a str),
    /// Truthy non-string reference.
    Opaque,
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Ownership gate shared by all requests.
#[derive(Clone)]
pub struct OwnershipGate {
    /// Reference lookup policy.
    policy: OwnershipPolicy,
    /// Routes that skip the ownership check.
    exemptions: Arc<BTreeSet<RouteKey>>,
    /// Audit sink for decisions.
    audit: Arc<dyn AuthAuditSink>,
}

impl OwnershipGate {
    /// Builds a gate from a policy, exemption table, and audit sink.
    #[must_use]
    pub fn new(
        policy: OwnershipPolicy,
        exemptions: impl IntoIterator<Item = RouteKey>,
        audit: Arc<dyn AuthAuditSink>,
    ) -> Self {
        Self {
            policy,
            exemptions: Arc::new(exemptions.into_iter().collect()),
            audit,
        }
    }

    /// Returns true when the route skips the ownership check.
    #[must_use]
    pub fn is_exempt(&self, route: &RouteKey) -> bool {
        self.exemptions.contains(route)
    }

    /// Checks that the caller may touch the tenant the request references.
    ///
    /// # Errors
    ///
    /// Returns [`GateRejection::OwnershipMismatch`] when the referenced tenant
    /// differs from the caller's tenant.
    pub fn check(
        &self,
        route: &RouteKey,
        ctx: &RequestContext,
    ) -> Result<OwnershipOutcome, GateRejection> {
        if self.is_exempt(route) {
            return Ok(self.allow(ctx, OwnershipOutcome::Exempt));
        }
        let Some(principal) = ctx.principal() else {
            return Ok(self.allow(ctx, OwnershipOutcome::Anonymous));
        };
        let Some(reference) = self.tenant_reference(route, ctx) else {
            return Ok(self.allow(ctx, OwnershipOutcome::NoTenantReference));
        };
        let caller = principal.tenant_id();
        match (reference, caller) {
            (TenantReference::Text(requested), Some(caller)) if caller.as_str() == requested => {
                Ok(self.allow(ctx, OwnershipOutcome::Matched))
            }
            _ => {
                let rejection = GateRejection::OwnershipMismatch;
                self.audit.record(&AuthAuditEvent::ownership_denied(ctx, rejection));
                Err(rejection)
            }
        }
    }

    /// Resolves the effective tenant reference: params, then body, then query.
    fn tenant_reference<'a>(
        &self,
        route: &RouteKey,
        ctx: &'a RequestContext,
    ) -> Option<TenantReference<'a>> {
        let sources = [
            ("params", self.param_reference(ctx)),
            ("body", self.body_reference(ctx)),
            ("query", self.query_reference(ctx)),
        ];
        let mut present = sources
            .into_iter()
            .filter_map(|(source, reference)| reference.map(|reference| (source, reference)));
        let (chosen_source, chosen) = present.next()?;
        for (source, other) in present {
            if other != chosen {
                debug!(
                    route = %route,
                    chosen = chosen_source,
                    ignored = source,
                    "tenant references disagree; earlier source wins"
                );
            }
        }
        Some(chosen)
    }

    /// Returns the first non-empty aliased route parameter.
    fn param_reference<'a>(&self, ctx: &'a RequestContext) -> Option<TenantReference<'a>> {
        self.policy
            .param_aliases
            .iter()
            .filter_map(|alias| ctx.params.get(alias))
            .find(|value| !value.is_empty())
            .map(|value| TenantReference::Text(value.as_str()))
    }

    /// Returns the top-level body field when it is truthy.
    fn body_reference<'a>(&self, ctx: &'a RequestContext) -> Option<TenantReference<'a>> {
        let value = ctx.body.as_ref()?.as_object()?.get(&self.policy.body_field)?;
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(TenantReference::Text(text)),
            Value::Number(number) if is_zero(number) => None,
            Value::Number(_) | Value::Bool(true) | Value::Array(_) | Value::Object(_) => {
                Some(TenantReference::Opaque)
            }
        }
    }

    /// Returns the query reference; a repeated key is opaque.
    fn query_reference<'a>(&self, ctx: &'a RequestContext) -> Option<TenantReference<'a>> {
        match ctx.query_values(&self.policy.query_field).as_slice() {
            [] => None,
            [single] if single.is_empty() => None,
            [single] => Some(TenantReference::Text(*single)),
            _ => Some(TenantReference::Opaque),
        }
    }

    /// Records an allow decision and returns the outcome.
    fn allow(&self, ctx: &RequestContext, outcome: OwnershipOutcome) -> OwnershipOutcome {
        self.audit.record(&AuthAuditEvent::ownership_allowed(ctx, outcome.label()));
        outcome
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for numeric zero (including `-0` and `0.0`).
fn is_zero(number: &Number) -> bool {
    number.as_f64().is_some_and(|value| value.classify() == FpCategory::Zero)
}
