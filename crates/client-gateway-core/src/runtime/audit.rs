// crates/client-gateway-core/src/runtime/audit.rs
// ============================================================================
// Module: Gate Audit Events
// Description: Structured audit records for authentication and ownership.
// Purpose: Record every gate decision without leaking raw credentials.
// Dependencies: serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! Audit events are JSON-serializable records emitted once per gate decision.
//! Credentials appear only as SHA-256 fingerprints.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::context::RequestContext;
use crate::core::identifiers::Credential;
use crate::core::principal::Principal;
use crate::core::rejection::GateRejection;
use crate::core::routes::RouteClass;
use crate::interfaces::AuthAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Event name for authentication decisions.
pub const AUTHN_EVENT: &str = "gateway_authn";
/// Event name for ownership decisions.
pub const OWNERSHIP_EVENT: &str = "gateway_ownership";
/// Tracing target used by [`TracingAuditSink`].
pub const AUDIT_TARGET: &str = "client_gateway::audit";

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Gate audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    event: &'static str,
    /// Decision outcome (`allow` or `deny`).
    decision: &'static str,
    /// Outcome detail label.
    outcome: &'static str,
    /// HTTP method.
    method: String,
    /// Request path.
    path: String,
    /// Route classification, for authentication events.
    route_class: Option<RouteClass>,
    /// Caller subject when known.
    subject: Option<String>,
    /// Caller tenant when known.
    tenant_id: Option<String>,
    /// Bearer token fingerprint (sha256).
    token_fingerprint: Option<String>,
    /// Failure reason.
    reason: Option<String>,
    /// Request identifier (if provided).
    request_id: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an authentication allow event.
    #[must_use]
    pub fn authn_allowed(
        ctx: &RequestContext,
        class: RouteClass,
        outcome: &'static str,
        presented: Option<&Credential>,
        reason: Option<String>,
    ) -> Self {
        let mut event = Self::base(AUTHN_EVENT, "allow", outcome, ctx);
        event.route_class = Some(class);
        event.token_fingerprint = presented.map(Credential::fingerprint);
        event.reason = reason;
        event
    }

    /// Builds an authentication deny event.
    #[must_use]
    pub fn authn_denied(
        ctx: &RequestContext,
        class: RouteClass,
        rejection: GateRejection,
        presented: Option<&Credential>,
        reason: Option<String>,
    ) -> Self {
        let mut event = Self::base(AUTHN_EVENT, "deny", rejection.label(), ctx);
        event.route_class = Some(class);
        event.token_fingerprint = presented.map(Credential::fingerprint);
        event.reason = Some(reason.unwrap_or_else(|| rejection.to_string()));
        event
    }

    /// Builds an ownership allow event.
    #[must_use]
    pub fn ownership_allowed(ctx: &RequestContext, outcome: &'static str) -> Self {
        Self::base(OWNERSHIP_EVENT, "allow", outcome, ctx)
    }

    /// Builds an ownership deny event.
    #[must_use]
    pub fn ownership_denied(ctx: &RequestContext, rejection: GateRejection) -> Self {
        let mut event = Self::base(OWNERSHIP_EVENT, "deny", rejection.label(), ctx);
        event.reason = Some(rejection.to_string());
        event
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        self.event
    }

    /// Returns the decision label.
    #[must_use]
    pub const fn decision(&self) -> &'static str {
        self.decision
    }

    /// Returns the outcome detail label.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        self.outcome
    }

    /// Returns the recorded token fingerprint.
    #[must_use]
    pub fn token_fingerprint(&self) -> Option<&str> {
        self.token_fingerprint.as_deref()
    }

    /// Builds the fields shared by every event.
    fn base(
        event: &'static str,
        decision: &'static str,
        outcome: &'static str,
        ctx: &RequestContext,
    ) -> Self {
        let principal = ctx.principal();
        Self {
            event,
            decision,
            outcome,
            method: ctx.method.clone(),
            path: ctx.path.clone(),
            route_class: None,
            subject: principal.and_then(|principal| principal.subject()).map(str::to_string),
            tenant_id: principal
                .and_then(Principal::tenant_id)
                .map(|tenant| tenant.as_str().to_string()),
            token_fingerprint: None,
            reason: None,
            request_id: ctx.request_id.clone(),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that emits JSON payloads as `tracing` events.
pub struct TracingAuditSink;

impl AuthAuditSink for TracingAuditSink {
    fn record(&self, event: &AuthAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            if event.decision == "deny" {
                tracing::warn!(target: AUDIT_TARGET, event = event.event, "{payload}");
            } else {
                tracing::info!(target: AUDIT_TARGET, event = event.event, "{payload}");
            }
        }
    }
}

/// No-op audit sink for tests and disabled auditing.
pub struct NoopAuditSink;

impl AuthAuditSink for NoopAuditSink {
    fn record(&self, _event: &AuthAuditEvent) {}
}
