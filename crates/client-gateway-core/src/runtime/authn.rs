// crates/client-gateway-core/src/runtime/authn.rs
// ============================================================================
// Module: Authentication Gate
// Description: Route-aware bearer credential enforcement.
// Purpose: Decide whether a request may proceed and attach its identity.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! The authentication gate combines the route classifier, the credential
//! extractor, and the remote verifier:
//!
//! | class     | no credential   | verify ok       | verify failed   |
//! |-----------|-----------------|-----------------|-----------------|
//! | excluded  | allow           | (not inspected) | (not inspected) |
//! | optional  | allow anonymous | allow + identity| allow anonymous |
//! | mandatory | 401 missing     | allow + identity| 401 invalid     |
//!
//! Security posture: mandatory routes fail closed on every verifier failure,
//! including timeouts and transport errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::debug;

use crate::core::context::RequestContext;
use crate::core::credential::extract_bearer;
use crate::core::identifiers::Credential;
use crate::core::rejection::GateRejection;
use crate::core::routes::RouteClass;
use crate::core::routes::RouteTable;
use crate::interfaces::AuthAuditSink;
use crate::interfaces::CredentialVerifier;
use crate::runtime::audit::AuthAuditEvent;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Successful authentication gate outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Excluded route; credentials were not inspected.
    Public,
    /// Optional route without a credential.
    Anonymous,
    /// Optional route whose credential failed verification.
    Unverified,
    /// Credential verified; identity attached to the context.
    Authenticated,
}

impl AuthOutcome {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Anonymous => "anonymous",
            Self::Unverified => "unverified",
            Self::Authenticated => "authenticated",
        }
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Authentication gate shared by all requests.
#[derive(Clone)]
pub struct AuthenticationGate {
    /// Static route classification table.
    routes: Arc<RouteTable>,
    /// Remote credential verifier.
    verifier: Arc<dyn CredentialVerifier>,
    /// Audit sink for decisions.
    audit: Arc<dyn AuthAuditSink>,
}

impl AuthenticationGate {
    /// Builds a gate from its collaborators.
    #[must_use]
    pub fn new(
        routes: Arc<RouteTable>,
        verifier: Arc<dyn CredentialVerifier>,
        audit: Arc<dyn AuthAuditSink>,
    ) -> Self {
        Self {
            routes,
            verifier,
            audit,
        }
    }

    /// Returns the route table used for classification.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Authenticates the request, attaching the identity on success.
    ///
    /// # Errors
    ///
    /// Returns [`GateRejection::MissingCredential`] or
    /// [`GateRejection::InvalidCredential`] for mandatory routes.
    pub async fn authenticate(
        &self,
        ctx: &mut RequestContext,
    ) -> Result<AuthOutcome, GateRejection> {
        let class = self.routes.classify(&ctx.method, &ctx.path);
        if class == RouteClass::Excluded {
            return Ok(self.allow(ctx, class, AuthOutcome::Public, None, None));
        }

        let Some(presented) = extract_bearer(ctx) else {
            if class == RouteClass::Optional {
                return Ok(self.allow(ctx, class, AuthOutcome::Anonymous, None, None));
            }
            return Err(self.deny(ctx, class, GateRejection::MissingCredential, None, None));
        };

        match self.verifier.verify(&presented).await {
            Ok(verified) => {
                ctx.attach_identity(verified.principal, verified.credential);
                Ok(self.allow(ctx, class, AuthOutcome::Authenticated, Some(&presented), None))
            }
            Err(failure) => {
                debug!(
                    method = %ctx.method,
                    path = %ctx.path,
                    class = class.as_str(),
                    failure = failure.label(),
                    "credential verification failed"
                );
                let reason = Some(failure.to_string());
                if class == RouteClass::Optional {
                    return Ok(self.allow(
                        ctx,
                        class,
                        AuthOutcome::Unverified,
                        Some(&presented),
                        reason,
                    ));
                }
                Err(self.deny(
                    ctx,
                    class,
                    GateRejection::InvalidCredential,
                    Some(&presented),
                    reason,
                ))
            }
        }
    }

    /// Records an allow decision and returns the outcome.
    fn allow(
        &self,
        ctx: &RequestContext,
        class: RouteClass,
        outcome: AuthOutcome,
        presented: Option<&Credential>,
        reason: Option<String>,
    ) -> AuthOutcome {
        self.audit.record(&AuthAuditEvent::authn_allowed(
            ctx,
            class,
            outcome.label(),
            presented,
            reason,
        ));
        outcome
    }

    /// Records a deny decision and returns the rejection.
    fn deny(
        &self,
        ctx: &RequestContext,
        class: RouteClass,
        rejection: GateRejection,
        presented: Option<&Credential>,
        reason: Option<String>,
    ) -> GateRejection {
        self.audit.record(&AuthAuditEvent::authn_denied(ctx, class, rejection, presented, reason));
        rejection
    }
}
