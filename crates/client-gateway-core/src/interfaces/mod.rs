// crates/client-gateway-core/src/interfaces/mod.rs
// ============================================================================
// Module: Client Gateway Interfaces
// Description: Backend-agnostic seams for credential verification and audit.
// Purpose: Let transports and sinks plug into the gates without coupling.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The gates depend only on the traits defined here. The broker crate supplies
//! the production [`CredentialVerifier`]; tests supply in-memory doubles.
//! Security posture: verification is a trust boundary; any failure is treated
//! as "not verified".

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::identifiers::Credential;
use crate::core::principal::Principal;
use crate::runtime::audit::AuthAuditEvent;

// ============================================================================
// SECTION: Credential Verification
// ============================================================================

/// Successful verification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified {
    /// Identity the credential belongs to.
    pub principal: Principal,
    /// Rotated credential to store in place of the presented one.
    pub credential: Credential,
}

/// Verification failure causes.
///
/// The authentication gate handles every variant the same way; the split
/// exists for logging and audit only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// The round trip exceeded its deadline.
    #[error("verification timed out")]
    Timeout,
    /// The broker could not deliver the request or reply.
    #[error("verification transport failure: {0}")]
    Transport(String),
    /// The authentication service rejected the credential.
    #[error("credential rejected: {0}")]
    Rejected(String),
    /// The reply could not be decoded.
    #[error("malformed verification reply: {0}")]
    Malformed(String),
}

impl VerificationFailure {
    /// Returns a stable label for logs and audit records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::Rejected(_) => "rejected",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Remote credential verifier.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verifies a credential with the authentication service.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationFailure`] when the credential is not accepted or
    /// the service cannot be reached in time.
    async fn verify(&self, credential: &Credential) -> Result<Verified, VerificationFailure>;
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink for gate decisions.
pub trait AuthAuditSink: Send + Sync {
    /// Record a gate audit event.
    fn record(&self, event: &AuthAuditEvent);
}
