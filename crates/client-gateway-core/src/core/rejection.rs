// crates/client-gateway-core/src/core/rejection.rs
// ============================================================================
// Module: Gate Rejections
// Description: Terminal reject outcomes produced by the gates.
// Purpose: Give the HTTP layer a status code and message for every reject.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Rejections are values, not panics or unwinding. The server layer renders
//! them as `{ statusCode, message, error }` bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Rejections
// ============================================================================

/// Reasons a gate refuses to let a request reach its handler.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Verifier failure subtypes are intentionally not distinguishable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    /// Mandatory route without a bearer credential.
    #[error("Token not found")]
    MissingCredential,
    /// Mandatory route whose credential failed verification.
    #[error("Invalid or expired token")]
    InvalidCredential,
    /// Authenticated caller referenced another tenant's resources.
    #[error("caller not entitled to this tenant's resources")]
    OwnershipMismatch,
}

impl GateRejection {
    /// Returns the HTTP status code for the rejection.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::MissingCredential | Self::InvalidCredential => 401,
            Self::OwnershipMismatch => 403,
        }
    }

    /// Returns the HTTP reason phrase for the status code.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self {
            Self::MissingCredential | Self::InvalidCredential => "Unauthorized",
            Self::OwnershipMismatch => "Forbidden",
        }
    }

    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::OwnershipMismatch => "ownership_mismatch",
        }
    }
}
