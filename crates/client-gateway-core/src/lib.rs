// crates/client-gateway-core/src/lib.rs
// ============================================================================
// Module: Client Gateway Core Library
// Description: Public API surface for the gateway authorization pipeline.
// Purpose: Expose request context, route tables, gates, and interfaces.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Client Gateway core holds the request authorization pipeline that every
//! inbound HTTP request passes through before reaching a route handler:
//! route classification, bearer credential extraction, remote verification,
//! and tenant ownership enforcement. It is transport-agnostic; the HTTP
//! server and broker client plug in through [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AuthAuditSink;
pub use interfaces::CredentialVerifier;
pub use interfaces::VerificationFailure;
pub use interfaces::Verified;
pub use runtime::AuthAuditEvent;
pub use runtime::AuthOutcome;
pub use runtime::AuthenticationGate;
pub use runtime::NoopAuditSink;
pub use runtime::OwnershipGate;
pub use runtime::OwnershipOutcome;
pub use runtime::OwnershipPolicy;
pub use runtime::TracingAuditSink;
