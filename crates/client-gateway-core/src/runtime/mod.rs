// crates/client-gateway-core/src/runtime/mod.rs
// ============================================================================
// Module: Client Gateway Runtime
// Description: Authentication gate, ownership gate, and audit sinks.
// Purpose: Run the per-request authorization pipeline.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Every routed request passes through [`AuthenticationGate`] and then
//! [`OwnershipGate`] before its handler runs. Both gates return explicit
//! `Result` values; the server layer renders rejections.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod authn;
pub mod ownership;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuthAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::TracingAuditSink;
pub use authn::AuthOutcome;
pub use authn::AuthenticationGate;
pub use ownership::OwnershipGate;
pub use ownership::OwnershipOutcome;
pub use ownership::OwnershipPolicy;
