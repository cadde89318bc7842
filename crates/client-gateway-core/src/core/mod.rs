// crates/client-gateway-core/src/core/mod.rs
// ============================================================================
// Module: Client Gateway Core Types
// Description: Data model for the request authorization pipeline.
// Purpose: Group identifiers, request context, route tables, and rejections.
// Dependencies: serde, regex, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data with no I/O. Route tables and policies are built
//! once at startup and shared read-only; [`RequestContext`] is owned by a
//! single request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod credential;
pub mod identifiers;
pub mod principal;
pub mod rejection;
pub mod routes;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::RequestContext;
pub use credential::AUTHORIZATION_HEADER;
pub use credential::BEARER_SCHEME;
pub use credential::extract_bearer;
pub use identifiers::Credential;
pub use identifiers::RouteKey;
pub use identifiers::TenantId;
pub use principal::Principal;
pub use rejection::GateRejection;
pub use routes::RouteClass;
pub use routes::RoutePattern;
pub use routes::RouteTable;
pub use routes::RouteTableError;
