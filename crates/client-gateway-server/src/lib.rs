// crates/client-gateway-server/src/lib.rs
// ============================================================================
// Module: Client Gateway Server Library
// Description: HTTP front door for the client gateway.
// Purpose: Expose the server, route catalog, and HTTP error mapping.
// Dependencies: crate::{catalog, error, handlers, middleware, server}
// ============================================================================

//! ## Overview
//! An axum server that classifies, authenticates, and ownership-checks every
//! matched request before forwarding it to backend services over the broker.
//! Routes are declared once in [`catalog`]; the router and the ownership
//! exemption table are both derived from it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod error;
mod handlers;
mod middleware;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::RouteAction;
pub use catalog::RouteSpec;
pub use catalog::TenantSource;
pub use catalog::ownership_exemptions;
pub use catalog::route_catalog;
pub use error::ApiError;
pub use handlers::TENANT_FIELD;
pub use middleware::REQUEST_ID_HEADER;
pub use server::GatewayServer;
pub use server::GatewayServerError;
