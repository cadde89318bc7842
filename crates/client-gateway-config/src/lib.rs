// crates/client-gateway-config/src/lib.rs
// ============================================================================
// Module: Client Gateway Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for client-gateway.toml semantics.
// Dependencies: client-gateway-core, serde, toml
// ============================================================================

//! ## Overview
//! `client-gateway-config` defines the configuration model for the gateway:
//! listener, broker connection, route tables, ownership lookup, audit, and
//! logging. Validation is strict and fail-closed; the route tables are
//! compiled during validation so a bad pattern never reaches the server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod defaults;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use defaults::DEFAULT_CORS_ORIGINS;
pub use defaults::DEFAULT_EXCLUDED_ROUTES;
pub use defaults::DEFAULT_OPTIONAL_ROUTES;
