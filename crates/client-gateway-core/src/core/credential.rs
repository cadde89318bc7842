// crates/client-gateway-core/src/core/credential.rs
// ============================================================================
// Module: Credential Extractor
// Description: Bearer token extraction from request headers.
// Purpose: Turn an Authorization header into an optional credential.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Extraction never fails: a missing header, another scheme, a lowercase
//! `bearer`, a lone token, or extra tokens all mean "no credential offered".

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::context::RequestContext;
use crate::core::identifiers::Credential;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// Accepted authorization scheme (case-sensitive).
pub const BEARER_SCHEME: &str = "Bearer";
/// Headers above this size are ignored.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts the bearer credential from the request headers.
#[must_use]
pub fn extract_bearer(context: &RequestContext) -> Option<Credential> {
    parse_bearer(context.header(AUTHORIZATION_HEADER))
}

/// Parses a raw `Authorization` header value.
#[must_use]
pub fn parse_bearer(header: Option<&str>) -> Option<Credential> {
    let header = header?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || scheme != BEARER_SCHEME {
        return None;
    }
    Some(Credential::new(token))
}
