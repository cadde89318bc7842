// crates/client-gateway-core/src/core/identifiers.rs
// ============================================================================
// Module: Client Gateway Identifiers
// Description: Opaque identifiers for tenants, credentials, and routes.
// Purpose: Provide strongly typed wrappers with stable wire forms.
// Dependencies: serde, sha2
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings on the wire. [`Credential`] never exposes its
//! value through `Debug`; audit records use [`Credential::fingerprint`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Tenant Identifier
// ============================================================================

/// Tenant (business) identifier owning a resource.
///
/// # Invariants
/// - Opaque UTF-8 string; compared by exact equality, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new tenant identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Credential
// ============================================================================

/// Opaque bearer credential presented by a caller.
///
/// # Invariants
/// - The raw token is never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase hex SHA-256 digest of the token.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex_encode(&digest)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

// ============================================================================
// SECTION: Route Key
// ============================================================================

/// Identifies a registered route handler by method and route template.
///
/// The template is the router's own pattern (for example
/// `/api/orders/{businessId}`), not the concrete request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    /// HTTP method in canonical uppercase form.
    pub method: String,
    /// Route template as registered with the router.
    pub template: String,
}

impl RouteKey {
    /// Builds a route key.
    #[must_use]
    pub fn new(method: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            template: template.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
