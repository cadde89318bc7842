// crates/client-gateway-config/src/defaults.rs
// ============================================================================
// Module: Default Route Tables
// Description: Built-in excluded and optional route rules and CORS origins.
// Purpose: Provide the gateway's stock public and optional-auth routes.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Rules are `(method, pattern)` pairs. Every pattern is anchored so sibling
//! routes are not classified by prefix; `/docs` is intentionally a prefix
//! match so every documentation asset is public.

// ============================================================================
// SECTION: Excluded Routes
// ============================================================================

/// Routes that never require a credential.
pub const DEFAULT_EXCLUDED_ROUTES: &[(&str, &str)] = &[
    ("GET", r"^\/$"),
    ("GET", r"^\/api\/?$"),
    ("GET", r"^\/docs"),
    ("POST", r"^\/api\/auth\/login$"),
    ("POST", r"^\/api\/auth\/register\/business$"),
    ("POST", r"^\/api\/orders$"),
    ("GET", r"^\/api\/tables\/[0-9a-fA-F-]+\/[0-9a-fA-F-]+$"),
    ("GET", r"^\/api\/orders\/[a-fA-F0-9]{24}\/order-position-by-table\/[0-9a-fA-F-]+$"),
    ("GET", r"^\/api\/orders\/[a-fA-F0-9]{24}\/paid-order-by-table\/[0-9a-fA-F-]+$"),
    ("GET", r"^\/api\/customization\/themes$"),
    ("GET", r"^\/api\/customization\/themes\/\d+$"),
    ("POST", r"^\/api\/customization\/themes\/seed$"),
];

// ============================================================================
// SECTION: Optional Routes
// ============================================================================

/// Routes where a credential is used when valid but never required.
pub const DEFAULT_OPTIONAL_ROUTES: &[(&str, &str)] = &[
    ("GET", r"^\/api\/products$"),
    ("GET", r"^\/api\/products\/\d+$"),
    ("GET", r"^\/api\/products\/top-selling$"),
    ("GET", r"^\/api\/categories$"),
    ("GET", r"^\/api\/categories\/\d+$"),
    ("GET", r"^\/api\/customization\/[a-fA-F0-9]{24}$"),
];

// ============================================================================
// SECTION: CORS Origins
// ============================================================================

/// Browser origins allowed to call the gateway.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:4200",
    "http://localhost:4201",
    "https://z2j7v360-4200.use.devtunnels.ms",
    "https://s05phrls-4201.use.devtunnels.ms",
    "https://d3gwsdg49ynx4o.cloudfront.net",
    "https://d2wez1qp46w24p.cloudfront.net",
];
