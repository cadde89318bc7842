// crates/client-gateway-core/tests/route_classifier.rs
// ============================================================================
// Module: Route Classifier Tests
// Description: Classification precedence and matching rules.
// ============================================================================
//! ## Overview
//! Validates excluded/optional/mandatory classification.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

mod common;

use client_gateway_core::RouteClass;
use client_gateway_core::RoutePattern;
use client_gateway_core::RouteTable;
use client_gateway_core::RouteTableError;

#[test]
fn excluded_routes_classify_as_excluded() {
    let table = common::route_table();
    assert_eq!(table.classify("GET", "/"), RouteClass::Excluded);
    assert_eq!(table.classify("GET", "/api"), RouteClass::Excluded);
    assert_eq!(table.classify("GET", "/api/"), RouteClass::Excluded);
    assert_eq!(table.classify("POST", "/api/orders"), RouteClass::Excluded);
    assert_eq!(table.classify("GET", "/api/tables/ab12-cd/ef34"), RouteClass::Excluded);
}

#[test]
fn optional_routes_classify_as_optional() {
    let table = common::route_table();
    assert_eq!(table.classify("GET", "/api/products"), RouteClass::Optional);
    assert_eq!(table.classify("GET", "/api/products/42"), RouteClass::Optional);
}

#[test]
fn unlisted_routes_are_mandatory() {
    let table = common::route_table();
    assert_eq!(table.classify("PATCH", "/api/roles/R1"), RouteClass::Mandatory);
    assert_eq!(table.classify("GET", "/api/orders"), RouteClass::Mandatory);
    assert_eq!(table.classify("GET", "/api/products/abc"), RouteClass::Mandatory);
}

#[test]
fn method_comparison_is_exact() {
    let table = common::route_table();
    assert_eq!(table.classify("post", "/api/orders"), RouteClass::Mandatory);
    assert_eq!(table.classify("DELETE", "/api/products"), RouteClass::Mandatory);
}

#[test]
fn excluded_takes_precedence_over_optional() {
    let table = RouteTable::compile([("GET", "^/api/items$")], [("GET", "^/api/items$")]).unwrap();
    assert_eq!(table.classify("GET", "/api/items"), RouteClass::Excluded);
}

#[test]
fn unanchored_patterns_match_anywhere() {
    let table = RouteTable::compile([("GET", "/docs")], std::iter::empty()).unwrap();
    assert_eq!(table.classify("GET", "/docs/index.html"), RouteClass::Excluded);
    assert_eq!(table.classify("GET", "/v2/docs"), RouteClass::Excluded);
}

#[test]
fn invalid_patterns_are_rejected() {
    let err = RoutePattern::new("GET", "^/api/(unclosed$").unwrap_err();
    assert!(matches!(err, RouteTableError::InvalidPattern { .. }));
    let err = RoutePattern::new("  ", "^/$").unwrap_err();
    assert!(matches!(err, RouteTableError::EmptyMethod(_)));
}
