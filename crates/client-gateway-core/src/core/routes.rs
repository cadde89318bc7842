// crates/client-gateway-core/src/core/routes.rs
// ============================================================================
// Module: Route Classifier
// Description: Static route tables deciding how much authentication a route needs.
// Purpose: Classify (method, path) pairs as excluded, optional, or mandatory.
// Dependencies: regex, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`RouteTable`] holds two disjoint rule lists built once at startup.
//! Classification checks `excluded` first, then `optional`; anything left over
//! is mandatory.
//!
//! Matching rules:
//! - The method must equal the rule method exactly (case-sensitive).
//! - The path is searched with the rule's regular expression. Matching is
//!   unanchored, so rule authors anchor with `^...$` to avoid classifying
//!   sibling routes by prefix.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Route Class
// ============================================================================

/// Authentication requirement for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// No credential is required or inspected.
    Excluded,
    /// A credential is used when present and valid, never required.
    Optional,
    /// A valid credential is required.
    Mandatory,
}

impl RouteClass {
    /// Returns a stable label for the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Optional => "optional",
            Self::Mandatory => "mandatory",
        }
    }
}

// ============================================================================
// SECTION: Route Pattern
// ============================================================================

/// A single (method, path matcher) rule.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// HTTP method compared by exact equality.
    method: String,
    /// Compiled path matcher.
    matcher: Regex,
}

impl RoutePattern {
    /// Compiles a rule from a method and a regular expression source.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError`] when the method is empty or the pattern
    /// does not compile.
    pub fn new(method: impl Into<String>, pattern: &str) -> Result<Self, RouteTableError> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(RouteTableError::EmptyMethod(pattern.to_string()));
        }
        let matcher = Regex::new(pattern).map_err(|err| RouteTableError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            method,
            matcher,
        })
    }

    /// Returns the rule method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the regular expression source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Returns true when the rule applies to the request.
    #[must_use]
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method == method && self.matcher.is_match(path)
    }
}

// ============================================================================
// SECTION: Route Table
// ============================================================================

/// Immutable excluded/optional rule lists.
///
/// # Invariants
/// - Never mutated after construction; share with `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Routes that never require a credential.
    excluded: Vec<RoutePattern>,
    /// Routes where a credential is optional.
    optional: Vec<RoutePattern>,
}

impl RouteTable {
    /// Builds a table from compiled rule lists.
    #[must_use]
    pub const fn new(excluded: Vec<RoutePattern>, optional: Vec<RoutePattern>) -> Self {
        Self {
            excluded,
            optional,
        }
    }

    /// Compiles a table from `(method, pattern)` source pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError`] on the first rule that fails to compile.
    pub fn compile<'a>(
        excluded: impl IntoIterator<Item = (&'a str, &'a str)>,
        optional: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RouteTableError> {
        let excluded = excluded
            .into_iter()
            .map(|(method, pattern)| RoutePattern::new(method, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let optional = optional
            .into_iter()
            .map(|(method, pattern)| RoutePattern::new(method, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(excluded, optional))
    }

    /// Classifies a request by method and path.
    #[must_use]
    pub fn classify(&self, method: &str, path: &str) -> RouteClass {
        if self.excluded.iter().any(|rule| rule.matches(method, path)) {
            return RouteClass::Excluded;
        }
        if self.optional.iter().any(|rule| rule.matches(method, path)) {
            return RouteClass::Optional;
        }
        RouteClass::Mandatory
    }

    /// Returns the excluded rules.
    #[must_use]
    pub fn excluded(&self) -> &[RoutePattern] {
        &self.excluded
    }

    /// Returns the optional rules.
    #[must_use]
    pub fn optional(&self) -> &[RoutePattern] {
        &self.optional
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Route table construction failures.
#[derive(Debug, Error)]
pub enum RouteTableError {
    /// Rule has an empty method.
    #[error("route rule for pattern {0} has an empty method")]
    EmptyMethod(String),
    /// Rule pattern failed to compile.
    #[error("invalid route pattern {pattern}: {reason}")]
    InvalidPattern {
        /// Pattern source.
        pattern: String,
        /// Compiler error message.
        reason: String,
    },
}
