// crates/client-gateway-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared verifier doubles, audit sinks, and route tables.
// Purpose: Drive the gates without a broker.
// Dependencies: client-gateway-core, async-trait
// ============================================================================

//! ## Overview
//! In-memory collaborators for gate integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test fixtures use unwrap for clarity.")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use client_gateway_core::AuthAuditEvent;
use client_gateway_core::AuthAuditSink;
use client_gateway_core::AuthenticationGate;
use client_gateway_core::Credential;
use client_gateway_core::CredentialVerifier;
use client_gateway_core::OwnershipGate;
use client_gateway_core::OwnershipPolicy;
use client_gateway_core::Principal;
use client_gateway_core::RequestContext;
use client_gateway_core::RouteKey;
use client_gateway_core::RouteTable;
use client_gateway_core::TenantId;
use client_gateway_core::VerificationFailure;
use client_gateway_core::Verified;

/// Excluded rules used by the tests.
pub const EXCLUDED: &[(&str, &str)] = &[
    ("GET", r"^\/$"),
    ("GET", r"^\/api\/?$"),
    ("POST", r"^\/api\/auth\/login$"),
    ("POST", r"^\/api\/orders$"),
    ("GET", r"^\/api\/tables\/[0-9a-fA-F-]+\/[0-9a-fA-F-]+$"),
];

/// Optional rules used by the tests.
pub const OPTIONAL: &[(&str, &str)] = &[
    ("GET", r"^\/api\/products$"),
    ("GET", r"^\/api\/products\/\d+$"),
    ("GET", r"^\/api\/categories$"),
];

/// Builds the shared test route table.
pub fn route_table() -> RouteTable {
    RouteTable::compile(EXCLUDED.iter().copied(), OPTIONAL.iter().copied()).unwrap()
}

/// Verifier that accepts a fixed set of tokens and counts calls.
#[derive(Default)]
pub struct ScriptedVerifier {
    /// Accepted token -> (principal, rotated token).
    accepted: BTreeMap<String, (Principal, String)>,
    /// Failure returned for unknown tokens.
    failure: Option<VerificationFailure>,
    /// Number of verify calls.
    calls: AtomicUsize,
}

impl ScriptedVerifier {
    /// Accepts `token` for a subject in `tenant`, rotating it to `rotated`.
    pub fn accept(mut self, token: &str, subject: &str, tenant: Option<&str>, rotated: &str) -> Self {
        let principal = Principal::new(subject, tenant.map(TenantId::from));
        self.accepted.insert(token.to_string(), (principal, rotated.to_string()));
        self
    }

    /// Sets the failure returned for unknown tokens.
    pub fn failing_with(mut self, failure: VerificationFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Returns the number of verification calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for ScriptedVerifier {
    async fn verify(&self, credential: &Credential) -> Result<Verified, VerificationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.accepted.get(credential.expose()) {
            Some((principal, rotated)) => Ok(Verified {
                principal: principal.clone(),
                credential: Credential::new(rotated.clone()),
            }),
            None => Err(self
                .failure
                .clone()
                .unwrap_or_else(|| VerificationFailure::Rejected("Invalid token".to_string()))),
        }
    }
}

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Recorded events.
    events: Mutex<Vec<AuthAuditEvent>>,
}

impl RecordingSink {
    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<AuthAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuthAuditSink for RecordingSink {
    fn record(&self, event: &AuthAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Builds an authentication gate over the shared route table.
pub fn authn_gate(verifier: Arc<ScriptedVerifier>, sink: Arc<RecordingSink>) -> AuthenticationGate {
    AuthenticationGate::new(Arc::new(route_table()), verifier, sink)
}

/// Builds an ownership gate with default policy and the given exemptions.
pub fn ownership_gate(exempt: &[(&str, &str)], sink: Arc<RecordingSink>) -> OwnershipGate {
    let exemptions = exempt.iter().map(|(method, template)| RouteKey::new(*method, *template));
    OwnershipGate::new(OwnershipPolicy::default(), exemptions, sink)
}

/// Returns a context authenticated as a `tenant` member through the gate.
pub async fn authenticated(ctx: RequestContext, tenant: Option<&str>) -> RequestContext {
    let verifier = Arc::new(ScriptedVerifier::default().accept("good", "u1", tenant, "rotated"));
    let gate = authn_gate(verifier, Arc::new(RecordingSink::default()));
    let mut ctx = ctx.with_header("Authorization", "Bearer good");
    gate.authenticate(&mut ctx).await.unwrap();
    assert!(ctx.principal().is_some());
    ctx
}
