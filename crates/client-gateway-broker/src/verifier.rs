// crates/client-gateway-broker/src/verifier.rs
// ============================================================================
// Module: Remote Verifier
// Description: Credential verification through the authentication service.
// Purpose: Implement the core verifier seam over the command client.
// Dependencies: async-trait, client-gateway-core, serde, serde_json
// ============================================================================

//! ## Overview
//! One round trip on the verification pattern carrying the raw token string.
//! The reply is `{ user, token }`: the principal's claims plus a rotated
//! token. No retries; every failure maps to a [`VerificationFailure`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use client_gateway_core::Credential;
use client_gateway_core::CredentialVerifier;
use client_gateway_core::Principal;
use client_gateway_core::VerificationFailure;
use client_gateway_core::Verified;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::client::CommandClient;
use crate::client::RpcFailure;
use crate::envelope::Pattern;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default verification pattern.
pub const VERIFY_PATTERN: &str = "auth.verify.user";

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Reply payload of the verification handler.
#[derive(Debug, Deserialize)]
struct VerifyReply {
    /// Principal claims.
    user: Map<String, Value>,
    /// Rotated token.
    token: String,
}

/// Verifier backed by the authentication service.
#[derive(Clone)]
pub struct RemoteVerifier {
    /// Broker command client.
    client: CommandClient,
    /// Verification pattern.
    pattern: Pattern,
}

impl RemoteVerifier {
    /// Builds a verifier on the default pattern.
    #[must_use]
    pub fn new(client: CommandClient) -> Self {
        Self::with_pattern(client, Pattern::topic(VERIFY_PATTERN))
    }

    /// Builds a verifier on a custom pattern.
    #[must_use]
    pub const fn with_pattern(client: CommandClient, pattern: Pattern) -> Self {
        Self {
            client,
            pattern,
        }
    }
}

#[async_trait]
impl CredentialVerifier for RemoteVerifier {
    async fn verify(&self, credential: &Credential) -> Result<Verified, VerificationFailure> {
        let data = Value::String(credential.expose().to_string());
        let reply = self.client.send(&self.pattern, data).await.map_err(|err| match err {
            RpcFailure::Timeout => VerificationFailure::Timeout,
            RpcFailure::Unavailable(reason) => VerificationFailure::Transport(reason),
            RpcFailure::Malformed(reason) => VerificationFailure::Malformed(reason),
            RpcFailure::Remote(value) => VerificationFailure::Rejected(remote_message(&value)),
        })?;
        let reply: VerifyReply = serde_json::from_value(reply)
            .map_err(|err| VerificationFailure::Malformed(err.to_string()))?;
        if reply.token.is_empty() {
            return Err(VerificationFailure::Malformed("empty rotated token".to_string()));
        }
        Ok(Verified {
            principal: Principal::from_claims(reply.user),
            credential: Credential::new(reply.token),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts a human-readable message from a remote error value.
fn remote_message(value: &Value) -> String {
    match value {
        Value::String(message) => message.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_string),
        _ => value.to_string(),
    }
}
