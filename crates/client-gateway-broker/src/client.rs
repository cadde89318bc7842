// crates/client-gateway-broker/src/client.rs
// ============================================================================
// Module: Command Client
// Description: Typed request/reply calls to backend handlers.
// Purpose: Wrap payloads in envelopes and unwrap replies into results.
// Dependencies: serde_json, thiserror, tracing, crate::{envelope, transport}
// ============================================================================

//! ## Overview
//! [`CommandClient::send`] performs exactly one round trip. Remote handler
//! errors are returned verbatim as [`RpcFailure::Remote`] so the HTTP layer
//! can translate their status; transport failures keep their cause.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::envelope::Pattern;
use crate::envelope::ReplyEnvelope;
use crate::envelope::RequestEnvelope;
use crate::transport::BrokerError;
use crate::transport::BrokerTransport;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures of a single command round trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcFailure {
    /// The handler replied with an error value.
    #[error("remote error: {0}")]
    Remote(Value),
    /// No reply arrived before the deadline.
    #[error("request timed out")]
    Timeout,
    /// The broker could not deliver the request.
    #[error("broker unavailable: {0}")]
    Unavailable(String),
    /// The request or reply could not be encoded or decoded.
    #[error("malformed message: {0}")]
    Malformed(String),
}

impl From<BrokerError> for RpcFailure {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::Timeout => Self::Timeout,
            BrokerError::Connect(_) | BrokerError::NoResponders(_) | BrokerError::Transport(_) => {
                Self::Unavailable(err.to_string())
            }
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Request/reply client shared by all handlers.
#[derive(Clone)]
pub struct CommandClient {
    /// Underlying transport.
    transport: Arc<dyn BrokerTransport>,
}

impl CommandClient {
    /// Builds a client over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn BrokerTransport>) -> Self {
        Self {
            transport,
        }
    }

    /// Sends `data` to the handler addressed by `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcFailure`] when the round trip fails or the handler
    /// replies with an error.
    pub async fn send(&self, pattern: &Pattern, data: Value) -> Result<Value, RpcFailure> {
        let envelope = RequestEnvelope::new(pattern, data);
        let payload = envelope.encode().map_err(|err| RpcFailure::Malformed(err.to_string()))?;
        let subject = pattern.subject();
        debug!(subject = %subject, id = %envelope.id, "sending broker request");
        let reply = self.transport.request(&subject, payload).await?;
        let reply =
            ReplyEnvelope::decode(&reply).map_err(|err| RpcFailure::Malformed(err.to_string()))?;
        reply.into_result().map_err(RpcFailure::Remote)
    }
}
