// crates/client-gateway-broker/src/memory.rs
// ============================================================================
// Module: In-Memory Broker Transport
// Description: Process-local request/reply transport with scripted handlers.
// Purpose: Run the gateway without a broker in tests and local demos.
// Dependencies: async-trait, bytes, serde_json, crate::{envelope, transport}
// ============================================================================

//! ## Overview
//! Handlers are registered per [`Pattern`] before the transport is shared.
//! Requests go through the full envelope codec so the wire format is
//! exercised end to end. Unregistered subjects behave like a broker with no
//! responders.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::envelope::Pattern;
use crate::envelope::ReplyEnvelope;
use crate::envelope::RequestEnvelope;
use crate::transport::BrokerError;
use crate::transport::BrokerTransport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Scripted handler outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryReply {
    /// Reply with a response value.
    Response(Value),
    /// Reply with an error value.
    Error(Value),
    /// Never reply; the request times out.
    Timeout,
    /// Reply with raw bytes that bypass the envelope codec.
    Raw(Bytes),
}

/// Scripted handler function.
type Handler = Arc<dyn Fn(&Value) -> MemoryReply + Send + Sync>;

/// In-memory request/reply transport.
#[derive(Default)]
pub struct InMemoryTransport {
    /// Handlers keyed by subject.
    handlers: BTreeMap<String, Handler>,
    /// Received requests in arrival order.
    received: Mutex<Vec<(String, RequestEnvelope)>>,
}

impl InMemoryTransport {
    /// Creates a transport with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the pattern's subject.
    #[must_use]
    pub fn with_handler(
        mut self,
        pattern: &Pattern,
        handler: impl Fn(&Value) -> MemoryReply + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(pattern.subject(), Arc::new(handler));
        self
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, RequestEnvelope)> {
        self.received.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Returns the number of requests received on `subject`.
    #[must_use]
    pub fn request_count(&self, subject: &str) -> usize {
        self.requests().iter().filter(|(received, _)| received == subject).count()
    }
}

#[async_trait]
impl BrokerTransport for InMemoryTransport {
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BrokerError> {
        let envelope = RequestEnvelope::decode(&payload)
            .map_err(|err| BrokerError::Transport(format!("invalid request envelope: {err}")))?;
        self.received
            .lock()
            .map_err(|_| BrokerError::Transport("in-memory transport mutex poisoned".to_string()))?
            .push((subject.to_string(), envelope.clone()));
        let handler = self
            .handlers
            .get(subject)
            .ok_or_else(|| BrokerError::NoResponders(subject.to_string()))?;
        let reply = match handler(&envelope.data) {
            MemoryReply::Response(value) => ReplyEnvelope::response(envelope.id, value),
            MemoryReply::Error(value) => ReplyEnvelope::error(envelope.id, value),
            MemoryReply::Timeout => return Err(BrokerError::Timeout),
            MemoryReply::Raw(bytes) => return Ok(bytes),
        };
        reply.encode().map_err(|err| BrokerError::Transport(err.to_string()))
    }
}
