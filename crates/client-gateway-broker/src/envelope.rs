// crates/client-gateway-broker/src/envelope.rs
// ============================================================================
// Module: Broker Envelope Codec
// Description: Message patterns and request/reply envelopes.
// Purpose: Speak the microservice wire format used by the backend services.
// Dependencies: bytes, serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! Every request is published on a subject derived from its [`Pattern`] and
//! carries a JSON [`RequestEnvelope`] `{ pattern, data, id }`. Services answer
//! with a [`ReplyEnvelope`] `{ response | err, isDisposed, id }`.
//!
//! Subject derivation:
//! - topic patterns use the string itself (`auth.verify.user`);
//! - command patterns use the compact JSON object (`{"cmd":"create_order"}`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// SECTION: Pattern
// ============================================================================

/// Message pattern addressing a backend handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Plain string pattern.
    Topic(String),
    /// `{ "cmd": <name> }` object pattern.
    Command(String),
}

impl Pattern {
    /// Builds a topic pattern.
    #[must_use]
    pub fn topic(name: impl Into<String>) -> Self {
        Self::Topic(name.into())
    }

    /// Builds a command pattern.
    #[must_use]
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command(name.into())
    }

    /// Returns the pattern as carried inside the request envelope.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Topic(name) => Value::String(name.clone()),
            Self::Command(name) => json!({ "cmd": name }),
        }
    }

    /// Returns the broker subject the request is published on.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::Topic(name) => name.clone(),
            Self::Command(_) => self.to_value().to_string(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subject())
    }
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Outbound request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Pattern value (string or command object).
    pub pattern: Value,
    /// Request payload.
    pub data: Value,
    /// Correlation identifier.
    pub id: String,
}

impl RequestEnvelope {
    /// Builds an envelope with a fresh correlation identifier.
    #[must_use]
    pub fn new(pattern: &Pattern, data: Value) -> Self {
        Self {
            pattern: pattern.to_value(),
            data,
            id: Uuid::new_v4().to_string(),
        }
    }

    /// Encodes the envelope as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Decodes an envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload is not a request envelope.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// Inbound reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    /// Successful response value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Error value raised by the handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    /// True when the handler stream has completed.
    #[serde(default)]
    pub is_disposed: bool,
    /// Correlation identifier echoed from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ReplyEnvelope {
    /// Builds a completed success reply.
    #[must_use]
    pub fn response(id: impl Into<String>, response: Value) -> Self {
        Self {
            response: Some(response),
            err: None,
            is_disposed: true,
            id: Some(id.into()),
        }
    }

    /// Builds a completed error reply.
    #[must_use]
    pub fn error(id: impl Into<String>, err: Value) -> Self {
        Self {
            response: None,
            err: Some(err),
            is_disposed: true,
            id: Some(id.into()),
        }
    }

    /// Encodes the envelope as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Decodes an envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload is not a reply envelope.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Splits the reply into the response or the remote error.
    ///
    /// A reply without a response value yields `null`.
    ///
    /// # Errors
    ///
    /// Returns the remote error value when `err` is set.
    pub fn into_result(self) -> Result<Value, Value> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.response.unwrap_or(Value::Null)),
        }
    }
}
