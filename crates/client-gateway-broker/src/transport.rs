// crates/client-gateway-broker/src/transport.rs
// ============================================================================
// Module: Broker Transport
// Description: Request/reply transport seam and the NATS implementation.
// Purpose: Deliver encoded envelopes and return the raw reply bytes.
// Dependencies: async-nats, async-trait, bytes, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! [`BrokerTransport`] moves opaque bytes: one request, at most one reply.
//! The NATS transport bounds every round trip with the configured request
//! timeout and never retries.
//! Security posture: the broker is a trust boundary; every failure surfaces
//! as a [`BrokerError`] and is never retried implicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_nats::Client;
use async_nats::ConnectOptions;
use async_nats::ServerAddr;
use async_nats::client::RequestErrorKind;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;
use tracing::info;

// ============================================================================
// SECTION: Transport Interface
// ============================================================================

/// Request/reply transport.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// Publishes `payload` on `subject` and waits for a single reply.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] on timeout, missing responders, or transport
    /// failures.
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BrokerError>;
}

/// Broker transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Connection to the broker could not be established.
    #[error("broker connect failed: {0}")]
    Connect(String),
    /// No reply arrived before the deadline.
    #[error("broker request timed out")]
    Timeout,
    /// No handler is subscribed to the subject.
    #[error("no responders for subject {0}")]
    NoResponders(String),
    /// Any other transport failure.
    #[error("broker transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: NATS Transport
// ============================================================================

/// NATS connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsTransportConfig {
    /// Server URLs (`nats://host:port`).
    pub servers: Vec<String>,
    /// Connection name reported to the server.
    pub client_name: String,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Request/reply timeout.
    pub request_timeout: Duration,
}

/// NATS-backed transport.
pub struct NatsTransport {
    /// Connected NATS client.
    client: Client,
    /// Request/reply deadline.
    request_timeout: Duration,
}

impl NatsTransport {
    /// Connects to the configured NATS servers.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Connect`] when an address is invalid or the
    /// connection cannot be established.
    pub async fn connect(config: &NatsTransportConfig) -> Result<Self, BrokerError> {
        let addrs = config
            .servers
            .iter()
            .map(|server| {
                server
                    .trim()
                    .parse::<ServerAddr>()
                    .map_err(|err| BrokerError::Connect(format!("invalid server {server}: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(servers = ?config.servers, name = %config.client_name, "connecting to NATS");
        let client = ConnectOptions::new()
            .name(config.client_name.as_str())
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout))
            .connect(addrs.as_slice())
            .await
            .map_err(|err| BrokerError::Connect(err.to_string()))?;
        info!(servers = ?config.servers, "connected to NATS");
        Ok(Self {
            client,
            request_timeout: config.request_timeout,
        })
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Flushes pending publishes.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Transport`] when the flush fails.
    pub async fn flush(&self) -> Result<(), BrokerError> {
        self.client.flush().await.map_err(|err| BrokerError::Transport(err.to_string()))
    }
}

#[async_trait]
impl BrokerTransport for NatsTransport {
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BrokerError> {
        let request = self.client.request(subject.to_string(), payload);
        let message = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(message)) => message,
            Ok(Err(err)) => {
                return Err(match err.kind() {
                    RequestErrorKind::TimedOut => BrokerError::Timeout,
                    RequestErrorKind::NoResponders => BrokerError::NoResponders(subject.to_string()),
                    _ => BrokerError::Transport(err.to_string()),
                });
            }
            Err(_) => return Err(BrokerError::Timeout),
        };
        debug!(subject, bytes = message.payload.len(), "broker reply received");
        Ok(message.payload)
    }
}
