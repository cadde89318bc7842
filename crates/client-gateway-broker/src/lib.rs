// crates/client-gateway-broker/src/lib.rs
// ============================================================================
// Module: Client Gateway Broker Library
// Description: Request/reply messaging with the backend microservices.
// Purpose: Carry commands and credential checks over the message broker.
// Dependencies: async-nats, client-gateway-core, serde_json, uuid
// ============================================================================

//! ## Overview
//! Backend services are reachable only through the message broker. This crate
//! provides the transport seam ([`BrokerTransport`]), the NATS transport, the
//! microservice envelope codec, a typed command client, and the
//! [`RemoteVerifier`] the authentication gate uses.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod envelope;
pub mod memory;
pub mod transport;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::CommandClient;
pub use client::RpcFailure;
pub use envelope::Pattern;
pub use envelope::ReplyEnvelope;
pub use envelope::RequestEnvelope;
pub use memory::InMemoryTransport;
pub use memory::MemoryReply;
pub use transport::BrokerError;
pub use transport::BrokerTransport;
pub use transport::NatsTransport;
pub use transport::NatsTransportConfig;
pub use verifier::RemoteVerifier;
