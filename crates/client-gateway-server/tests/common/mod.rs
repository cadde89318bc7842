// crates/client-gateway-server/tests/common/mod.rs
// ============================================================================
// Module: Server Test Fixtures
// Description: In-process gateway servers over a scripted broker.
// Purpose: Drive the full HTTP pipeline end to end without NATS.
// Dependencies: client-gateway-server, client-gateway-broker, reqwest, tokio
// ============================================================================

//! ## Overview
//! Spawns the gateway router on an ephemeral port with an in-memory broker
//! whose verification handler accepts a fixed set of tokens. Backend
//! handlers echo the payload they receive so tests can assert on it.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test fixtures use unwrap for clarity.")]

use std::sync::Arc;

use client_gateway_broker::BrokerTransport;
use client_gateway_broker::InMemoryTransport;
use client_gateway_broker::MemoryReply;
use client_gateway_broker::Pattern;
use client_gateway_config::GatewayConfig;
use client_gateway_server::GatewayServer;
use serde_json::Value;
use serde_json::json;
use tokio::sync::oneshot;

/// Subject of the verification handler.
pub const VERIFY_SUBJECT: &str = "auth.verify.user";

/// Token accepted for a member of tenant `T1`.
pub const TOKEN_T1: &str = "good-t1";
/// Token accepted for a member of tenant `T2`.
pub const TOKEN_T2: &str = "good-t2";
/// Token accepted for a principal without a tenant.
pub const TOKEN_NO_TENANT: &str = "good-none";
/// Token whose verification never answers.
pub const TOKEN_SLOW: &str = "slow";

/// Running gateway bound to an ephemeral port.
pub struct Gateway {
    /// Base URL (`http://127.0.0.1:<port>`).
    pub base: String,
    /// Broker double shared with the server.
    pub broker: Arc<InMemoryTransport>,
    /// HTTP client.
    pub http: reqwest::Client,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
}

impl Gateway {
    /// Returns the absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Returns the number of verification round trips.
    pub fn verify_calls(&self) -> usize {
        self.broker.request_count(VERIFY_SUBJECT)
    }

    /// Returns the number of requests sent to `pattern`.
    pub fn calls(&self, pattern: &Pattern) -> usize {
        self.broker.request_count(&pattern.subject())
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Verification handler over the fixed token set.
fn verify_reply(data: &Value) -> MemoryReply {
    let token = data.as_str().unwrap_or_default();
    let user = match token {
        TOKEN_T1 => json!({ "id": "u1", "businessId": "T1", "role": "admin" }),
        TOKEN_T2 => json!({ "id": "u2", "businessId": "T2" }),
        TOKEN_NO_TENANT => json!({ "id": "u3" }),
        TOKEN_SLOW => return MemoryReply::Timeout,
        _ => return MemoryReply::Error(json!({ "status": 401, "message": "Invalid token" })),
    };
    MemoryReply::Response(json!({ "user": user, "token": format!("rotated-{token}") }))
}

/// Returns a broker with the verification handler installed.
pub fn broker() -> InMemoryTransport {
    InMemoryTransport::new().with_handler(&Pattern::topic(VERIFY_SUBJECT), verify_reply)
}

/// Registers an echo handler replying `{ echo: <data> }`.
pub fn echo(broker: InMemoryTransport, pattern: &Pattern) -> InMemoryTransport {
    broker.with_handler(pattern, |data| MemoryReply::Response(json!({ "echo": data })))
}

/// Spawns a gateway with default configuration.
pub async fn spawn(broker: InMemoryTransport) -> Gateway {
    spawn_with(&GatewayConfig::default(), broker).await
}

/// Spawns a gateway with the given configuration.
pub async fn spawn_with(config: &GatewayConfig, broker: InMemoryTransport) -> Gateway {
    let broker = Arc::new(broker);
    let transport: Arc<dyn BrokerTransport> = broker.clone();
    let server = GatewayServer::from_config(config, transport).expect("server");
    let app = server.router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    Gateway {
        base: format!("http://{addr}"),
        broker,
        http: reqwest::Client::new(),
        shutdown: Some(shutdown_tx),
    }
}
