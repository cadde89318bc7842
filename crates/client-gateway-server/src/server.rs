// crates/client-gateway-server/src/server.rs
// ============================================================================
// Module: Gateway Server
// Description: HTTP listener wiring the gates, catalog, and broker client.
// Purpose: Build the router from configuration and serve it.
// Dependencies: axum, client-gateway-{broker, config, core}, tokio, tower-http, tracing
// ============================================================================

//! ## Overview
//! [`GatewayServer::from_config`] compiles the route tables, derives the
//! ownership exemptions from the route catalog, and builds one router whose
//! every route sits behind the gate middleware. Shared state is immutable
//! after construction and handed to requests by `Arc`.
//!
//! CORS sits outside the gates, so browser preflight requests are answered
//! from the origin allowlist without reaching authentication.
//!
//! Security posture: configuration errors fail startup; the server never
//! runs with a partially built route table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Extension;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::MethodFilter;
use axum::routing::MethodRouter;
use axum::routing::on;
use client_gateway_broker::BrokerTransport;
use client_gateway_broker::CommandClient;
use client_gateway_broker::Pattern;
use client_gateway_broker::RemoteVerifier;
use client_gateway_config::GatewayConfig;
use client_gateway_core::AuthAuditSink;
use client_gateway_core::AuthenticationGate;
use client_gateway_core::NoopAuditSink;
use client_gateway_core::OwnershipGate;
use client_gateway_core::TracingAuditSink;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing::warn;

use crate::catalog::RouteAction;
use crate::catalog::RouteSpec;
use crate::catalog::ownership_exemptions;
use crate::catalog::route_catalog;
use crate::handlers::ForwardRoute;
use crate::handlers::forward;
use crate::handlers::health;
use crate::handlers::verify_token;
use crate::middleware::authorize;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway server errors.
#[derive(Debug, Error)]
pub enum GatewayServerError {
    /// Configuration could not be turned into a server.
    #[error("config error: {0}")]
    Config(String),
    /// Router construction failed.
    #[error("init error: {0}")]
    Init(String),
    /// Listener or connection failure.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared per-server state handed to middleware and handlers.
pub(crate) struct ServerState {
    /// Authentication gate.
    pub(crate) authn: AuthenticationGate,
    /// Ownership gate.
    pub(crate) ownership: OwnershipGate,
    /// Broker command client for forwarded routes.
    pub(crate) client: CommandClient,
    /// Server start time for uptime reporting.
    pub(crate) started: Instant,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP gateway server.
pub struct GatewayServer {
    /// Listener address.
    bind: SocketAddr,
    /// Fully layered router.
    router: Router,
    /// Number of routes served.
    route_count: usize,
}

impl GatewayServer {
    /// Builds a server from validated configuration and a broker transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError`] when the configuration is invalid or the
    /// router cannot be built.
    pub fn from_config(
        config: &GatewayConfig,
        transport: Arc<dyn BrokerTransport>,
    ) -> Result<Self, GatewayServerError> {
        config.validate().map_err(|err| GatewayServerError::Config(err.to_string()))?;
        let bind =
            config.server.bind_addr().map_err(|err| GatewayServerError::Config(err.to_string()))?;
        let routes =
            config.route_table().map_err(|err| GatewayServerError::Config(err.to_string()))?;

        let audit: Arc<dyn AuthAuditSink> =
            if config.audit.enabled { Arc::new(TracingAuditSink) } else { Arc::new(NoopAuditSink) };
        let client = CommandClient::new(transport);
        let verifier = RemoteVerifier::with_pattern(
            client.clone(),
            Pattern::topic(config.broker.verify_pattern.as_str()),
        );
        let cors = cors_layer(&config.server.cors_origins)?;
        let catalog = route_catalog();
        let state = Arc::new(ServerState {
            authn: AuthenticationGate::new(
                Arc::new(routes),
                Arc::new(verifier),
                Arc::clone(&audit),
            ),
            ownership: OwnershipGate::new(
                config.ownership_policy(),
                ownership_exemptions(&catalog),
                audit,
            ),
            client,
            started: Instant::now(),
        });
        let router = build_router(state, &catalog, config.server.max_body_bytes, cors)?;
        Ok(Self {
            bind,
            router,
            route_count: catalog.len(),
        })
    }

    /// Returns the configured listener address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Returns a clone of the router for in-process serving.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the listener and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), GatewayServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| GatewayServerError::Transport(format!("bind {}: {err}", self.bind)))?;
        info!(bind = %self.bind, routes = self.route_count, "client gateway listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| GatewayServerError::Transport(err.to_string()))?;
        info!("client gateway stopped");
        Ok(())
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the gated router from the route catalog.
fn build_router(
    state: Arc<ServerState>,
    catalog: &[RouteSpec],
    max_body_bytes: usize,
    cors: CorsLayer,
) -> Result<Router, GatewayServerError> {
    let mut router = Router::new();
    for route in catalog {
        router = router.route(route.template, method_router(route)?);
    }
    Ok(router
        .route_layer(from_fn_with_state(Arc::clone(&state), authorize))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state))
}

/// Builds the CORS layer for the configured origin allowlist.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, GatewayServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| {
                GatewayServerError::Config(format!("invalid cors origin: {origin}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Builds the method router for one catalog entry.
fn method_router(route: &RouteSpec) -> Result<MethodRouter<Arc<ServerState>>, GatewayServerError> {
    let filter = MethodFilter::try_from(route.method.clone()).map_err(|err| {
        GatewayServerError::Init(format!("unsupported method for {}: {err}", route.template))
    })?;
    Ok(match &route.action {
        RouteAction::Health => on(filter, health),
        RouteAction::VerifyToken => on(filter, verify_token),
        RouteAction::Forward {
            pattern,
            tenant,
            numeric_params,
        } => on(filter, forward).layer(Extension(Arc::new(ForwardRoute {
            method: route.method.clone(),
            pattern: pattern.clone(),
            tenant: *tenant,
            numeric_params: *numeric_params,
        }))),
    })
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
