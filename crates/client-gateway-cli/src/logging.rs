// crates/client-gateway-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Tracing subscriber installation for the gateway binary.
// Purpose: Route operational logs and audit events to stderr.
// Dependencies: client-gateway-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! The filter comes from `CLIENT_GATEWAY_LOG` when set, else from the
//! configured level. Output is plain text or JSON and always goes to stderr
//! so command output on stdout stays machine-readable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use client_gateway_config::LoggingConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the log filter.
pub(crate) const LOG_ENV: &str = "CLIENT_GATEWAY_LOG";

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Builds the log filter from the environment or the configured level.
pub(crate) fn log_filter(config: &LoggingConfig, env_value: Option<&str>) -> EnvFilter {
    env_value
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.level.as_str()))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns a message when a global subscriber is already installed.
pub(crate) fn init_logging(config: &LoggingConfig) -> Result<(), String> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = log_filter(config, env_value.as_deref());
    let json_layer =
        config.json.then(|| fmt::layer().json().with_target(true).with_writer(std::io::stderr));
    let text_layer =
        (!config.json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|err| err.to_string())
}
