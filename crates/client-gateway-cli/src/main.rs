// crates/client-gateway-cli/src/main.rs
// ============================================================================
// Module: Client Gateway CLI Entry Point
// Description: Command dispatcher for the client gateway binary.
// Purpose: Serve the gateway and inspect its configuration offline.
// Dependencies: clap, client-gateway-{broker, config, server}, tokio
// ============================================================================

//! ## Overview
//! `client-gateway serve` loads configuration, connects to the broker, and
//! runs the HTTP server until Ctrl-C. `config check` validates a config file
//! and `routes classify` reports how a method and path are classified.
//! Security posture: configuration is untrusted input and is validated
//! before any listener is bound.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use client_gateway_broker::BrokerTransport;
use client_gateway_broker::NatsTransport;
use client_gateway_broker::NatsTransportConfig;
use client_gateway_config::GatewayConfig;
use client_gateway_server::GatewayServer;
use client_gateway_server::ownership_exemptions;
use client_gateway_server::route_catalog;
use thiserror::Error;
use tracing::info;

use crate::logging::init_logging;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "client-gateway", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the client gateway HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Route table utilities.
    Routes {
        /// Selected routes subcommand.
        #[command(subcommand)]
        command: RoutesCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the gateway config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Check(ConfigCheckCommand),
}

/// Arguments for `config check`.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Path to the gateway config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Route table subcommands.
#[derive(Subcommand, Debug)]
enum RoutesCommand {
    /// Classify a method and path against the configured route tables.
    Classify(RoutesClassifyCommand),
}

/// Arguments for `routes classify`.
#[derive(Args, Debug)]
struct RoutesClassifyCommand {
    /// Path to the gateway config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// HTTP method (uppercase).
    #[arg(long, value_name = "METHOD")]
    method: String,
    /// Request path without the query string.
    #[arg(long, value_name = "PATH")]
    path: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("client-gateway {version}"))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        let help = Cli::command().render_help().to_string();
        write_stdout_line(&help)?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command: ConfigCommand::Check(command),
        } => command_config_check(&command),
        Commands::Routes {
            command: RoutesCommand::Classify(command),
        } => command_routes_classify(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = GatewayConfig::load_or_default(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
        config.validate().map_err(|err| CliError::new(format!("invalid bind override: {err}")))?;
    }
    init_logging(&config.logging)
        .map_err(|err| CliError::new(format!("failed to initialise logging: {err}")))?;

    let transport = NatsTransport::connect(&nats_config(&config))
        .await
        .map_err(|err| CliError::new(format!("failed to connect to broker: {err}")))?;
    let transport: Arc<dyn BrokerTransport> = Arc::new(transport);
    let server = GatewayServer::from_config(&config, transport)
        .map_err(|err| CliError::new(format!("failed to initialise server: {err}")))?;
    info!(bind = %server.bind_addr(), "starting client gateway");
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds NATS transport settings from the broker configuration.
fn nats_config(config: &GatewayConfig) -> NatsTransportConfig {
    NatsTransportConfig {
        servers: config.broker.servers.clone(),
        client_name: config.broker.client_name.clone(),
        connect_timeout: config.broker.connect_timeout(),
        request_timeout: config.broker.request_timeout(),
    }
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes the `config check` command.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = GatewayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config check failed: {err}")))?;
    write_stdout_line(&config_summary(&config))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders a one-line summary of a valid configuration.
fn config_summary(config: &GatewayConfig) -> String {
    let catalog = route_catalog();
    format!(
        "config ok: bind {}, {} excluded rules, {} optional rules, {} routes ({} exempt), broker {}",
        config.server.bind,
        config.routes.excluded.len(),
        config.routes.optional.len(),
        catalog.len(),
        ownership_exemptions(&catalog).len(),
        config.broker.servers.join(","),
    )
}

// ============================================================================
// SECTION: Routes Command
// ============================================================================

/// Executes the `routes classify` command.
fn command_routes_classify(command: &RoutesClassifyCommand) -> CliResult<ExitCode> {
    let line = classify_line(command)?;
    write_stdout_line(&line)?;
    Ok(ExitCode::SUCCESS)
}

/// Classifies the command's method and path.
fn classify_line(command: &RoutesClassifyCommand) -> CliResult<String> {
    let config = GatewayConfig::load_or_default(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let routes = config
        .route_table()
        .map_err(|err| CliError::new(format!("failed to compile routes: {err}")))?;
    let class = routes.classify(&command.method, &command.path);
    Ok(format!("{} {} -> {}", command.method, command.path, class.as_str()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
