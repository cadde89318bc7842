// crates/client-gateway-config/src/config.rs
// ============================================================================
// Module: Client Gateway Configuration
// Description: Configuration loading and validation for the gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: client-gateway-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults, so an empty file yields a runnable gateway
//! pointed at a local broker. Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use client_gateway_core::OwnershipPolicy;
use client_gateway_core::RoutePattern;
use client_gateway_core::RouteTable;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::defaults::DEFAULT_CORS_ORIGINS;
use crate::defaults::DEFAULT_EXCLUDED_ROUTES;
use crate::defaults::DEFAULT_OPTIONAL_ROUTES;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "client-gateway.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CLIENT_GATEWAY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
const DEFAULT_BIND: &str = "0.0.0.0:3000";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Upper bound for the request body limit.
pub(crate) const MAX_BODY_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Maximum number of CORS origins.
pub(crate) const MAX_CORS_ORIGINS: usize = 64;
/// Maximum length of a CORS origin.
pub(crate) const MAX_CORS_ORIGIN_LENGTH: usize = 256;
/// Default broker server URL.
const DEFAULT_BROKER_SERVER: &str = "nats://localhost:4222";
/// Default broker client connection name.
const DEFAULT_CLIENT_NAME: &str = "client-gateway";
/// Maximum number of broker servers.
pub(crate) const MAX_BROKER_SERVERS: usize = 16;
/// Accepted broker URL schemes.
const BROKER_SCHEMES: &[&str] = &["nats://", "tls://", "ws://", "wss://"];
/// Minimum broker connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum broker connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Default broker connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
/// Minimum broker request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum broker request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Default broker request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
/// Default broker pattern for credential verification.
const DEFAULT_VERIFY_PATTERN: &str = "auth.verify.user";
/// Maximum number of rules per route list.
pub(crate) const MAX_ROUTE_RULES: usize = 256;
/// Maximum length of a route pattern source.
pub(crate) const MAX_ROUTE_PATTERN_LENGTH: usize = 512;
/// Maximum length of an HTTP method token.
pub(crate) const MAX_METHOD_LENGTH: usize = 16;
/// Maximum number of ownership parameter aliases.
pub(crate) const MAX_PARAM_ALIASES: usize = 4;
/// Maximum length of a tenant field or alias name.
pub(crate) const MAX_FIELD_NAME_LENGTH: usize = 64;

// ============================================================================
// SECTION: Gateway Config
// ============================================================================

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Message broker configuration.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Route classification tables.
    #[serde(default)]
    pub routes: RoutesConfig,
    /// Ownership lookup configuration.
    #[serde(default)]
    pub ownership: OwnershipConfig,
    /// Audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Loads configuration, or the built-in defaults when no path is given,
    /// the environment names none, and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a named or present file fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none()
            && env::var_os(CONFIG_ENV_VAR).is_none()
            && !Path::new(DEFAULT_CONFIG_NAME).exists()
        {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.broker.validate()?;
        self.routes.validate()?;
        self.ownership.validate()?;
        Ok(())
    }

    /// Compiles the configured route table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a rule fails to compile.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        self.routes.compile()
    }

    /// Returns the ownership lookup policy.
    #[must_use]
    pub fn ownership_policy(&self) -> OwnershipPolicy {
        self.ownership.policy()
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address (`host:port`).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Browser origins allowed by CORS (`scheme://host[:port]`).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// Validates listener configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be at most {MAX_BODY_BYTES_LIMIT}"
            )));
        }
        if self.cors_origins.len() > MAX_CORS_ORIGINS {
            return Err(ConfigError::Invalid(format!(
                "server.cors_origins exceeds max of {MAX_CORS_ORIGINS}"
            )));
        }
        for origin in &self.cors_origins {
            validate_cors_origin(origin)?;
        }
        Ok(())
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the address is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is invalid: {}", self.bind)))
    }
}

// ============================================================================
// SECTION: Broker Config
// ============================================================================

/// Message broker connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    /// Broker server URLs.
    #[serde(default = "default_broker_servers")]
    pub servers: Vec<String>,
    /// Connection name reported to the broker.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request/reply timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Pattern used for credential verification.
    #[serde(default = "default_verify_pattern")]
    pub verify_pattern: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            servers: default_broker_servers(),
            client_name: default_client_name(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            verify_pattern: default_verify_pattern(),
        }
    }
}

impl BrokerConfig {
    /// Validates broker configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("broker.servers must be non-empty".to_string()));
        }
        if self.servers.len() > MAX_BROKER_SERVERS {
            return Err(ConfigError::Invalid(format!(
                "broker.servers exceeds max of {MAX_BROKER_SERVERS}"
            )));
        }
        for server in &self.servers {
            let trimmed = server.trim();
            if !BROKER_SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
                return Err(ConfigError::Invalid(format!(
                    "broker.servers entry has unsupported scheme: {trimmed}"
                )));
            }
        }
        if self.client_name.trim().is_empty() {
            return Err(ConfigError::Invalid("broker.client_name must be non-empty".to_string()));
        }
        if !(MIN_CONNECT_TIMEOUT_MS..=MAX_CONNECT_TIMEOUT_MS).contains(&self.connect_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "broker.connect_timeout_ms must be between {MIN_CONNECT_TIMEOUT_MS} and \
                 {MAX_CONNECT_TIMEOUT_MS}"
            )));
        }
        if !(MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS).contains(&self.request_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "broker.request_timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and \
                 {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.verify_pattern.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "broker.verify_pattern must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the request/reply timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ============================================================================
// SECTION: Route Config
// ============================================================================

/// A single `(method, pattern)` route rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteRuleConfig {
    /// HTTP method (uppercase).
    pub method: String,
    /// Regular expression matched against the request path.
    pub pattern: String,
}

impl RouteRuleConfig {
    /// Builds a rule from source strings.
    #[must_use]
    pub fn new(method: &str, pattern: &str) -> Self {
        Self {
            method: method.to_string(),
            pattern: pattern.to_string(),
        }
    }

    /// Validates and compiles the rule.
    fn compile(&self, list: &str) -> Result<RoutePattern, ConfigError> {
        validate_method(list, &self.method)?;
        if self.pattern.is_empty() {
            return Err(ConfigError::Invalid(format!("routes.{list} pattern must be non-empty")));
        }
        if self.pattern.len() > MAX_ROUTE_PATTERN_LENGTH {
            return Err(ConfigError::Invalid(format!("routes.{list} pattern exceeds max length")));
        }
        RoutePattern::new(self.method.as_str(), &self.pattern)
            .map_err(|err| ConfigError::Invalid(format!("routes.{list}: {err}")))
    }
}

/// Route classification tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Routes that never require a credential.
    #[serde(default = "default_excluded_routes")]
    pub excluded: Vec<RouteRuleConfig>,
    /// Routes where a credential is optional.
    #[serde(default = "default_optional_routes")]
    pub optional: Vec<RouteRuleConfig>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            excluded: default_excluded_routes(),
            optional: default_optional_routes(),
        }
    }
}

impl RoutesConfig {
    /// Validates the route tables by compiling them.
    fn validate(&self) -> Result<(), ConfigError> {
        self.compile().map(|_| ())
    }

    /// Compiles both lists into a [`RouteTable`].
    fn compile(&self) -> Result<RouteTable, ConfigError> {
        let excluded = compile_rules("excluded", &self.excluded)?;
        let optional = compile_rules("optional", &self.optional)?;
        Ok(RouteTable::new(excluded, optional))
    }
}

// ============================================================================
// SECTION: Ownership Config
// ============================================================================

/// Where the ownership gate looks for tenant references.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OwnershipConfig {
    /// Route parameter names checked in order.
    #[serde(default = "default_param_aliases")]
    pub param_aliases: Vec<String>,
    /// Top-level JSON body field.
    #[serde(default = "default_tenant_field")]
    pub body_field: String,
    /// Query string key.
    #[serde(default = "default_tenant_field")]
    pub query_field: String,
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        let policy = OwnershipPolicy::default();
        Self {
            param_aliases: policy.param_aliases,
            body_field: policy.body_field,
            query_field: policy.query_field,
        }
    }
}

impl OwnershipConfig {
    /// Validates ownership lookup names.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.param_aliases.is_empty() || self.param_aliases.len() > MAX_PARAM_ALIASES {
            return Err(ConfigError::Invalid(format!(
                "ownership.param_aliases must contain between 1 and {MAX_PARAM_ALIASES} entries"
            )));
        }
        for alias in &self.param_aliases {
            validate_field_name("ownership.param_aliases", alias)?;
        }
        validate_field_name("ownership.body_field", &self.body_field)?;
        validate_field_name("ownership.query_field", &self.query_field)?;
        Ok(())
    }

    /// Returns the core ownership policy.
    #[must_use]
    pub fn policy(&self) -> OwnershipPolicy {
        OwnershipPolicy {
            param_aliases: self.param_aliases.clone(),
            body_field: self.body_field.clone(),
            query_field: self.query_field.clone(),
        }
    }
}

// ============================================================================
// SECTION: Audit and Logging Config
// ============================================================================

/// Audit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Emit gate audit events.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
        }
    }
}

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Trace and above.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log level when no environment filter is set.
    #[serde(default)]
    pub level: LogLevel,
    /// Emit JSON formatted logs.
    #[serde(default)]
    pub json: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Compiles one route list with size limits.
fn compile_rules(list: &str, rules: &[RouteRuleConfig]) -> Result<Vec<RoutePattern>, ConfigError> {
    if rules.len() > MAX_ROUTE_RULES {
        return Err(ConfigError::Invalid(format!(
            "routes.{list} exceeds max of {MAX_ROUTE_RULES} rules"
        )));
    }
    rules.iter().map(|rule| rule.compile(list)).collect()
}

/// Validates an HTTP method token (uppercase ASCII letters).
fn validate_method(list: &str, method: &str) -> Result<(), ConfigError> {
    if method.is_empty() || method.len() > MAX_METHOD_LENGTH {
        return Err(ConfigError::Invalid(format!("routes.{list} method has invalid length")));
    }
    if !method.bytes().all(|byte| byte.is_ascii_uppercase()) {
        return Err(ConfigError::Invalid(format!(
            "routes.{list} method must be uppercase: {method}"
        )));
    }
    Ok(())
}

/// Validates a field or parameter name.
fn validate_field_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
    }
    if value.len() > MAX_FIELD_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} entry exceeds max length")));
    }
    Ok(())
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default CORS origins.
fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|origin| (*origin).to_string()).collect()
}

/// Validates one CORS origin: an http(s) scheme and host, no path.
fn validate_cors_origin(origin: &str) -> Result<(), ConfigError> {
    let host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::Invalid(format!("server.cors_origins entry must be http(s): {origin}"))
        })?;
    if origin.len() > MAX_CORS_ORIGIN_LENGTH
        || host.is_empty()
        || host.contains('/')
        || !host.chars().all(|ch| ch.is_ascii_graphic())
    {
        return Err(ConfigError::Invalid(format!("server.cors_origins entry is invalid: {origin}")));
    }
    Ok(())
}

/// Default broker servers.
fn default_broker_servers() -> Vec<String> {
    vec![DEFAULT_BROKER_SERVER.to_string()]
}

/// Default broker client name.
fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

/// Default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default request timeout.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default verification pattern.
fn default_verify_pattern() -> String {
    DEFAULT_VERIFY_PATTERN.to_string()
}

/// Default excluded route rules.
fn default_excluded_routes() -> Vec<RouteRuleConfig> {
    DEFAULT_EXCLUDED_ROUTES
        .iter()
        .map(|(method, pattern)| RouteRuleConfig::new(method, pattern))
        .collect()
}

/// Default optional route rules.
fn default_optional_routes() -> Vec<RouteRuleConfig> {
    DEFAULT_OPTIONAL_ROUTES
        .iter()
        .map(|(method, pattern)| RouteRuleConfig::new(method, pattern))
        .collect()
}

/// Default ownership parameter aliases.
fn default_param_aliases() -> Vec<String> {
    OwnershipPolicy::default().param_aliases
}

/// Default tenant field name.
fn default_tenant_field() -> String {
    OwnershipPolicy::default().body_field
}

/// Serde default for enabled flags.
const fn default_true() -> bool {
    true
}
