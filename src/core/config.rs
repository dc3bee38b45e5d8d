//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and a `.env` file, if present) on top of defaults.

use super::transport::TransportConfig;
use crate::domains::sage::{DEFAULT_API_VERSION, Region};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Sage API credentials and endpoint selection.
    pub sage: SageConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Sage Business Cloud Accounting configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SageConfig {
    /// OAuth client id of the registered Sage app.
    pub client_id: Option<String>,

    /// OAuth client secret of the registered Sage app.
    pub client_secret: Option<String>,

    /// Bearer token used on every API call.
    pub access_token: Option<String>,

    /// Long-lived token exchanged for a new access token on expiry.
    pub refresh_token: Option<String>,

    /// Business region.
    pub region: Region,

    /// API version path segment, e.g. "v3.1".
    pub api_version: String,

    /// Local port the `sage_auth` helper listens on for the OAuth callback.
    pub callback_port: u16,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SageConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("region", &self.region)
            .field("api_version", &self.api_version)
            .field("callback_port", &self.callback_port)
            .finish()
    }
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            access_token: None,
            refresh_token: None,
            region: Region::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            callback_port: 8080,
        }
    }
}

impl SageConfig {
    /// Base URL of the accounting API for the configured region and version.
    pub fn base_url(&self) -> String {
        self.region.base_url(&self.api_version)
    }

    /// Redirect URI registered for the `sage_auth` helper.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.callback_port)
    }

    fn from_env() -> Self {
        let mut sage = Self {
            client_id: env_var("SAGE_CLIENT_ID"),
            client_secret: env_var("SAGE_CLIENT_SECRET"),
            access_token: env_var("SAGE_ACCESS_TOKEN"),
            refresh_token: env_var("SAGE_REFRESH_TOKEN"),
            ..Self::default()
        };

        if let Some(region) = env_var("SAGE_REGION") {
            match region.parse() {
                Ok(region) => sage.region = region,
                Err(e) => warn!("{}; falling back to '{}'", e, sage.region),
            }
        }

        if let Some(version) = env_var("SAGE_API_VERSION") {
            sage.api_version = version;
        }

        if let Some(port) = env_var("SAGE_CALLBACK_PORT") {
            match port.parse() {
                Ok(port) => sage.callback_port = port,
                Err(_) => warn!(
                    "Invalid SAGE_CALLBACK_PORT '{}'; using {}",
                    port, sage.callback_port
                ),
            }
        }

        if sage.access_token.is_none() {
            warn!("SAGE_ACCESS_TOKEN not set - every tool call will fail until one is provided");
        }
        if sage.refresh_token.is_none() || sage.client_id.is_none() || sage.client_secret.is_none()
        {
            warn!(
                "SAGE_REFRESH_TOKEN, SAGE_CLIENT_ID and SAGE_CLIENT_SECRET are required \
                 to refresh an expired access token"
            );
        }

        info!("Sage API base URL: {}", sage.base_url());
        sage
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "sage-accounting-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
            transport: TransportConfig::default(),
            sage: SageConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`); Sage settings use `SAGE_`.
    ///
    /// Install the tracing subscriber first (see [`Config::log_level_from_env`])
    /// so the startup warnings emitted here are not lost.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.logging.level = Self::log_level_from_env();

        if let Some(name) = env_var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.transport = TransportConfig::from_env();
        config.sage = SageConfig::from_env();

        config
    }

    /// Log level from `MCP_LOG_LEVEL` (after loading `.env`), defaulting to "info".
    ///
    /// Readable before logging is initialized, unlike the full config.
    pub fn log_level_from_env() -> String {
        dotenvy::dotenv().ok();
        env_var("MCP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
