//! Configuration management for the gateway.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The gateway only consumes
//! already-resolved values; a missing upstream credential is detected per call,
//! never at startup.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::transport::HttpConfig;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub transport: HttpConfig,

    /// Upstream API credentials.
    pub credentials: CredentialsConfig,

    /// Upstream endpoint locations.
    pub upstream: UpstreamConfig,
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

/// Configuration for upstream API credentials.
///
/// Both keys are optional: the gateway starts without them and fails the
/// affected tool call at request time instead.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// data.gov.in API key for the commodity price resource.
    pub data_gov_api_key: Option<String>,

    /// Exa API key for web search.
    pub exa_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "data_gov_api_key",
                &self.data_gov_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "exa_api_key",
                &self.exa_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Upstream endpoint locations.
///
/// Base URLs are configurable so tests can point the gateway at a local mock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the government open data platform.
    pub data_gov_base_url: String,

    /// Resource identifier of the commodity price dataset.
    pub data_gov_resource_id: String,

    /// Base URL of the Exa search API.
    pub exa_base_url: String,
}

/// Daily mandi price dataset on data.gov.in.
const DEFAULT_RESOURCE_ID: &str = "9ef84268-d588-465a-a308-a864a43d0070";

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            data_gov_base_url: "https://api.data.gov.in".to_string(),
            data_gov_resource_id: DEFAULT_RESOURCE_ID.to_string(),
            exa_base_url: "https://api.exa.ai".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "agri-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            credentials: CredentialsConfig::default(),
            upstream: UpstreamConfig::default(),
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
    /// Server-level settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_HTTP_*`); upstream credentials use the vendor
    /// variable names (`DATA_GOV_API_KEY`, `EXA_API_KEY`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(api_key) = std::env::var("DATA_GOV_API_KEY") {
            config.credentials.data_gov_api_key = Some(api_key);
        } else {
            warn!("DATA_GOV_API_KEY not set - the crop-price tool will fail until it is");
        }

        if let Ok(api_key) = std::env::var("EXA_API_KEY") {
            config.credentials.exa_api_key = Some(api_key);
        } else {
            warn!("EXA_API_KEY not set - the search tool will fail until it is");
        }

        if let Ok(resource_id) = std::env::var("DATA_GOV_RESOURCE_ID") {
            config.upstream.data_gov_resource_id = resource_id;
        }

        if let Ok(base_url) = std::env::var("DATA_GOV_BASE_URL") {
            config.upstream.data_gov_base_url = base_url;
        }

        if let Ok(base_url) = std::env::var("EXA_BASE_URL") {
            config.upstream.exa_base_url = base_url;
        }

        config
    }
}
