//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Client behavior section
    #[serde(default)]
    pub client: ClientSection,

    /// Connection pool section
    #[serde(default)]
    pub pool: PoolSection,

    /// Request to send
    #[serde(default)]
    pub request: RequestSection,
}

/// Client behavior section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Retry cap (clamped to 0..=3)
    pub max_retries: Option<i64>,

    /// Send X-Request-ID from the call's correlation id
    pub propagate_request_id: Option<bool>,
}

/// Connection pool section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSection {
    /// Connect (and TLS handshake) timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,

    /// TCP keep-alive interval in seconds
    pub tcp_keepalive_secs: Option<u64>,

    /// Maximum idle connections per host
    pub max_idle_per_host: Option<usize>,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: Option<u64>,
}

/// Request section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// Target URL
    pub url: Option<String>,

    /// HTTP method (default: GET)
    pub method: Option<String>,

    /// Request body
    pub body: Option<String>,

    /// Correlation id sent as X-Request-ID
    pub request_id: Option<String>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# outbound-http configuration file

[client]
# Per-attempt timeout in milliseconds (default: 10000, 0 = default)
# timeout_ms = 10000

# Retries for GET/HEAD/PUT/DELETE on 502/503/504, timeouts and
# connections closed mid-response (default: 0, clamped to 0..=3)
# max_retries = 2

# Send X-Request-ID from request.request_id (default: true)
# Disabled by --no-propagate
# propagate_request_id = true

[pool]
# Connect timeout, TLS handshake included, in milliseconds (default: 5000)
# connect_timeout_ms = 5000

# TCP keep-alive in seconds (default: 30)
# tcp_keepalive_secs = 30

# Idle connections kept per host (default: 100)
# max_idle_per_host = 100

# Idle connection timeout in seconds (default: 90)
# idle_timeout_secs = 90

[request]
# Target URL (required, can be overridden by --url)
# url = "https://api.example.com/health"

# HTTP method (default: GET)
# method = "GET"

# Request body
# body = '{"ping": true}'

# Correlation id sent as X-Request-ID
# request_id = "probe-1"

# HTTP headers (CLI headers with the same name override these)
# [request.headers]
# Accept = "application/json"
"#
    .to_string()
}
