//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use crate::client::ClientConfig;
use crate::context::CorrelationId;
use crate::retry::RetryBudget;
use crate::transport::{HttpRequest, PoolOptions};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
/// Numeric settings are never rejected; the client factory normalizes them.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Target URL (required, http or https)
    pub url: Url,

    /// HTTP method
    pub method: Method,

    /// HTTP headers
    pub headers: HeaderMap,

    /// Request body (optional)
    pub body: Option<String>,

    /// Correlation id for the call (optional)
    pub request_id: Option<CorrelationId>,

    /// Settings for the client factory
    pub client: ClientConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request_id = self
            .request_id
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);

        write!(
            f,
            "Config {{ url: {}, method: {}, headers: {}, body: {}B, request_id: {}, \
             timeout: {}ms, retries: {}, propagate: {} }}",
            self.url,
            self.method,
            self.headers.len(),
            self.body.as_ref().map_or(0, String::len),
            request_id,
            self.client.effective_timeout().as_millis(),
            self.client.max_retries,
            !self.client.disable_correlation_propagation,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing, unparsable, or not http/https
    /// - The method is invalid
    /// - A header is malformed
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let method = Self::resolve_method(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;

        let body = cli
            .data
            .clone()
            .or_else(|| toml.and_then(|t| t.request.body.clone()));

        let request_id = cli
            .request_id
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.request_id.as_deref()))
            .filter(|id| !id.is_empty())
            .map(CorrelationId::from);

        let client = Self::build_client_config(cli, toml);

        Ok(Self {
            url,
            method,
            headers,
            body,
            request_id,
            client,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the request described by this configuration.
    #[must_use]
    pub fn to_request(&self) -> HttpRequest {
        let mut request = HttpRequest::new(self.method.clone(), self.url.clone());
        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }
        if let Some(body) = &self.body {
            request = request.with_body(body.clone());
        }
        request
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // CLI takes precedence
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set request.url in config file")
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
            });
        }

        Ok(url)
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .to_ascii_uppercase()
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.request.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        // Repeated CLI values for one name are all kept
        let mut from_cli = HeaderMap::new();
        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            from_cli.append(header_name, header_value);
        }

        // CLI names replace TOML values with the same name
        for name in from_cli.keys() {
            headers.remove(name);
        }
        for (name, value) in &from_cli {
            headers.append(name.clone(), value.clone());
        }

        Ok(headers)
    }

    fn build_client_config(cli: &Cli, toml: Option<&TomlConfig>) -> ClientConfig {
        let client = toml.map(|t| &t.client);
        let pool = toml.map(|t| &t.pool);

        // Priority: CLI explicit > TOML > default
        let timeout = cli
            .timeout_ms
            .or_else(|| client.and_then(|c| c.timeout_ms))
            .map_or(defaults::TIMEOUT, Duration::from_millis);

        let max_retries = cli
            .retries
            .or_else(|| client.and_then(|c| c.max_retries))
            .map_or(defaults::MAX_RETRIES, RetryBudget::clamped);

        // --no-propagate only disables; it cannot re-enable a TOML `false`
        let propagate = !cli.no_propagate
            && client
                .and_then(|c| c.propagate_request_id)
                .unwrap_or(defaults::PROPAGATE_REQUEST_ID);

        let pool = PoolOptions {
            connect_timeout: pool
                .and_then(|p| p.connect_timeout_ms)
                .map_or(defaults::POOL.connect_timeout, Duration::from_millis),
            tcp_keepalive: pool
                .and_then(|p| p.tcp_keepalive_secs)
                .map_or(defaults::POOL.tcp_keepalive, Duration::from_secs),
            max_idle_per_host: pool
                .and_then(|p| p.max_idle_per_host)
                .unwrap_or(defaults::POOL.max_idle_per_host),
            idle_timeout: pool
                .and_then(|p| p.idle_timeout_secs)
                .map_or(defaults::POOL.idle_timeout, Duration::from_secs),
        };

        let mut config = ClientConfig::new()
            .with_timeout(timeout)
            .with_correlation_propagation(propagate)
            .with_pool(pool);
        config.max_retries = max_retries;
        config
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Splits at the first ':' or '=', whichever comes first.
fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let Some(split) = s.find([':', '=']) else {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    };

    let name = s[..split].trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    }
    Ok((name.to_string(), s[split + 1..].trim().to_string()))
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
