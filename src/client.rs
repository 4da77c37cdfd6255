//! Client factory.
//!
//! [`build_client`] turns a [`ClientConfig`] into a [`Client`]: a pooled
//! (or caller-supplied) base transport, wrapped in request-id propagation
//! and tracing, with a per-attempt timeout and a retry cap.

use std::time::Duration;

use thiserror::Error;

use crate::context::CallContext;
use crate::retry::{ExecuteError, Executor, RetryBudget};
use crate::transport::{
    CorrelationTransport, HttpClient, HttpError, HttpRequest, HttpResponse, PoolOptions,
    ReqwestClient, TracingTransport,
};

/// Per-attempt timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error returned by [`build_client`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The pooled HTTP transport could not be constructed.
    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Settings for [`build_client`].
///
/// Out-of-range values are normalized rather than rejected: a zero timeout
/// becomes [`DEFAULT_TIMEOUT`] and the retry cap is clamped
/// to `0..=3`.
///
/// # Type Parameters
///
/// - `T`: Custom base transport (unused unless [`with_transport`] is called)
///
/// [`with_transport`]: ClientConfig::with_transport
///
/// # Example
///
/// ```
/// use outbound_http::client::{ClientConfig, build_client};
/// use std::time::Duration;
///
/// let client = build_client(
///     ClientConfig::new()
///         .with_timeout(Duration::from_secs(3))
///         .with_max_retries(2),
/// )
/// .unwrap();
/// assert_eq!(client.max_retries().get(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig<T = ReqwestClient> {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries used by [`Client::execute`].
    pub max_retries: RetryBudget,
    /// Base transport replacing the pooled reqwest client.
    pub transport: Option<T>,
    /// Skip stamping outgoing requests with the call's request id.
    pub disable_correlation_propagation: bool,
    /// Pool settings for the default base transport.
    pub pool: PoolOptions,
}

impl ClientConfig<ReqwestClient> {
    /// Creates a configuration with default values and the pooled transport.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: RetryBudget::NONE,
            transport: None,
            disable_correlation_propagation: false,
            pool: PoolOptions::new(),
        }
    }
}

impl Default for ClientConfig<ReqwestClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClientConfig<T> {
    /// Sets the per-attempt timeout. Zero selects the default.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry cap, clamped to `0..=3`.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: i64) -> Self {
        self.max_retries = RetryBudget::clamped(retries);
        self
    }

    /// Sets the pool options of the default base transport.
    #[must_use]
    pub const fn with_pool(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }

    /// Enables or disables request-id propagation.
    #[must_use]
    pub const fn with_correlation_propagation(mut self, enabled: bool) -> Self {
        self.disable_correlation_propagation = !enabled;
        self
    }

    /// Replaces the pooled base transport with `transport`.
    ///
    /// Pool options are ignored for a custom transport.
    #[must_use]
    pub fn with_transport<U>(self, transport: U) -> ClientConfig<U> {
        ClientConfig {
            timeout: self.timeout,
            max_retries: self.max_retries,
            transport: Some(transport),
            disable_correlation_propagation: self.disable_correlation_propagation,
            pool: self.pool,
        }
    }

    /// Returns the timeout after normalization.
    #[must_use]
    pub const fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }
}

/// Builds a client from `config`.
///
/// # Errors
///
/// Returns [`BuildError::Transport`] if the pooled transport cannot be
/// constructed (for example when the TLS backend fails to initialize).
/// Out-of-range settings are normalized and never produce an error.
pub fn build_client<T>(config: ClientConfig<T>) -> Result<Client<T>, BuildError> {
    let timeout = config.effective_timeout();
    let custom = config.transport.is_some();

    let base = match config.transport {
        Some(transport) => Base::Custom(transport),
        None => {
            let pooled = ReqwestClient::pooled(config.pool.normalized(), timeout)
                .map_err(BuildError::Transport)?;
            Base::Pooled(pooled)
        }
    };

    let chain = if config.disable_correlation_propagation {
        Propagation::Disabled(base)
    } else {
        Propagation::Enabled(CorrelationTransport::new(base))
    };

    tracing::debug!(
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        max_retries = config.max_retries.get(),
        custom_transport = custom,
        propagate_request_id = !config.disable_correlation_propagation,
        "Built HTTP client"
    );

    Ok(Client {
        stack: TracingTransport::new(chain),
        timeout,
        max_retries: config.max_retries,
    })
}

/// HTTP client produced by [`build_client`].
///
/// Implements [`HttpClient`] (one attempt, bounded by the configured
/// timeout) and offers [`Client::execute`] for retried calls. Share it by
/// reference or behind an [`Arc`](std::sync::Arc); it holds the pool.
#[derive(Debug)]
pub struct Client<T = ReqwestClient> {
    stack: TracingTransport<Propagation<Base<T>>>,
    timeout: Duration,
    max_retries: RetryBudget,
}

impl<T> Client<T> {
    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry cap used by [`Client::execute`].
    #[must_use]
    pub const fn max_retries(&self) -> RetryBudget {
        self.max_retries
    }

    /// Returns true if outgoing requests are stamped with the request id.
    #[must_use]
    pub const fn propagates_correlation(&self) -> bool {
        matches!(self.stack.inner(), Propagation::Enabled(_))
    }
}

impl<T: HttpClient> Client<T> {
    /// Sends `request` with the client's retry cap.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn execute(
        &self,
        cx: &CallContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, ExecuteError> {
        Executor::new()
            .execute(cx, self, request, self.max_retries)
            .await
    }
}

impl<T: HttpClient> HttpClient for Client<T> {
    async fn request(&self, req: HttpRequest, cx: &CallContext) -> Result<HttpResponse, HttpError> {
        tokio::time::timeout(self.timeout, self.stack.request(req, cx))
            .await
            .unwrap_or_else(|_| Err(HttpError::Timeout))
    }
}

/// Innermost transport of a [`Client`].
#[derive(Debug)]
enum Base<T> {
    Pooled(ReqwestClient),
    Custom(T),
}

impl<T: HttpClient> HttpClient for Base<T> {
    async fn request(&self, req: HttpRequest, cx: &CallContext) -> Result<HttpResponse, HttpError> {
        match self {
            Self::Pooled(client) => client.request(req, cx).await,
            Self::Custom(client) => client.request(req, cx).await,
        }
    }
}

/// Optional request-id stamping layer.
#[derive(Debug)]
enum Propagation<T> {
    Enabled(CorrelationTransport<T>),
    Disabled(T),
}

impl<T: HttpClient> HttpClient for Propagation<T> {
    async fn request(&self, req: HttpRequest, cx: &CallContext) -> Result<HttpResponse, HttpError> {
        match self {
            Self::Enabled(client) => client.request(req, cx).await,
            Self::Disabled(client) => client.request(req, cx).await,
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
