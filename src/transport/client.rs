//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use tokio_stream::StreamExt;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, ResponseBody};
use crate::context::CallContext;

/// Connection pool settings for the pooled base transport.
///
/// Zero durations and a zero idle-connection bound fall back to the
/// defaults, mirroring the permissive normalization of the client factory.
///
/// # Defaults
///
/// - `connect_timeout`: 5 seconds (TCP connect plus TLS handshake)
/// - `tcp_keepalive`: 30 seconds
/// - `max_idle_per_host`: 100
/// - `idle_timeout`: 90 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Bound on establishing a connection, TLS handshake included.
    pub connect_timeout: Duration,
    /// TCP keep-alive interval for pooled connections.
    pub tcp_keepalive: Duration,
    /// Maximum idle connections kept per host.
    pub max_idle_per_host: usize,
    /// How long an idle connection stays in the pool.
    pub idle_timeout: Duration,
}

impl PoolOptions {
    /// Default connect timeout (5 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default TCP keep-alive (30 seconds).
    pub const DEFAULT_TCP_KEEPALIVE: Duration = Duration::from_secs(30);

    /// Default idle connections per host.
    pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 100;

    /// Default idle timeout (90 seconds).
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Creates pool options with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            tcp_keepalive: Self::DEFAULT_TCP_KEEPALIVE,
            max_idle_per_host: Self::DEFAULT_MAX_IDLE_PER_HOST,
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Replaces zero values with defaults.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self {
            connect_timeout: non_zero_or(self.connect_timeout, Self::DEFAULT_CONNECT_TIMEOUT),
            tcp_keepalive: non_zero_or(self.tcp_keepalive, Self::DEFAULT_TCP_KEEPALIVE),
            max_idle_per_host: if self.max_idle_per_host == 0 {
                Self::DEFAULT_MAX_IDLE_PER_HOST
            } else {
                self.max_idle_per_host
            },
            idle_timeout: non_zero_or(self.idle_timeout, Self::DEFAULT_IDLE_TIMEOUT),
        }
    }
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self::new()
    }
}

const fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() { fallback } else { value }
}

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait. The wrapped client owns the connection pool;
/// clones share it.
///
/// # Example
///
/// ```no_run
/// use outbound_http::context::CallContext;
/// use outbound_http::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.example.com/items")?;
/// let response = client.request(HttpRequest::get(url), &CallContext::new()).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with reqwest's default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a pooled client with the given pool settings and overall
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the client cannot be constructed
    /// (for example, when the TLS backend fails to initialize).
    pub fn pooled(pool: PoolOptions, timeout: Duration) -> Result<Self, reqwest::Error> {
        let pool = pool.normalized();
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(pool.connect_timeout)
            .tcp_keepalive(pool.tcp_keepalive)
            .pool_max_idle_per_host(pool.max_idle_per_host)
            .pool_idle_timeout(pool.idle_timeout)
            .build()?;
        Ok(Self { inner })
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS roots, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest, _cx: &CallContext) -> Result<HttpResponse, HttpError> {
        let (head, body, _) = req.into_parts();

        let mut builder = self
            .inner
            .request(head.method.clone(), head.url.clone())
            .headers(head.headers().clone());

        if let Some(body) = body {
            builder = builder.body(body.into_reqwest());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_body_error));

        Ok(HttpResponse::with_body(
            status,
            headers,
            ResponseBody::from_stream(stream),
        ))
    }
}

/// Maps a reqwest send error to the transport taxonomy.
fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else if is_end_of_stream(&e) {
        HttpError::UnexpectedEof(Box::new(e))
    } else {
        HttpError::Connection(Box::new(e))
    }
}

fn map_body_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Body(Box::new(e))
    }
}

/// Walks the source chain looking for a connection that closed before the
/// message completed.
pub(crate) fn is_end_of_stream(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::UnexpectedEof {
                return true;
            }
        }
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() {
                return true;
            }
        }
        current = err.source();
    }
    false
}
