//! Error types for HTTP operations.

use thiserror::Error;

/// Boxed error used for opaque causes from the underlying stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for a single HTTP exchange.
///
/// Describes what went wrong without dictating recovery strategy.
/// Whether a variant is worth retrying is decided by the retry classifier
/// ([`is_retryable_error`](crate::retry::is_retryable_error)).
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS failures and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The connection was closed before the response was complete.
    ///
    /// Typically a pooled keep-alive connection the server had already
    /// closed.
    #[error("Connection closed before message completed: {0}")]
    UnexpectedEof(#[source] BoxError),

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Reading the response body failed.
    #[error("Failed to read response body: {0}")]
    Body(#[source] BoxError),
}

impl HttpError {
    /// Returns true if the error carries a timeout signal.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns true if the error is an end-of-stream condition.
    #[must_use]
    pub const fn is_unexpected_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof(_))
    }
}
