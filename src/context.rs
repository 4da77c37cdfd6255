//! Per-call scope threaded explicitly through every outbound exchange.
//!
//! A [`CallContext`] carries the correlation identifier assigned by the
//! upstream request-identification layer, a cancellation token, and an
//! optional deadline. It is passed by reference to every
//! [`HttpClient`](crate::transport::HttpClient) so that decorators can read the
//! correlation id without any implicit, keyed lookup.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Opaque correlation identifier for one logical call.
///
/// The value is forwarded byte-for-byte in the request-id header. This crate
/// never generates or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wraps an identifier produced upstream.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CorrelationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reason a call ended before it produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancellation {
    /// The call's cancellation token was triggered.
    #[error("call cancelled")]
    Cancelled,

    /// The call's deadline passed.
    #[error("call deadline exceeded")]
    DeadlineExceeded,
}

/// Explicit call scope: correlation id, cancellation and deadline.
///
/// Cheap to clone; clones share the same cancellation token.
///
/// # Example
///
/// ```
/// use outbound_http::context::CallContext;
/// use std::time::Duration;
///
/// let cx = CallContext::new()
///     .with_correlation_id("rid-123")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(cx.correlation_id().map(|id| id.as_str()), Some("rid-123"));
/// assert!(cx.check().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    correlation_id: Option<CorrelationId>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context with no correlation id, no deadline and a fresh
    /// cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the correlation id for this call.
    ///
    /// An empty id is ignored and leaves the context unchanged.
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<CorrelationId>) -> Self {
        let id = id.into();
        if !id.as_str().is_empty() {
            self.correlation_id = Some(id);
        }
        self
    }

    /// Replaces the cancellation token, typically with a child of a
    /// service-wide shutdown token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Sets an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the correlation id, if any.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// Returns the cancellation token governing this call.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels the call.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Reports whether the call has already ended.
    ///
    /// # Errors
    ///
    /// Returns [`Cancellation::Cancelled`] if the token was triggered, or
    /// [`Cancellation::DeadlineExceeded`] if the deadline has passed.
    pub fn check(&self) -> Result<(), Cancellation> {
        if self.cancel.is_cancelled() {
            return Err(Cancellation::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Cancellation::DeadlineExceeded);
        }
        Ok(())
    }

    /// Completes when the call ends, reporting why.
    ///
    /// Never completes for a context without deadline whose token is
    /// never cancelled.
    pub async fn done(&self) -> Cancellation {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;

                    () = self.cancel.cancelled() => Cancellation::Cancelled,
                    () = tokio::time::sleep_until(deadline) => Cancellation::DeadlineExceeded,
                }
            }
            None => {
                self.cancel.cancelled().await;
                Cancellation::Cancelled
            }
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
