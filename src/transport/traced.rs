//! Tracing decorator for outbound exchanges.

use std::time::Instant;

use tracing::Instrument;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::context::{CallContext, CorrelationId};

/// Transport decorator that wraps each exchange in a `tracing` span.
///
/// The span records method, URL and correlation id; status and latency
/// are emitted as a DEBUG event when the exchange completes.
#[derive(Debug, Clone)]
pub struct TracingTransport<T> {
    inner: T,
}

impl<T> TracingTransport<T> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: HttpClient> HttpClient for TracingTransport<T> {
    async fn request(&self, req: HttpRequest, cx: &CallContext) -> Result<HttpResponse, HttpError> {
        let span = tracing::debug_span!(
            "http.request",
            method = %req.method,
            url = %req.url,
            request_id = cx.correlation_id().map_or("", CorrelationId::as_str),
        );
        let started = Instant::now();

        let result = self.inner.request(req, cx).instrument(span.clone()).await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => {
                tracing::debug!(
                    parent: &span,
                    status = response.status.as_u16(),
                    elapsed_ms,
                    "Response received"
                );
            }
            Err(e) => {
                tracing::debug!(parent: &span, error = %e, elapsed_ms, "Request failed");
            }
        }
        result
    }
}
