//! Request-id propagation decorator.

use http::{HeaderName, HeaderValue};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::context::CallContext;

/// Header carrying the correlation id across service boundaries.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Transport decorator that stamps outgoing requests with the call's
/// correlation id.
///
/// A request that already carries [`REQUEST_ID_HEADER`] is forwarded
/// untouched. Otherwise, if the [`CallContext`] has a correlation id, the
/// header is written into a private copy of the header map; the caller's
/// map is never modified.
#[derive(Debug, Clone)]
pub struct CorrelationTransport<T> {
    inner: T,
}

impl<T> CorrelationTransport<T> {
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

impl<T: HttpClient> HttpClient for CorrelationTransport<T> {
    async fn request(&self, req: HttpRequest, cx: &CallContext) -> Result<HttpResponse, HttpError> {
        let req = stamp_request_id(req, cx);
        self.inner.request(req, cx).await
    }
}

/// Returns `req` carrying the call's correlation id, if it had none.
///
/// Writes go through [`HttpRequest::headers_mut`], which copies a shared
/// header map before inserting.
pub(crate) fn stamp_request_id(mut req: HttpRequest, cx: &CallContext) -> HttpRequest {
    if req.headers().contains_key(&REQUEST_ID_HEADER) {
        return req;
    }
    let Some(id) = cx.correlation_id() else {
        return req;
    };

    match HeaderValue::from_str(id.as_str()) {
        Ok(value) => {
            req.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(_) => {
            tracing::debug!(
                request_id = %id,
                "Correlation id is not a valid header value; not propagated"
            );
        }
    }
    req
}
