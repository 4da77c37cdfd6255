//! Retry eligibility predicates.
//!
//! Eligibility is decided separately for the request method, for
//! returned status codes and for transport failures. The executor only
//! retries when the method gate and one of the other two agree.

use http::{Method, StatusCode};

use crate::transport::HttpError;

/// Returns true for methods that may be safely re-sent.
///
/// Only GET, HEAD, PUT and DELETE qualify. OPTIONS, TRACE, POST, PATCH
/// and extension methods are never retried.
#[must_use]
pub fn is_idempotent(method: &Method) -> bool {
    *method == Method::GET
        || *method == Method::HEAD
        || *method == Method::PUT
        || *method == Method::DELETE
}

/// Returns true for upstream-unavailable status codes (502, 503, 504).
#[must_use]
pub const fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Returns true for transport failures worth another attempt.
///
/// Timeouts and connections closed mid-exchange are transient; refused
/// connections, DNS and TLS failures and invalid URLs are not.
#[must_use]
pub const fn is_retryable_error(error: &HttpError) -> bool {
    error.is_timeout() || error.is_unexpected_eof()
}
