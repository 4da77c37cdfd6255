//! Error type for retried executions.

use thiserror::Error;

use crate::context::Cancellation;
use crate::transport::{BoxError, HttpError};

/// Terminal failure of [`execute`](super::execute).
///
/// A response with any status code, including a retryable one returned on
/// the final attempt, is not an error.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The request was rejected before any network activity.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A retry was due but the request body cannot be sent again.
    #[error("Request body cannot be replayed for attempt {attempt}")]
    BodyNotReplayable {
        /// The retry attempt that needed the body (1-based).
        attempt: u32,
    },

    /// The body regenerator failed.
    #[error("Failed to regenerate request body for attempt {attempt}: {source}")]
    BodyRewind {
        /// The retry attempt that needed the body (1-based).
        attempt: u32,
        /// Error returned by the regenerator.
        #[source]
        source: BoxError,
    },

    /// The call was cancelled or its deadline passed.
    #[error(transparent)]
    Cancelled(#[from] Cancellation),

    /// The last attempt failed at the transport level.
    #[error("Request failed after {attempts} attempt(s): {source}")]
    Transport {
        /// Number of attempts that reached the transport.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: HttpError,
    },
}

impl ExecuteError {
    /// Returns true if the call ended through cancellation or deadline.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Returns the transport error of the final attempt, if that is why
    /// the call failed.
    #[must_use]
    pub const fn transport_error(&self) -> Option<&HttpError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
