//! Sleep abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting an
//! instant sleeper in tests while using the real tokio timer in production.
//! The retry executor waits through a [`Sleeper`] between attempts.

use std::future::Future;
use std::time::Duration;

/// Abstraction over asynchronous sleeping.
///
/// # Example
///
/// ```
/// use outbound_http::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// // Returns immediately regardless of the requested duration
/// InstantSleeper.sleep(Duration::from_secs(3600)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Completes after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
///
/// Honors tokio's paused clock, so tests using `start_paused = true`
/// observe deterministic virtual time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that completes immediately.
///
/// Useful in tests that exercise retry sequences without caring about
/// the delays between attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
