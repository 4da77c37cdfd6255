//! Bounded retries for outbound HTTP calls.
//!
//! This module provides:
//! - Retry eligibility predicates ([`is_idempotent`], [`is_retryable_status`],
//!   [`is_retryable_error`])
//! - Retry budget and backoff schedule ([`RetryBudget`], [`Backoff`])
//! - Body rewind between attempts ([`ReplayGuard`])
//! - The retry loop itself ([`execute`], [`Executor`])

mod backoff;
mod classify;
mod error;
mod executor;
mod replay;


pub use backoff::{Backoff, RetryBudget};
pub use classify::{is_idempotent, is_retryable_error, is_retryable_status};
pub use error::ExecuteError;
pub use executor::{Executor, execute};
pub use replay::ReplayGuard;
