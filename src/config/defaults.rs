//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

use crate::retry::RetryBudget;
use crate::transport::PoolOptions;

/// Default HTTP method for probe requests.
pub const METHOD: &str = "GET";

/// Default per-attempt timeout.
pub const TIMEOUT: Duration = crate::client::DEFAULT_TIMEOUT;

/// Default retry cap.
pub const MAX_RETRIES: RetryBudget = RetryBudget::NONE;

/// Whether X-Request-ID is propagated by default.
pub const PROPAGATE_REQUEST_ID: bool = true;

/// Default pool settings.
pub const POOL: PoolOptions = PoolOptions::new();
