//! Retry budget and backoff schedule.

use std::time::Duration;

/// Linear backoff between retry attempts.
///
/// The wait before retry `n` (1-based) is `base * n`, capped at `ceiling`.
///
/// # Defaults
///
/// - `base`: 150 milliseconds
/// - `ceiling`: 800 milliseconds
///
/// # Example
///
/// ```
/// use outbound_http::retry::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::default();
/// assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(150));
/// assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(300));
/// assert_eq!(backoff.delay_for_attempt(9), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Step added per retry attempt.
    pub base: Duration,

    /// Upper bound on any single wait.
    pub ceiling: Duration,
}

impl Backoff {
    /// Default step (150 milliseconds).
    pub const DEFAULT_BASE: Duration = Duration::from_millis(150);

    /// Default ceiling (800 milliseconds).
    pub const DEFAULT_CEILING: Duration = Duration::from_millis(800);

    /// Creates a backoff with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            ceiling: Self::DEFAULT_CEILING,
        }
    }

    /// Sets the per-attempt step.
    ///
    /// Zero is accepted and yields back-to-back retries.
    #[must_use]
    pub const fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Sets the ceiling.
    #[must_use]
    pub const fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Computes the wait before the given retry attempt.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The retry number (1 = first retry, 2 = second retry, etc.)
    ///
    /// Attempt 0 is the initial request and never waits.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt).min(self.ceiling)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of retries a call may use, beyond the initial attempt.
///
/// Always within `0..=RetryBudget::HARD_CAP`; larger requests are clamped
/// down and negative ones clamp to zero.
///
/// # Example
///
/// ```
/// use outbound_http::retry::RetryBudget;
///
/// assert_eq!(RetryBudget::new(2).get(), 2);
/// assert_eq!(RetryBudget::new(10).get(), 3);
/// assert_eq!(RetryBudget::clamped(-1).get(), 0);
/// assert_eq!(RetryBudget::new(2).max_attempts(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RetryBudget(u32);

impl RetryBudget {
    /// Largest number of retries any call may use.
    pub const HARD_CAP: u32 = 3;

    /// No retries; only the initial attempt is made.
    pub const NONE: Self = Self(0);

    /// The largest budget.
    pub const MAX: Self = Self(Self::HARD_CAP);

    /// Creates a budget, clamping values above [`Self::HARD_CAP`].
    #[must_use]
    pub const fn new(retries: u32) -> Self {
        if retries > Self::HARD_CAP {
            Self(Self::HARD_CAP)
        } else {
            Self(retries)
        }
    }

    /// Creates a budget from a signed value, clamping to `0..=HARD_CAP`.
    #[must_use]
    pub const fn clamped(retries: i64) -> Self {
        if retries <= 0 {
            return Self::NONE;
        }
        if retries >= Self::HARD_CAP as i64 {
            return Self::MAX;
        }
        // Safe cast: value is within 1..HARD_CAP here
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let retries = retries as u32;
        Self(retries)
    }

    /// Returns the number of retries.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the total number of attempts, including the initial one.
    #[must_use]
    pub const fn max_attempts(self) -> u32 {
        self.0 + 1
    }
}

impl From<u32> for RetryBudget {
    fn from(retries: u32) -> Self {
        Self::new(retries)
    }
}

impl std::fmt::Display for RetryBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
