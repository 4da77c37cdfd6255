//! Body rewind for retry attempts.

use std::fmt;

use super::ExecuteError;
use crate::transport::{BodyRegenerator, RequestBody};

/// Produces request bodies for attempts after the first.
///
/// A request without a body, or with a known-empty one, is always
/// replayable. Any other body can only be sent again through its
/// regenerator.
#[derive(Clone)]
pub struct ReplayGuard {
    had_body: bool,
    needs_regenerator: bool,
    regenerate: Option<BodyRegenerator>,
}

impl fmt::Debug for ReplayGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayGuard")
            .field("had_body", &self.had_body)
            .field("needs_regenerator", &self.needs_regenerator)
            .field("has_regenerator", &self.regenerate.is_some())
            .finish()
    }
}

impl ReplayGuard {
    /// Inspects the original body before it is consumed by attempt 0.
    #[must_use]
    pub fn new(body: Option<&RequestBody>, regenerate: Option<BodyRegenerator>) -> Self {
        Self {
            had_body: body.is_some(),
            needs_regenerator: body.is_some_and(|b| !b.is_empty()),
            regenerate,
        }
    }

    /// Returns true if every retry attempt can be given a body.
    #[must_use]
    pub const fn is_replayable(&self) -> bool {
        !self.needs_regenerator || self.regenerate.is_some()
    }

    /// Returns the body to send on the given retry attempt.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::BodyNotReplayable`] if the body needs a
    ///   regenerator and none was supplied
    /// - [`ExecuteError::BodyRewind`] if the regenerator failed
    pub fn body_for_attempt(&self, attempt: u32) -> Result<Option<RequestBody>, ExecuteError> {
        if !self.needs_regenerator {
            return Ok(self.had_body.then(RequestBody::empty));
        }
        let Some(regenerate) = &self.regenerate else {
            return Err(ExecuteError::BodyNotReplayable { attempt });
        };
        regenerate()
            .map(Some)
            .map_err(|source| ExecuteError::BodyRewind { attempt, source })
    }
}
