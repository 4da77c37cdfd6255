//! Retrying request executor.

use crate::context::CallContext;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse, RequestBody};

use super::{
    Backoff, ExecuteError, ReplayGuard, RetryBudget, is_idempotent, is_retryable_error,
    is_retryable_status,
};

/// Sends a request with bounded, idempotency-aware retries.
///
/// Uses the default [`Backoff`] and [`TokioSleeper`]. See
/// [`Executor::execute`] for the full contract.
///
/// # Errors
///
/// See [`Executor::execute`].
pub async fn execute<C: HttpClient>(
    cx: &CallContext,
    client: &C,
    request: HttpRequest,
    budget: impl Into<RetryBudget>,
) -> Result<HttpResponse, ExecuteError> {
    Executor::new()
        .execute(cx, client, request, budget.into())
        .await
}

/// Retry loop with an injectable sleeper and backoff schedule.
///
/// # Type Parameters
///
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use outbound_http::context::CallContext;
/// use outbound_http::retry::{Executor, RetryBudget};
/// use outbound_http::transport::{HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let request = HttpRequest::get(Url::parse("https://api.example.com/items")?);
///
/// let response = Executor::new()
///     .execute(&CallContext::new(), &client, request, RetryBudget::new(2))
///     .await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Executor<S = TokioSleeper> {
    sleeper: S,
    backoff: Backoff,
}

impl Executor<TokioSleeper> {
    /// Creates an executor with default backoff and the tokio timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sleeper: TokioSleeper,
            backoff: Backoff::new(),
        }
    }
}

impl<S> Executor<S> {
    /// Sets a custom sleeper for the waits between attempts.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Executor<S2> {
        Executor {
            sleeper,
            backoff: self.backoff,
        }
    }

    /// Sets the backoff schedule.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the backoff schedule.
    #[must_use]
    pub const fn backoff(&self) -> &Backoff {
        &self.backoff
    }
}

/// What the loop does after an attempt.
enum Step {
    Retry,
    Finish(Result<HttpResponse, ExecuteError>),
}

impl<S: Sleeper> Executor<S> {
    /// Sends `request` through `client`, retrying transient failures.
    ///
    /// Up to `budget.get()` retries are made. A retry happens only when the
    /// method is idempotent and the attempt either returned 502, 503 or 504
    /// or failed with a timeout or an unexpected end of stream. Before
    /// retry `n` the executor waits [`Backoff::delay_for_attempt`]`(n)`.
    ///
    /// Any response is returned to the caller, including a retryable
    /// status on the final attempt. Responses that trigger a retry are
    /// closed before the next attempt.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::InvalidRequest`] if the URL is not http(s)
    /// - [`ExecuteError::Cancelled`] if `cx` ends before a response arrives
    /// - [`ExecuteError::BodyNotReplayable`] or [`ExecuteError::BodyRewind`]
    ///   if a retry is due but the body cannot be produced again
    /// - [`ExecuteError::Transport`] if the final attempt failed
    pub async fn execute<C: HttpClient>(
        &self,
        cx: &CallContext,
        client: &C,
        request: HttpRequest,
        budget: RetryBudget,
    ) -> Result<HttpResponse, ExecuteError> {
        validate_target(&request.url)?;

        let idempotent = is_idempotent(&request.method);
        let (head, body, regenerate) = request.into_parts();
        let guard = ReplayGuard::new(body.as_ref(), regenerate);
        let mut first_body = body;

        tracing::trace!(
            method = %head.method,
            url = %head.url,
            retries = budget.get(),
            idempotent,
            "Executing request"
        );

        let mut attempt: u32 = 0;
        loop {
            cx.check()?;

            let body = if attempt == 0 {
                first_body.take()
            } else {
                self.prepare_retry(cx, &guard, attempt).await?
            };
            let outgoing = HttpRequest::from_parts(head.clone(), body);

            let outcome = tokio::select! {
                biased;

                reason = cx.done() => return Err(reason.into()),
                outcome = client.request(outgoing, cx) => outcome,
            };

            let may_retry = idempotent && attempt < budget.get();
            match next_step(outcome, may_retry, attempt) {
                Step::Retry => attempt += 1,
                Step::Finish(result) => return result,
            }
        }
    }

    /// Rewinds the body and waits out the backoff before retry `attempt`.
    async fn prepare_retry(
        &self,
        cx: &CallContext,
        guard: &ReplayGuard,
        attempt: u32,
    ) -> Result<Option<RequestBody>, ExecuteError> {
        let body = guard.body_for_attempt(attempt)?;
        let delay = self.backoff.delay_for_attempt(attempt);

        tracing::debug!(
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Retrying request"
        );

        tokio::select! {
            biased;

            reason = cx.done() => return Err(reason.into()),
            () = self.sleeper.sleep(delay) => {}
        }
        Ok(body)
    }
}

/// Classifies the outcome of one attempt.
fn next_step(outcome: Result<HttpResponse, HttpError>, may_retry: bool, attempt: u32) -> Step {
    match outcome {
        Ok(response) if may_retry && is_retryable_status(response.status) => {
            tracing::debug!(
                attempt,
                status = response.status.as_u16(),
                "Retryable status"
            );
            response.close();
            tracing::trace!(attempt, "Discarded response body closed");
            Step::Retry
        }
        Ok(response) => Step::Finish(Ok(response)),
        Err(error) if may_retry && is_retryable_error(&error) => {
            tracing::debug!(attempt, error = %error, "Retryable transport error");
            Step::Retry
        }
        Err(error) => Step::Finish(Err(ExecuteError::Transport {
            attempts: attempt + 1,
            source: error,
        })),
    }
}

/// Rejects targets no HTTP transport can reach.
fn validate_target(url: &url::Url) -> Result<(), ExecuteError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExecuteError::InvalidRequest(format!(
            "unsupported URL scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ExecuteError::InvalidRequest(format!(
            "URL has no host: {url}"
        )));
    }
    Ok(())
}
