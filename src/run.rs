//! Application execution logic.
//!
//! This module builds the client from the validated configuration, sends the
//! configured request through the retry executor and writes the response.

use std::io::Write;

use thiserror::Error;
use tokio::signal;

use outbound_http::client::{BuildError, build_client};
use outbound_http::config::ValidatedConfig;
use outbound_http::context::{CallContext, Cancellation};
use outbound_http::retry::ExecuteError;
use outbound_http::transport::{HttpError, HttpResponse, ResponseBody};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The client could not be constructed from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] BuildError),

    /// The call failed after all permitted attempts.
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// Reading the response body failed.
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] HttpError),

    /// The call was cancelled while the body was being read.
    #[error("Response body read interrupted: {0}")]
    BodyInterrupted(#[source] Cancellation),

    /// Writing the response body to stdout failed.
    #[error("Failed to write response body: {0}")]
    Output(#[source] std::io::Error),
}

impl RunError {
    /// Returns true if the error stems from the configuration rather than
    /// the call itself.
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ClientBuild(_) | Self::Execute(ExecuteError::InvalidRequest(_))
        )
    }
}

/// Sends the configured request and prints the response.
///
/// The status line goes to stderr and the body to stdout. Any HTTP status
/// counts as success; only failing to obtain a response is an error.
/// Ctrl+C or SIGTERM cancels the call.
///
/// # Errors
///
/// Returns an error if:
/// - The pooled transport cannot be built
/// - The call fails or is cancelled
/// - The response body cannot be read or written
///
/// Excluded from coverage - requires network access and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let request = config.to_request();
    let cx = build_context(&config);
    let client = build_client(config.client).map_err(RunError::ClientBuild)?;

    let token = cx.cancellation_token().clone();
    let watcher = tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, cancelling call...");
        token.cancel();
    });

    let result = send(&cx, &client, request).await;
    watcher.abort();
    result
}

/// Builds the call context from the configured request id.
fn build_context(config: &ValidatedConfig) -> CallContext {
    let cx = CallContext::new();
    match &config.request_id {
        Some(id) => cx.with_correlation_id(id.clone()),
        None => cx,
    }
}

#[cfg(not(tarpaulin_include))]
async fn send(
    cx: &CallContext,
    client: &outbound_http::client::Client,
    request: outbound_http::transport::HttpRequest,
) -> Result<(), RunError> {
    let response = client.execute(cx, request).await?;
    eprintln!("{}", status_line(&response));

    let mut stdout = std::io::stdout().lock();
    let written = write_body(cx, response.body, &mut stdout).await?;
    stdout.flush().map_err(RunError::Output)?;
    tracing::debug!("Wrote {written} body byte(s)");
    Ok(())
}

/// Formats the response status as `<code> <reason>`.
fn status_line(response: &HttpResponse) -> String {
    let status = response.status;
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Copies the response body to `out` chunk by chunk.
///
/// Stops early if the call context ends. Returns the number of bytes written.
async fn write_body(
    cx: &CallContext,
    mut body: ResponseBody,
    out: &mut impl Write,
) -> Result<usize, RunError> {
    let mut written = 0;
    loop {
        let chunk = tokio::select! {
            biased;

            reason = cx.done() => return Err(RunError::BodyInterrupted(reason)),
            chunk = body.chunk() => chunk.map_err(RunError::BodyRead)?,
        };

        let Some(chunk) = chunk else {
            return Ok(written);
        };
        out.write_all(&chunk).map_err(RunError::Output)?;
        written += chunk.len();
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed the failure is logged and that signal
/// is never observed.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
