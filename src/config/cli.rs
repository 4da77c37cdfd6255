//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// outbound-http: send one HTTP request with bounded, idempotency-aware retries
///
/// Prints the response status line to stderr and the body to stdout.
/// Any received response, whatever its status, counts as success.
#[derive(Debug, Parser)]
#[command(name = "outbound-http")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Target URL (required unless set in the config file)
    #[arg(long)]
    pub url: Option<String>,

    /// HTTP method
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// HTTP headers in 'Key: Value' or 'Key=Value' format (can be specified multiple times)
    #[arg(long = "header", short = 'H', value_name = "K: V")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Correlation id sent as X-Request-ID
    #[arg(long = "request-id")]
    pub request_id: Option<String>,

    /// Retry cap (clamped to 0..=3)
    #[arg(long, allow_negative_numbers = true)]
    pub retries: Option<i64>,

    /// Per-attempt timeout in milliseconds (0 selects the default)
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Do not send X-Request-ID
    #[arg(long = "no-propagate")]
    pub no_propagate: bool,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for outbound-http
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "outbound-http.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
