//! Configuration layer for the `outbound-http` probe.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//! - Configuration errors ([`ConfigError`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Headers are merged: TOML headers are applied first and CLI headers with
//! the same name replace them. Repeating a CLI header sends every value.
//!
//! # Boolean Flag Semantics
//!
//! `--no-propagate` only disables request-id propagation. A TOML
//! `propagate_request_id = false` cannot be re-enabled from the CLI.
//!
//! # Normalization
//!
//! Numeric settings are never rejected. A zero timeout or pool value
//! selects the default and the retry cap is clamped to `0..=3` when the
//! client is built.
//!
//! # TOML-Only Options
//!
//! Pool tuning (`[pool]`) is not available via CLI.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{ClientSection, PoolSection, RequestSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
