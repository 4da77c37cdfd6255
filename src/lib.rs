//! outbound-http: resilient outbound HTTP calls
//!
//! A library for sending HTTP requests to upstream services with bounded,
//! idempotency-aware retries, linear backoff and request-id propagation.

pub mod client;
pub mod config;
pub mod context;
pub mod retry;
pub mod time;
pub mod transport;
