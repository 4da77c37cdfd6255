//! Transport layer for sending HTTP requests to upstream services.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`], [`RequestBody`])
//! - Handling HTTP responses ([`HttpResponse`], [`ResponseBody`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production pooled HTTP client implementation ([`ReqwestClient`])
//! - Decorators for request-id propagation ([`CorrelationTransport`]) and
//!   tracing ([`TracingTransport`])

mod client;
mod correlation;
mod error;
mod http;
mod traced;

#[cfg(test)]
mod client_tests;

pub use client::{PoolOptions, ReqwestClient};
pub use correlation::{CorrelationTransport, REQUEST_ID_HEADER};
pub use error::{BoxError, HttpError};
pub use http::{
    BodyRegenerator, HttpClient, HttpRequest, HttpResponse, RequestBody, RequestHead,
    ResponseBody,
};
pub use traced::TracingTransport;
