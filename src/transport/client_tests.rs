//! Tests for `ReqwestClient` and `PoolOptions`.
//!
//! Exchanges against a live server are covered by the integration tests
//! under `tests/`; these focus on construction and error mapping.

use super::client::is_end_of_stream;
use super::*;
use crate::context::CallContext;
use std::time::Duration;

mod pool_options {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let pool = PoolOptions::default();

        assert_eq!(pool.connect_timeout, Duration::from_secs(5));
        assert_eq!(pool.tcp_keepalive, Duration::from_secs(30));
        assert_eq!(pool.max_idle_per_host, 100);
        assert_eq!(pool.idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn normalized_replaces_zero_values() {
        let pool = PoolOptions {
            connect_timeout: Duration::ZERO,
            tcp_keepalive: Duration::ZERO,
            max_idle_per_host: 0,
            idle_timeout: Duration::ZERO,
        }
        .normalized();

        assert_eq!(pool, PoolOptions::new());
    }

    #[test]
    fn normalized_keeps_explicit_values() {
        let pool = PoolOptions {
            connect_timeout: Duration::from_secs(1),
            tcp_keepalive: Duration::from_secs(2),
            max_idle_per_host: 3,
            idle_timeout: Duration::from_secs(4),
        };

        assert_eq!(pool.normalized(), pool);
    }
}

mod reqwest_client {
    use super::*;

    #[test]
    fn new_creates_client() {
        let client = ReqwestClient::new();
        let _ = format!("{client:?}");
    }

    #[test]
    fn pooled_builds_with_defaults() {
        let client = ReqwestClient::pooled(PoolOptions::default(), Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let client = ReqwestClient::from_client(custom);

        let _ = format!("{client:?}");
    }

    #[test]
    fn debug_format_is_readable() {
        let client = ReqwestClient::new();
        let debug = format!("{client:?}");

        assert!(debug.contains("ReqwestClient"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }

    #[tokio::test]
    async fn request_to_invalid_host_returns_error_or_proxy_response() {
        let client = ReqwestClient::new();
        let url = url::Url::parse("http://invalid.invalid.invalid/").unwrap();
        let req = HttpRequest::get(url);

        let result = client.request(req, &CallContext::new()).await;

        // DNS resolution failure typically causes a connection error.
        // However, in environments with a proxy, the proxy may return an
        // HTTP error response (e.g., 502 Bad Gateway) instead.
        match result {
            Err(HttpError::Connection(_)) => {}
            Ok(resp) if !resp.is_success() => {}
            other => panic!("Expected connection error or proxy error response, got {other:?}"),
        }
    }
}

mod end_of_stream_detection {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("wrapper")]
    struct Wrapper(#[source] std::io::Error);

    #[test]
    fn direct_unexpected_eof_is_detected() {
        let err = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(is_end_of_stream(&err));
    }

    #[test]
    fn nested_unexpected_eof_is_detected() {
        let err = Wrapper(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(is_end_of_stream(&err));
    }

    #[test]
    fn other_io_errors_are_not_end_of_stream() {
        let err = Wrapper(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
        assert!(!is_end_of_stream(&err));
    }
}
