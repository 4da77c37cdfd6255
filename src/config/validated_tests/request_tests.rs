//! Tests for request settings: URL, method, headers, body and request id.

use super::*;

mod url_validation {
    use super::*;

    #[test]
    fn unparsable_url_is_rejected() {
        let cli = cli(&["--url", "not a url"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let cli = cli(&["--url", "ftp://files.example.com/a"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        match result {
            Err(ConfigError::InvalidUrl { reason, .. }) => assert!(reason.contains("ftp")),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn plain_http_is_accepted() {
        let cli = cli(&["--url", "http://127.0.0.1:8080/ping"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.url.scheme(), "http");
    }
}

mod method {
    use super::*;

    #[test]
    fn defaults_to_get() {
        let config = ValidatedConfig::from_raw(&cli(&["--url", "https://x.example"]), None).unwrap();

        assert_eq!(config.method, http::Method::GET);
    }

    #[test]
    fn lowercase_method_is_normalized() {
        let cli = cli(&["--url", "https://x.example", "-X", "delete"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.method, http::Method::DELETE);
    }

    #[test]
    fn invalid_method_is_rejected() {
        let cli = cli(&["--url", "https://x.example", "-X", "GET POST"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidMethod(_))));
    }
}

mod headers {
    use super::*;

    #[test]
    fn colon_and_equals_formats_are_accepted() {
        let cli = cli(&[
            "--url",
            "https://x.example",
            "-H",
            "Accept: application/json",
            "-H",
            "X-Api-Key=secret",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.headers.get("accept").unwrap(), "application/json");
        assert_eq!(config.headers.get("x-api-key").unwrap(), "secret");
    }

    #[test]
    fn first_separator_wins() {
        let cli = cli(&[
            "--url",
            "https://x.example",
            "-H",
            "Authorization: Basic dXNlcjpwYXNz==",
            "-H",
            "X-Callback=https://cb.example/hook",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(
            config.headers.get("authorization").unwrap(),
            "Basic dXNlcjpwYXNz=="
        );
        assert_eq!(
            config.headers.get("x-callback").unwrap(),
            "https://cb.example/hook"
        );
    }

    #[test]
    fn header_without_separator_is_rejected() {
        let cli = cli(&["--url", "https://x.example", "-H", "NoSeparator"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn header_with_empty_name_is_rejected() {
        let cli = cli(&["--url", "https://x.example", "-H", ": value"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let cli = cli(&["--url", "https://x.example", "-H", "Bad Name: v"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidHeaderName { .. })));
    }

    #[test]
    fn invalid_header_value_from_toml_is_rejected() {
        let toml = toml(
            "[request]\nurl = \"https://x.example\"\n[request.headers]\nX-Bad = \"line\\nbreak\"",
        );
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeaderValue { .. })
        ));
    }
}

mod body_and_request_id {
    use super::*;

    #[test]
    fn body_and_request_id_from_cli() {
        let cli = cli(&[
            "--url",
            "https://x.example",
            "-d",
            "hello",
            "--request-id",
            "rid-1",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.body.as_deref(), Some("hello"));
        assert_eq!(config.request_id.as_ref().unwrap().as_str(), "rid-1");
    }

    #[test]
    fn empty_request_id_is_ignored() {
        let cli = cli(&["--url", "https://x.example", "--request-id", ""]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert!(config.request_id.is_none());
    }

    #[test]
    fn to_request_carries_method_headers_and_body() {
        let cli = cli(&[
            "--url",
            "https://x.example/items",
            "-X",
            "PUT",
            "-H",
            "Content-Type: text/plain",
            "-d",
            "payload",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let request = config.to_request();

        assert_eq!(request.method, http::Method::PUT);
        assert_eq!(request.url.as_str(), "https://x.example/items");
        assert_eq!(request.headers().get("content-type").unwrap(), "text/plain");
        assert_eq!(
            request.body().and_then(crate::transport::RequestBody::as_bytes),
            Some(&b"payload"[..])
        );
        assert!(request.regenerator().is_some());
    }

    #[test]
    fn to_request_without_body_has_none() {
        let config = ValidatedConfig::from_raw(&cli(&["--url", "https://x.example"]), None).unwrap();

        assert!(config.to_request().body().is_none());
    }

    #[test]
    fn display_summarizes_config() {
        let cli = cli(&["--url", "https://x.example", "--request-id", "rid-2"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let shown = config.to_string();

        assert!(shown.contains("https://x.example/"));
        assert!(shown.contains("rid-2"));
        assert!(shown.contains("timeout: 10000ms"));
    }
}
