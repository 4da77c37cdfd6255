//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.request.url.is_none());
        assert!(config.client.timeout_ms.is_none());
        assert!(config.pool.max_idle_per_host.is_none());
        assert!(config.request.headers.is_empty());
    }

    #[test]
    fn parse_request_section() {
        let toml = r#"
            [request]
            url = "https://api.example.com/items/1"
            method = "DELETE"
            body = "payload"
            request_id = "rid-toml"

            [request.headers]
            Accept = "application/json"
            X-Tenant = "acme"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let request = &config.request;

        assert_eq!(request.url.as_deref(), Some("https://api.example.com/items/1"));
        assert_eq!(request.method.as_deref(), Some("DELETE"));
        assert_eq!(request.body.as_deref(), Some("payload"));
        assert_eq!(request.request_id.as_deref(), Some("rid-toml"));
        assert_eq!(request.headers.len(), 2);
        assert_eq!(
            request.headers.get("X-Tenant").map(String::as_str),
            Some("acme")
        );
    }

    #[test]
    fn parse_client_section() {
        let toml = r"
            [client]
            timeout_ms = 2500
            max_retries = -1
            propagate_request_id = false
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.client.timeout_ms, Some(2500));
        assert_eq!(config.client.max_retries, Some(-1));
        assert_eq!(config.client.propagate_request_id, Some(false));
    }

    #[test]
    fn parse_pool_section() {
        let toml = r"
            [pool]
            connect_timeout_ms = 750
            tcp_keepalive_secs = 15
            max_idle_per_host = 8
            idle_timeout_secs = 45
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.pool.connect_timeout_ms, Some(750));
        assert_eq!(config.pool.tcp_keepalive_secs, Some(15));
        assert_eq!(config.pool.max_idle_per_host, Some(8));
        assert_eq!(config.pool.idle_timeout_secs, Some(45));
    }
}

mod errors {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[webhook]\nurl = \"https://x\"");

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = TomlConfig::parse("[client]\nretries = 2");

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = TomlConfig::parse("[client]\ntimeout_ms = \"fast\"");

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn load_missing_file_returns_file_read_error() {
        let result = TomlConfig::load(std::path::Path::new("definitely_missing_98765.toml"));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(config.request.url.is_none());
        assert!(config.client.max_retries.is_none());
    }

    #[test]
    fn default_template_documents_every_section() {
        let template = default_config_template();

        assert!(template.contains("[client]"));
        assert!(template.contains("[pool]"));
        assert!(template.contains("[request]"));
        assert!(template.contains("[request.headers]"));
    }
}
