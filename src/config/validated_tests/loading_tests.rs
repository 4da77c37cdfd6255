//! Tests for configuration loading and required fields.

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, tempdir};

use super::*;

mod required_fields {
    use super::*;

    #[test]
    fn missing_url_returns_error() {
        let cli = cli(&[]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "url", .. })
        ));
    }

    #[test]
    fn url_from_cli() {
        let cli = cli(&["--url", "https://example.com"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/");
    }

    #[test]
    fn url_from_toml() {
        let cli = cli(&[]);
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/health"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/health");
    }
}

mod config_load {
    use super::*;

    #[test]
    fn load_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [client]
            max_retries = 2

            [request]
            url = "https://example.com/orders"
            method = "PUT"
        "#
        )
        .unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/orders");
        assert_eq!(config.method, http::Method::PUT);
        assert_eq!(config.client.max_retries.get(), 2);
    }

    #[test]
    fn load_without_config_file() {
        let cli = cli(&["--url", "https://example.com"]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/");
    }

    #[test]
    fn load_nonexistent_config_file_returns_error() {
        let cli = cli(&["--config", "nonexistent_file_12345.toml"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_toml_returns_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[request\nurl = ").unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}

mod write_config {
    use super::super::super::validated::write_default_config;
    use super::*;

    #[test]
    fn write_default_config_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-config.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[client]"));
        assert!(content.contains("[pool]"));
        assert!(content.contains("[request]"));
    }

    #[test]
    fn written_template_loads_once_url_is_given() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        write_default_config(&path).unwrap();

        let cli = cli(&[
            "--config",
            path.to_str().unwrap(),
            "--url",
            "http://localhost:8080/",
        ]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.method, http::Method::GET);
    }

    #[test]
    fn write_default_config_to_invalid_path_returns_error() {
        // Try writing to an invalid path (directory that doesn't exist)
        let path = Path::new("/nonexistent_dir_12345/config.toml");
        let result = write_default_config(path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
