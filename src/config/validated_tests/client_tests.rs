//! Tests for client settings: timeout, retry cap and pool options.

use std::time::Duration;

use crate::transport::PoolOptions;

use super::*;

fn base() -> Cli {
    cli(&["--url", "https://x.example"])
}

mod defaults {
    use super::*;

    #[test]
    fn client_defaults_apply_without_sources() {
        let config = ValidatedConfig::from_raw(&base(), None).unwrap();

        assert_eq!(config.client.timeout, Duration::from_secs(10));
        assert_eq!(config.client.max_retries.get(), 0);
        assert_eq!(config.client.pool, PoolOptions::default());
        assert!(config.client.transport.is_none());
    }
}

mod normalization {
    use super::*;

    #[test]
    fn zero_timeout_is_accepted_and_normalized() {
        let cli = cli(&["--url", "https://x.example", "--timeout-ms", "0"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.client.effective_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn retries_above_cap_are_clamped() {
        let cli = cli(&["--url", "https://x.example", "--retries", "42"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.client.max_retries.get(), 3);
    }

    #[test]
    fn negative_retries_are_clamped_to_zero() {
        let toml = toml("[client]\nmax_retries = -5");
        let config = ValidatedConfig::from_raw(&base(), Some(&toml)).unwrap();

        assert_eq!(config.client.max_retries.get(), 0);
    }
}

mod pool {
    use super::*;

    #[test]
    fn pool_values_come_from_toml() {
        let toml = toml(
            r"
            [pool]
            connect_timeout_ms = 750
            tcp_keepalive_secs = 15
            max_idle_per_host = 8
            idle_timeout_secs = 45
        ",
        );

        let config = ValidatedConfig::from_raw(&base(), Some(&toml)).unwrap();

        assert_eq!(
            config.client.pool,
            PoolOptions {
                connect_timeout: Duration::from_millis(750),
                tcp_keepalive: Duration::from_secs(15),
                max_idle_per_host: 8,
                idle_timeout: Duration::from_secs(45),
            }
        );
    }

    #[test]
    fn partial_pool_section_keeps_other_defaults() {
        let toml = toml("[pool]\nmax_idle_per_host = 4");
        let config = ValidatedConfig::from_raw(&base(), Some(&toml)).unwrap();

        assert_eq!(config.client.pool.max_idle_per_host, 4);
        assert_eq!(
            config.client.pool.connect_timeout,
            PoolOptions::DEFAULT_CONNECT_TIMEOUT
        );
    }

    #[test]
    fn validated_settings_build_a_client() {
        let toml = toml("[pool]\nconnect_timeout_ms = 0\nmax_idle_per_host = 0");
        let config = ValidatedConfig::from_raw(&base(), Some(&toml)).unwrap();

        let client = crate::client::build_client(config.client).unwrap();

        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
