//! Configuration validation integration tests
//!
//! Tests for configuration validation across all config sections.

#[cfg(test)]
mod tests {
    use balance_batch::config::models::{
        BatchConfig, LoggingConfig, LookupConfig, ServerConfig, ServiceConfig,
    };
    use balance_batch::config::{Config, Validate};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== ServiceConfig Validation ====================

    #[test]
    fn test_default_service_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_port_zero_fails() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().contains("port"));
    }

    // ==================== LookupConfig Validation ====================

    #[test]
    fn test_lookup_requires_http_url() {
        let config = LookupConfig {
            base_url: "ftp://balances.example.com".to_string(),
            ..LookupConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_zero_timeout_fails() {
        let config = LookupConfig {
            timeout_secs: 0,
            ..LookupConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("timeout"));
    }

    #[test]
    fn test_lookup_zero_retry_after_cap_fails() {
        let config = LookupConfig {
            max_retry_after_secs: 0,
            ..LookupConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("max_retry_after_secs"));
    }

    // ==================== BatchConfig Validation ====================

    #[test]
    fn test_default_rate_above_max_fails() {
        let config = BatchConfig {
            default_rate_limit: 500,
            max_rate_limit: 100,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // ==================== LoggingConfig Validation ====================

    #[test]
    fn test_empty_log_level_fails() {
        let config = LoggingConfig {
            level: String::new(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // ==================== File loading ====================

    #[tokio::test]
    async fn test_load_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
server:
  port: 9100
lookup:
  base_url: "https://balances.example.com/v1/balances"
  max_retries: 1
batch:
  default_rate_limit: 2
"#,
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server().port, 9100);
        assert_eq!(config.lookup().max_retries, 1);
        assert_eq!(config.batch().default_rate_limit, 2);
        assert_eq!(config.batch().max_rate_limit, 100);
    }
}
