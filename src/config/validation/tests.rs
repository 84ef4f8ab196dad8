//! Tests for configuration validation

#[cfg(test)]
mod tests {
    use super::super::trait_def::Validate;
    use crate::config::models::*;

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 8080;
        config.host = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_config_validation() {
        let mut config = LookupConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://balances.example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://balances.example.com".to_string();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 10;
        config.max_retries = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_config_validation() {
        let mut config = BatchConfig::default();
        assert!(config.validate().is_ok());

        config.default_rate_limit = 0;
        assert!(config.validate().is_err());

        config.default_rate_limit = 500;
        config.max_rate_limit = 100;
        assert!(config.validate().is_err());

        config.default_rate_limit = 5;
        config.max_addresses_per_job = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_config_validation_reports_first_error() {
        let mut config = ServiceConfig::default();
        assert!(config.validate().is_ok());

        config.logging.level = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Logging level"));
    }
}
