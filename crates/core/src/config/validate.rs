use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Debrid token is present (the provider rejects unauthenticated calls)
/// - Server port is not 0
/// - Resolver limits and cache TTLs are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.debrid.api_token.is_empty() {
        return Err(ConfigError::ValidationError(
            "debrid.api_token is required".to_string(),
        ));
    }

    let resolver = &config.resolver;
    if resolver.torrent_limit == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.torrent_limit cannot be 0".to_string(),
        ));
    }
    if resolver.availability_check_limit == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.availability_check_limit cannot be 0".to_string(),
        ));
    }
    if resolver.max_streams == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_streams cannot be 0".to_string(),
        ));
    }
    if resolver.max_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_concurrency cannot be 0".to_string(),
        ));
    }
    if resolver.poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.poll_attempts cannot be 0".to_string(),
        ));
    }

    let cache = &config.cache;
    if cache.metadata_ttl_secs == 0 || cache.search_ttl_secs == 0 || cache.stream_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache TTLs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[debrid]
api_token = "token"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_token_fails() {
        let mut config = valid_config();
        config.debrid.api_token.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_limits_fail() {
        let mut config = valid_config();
        config.resolver.max_concurrency = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.resolver.torrent_limit = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.resolver.max_streams = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_ttl_fails() {
        let mut config = valid_config();
        config.cache.stream_ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
