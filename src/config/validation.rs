use crate::config::types::{Config, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.archive_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "archive-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    let endpoint = Url::parse(&config.archive_endpoint).map_err(|e| {
        ConfigError::Validation(format!("invalid archive-endpoint: {}", e))
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "archive-endpoint must be an http(s) URL, got scheme '{}'",
            endpoint.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_directory_rejected() {
        let mut config = Config::default();
        config.output.directory = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        let mut config = Config::default();
        config.http.fetch_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_archive_timeout_rejected() {
        let mut config = Config::default();
        config.http.archive_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::default();
        config.http.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_archive_endpoint_rejected() {
        let mut config = Config::default();
        config.http.archive_endpoint = "ftp://archive.org/wayback".to_string();
        let result = validate(&config);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_archive_endpoint_rejected() {
        let mut config = Config::default();
        config.http.archive_endpoint = "not a url".to_string();
        assert!(validate(&config).is_err());
    }
}
