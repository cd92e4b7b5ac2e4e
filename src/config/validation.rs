use crate::config::types::{ApiConfig, Config, PacingConfig, SessionConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_pacing_config(&config.pacing)?;
    if let Some(session) = &config.session {
        validate_session_config(session)?;
    }
    Ok(())
}

/// Validates the upstream API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base-url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::Validation(format!("invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates pacing parameters
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.max_wait_ms == 0 {
        return Err(ConfigError::Validation(
            "max-wait-ms must be greater than 0".to_string(),
        ));
    }

    if config.min_wait_ms > config.max_wait_ms {
        return Err(ConfigError::Validation(format!(
            "min-wait-ms ({}) must not exceed max-wait-ms ({})",
            config.min_wait_ms, config.max_wait_ms
        )));
    }

    if config.max_server_errors < 1 {
        return Err(ConfigError::Validation(
            "max-server-errors must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the session cookie pair
fn validate_session_config(session: &SessionConfig) -> Result<(), ConfigError> {
    if session.cookie_t.is_empty() || session.cookie_y.is_empty() {
        return Err(ConfigError::Validation(
            "session cookies cookie-t and cookie-y must both be non-empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = Config::default();
        config.api.base_url = "ftp://groups.example.net/api".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unparseable_base_url_rejected() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_min_wait_above_max_rejected() {
        let mut config = Config::default();
        config.pacing.min_wait_ms = 20_000;
        config.pacing.max_wait_ms = 10_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_wait_rejected() {
        let mut config = Config::default();
        config.pacing.min_wait_ms = 0;
        config.pacing.max_wait_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_server_error_threshold_rejected() {
        let mut config = Config::default();
        config.pacing.max_server_errors = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_cookie_rejected() {
        let mut config = Config::default();
        config.session = Some(SessionConfig {
            cookie_t: "t".to_string(),
            cookie_y: String::new(),
        });
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_full_cookie_pair_accepted() {
        let mut config = Config::default();
        config.session = Some(SessionConfig {
            cookie_t: "t".to_string(),
            cookie_y: "y".to_string(),
        });
        assert!(validate(&config).is_ok());
    }
}
