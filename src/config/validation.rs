use crate::config::types::{Config, CrawlConfig, OutputConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates transport configuration: every numeric field must be positive
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be > 0 seconds".to_string(),
        ));
    }

    if config.retry_attempts == 0 {
        return Err(ConfigError::Validation(
            "retry_attempts must be >= 1".to_string(),
        ));
    }

    if !config.retry_delay.is_finite()
        || config.retry_delay <= 0.0
        || Duration::try_from_secs_f64(config.retry_delay).is_err()
    {
        return Err(ConfigError::Validation(format!(
            "retry_delay must be a positive number of seconds, got {}",
            config.retry_delay
        )));
    }

    if config.max_concurrent_requests == 0 {
        return Err(ConfigError::Validation(
            "max_concurrent_requests must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates output configuration
pub fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
