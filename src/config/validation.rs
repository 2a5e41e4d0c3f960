use crate::config::types::{Config, CrawlerConfig, OutputConfig, RendererConfig, RetryConfig, ScopeConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_scope_config(&config.scope)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.task_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "task_timeout_ms must be greater than 0".to_string(),
        ));
    }

    // Pacing runs inside the task deadline
    if config.pacing_delay_ms >= config.task_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "pacing_delay_ms ({}) must be less than task_timeout_ms ({})",
            config.pacing_delay_ms, config.task_timeout_ms
        )));
    }

    if config.release_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "release_timeout_ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.launch_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "launch_attempts must be >= 1, got {}",
            config.launch_attempts
        )));
    }

    if config.load_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "load_attempts must be >= 1, got {}",
            config.load_attempts
        )));
    }

    Ok(())
}

/// Validates the link scope prefix
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    if !config.prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "scope prefix must start with '/', got '{}'",
            config.prefix
        )));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be greater than 0".to_string(),
        ));
    }

    Selector::parse(&config.content_selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", config.content_selector, e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.failure_log.is_empty() {
        return Err(ConfigError::Validation(
            "failure_log cannot be empty".to_string(),
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
    fn test_scope_prefix_must_be_absolute() {
        let mut config = Config::default();
        config.scope.prefix = "docs".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.scope.prefix = "/".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_pacing_must_fit_inside_task_timeout() {
        let mut config = Config::default();
        config.crawler.task_timeout_ms = 1_000;
        config.crawler.pacing_delay_ms = 1_500;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.pacing_delay_ms = 1_000;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.pacing_delay_ms = 999;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_attempts_must_be_positive() {
        let mut config = Config::default();
        config.retry.load_attempts = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.retry.launch_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_content_selector() {
        let mut config = Config::default();
        config.renderer.content_selector = "main >>> ((".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_zero_task_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.task_timeout_ms = 0;
        assert!(validate(&config).is_err());
    }
}
