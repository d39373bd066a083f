use crate::config::types::{Config, CrawlerConfig, RepairConfig, UserAgentConfig, VectorConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_vector_config(&config.vector)?;
    validate_repair_config(&config.repair)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates similarity index configuration
fn validate_vector_config(config: &VectorConfig) -> Result<(), ConfigError> {
    if config.dimension < 1 {
        return Err(ConfigError::Validation(format!(
            "dimension must be >= 1, got {}",
            config.dimension
        )));
    }

    if !config.similarity_threshold.is_finite() || config.similarity_threshold <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "similarity_threshold must be a positive number, got {}",
            config.similarity_threshold
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    validate_http_endpoint("embedding_endpoint", &config.embedding_endpoint)?;

    if config.embedding_model.is_empty() {
        return Err(ConfigError::Validation(
            "embedding_model cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.store_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "store_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates repair engine configuration
fn validate_repair_config(config: &RepairConfig) -> Result<(), ConfigError> {
    if config.similarity_k < 1 {
        return Err(ConfigError::Validation(format!(
            "similarity_k must be >= 1, got {}",
            config.similarity_k
        )));
    }

    if config.max_suggestions < 1 {
        return Err(ConfigError::Validation(format!(
            "max_suggestions must be >= 1, got {}",
            config.max_suggestions
        )));
    }

    validate_http_endpoint("archive_endpoint", &config.archive_endpoint)?;
    validate_http_endpoint("generator_endpoint", &config.generator_endpoint)?;

    if config.generator_model.is_empty() {
        return Err(ConfigError::Validation(
            "generator_model cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a setting holds an absolute HTTP(S) URL
fn validate_http_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use HTTP or HTTPS, got '{}'",
            name, value
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
