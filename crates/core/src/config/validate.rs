use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API section exists (enforced by serde)
/// - Gateway URL and endpoint are non-empty
/// - Staleness window and listing cap are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.gateway.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.gateway cannot be empty".to_string(),
        ));
    }

    if config.api.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.endpoint cannot be empty".to_string(),
        ));
    }

    if config.cache.refresh_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.refresh_secs cannot be 0".to_string(),
        ));
    }

    if config.resolver.max_listing == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_listing cannot be 0".to_string(),
        ));
    }

    Ok(())
}
