use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Batch limits are positive
/// - Converter has a binary, a timeout and at least one slot
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Limits validation
    if config.limits.max_files == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_files must be at least 1".to_string(),
        ));
    }
    if config.limits.max_file_size_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_file_size_bytes must be at least 1".to_string(),
        ));
    }

    // Converter validation
    if config.converter.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.ffmpeg_path cannot be empty".to_string(),
        ));
    }
    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs must be at least 1".to_string(),
        ));
    }
    if config.converter.max_parallel_conversions == 0 {
        return Err(ConfigError::ValidationError(
            "converter.max_parallel_conversions must be at least 1".to_string(),
        ));
    }

    Ok(())
}
