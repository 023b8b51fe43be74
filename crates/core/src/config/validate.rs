use super::{types::Config, ConfigError};

/// Validate configuration values before the run starts.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.album.max_concurrent == 0 {
        return Err(ConfigError::Invalid(
            "album.max_concurrent must be at least 1".to_string(),
        ));
    }

    for (name, percent) in [
        ("album.thumbnail_percent", config.album.thumbnail_percent),
        ("album.medium_percent", config.album.medium_percent),
    ] {
        if percent == 0 || percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "{name} must be between 1 and 100, got {percent}"
            )));
        }
    }

    if config.invoker.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "invoker.timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        validate_config(&Config::default()).unwrap();
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.album.max_concurrent = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let mut config = Config::default();
        config.album.medium_percent = 101;
        assert!(validate_config(&config).is_err());

        config.album.medium_percent = 0;
        assert!(validate_config(&config).is_err());
    }
}
