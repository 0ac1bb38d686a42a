use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Catches every configuration-class defect before any directory is created or
/// any process is spawned:
/// - Empty playlist registry
/// - Invalid playlist names and unknown playlist kinds
/// - Duplicate playlist names (they would share a directory and archive)
/// - Inverted sleep interval range
/// - Recovery URL template without an `{id}` placeholder
/// - Zero timeout
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.playlists.is_empty() {
        return Err(ConfigError::ValidationError(
            "no playlists configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for playlist in &config.playlists {
        playlist
            .preflight()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if !seen.insert(playlist.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate playlist name: '{}'",
                playlist.name
            )));
        }
    }

    let rate_limit = &config.rate_limit;
    if rate_limit.min_sleep_interval_secs > rate_limit.max_sleep_interval_secs {
        return Err(ConfigError::ValidationError(format!(
            "rate_limit.min_sleep_interval_secs ({}) exceeds rate_limit.max_sleep_interval_secs ({})",
            rate_limit.min_sleep_interval_secs, rate_limit.max_sleep_interval_secs
        )));
    }

    if !config.policy.recovery_url_template.contains("{id}") {
        return Err(ConfigError::ValidationError(
            "policy.recovery_url_template must contain '{id}'".to_string(),
        ));
    }

    if config.downloader.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "downloader.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::PlaylistDescriptor;

    fn valid_config() -> Config {
        let mut config = Config::with_root("/data");
        config.playlists = vec![
            PlaylistDescriptor::new("Everyday Carry", "video", "https://example.com/1"),
            PlaylistDescriptor::new("Google Voice", "audio", "https://example.com/2"),
        ];
        config
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_registry_fails() {
        let config = Config::with_root("/data");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_invalid_name_fails() {
        let mut config = valid_config();
        config
            .playlists
            .push(PlaylistDescriptor::new("What?", "video", "https://example.com/3"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("What?"));
    }

    #[test]
    fn test_validate_unknown_kind_fails() {
        let mut config = valid_config();
        config.playlists[1].kind = "podcast".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("podcast"));
    }

    #[test]
    fn test_validate_duplicate_names_fails() {
        let mut config = valid_config();
        config
            .playlists
            .push(PlaylistDescriptor::new("Google Voice", "video", "https://example.com/4"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_inverted_sleep_range_fails() {
        let mut config = valid_config();
        config.rate_limit.min_sleep_interval_secs = 120;
        config.rate_limit.max_sleep_interval_secs = 30;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_template_without_placeholder_fails() {
        let mut config = valid_config();
        config.policy.recovery_url_template = "https://example.com/search".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.downloader.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
