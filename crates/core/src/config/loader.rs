use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore, e.g.
/// `TUBEMIRROR_POLICY__RATE_LIMIT=true`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TUBEMIRROR_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[destination]
root = "/srv/mirror"

[downloader]
binary = "/opt/yt-dlp"
timeout_secs = 7200
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.downloader.binary, PathBuf::from("/opt/yt-dlp"));
        assert_eq!(config.downloader.timeout_secs, Some(7200));
    }

    #[test]
    fn test_load_config_from_str_missing_destination() {
        let toml = r#"
[policy]
rate_limit = true
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[destination]
root = "/srv/mirror"

[policy]
mark_unavailable = false

[[playlists]]
name = "Talks"
kind = "audio"
url = "https://www.youtube.com/playlist?list=PLtalks"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.destination.root, PathBuf::from("/srv/mirror"));
        assert!(!config.policy.mark_unavailable);
        assert_eq!(config.playlists.len(), 1);
        assert_eq!(config.playlists[0].name, "Talks");
    }

    #[test]
    fn test_example_config_is_valid() {
        let example = include_str!("../../../../config.example.toml");
        let config = load_config_from_str(example).unwrap();

        assert_eq!(config.playlists.len(), 2);
        assert_eq!(config.rate_limit.limit_rate, "5M");
        crate::config::validate_config(&config).unwrap();
    }
}
