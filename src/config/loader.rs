//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Load configuration, falling back to defaults when the file is absent.
///
/// The original deployment ran with no config file at all, driven entirely
/// by environment variables; that must keep working.
pub fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "No config file found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Semantic validation (serde handles syntactic).
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.rate_limit.window_secs == 0 {
        return Err(ConfigError::Validation(
            "rate_limit.window_secs must be > 0".into(),
        ));
    }
    if config.rate_limit.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "rate_limit.max_attempts must be > 0".into(),
        ));
    }
    if config.trigger.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "trigger.timeout_secs must be > 0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("flowgate.toml")).unwrap();
        assert_eq!(config.rate_limit.max_attempts, 10);
        assert_eq!(config.trigger.timeout_secs, 20);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowgate.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "[listener]\nbind_address = \"127.0.0.1:9999\"").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.rate_limit.window_secs, 300);
    }

    #[test]
    fn zero_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowgate.toml");
        fs::write(&path, "[rate_limit]\nwindow_secs = 0\n").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }
}
