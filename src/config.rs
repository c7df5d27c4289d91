use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tagwire::codec::DecodeLimits;

/// Application configuration loaded from ~/.config/tagwire/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub limits: DecodeLimits,
    #[serde(default)]
    pub backups: BackupsConfig,
}

/// Configuration for backups taken before writing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupsConfig {
    /// Copy the file to `<file>.bak` before saving (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl Config {
    /// Load from `path` if given, otherwise from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("tagwire").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limits, DecodeLimits::default());
        assert!(config.backups.enabled);
    }

    #[test]
    fn test_load_partial_limits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[limits]
max_description_len = 64
max_language_len = 3
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limits.max_description_len, 64);
        assert_eq!(config.limits.max_language_len, 3);
        // unspecified limits keep their defaults
        assert_eq!(config.limits.max_key_len, 255);
        assert_eq!(config.limits.max_value_len, 16 * 1024 * 1024);
    }

    #[test]
    fn test_backups_config_defaults() {
        let config = Config::default();
        assert!(config.backups.enabled);
    }

    #[test]
    fn test_load_with_backups_disabled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backups]
enabled = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.backups.enabled);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_key_len = \"big\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
