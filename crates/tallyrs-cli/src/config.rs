//! Configuration file handling.
//!
//! Reads from `~/.config/tallyrs/tallyrs.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the encrypted save file.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    /// Symbol printed in front of money amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_save_path() -> PathBuf {
    PathBuf::from("saves.data")
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path and fail if it is
    /// missing. Otherwise use the default XDG location, writing a default
    /// config there on first use.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match custom_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                path
            }
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    let config = Config::default();
                    // A read-only home should not stop the ledger from opening.
                    if let Err(e) = config.save(&path) {
                        tracing::warn!("Could not write default config: {e:#}");
                    } else {
                        tracing::info!("Created default config at {}", path.display());
                    }
                    return Ok(config);
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the default config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tallyrs").join("tallyrs.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());

        let config: Config = toml::from_str("currency_symbol = \"€\"").unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.save_path, PathBuf::from("saves.data"));
    }

    #[test]
    fn test_custom_path_must_exist() {
        let err = Config::load(Some(PathBuf::from("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_save_then_load_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tallyrs.toml");
        let config = Config {
            save_path: PathBuf::from("/tmp/money.data"),
            currency_symbol: "£".into(),
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(path)).unwrap(), config);
    }
}
