//! TOML-based application configuration.
//!
//! Stores the tracking options, currently the single knob
//! `tracking.percentage_check`: the fraction of total duration that must be
//! rewatched before the one-time notification fires.
//!
//! Configuration is stored at `~/.config/rewatch/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default fraction of the duration that must be rewatched.
pub const DEFAULT_PERCENTAGE_CHECK: f64 = 0.25;

/// Tracking-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Fraction of total duration, in `(0, 1]`.
    #[serde(default = "default_percentage_check")]
    pub percentage_check: f64,
}

fn default_percentage_check() -> f64 {
    DEFAULT_PERCENTAGE_CHECK
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            percentage_check: DEFAULT_PERCENTAGE_CHECK,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rewatch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// Returns `~/.config/rewatch[-dev]/` based on REWATCH_ENV.
///
/// Set REWATCH_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REWATCH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("rewatch-dev")
    } else {
        base_dir.join("rewatch")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| ConfigError::ParseFailed(e.to_string())),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "tracking.percentage_check" => Some(self.tracking.percentage_check.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key. Does not persist; call [`Config::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "tracking.percentage_check" => {
                let parsed: f64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as a number"),
                })?;
                self.tracking.percentage_check = validate_fraction(key, parsed)?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn validate_fraction(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be in (0, 1], got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tracking.percentage_check, DEFAULT_PERCENTAGE_CHECK);
    }

    #[test]
    fn missing_section_falls_back_to_default() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.tracking.percentage_check, DEFAULT_PERCENTAGE_CHECK);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(
            cfg.get("tracking.percentage_check").as_deref(),
            Some("0.25")
        );
        assert!(cfg.get("tracking.missing_key").is_none());
    }

    #[test]
    fn set_accepts_values_in_range() {
        let mut cfg = Config::default();
        cfg.set("tracking.percentage_check", "0.5").unwrap();
        assert_eq!(cfg.tracking.percentage_check, 0.5);
        cfg.set("tracking.percentage_check", "1").unwrap();
        assert_eq!(cfg.tracking.percentage_check, 1.0);
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("tracking.percentage_check", "0").is_err());
        assert!(cfg.set("tracking.percentage_check", "1.5").is_err());
        assert!(cfg.set("tracking.percentage_check", "-0.25").is_err());
        assert!(cfg.set("tracking.percentage_check", "NaN").is_err());
        assert_eq!(cfg.tracking.percentage_check, DEFAULT_PERCENTAGE_CHECK);
    }

    #[test]
    fn set_rejects_garbage_and_unknown_keys() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("tracking.percentage_check", "a quarter"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("playback.speed", "2"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
