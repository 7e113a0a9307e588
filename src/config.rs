//! Configuration module
//!
//! Reads `config.toml` (default: `~/.config/csms-core/config.toml`). Every
//! section and key is optional; missing values fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub ocpp: OcppSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SeaORM connection URL, e.g. `sqlite://./csms.db?mode=rwc`
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./csms.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// EnvFilter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcppSection {
    /// Interval returned in BootNotification responses
    pub heartbeat_interval_secs: u32,
    /// Upper bound for handling one inbound message, storage calls included
    pub request_timeout_secs: u64,
    pub reservation_check_interval_secs: u64,
    /// How long after a stop late MeterValues still attach to the transaction
    pub meter_value_grace_secs: i64,
}

impl Default for OcppSection {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: 300,
            request_timeout_secs: 30,
            reservation_check_interval_secs: 60,
            meter_value_grace_secs: 300,
        }
    }
}

impl OcppSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn meter_value_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.meter_value_grace_secs)
    }
}

impl AppConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("csms-core")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.database.url, "sqlite://./csms.db?mode=rwc");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.ocpp.heartbeat_interval_secs, 300);
        assert_eq!(cfg.ocpp.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [ocpp]
            heartbeat_interval_secs = 60

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ocpp.heartbeat_interval_secs, 60);
        assert_eq!(cfg.ocpp.reservation_check_interval_secs, 60);
        assert_eq!(cfg.ocpp.meter_value_grace(), chrono::Duration::seconds(300));
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(AppConfig::from_toml("[ocpp]\nheartbeat_interval_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/csms-core/config.toml")).unwrap();
        assert_eq!(cfg.ocpp.request_timeout_secs, 30);
    }
}
