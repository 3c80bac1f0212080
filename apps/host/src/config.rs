//! # Host Configuration
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                  | Default                                   |
//! |---------------------------|-------------------------------------------|
//! | `WARDROBE_DB_PATH`        | `<platform data dir>/wardrobe.db`         |
//! | `WARDROBE_BURN_DOWN_DAYS` | `7`                                       |
//! | `WARDROBE_LOG`            | `info,wardrobe=debug,sqlx=warn`           |
//!
//! ## Platform-Specific Paths
//! - **macOS**: `~/Library/Application Support/com.wardrobeflow.wardrobe-flow/`
//! - **Windows**: `%APPDATA%\wardrobeflow\wardrobe-flow\data\`
//! - **Linux**: `~/.local/share/wardrobe-flow/`

use directories::ProjectDirs;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use wardrobe_core::analytics::MAX_DAYS_AHEAD;

/// Default burn-down horizon shown on the dashboard.
pub const DEFAULT_BURN_DOWN_DAYS: u32 = 7;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info,wardrobe=debug,sqlx=warn";

const DB_FILE_NAME: &str = "wardrobe.db";

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Days projected by the burn-down chart
    pub burn_down_days: u32,

    /// `EnvFilter` directive for the subscriber
    pub log_filter: String,
}

impl HostConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    ///
    /// Creates the platform data directory when no explicit path is given.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup("WARDROBE_DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let burn_down_days = match lookup("WARDROBE_BURN_DOWN_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| (1..=MAX_DAYS_AHEAD).contains(days))
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "WARDROBE_BURN_DOWN_DAYS".to_string(),
                    value: raw,
                })?,
            None => DEFAULT_BURN_DOWN_DAYS,
        };

        let log_filter = lookup("WARDROBE_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(HostConfig {
            db_path,
            burn_down_days,
            log_filter,
        })
    }
}

fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "wardrobeflow", "wardrobe-flow").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();

    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Could not create data directory: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_explicit_path() {
        let config = HostConfig::from_lookup(lookup(&[("WARDROBE_DB_PATH", "/tmp/w.db")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/w.db"));
        assert_eq!(config.burn_down_days, DEFAULT_BURN_DOWN_DAYS);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_overrides() {
        let config = HostConfig::from_lookup(lookup(&[
            ("WARDROBE_DB_PATH", "./dev.db"),
            ("WARDROBE_BURN_DOWN_DAYS", " 14 "),
            ("WARDROBE_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.burn_down_days, 14);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_burn_down_days() {
        for bad in ["0", "-3", "week", "91"] {
            let err = HostConfig::from_lookup(lookup(&[
                ("WARDROBE_DB_PATH", "./dev.db"),
                ("WARDROBE_BURN_DOWN_DAYS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{bad}");
        }
    }

    #[test]
    fn test_blank_log_filter_falls_back() {
        let config = HostConfig::from_lookup(lookup(&[
            ("WARDROBE_DB_PATH", "./dev.db"),
            ("WARDROBE_LOG", "  "),
        ]))
        .unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
