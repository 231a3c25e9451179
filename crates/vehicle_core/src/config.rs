//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database location, busy timeout and logging settings.
//! - Reject malformed values instead of silently falling back.
//!
//! # Invariants
//! - Unset or blank variables use defaults; set-but-invalid ones are errors.

use crate::db::SqliteFile;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "VEHICLE_DB_PATH";
pub const DB_BUSY_TIMEOUT_ENV: &str = "VEHICLE_DB_BUSY_TIMEOUT_MS";
pub const LOG_LEVEL_ENV: &str = "VEHICLE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "VEHICLE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "vehicledb.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings needed to bootstrap the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = value(DB_BUSY_TIMEOUT_ENV) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: DB_BUSY_TIMEOUT_ENV,
                value: raw.clone(),
                reason: "expected milliseconds as a non-negative integer",
            })?;
            config.busy_timeout = Duration::from_millis(millis);
        }

        if let Some(level) = value(LOG_LEVEL_ENV) {
            let level = normalize_level(&level).map_err(|_| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                value: level.clone(),
                reason: "expected one of trace, debug, info, warn, error",
            })?;
            config.log_level = level.to_string();
        }

        if let Some(dir) = value(LOG_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_ENV,
                    value: dir.display().to_string(),
                    reason: "log directory must be an absolute path",
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }

    /// Builds the connection source described by this configuration.
    pub fn connection_source(&self) -> SqliteFile {
        SqliteFile::new(&self.db_path).with_busy_timeout(self.busy_timeout)
    }
}
