//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database location, busy timeout, logging and seeding switches.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Malformed values are rejected with the offending variable named, so
//!   the logger never sees a level or directory it would refuse.

use crate::db::DbOptions;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "RECORDINGS_DB";
pub const ENV_BUSY_TIMEOUT_MS: &str = "RECORDINGS_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "RECORDINGS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RECORDINGS_LOG_DIR";
pub const ENV_SEED: &str = "RECORDINGS_SEED";

const DEFAULT_DB_FILE_NAME: &str = "recordings.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                expected,
            } => write!(f, "invalid {variable} value `{value}`: expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub db_options: DbOptions,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// Insert the sample catalog into an empty database on startup.
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            db_options: DbOptions::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed_sample_data: false,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                variable: ENV_BUSY_TIMEOUT_MS,
                value: raw.clone(),
                expected: "a non-negative integer number of milliseconds",
            })?;
            config.db_options.busy_timeout = Duration::from_millis(millis);
        }
        if let Some(raw) = read(ENV_LOG_LEVEL) {
            let level = normalize_level(&raw).map_err(|_| ConfigError::InvalidValue {
                variable: ENV_LOG_LEVEL,
                value: raw.clone(),
                expected: "one of trace|debug|info|warn|error",
            })?;
            config.log_level = level.to_string();
        }
        if let Some(raw) = read(ENV_LOG_DIR) {
            let log_dir = PathBuf::from(&raw);
            if !log_dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    variable: ENV_LOG_DIR,
                    value: raw,
                    expected: "an absolute directory path",
                });
            }
            config.log_dir = Some(log_dir);
        }
        if let Some(raw) = read(ENV_SEED) {
            config.seed_sample_data = parse_flag(ENV_SEED, &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(variable: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            value: raw.to_string(),
            expected: "one of 1|0|true|false|yes|no|on|off",
        }),
    }
}
