//! Runtime configuration, read from the environment once at startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// How unknown entity types and malformed identifiers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypePolicy {
    /// Skip with a warning; the skipped slot is reported but the call
    /// succeeds. Matches the original system's observed behavior.
    #[default]
    Lenient,
    /// Fail the call with `UnknownEntityType` / `Validation`.
    Strict,
}

/// Immutable configuration shared by all components.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local data directory (graph dumps, caches).
    pub data_path: PathBuf,
    /// Whether the initialization shell refreshes local data.
    pub auto_update: bool,
    /// Refresh interval in days.
    pub update_interval_days: u64,
    /// Unknown-type / malformed-identifier policy.
    pub type_policy: TypePolicy,
    /// Per-sub-query timeout.
    pub query_timeout: Duration,
    /// Cap on concurrent backend sub-queries within one call.
    pub max_concurrent_queries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("biograph_data"),
            auto_update: true,
            update_interval_days: 7,
            type_policy: TypePolicy::default(),
            query_timeout: Duration::from_secs(30),
            max_concurrent_queries: 4,
        }
    }
}

impl Config {
    /// Read configuration from `BIOGRAPH_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("BIOGRAPH_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Ok(v) = std::env::var("BIOGRAPH_AUTO_UPDATE") {
            config.auto_update = parse_bool("BIOGRAPH_AUTO_UPDATE", &v)?;
        }
        if let Ok(v) = std::env::var("BIOGRAPH_UPDATE_INTERVAL_DAYS") {
            config.update_interval_days = parse_u64("BIOGRAPH_UPDATE_INTERVAL_DAYS", &v)?;
        }
        if let Ok(v) = std::env::var("BIOGRAPH_STRICT_TYPES") {
            config.type_policy = if parse_bool("BIOGRAPH_STRICT_TYPES", &v)? {
                TypePolicy::Strict
            } else {
                TypePolicy::Lenient
            };
        }
        if let Ok(v) = std::env::var("BIOGRAPH_QUERY_TIMEOUT_MS") {
            config.query_timeout = Duration::from_millis(parse_u64("BIOGRAPH_QUERY_TIMEOUT_MS", &v)?);
        }
        if let Ok(v) = std::env::var("BIOGRAPH_MAX_CONCURRENT_QUERIES") {
            let n = parse_u64("BIOGRAPH_MAX_CONCURRENT_QUERIES", &v)? as usize;
            config.max_concurrent_queries = n.max(1);
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

fn parse_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: "expected an unsigned integer".to_string(),
    })
}
