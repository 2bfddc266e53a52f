//! Configuration resolution for msgqueue.
//!
//! Resolution order (lowest to highest priority):
//! 1. Built-in defaults
//! 2. JSON config file (`--config`)
//! 3. Environment variables (`MSGQUEUE_*`)
//! 4. CLI arguments, applied by the binary after loading

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete msgqueue configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_path: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

/// Background retention purge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Messages older than this many days are purged. `None` disables the task.
    pub max_age_days: Option<i64>,
    /// Seconds between purge runs.
    pub interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_days: None,
            interval_secs: 3600,
        }
    }
}

/// Load configuration: defaults, then the optional file, then environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Default database location (`~/.msgqueue/messages.db`).
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".msgqueue").join("messages.db"))
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

/// Apply `MSGQUEUE_*` overrides read through `lookup`. Unparsable values are
/// reported as [`Error::Config`].
fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(val) = lookup("MSGQUEUE_ADDR") {
        config.server.addr = val
            .parse()
            .map_err(|e| Error::Config(format!("MSGQUEUE_ADDR={val}: {e}")))?;
    }
    if let Some(val) = lookup("MSGQUEUE_DB_PATH") {
        config.server.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("MSGQUEUE_LOG_LEVEL") {
        config.server.log_level = val;
    }
    if let Some(val) = lookup("MSGQUEUE_RETENTION_DAYS") {
        let days = val
            .parse()
            .map_err(|e| Error::Config(format!("MSGQUEUE_RETENTION_DAYS={val}: {e}")))?;
        config.retention.max_age_days = Some(days);
    }
    Ok(())
}

/// Reject values that would break the server after startup.
fn validate(config: &Config) -> Result<()> {
    if config.retention.interval_secs == 0 {
        return Err(Error::Config(
            "retention.interval_secs must be at least 1".to_string(),
        ));
    }
    if let Some(days) = config.retention.max_age_days.filter(|&d| d <= 0) {
        return Err(Error::Config(format!(
            "retention.max_age_days must be positive, got {days}"
        )));
    }
    Ok(())
}
