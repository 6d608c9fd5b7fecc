use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use thiserror::Error;

/// How long the service this ledger replaces waited for an account lock.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid lock timeout: {0}ms")]
    InvalidTimeout(u64),
}

/// Store-wide settings.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum time to wait for one account lock, in milliseconds.
    pub lock_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.validate()
    }

    /// The lock timeout must be at least one millisecond.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(self.lock_timeout_ms));
        }
        Ok(self)
    }

    pub fn with_lock_timeout_ms(mut self, lock_timeout_ms: u64) -> Self {
        self.lock_timeout_ms = lock_timeout_ms;
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
