//! Store configuration
//!
//! Resolved from (lowest to highest priority): defaults, an optional TOML
//! file, environment variables, then explicit overrides from the caller.

use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default data file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "exhibit_data.json";

/// Default quiescence delay before a deferred flush
pub const DEFAULT_FLUSH_DELAY_MS: u64 = 10_000;

/// Upper bound for the flush delay (1 hour)
pub const MAX_FLUSH_DELAY_MS: u64 = 3_600_000;

/// Environment variable naming the data file
pub const ENV_DATA_FILE: &str = "DATAFILE_LOCATION";

/// Environment variable overriding the flush delay, in milliseconds
pub const ENV_FLUSH_DELAY_MS: &str = "EXHIBIT_FLUSH_DELAY_MS";

/// Configuration for a [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backing JSON file
    pub path: PathBuf,
    /// Quiescence delay in milliseconds
    pub flush_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
            flush_delay_ms: DEFAULT_FLUSH_DELAY_MS,
        }
    }
}

impl StoreConfig {
    /// Config for the given file with the default delay
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Builder-style delay override
    pub fn with_flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Quiescence delay as a `Duration`
    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }

    /// Defaults overlaid with process environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup
    ///
    /// Unset variables leave the current value in place.
    pub fn overlay_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_FILE).filter(|p| !p.is_empty()) {
            self.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_FLUSH_DELAY_MS) {
            self.flush_delay_ms = raw.trim().parse().map_err(|_| {
                StoreError::Config(format!(
                    "{} must be a non-negative integer, got {:?}",
                    ENV_FLUSH_DELAY_MS, raw
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load from a TOML file
    ///
    /// ```toml
    /// path = "exhibit_data.json"
    /// flush_delay_ms = 10000
    /// ```
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: StoreConfig = toml::from_str(&contents).map_err(|e| {
            StoreError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::Config("data file path must not be empty".to_string()));
        }

        if self.flush_delay_ms > MAX_FLUSH_DELAY_MS {
            return Err(StoreError::Config(format!(
                "flush_delay_ms must be at most {} (got {})",
                MAX_FLUSH_DELAY_MS, self.flush_delay_ms
            )));
        }

        Ok(())
    }
}
