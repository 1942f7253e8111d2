//! Store configuration resolution for the CLI

use anyhow::{Context, Result};
use exhibit_store::StoreConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Overrides collected from command-line flags
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// TOML config file (`--config`)
    pub config_file: Option<PathBuf>,
    /// Data file (`--data-file`)
    pub data_file: Option<PathBuf>,
    /// Flush delay in milliseconds (`--flush-delay-ms`)
    pub flush_delay_ms: Option<u64>,
}

/// Resolve the store configuration
///
/// Priority, lowest first: defaults, `--config` file, environment, flags.
pub fn resolve<F>(overrides: &Overrides, env: F) -> Result<StoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match &overrides.config_file {
        Some(path) => StoreConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StoreConfig::default(),
    };

    let mut config = base
        .overlay_env(env)
        .context("Invalid store settings in environment")?;

    if let Some(path) = &overrides.data_file {
        config.path = path.clone();
    }
    if let Some(ms) = overrides.flush_delay_ms {
        config = config.with_flush_delay(Duration::from_millis(ms));
    }

    config.validate().context("Invalid store settings")?;
    Ok(config)
}
