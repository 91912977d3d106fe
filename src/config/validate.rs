// src/config/validate.rs

use crate::config::model::{RawWatchConfig, WatchConfig};
use crate::errors::{BuildwatchError, Result};

impl TryFrom<RawWatchConfig> for WatchConfig {
    type Error = BuildwatchError;

    fn try_from(raw: RawWatchConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(WatchConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawWatchConfig) -> Result<()> {
    validate_command(cfg)?;
    validate_ignore_entries(cfg)?;
    Ok(())
}

fn validate_command(cfg: &RawWatchConfig) -> Result<()> {
    if cfg.command.trim().is_empty() {
        return Err(BuildwatchError::ConfigError(
            "--command must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_ignore_entries(cfg: &RawWatchConfig) -> Result<()> {
    // An empty substring is contained in every path and would silence the
    // watcher completely.
    if let Some(pos) = cfg.ignore.iter().position(|s| s.is_empty()) {
        return Err(BuildwatchError::ConfigError(format!(
            "--ignore entry #{} is empty",
            pos + 1
        )));
    }
    Ok(())
}
