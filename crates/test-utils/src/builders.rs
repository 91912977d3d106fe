#![allow(dead_code)]

use std::path::PathBuf;

use buildwatch::config::{RawWatchConfig, WatchConfig};
use buildwatch::errors::Result;

/// Builder for `RawWatchConfig` to simplify test setup.
pub struct WatchConfigBuilder {
    config: RawWatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            config: RawWatchConfig {
                command: command.to_string(),
                ignore: Vec::new(),
                use_default_ignores: true,
                root: PathBuf::from("."),
                serialize_builds: false,
                watch_new_dirs: false,
                color: false,
            },
        }
    }

    pub fn ignore(mut self, substring: &str) -> Self {
        self.config.ignore.push(substring.to_string());
        self
    }

    pub fn without_default_ignores(mut self) -> Self {
        self.config.use_default_ignores = false;
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn serialize_builds(mut self, val: bool) -> Self {
        self.config.serialize_builds = val;
        self
    }

    pub fn watch_new_dirs(mut self, val: bool) -> Self {
        self.config.watch_new_dirs = val;
        self
    }

    pub fn raw(self) -> RawWatchConfig {
        self.config
    }

    pub fn try_build(self) -> Result<WatchConfig> {
        WatchConfig::try_from(self.config)
    }

    pub fn build(self) -> WatchConfig {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}
