//! Configuration for Bigsby
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

/// Main configuration for a Bigsby store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory for all data files
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Memtable Configuration
    // -------------------------------------------------------------------------
    /// Memtable byte-size threshold that triggers a flush.
    /// Measured as the sum of key + value lengths over live entries.
    pub compaction_limit: usize,

    // -------------------------------------------------------------------------
    // Compaction Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of segments a level may hold before its two oldest
    /// segments are merged into the level below.
    pub level_max_segments: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./.bigsby"),
            compaction_limit: 1000,
            level_max_segments: 4,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.config.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the memtable flush threshold in bytes
    pub fn compaction_limit(mut self, limit: usize) -> Self {
        self.config.compaction_limit = limit;
        self
    }

    /// Set the per-level segment count that triggers compaction
    pub fn level_max_segments(mut self, max: usize) -> Self {
        self.config.level_max_segments = max;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
