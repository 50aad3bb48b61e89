//! Configuration for the persistence layer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the decision cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Base directory for persistence files
    pub data_dir: PathBuf,

    /// Cache file name, relative to `data_dir`
    pub cache_file: String,

    /// Flush after every new decision instead of only on close
    pub write_through: bool,

    /// Start from an empty cache when the file does not exist yet
    pub create_if_missing: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cache_file: "name-map.json".to_string(),
            write_through: true,
            create_if_missing: false,
        }
    }
}

impl PersistenceConfig {
    /// Create a new configuration with custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }

    /// Get the cache file path
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(&self.cache_file)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_file.trim().is_empty() {
            return Err("cache_file must not be empty".to_string());
        }

        if self.cache_file.contains(['/', '\\']) {
            return Err(format!(
                "cache_file must be a file name inside data_dir, got '{}'",
                self.cache_file
            ));
        }

        Ok(())
    }
}
