//! Tool configuration management

use anyhow::{Context, Result};
use name_resolver::ResolverConfig;
use persistence::PersistenceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "RESOLVE_NAMES";

/// Main tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveNamesConfig {
    /// Roster and team snapshots
    pub registry: RegistryConfig,

    /// Decision cache
    pub persistence: PersistenceConfig,

    /// Resolver tuning
    pub resolver: ResolverConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Locations of the identity store exports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON array of `{id, name, birth_date}`
    pub roster_file: PathBuf,

    /// JSON array of `{id, name, nickname, abbreviation}`
    pub teams_file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            roster_file: PathBuf::from("./data/players.json"),
            teams_file: PathBuf::from("./data/teams.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Load configuration from an optional file and the environment
///
/// Later sources win: defaults, then the file, then `RESOLVE_NAMES__SECTION__KEY`
/// variables.
pub fn load_config(path: Option<&Path>) -> Result<ResolveNamesConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let config: ResolveNamesConfig = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &ResolveNamesConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    config.persistence.validate().map_err(|e| anyhow::anyhow!("Invalid persistence config: {e}"))?;
    config.resolver.validate().map_err(|e| anyhow::anyhow!("Invalid resolver config: {e}"))?;

    Ok(())
}
