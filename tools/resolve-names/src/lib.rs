//! Resolve Names Tool Library
//!
//! Configuration, logging and signal setup for the `resolve-names` binary,
//! plus the subcommands it dispatches to.

use anyhow::{Context, Result};
use std::path::Path;

pub mod commands;
pub mod config;
pub mod logging;
pub mod signals;

pub use config::ResolveNamesConfig;
pub use logging::initialize_logging;
pub use signals::{setup_signal_handlers, ShutdownFlag};

/// Load configuration from an optional file and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<ResolveNamesConfig> {
    config::load_config(path).context("Failed to load resolve-names configuration")
}
