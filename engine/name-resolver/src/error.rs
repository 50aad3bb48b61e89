//! Error types for name resolution

use persistence::PersistenceError;
use player_registry::{PlayerId, RegistryError};
use thiserror::Error;

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving names
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Decision cache error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("No confident match for '{raw_name}': best candidate '{best}' scored {score:.3}")]
    AmbiguousMatch { raw_name: String, best: String, score: f64 },

    #[error("Cached decision for '{raw_name}' points at player {player_id}, which is not in the roster")]
    StaleDecision { raw_name: String, player_id: PlayerId },

    #[error("Confirmation failed: {0}")]
    Confirmation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
