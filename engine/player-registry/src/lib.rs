//! Player Registry - Roster and team snapshots for name resolution
//!
//! This crate holds the immutable, in-memory view of every known player and
//! team. It is loaded once from the identity store's snapshot files and then
//! handed to the name resolver.

pub mod normalize;
pub mod registry;
pub mod teams;
pub mod types;

pub use registry::RosterIndex;
pub use teams::TeamIndex;
pub use types::{PlayerId, PlayerRecord, RegistryError, Result, TeamId, TeamRecord};
