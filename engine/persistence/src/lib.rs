//! # Persistence Layer
//!
//! This crate provides the decision cache behind player name resolution: a
//! persisted mapping from a raw scraped name to either a player id or an
//! explicit "no such player" marker.
//!
//! ## Architecture
//!
//! - **DecisionStore**: Abstract trait (`get`, `put`, `remove`, `flush`)
//! - **JsonFileStore**: Human-readable JSON file, sorted by key, replaced atomically
//! - **InMemoryStore**: Same semantics without I/O, for tests
//!
//! ## Usage
//!
//! ```rust
//! use persistence::{create_local_store, DecisionStore, PersistenceConfig};
//! use tempfile::TempDir;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let config = PersistenceConfig { create_if_missing: true, ..PersistenceConfig::new(temp_dir.path()) };
//!     let mut store = create_local_store(&config)?;
//!
//!     store.put("Luka Doncic", Some(1))?;
//!     store.put("Incomplete Roster Charge", None)?;
//!     assert_eq!(store.get("Luka Doncic"), Some(Some(1)));
//!
//!     store.flush()?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;

pub use backend::{Decision, DecisionStore, InMemoryStore};
pub use config::PersistenceConfig;
pub use error::{PersistenceError, Result};
pub use local::{create_local_store, JsonFileStore};
