//! # Name Resolver
//!
//! Maps free-text player names scraped from salary tables, award pages and
//! draft boards to canonical player ids.
//!
//! Resolution consults the decision cache first, then tries automated
//! disambiguation (unique exact name, birth-year window, surname token,
//! sequence similarity), and escalates to a human operator only when those
//! signals are too weak. Every final answer is cached so the same raw string
//! is never asked about twice.

pub mod candidates;
pub mod config;
pub mod confirm;
pub mod error;
pub mod ingest;
pub mod resolver;
pub mod similarity;

pub use config::ResolverConfig;
pub use confirm::{ConfirmationPort, DenyAll, ProposedMatch, ScriptedConfirmation, TerminalConfirmation, Verdict};
pub use error::{ResolveError, Result};
pub use ingest::{NameKind, RawNameRow};
pub use resolver::NameResolver;

pub use persistence::{Decision, DecisionStore};
/// Re-export commonly used types
pub use player_registry::{PlayerId, PlayerRecord, RosterIndex, TeamId, TeamIndex};
