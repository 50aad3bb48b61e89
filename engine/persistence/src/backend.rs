//! Decision store trait and in-memory implementation

use crate::error::Result;
use player_registry::PlayerId;
use std::collections::BTreeMap;

/// A cached resolution: a player id, or `None` for a confirmed non-match
pub type Decision = Option<PlayerId>;

/// Abstract key-value store for resolution decisions
///
/// Keys are raw input names exactly as scraped. A stored `None` means the name
/// was confirmed to belong to no known player and must not be asked again.
pub trait DecisionStore {
    /// Look up a previous decision
    fn get(&self, raw_name: &str) -> Option<Decision>;

    /// Record a decision
    fn put(&mut self, raw_name: &str, decision: Decision) -> Result<()>;

    /// Forget a decision so the name is resolved again next time
    fn remove(&mut self, raw_name: &str) -> Result<Option<Decision>>;

    /// Persist every decision made so far
    fn flush(&mut self) -> Result<()>;

    /// Number of cached decisions
    fn len(&self) -> usize;

    /// Check if the cache is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All decisions, sorted by raw name
    fn entries(&self) -> Vec<(String, Decision)>;
}

/// In-memory decision store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    decisions: BTreeMap<String, Decision>,
    dirty: bool,
    flushes: usize,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with decisions
    pub fn with_decisions<I, S>(decisions: I) -> Self
    where
        I: IntoIterator<Item = (S, Decision)>,
        S: Into<String>,
    {
        let decisions = decisions.into_iter().map(|(name, d)| (name.into(), d)).collect();
        Self { decisions, dirty: false, flushes: 0 }
    }

    /// Number of flushes that actually persisted changes
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Whether there are decisions not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl DecisionStore for InMemoryStore {
    fn get(&self, raw_name: &str) -> Option<Decision> {
        self.decisions.get(raw_name).copied()
    }

    fn put(&mut self, raw_name: &str, decision: Decision) -> Result<()> {
        if self.decisions.get(raw_name) == Some(&decision) {
            return Ok(());
        }
        self.decisions.insert(raw_name.to_string(), decision);
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self, raw_name: &str) -> Result<Option<Decision>> {
        let removed = self.decisions.remove(raw_name);
        if removed.is_some() {
            self.dirty = true;
        }
        Ok(removed)
    }

    fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.dirty = false;
            self.flushes += 1;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.decisions.len()
    }

    fn entries(&self) -> Vec<(String, Decision)> {
        self.decisions.iter().map(|(name, decision)| (name.clone(), *decision)).collect()
    }
}
