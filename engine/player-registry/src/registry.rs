use crate::types::{PlayerId, PlayerRecord, RegistryError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Roster Index - Immutable snapshot of every known player
///
/// Players keep the order they were loaded in. Duplicate names are expected
/// across a decades-long roster; duplicate ids are not.
#[derive(Debug, Clone)]
pub struct RosterIndex {
    /// Players in snapshot order
    players: Vec<PlayerRecord>,

    /// Map from player id to position in `players`
    positions_by_id: HashMap<PlayerId, usize>,
}

impl RosterIndex {
    /// Build the index, rejecting empty rosters and repeated ids
    pub fn new(players: Vec<PlayerRecord>) -> Result<Self> {
        if players.is_empty() {
            return Err(RegistryError::EmptyRoster);
        }

        let mut positions_by_id = HashMap::with_capacity(players.len());
        for (position, player) in players.iter().enumerate() {
            if positions_by_id.insert(player.id, position).is_some() {
                return Err(RegistryError::DuplicatePlayerId(player.id));
            }
        }

        Ok(Self { players, positions_by_id })
    }

    /// Load a roster snapshot (JSON array of `{id, birth_date, name}`)
    pub fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        info!("Loading roster snapshot from: {:?}", file_path.as_ref());

        let json_content = std::fs::read_to_string(&file_path)?;
        let players: Vec<PlayerRecord> = serde_json::from_str(&json_content)?;

        info!("Loaded {} players from roster snapshot", players.len());

        Self::new(players)
    }

    /// All players in snapshot order
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Get a player by id
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.positions_by_id.get(&id).map(|&position| &self.players[position])
    }

    /// Check whether an id is part of the roster
    pub fn contains(&self, id: PlayerId) -> bool {
        self.positions_by_id.contains_key(&id)
    }

    /// Number of players whose display name equals `name` exactly
    pub fn count_exact(&self, name: &str) -> usize {
        self.players.iter().filter(|player| player.name == name).count()
    }

    /// The player whose display name equals `name`, if exactly one does
    pub fn unique_exact(&self, name: &str) -> Option<&PlayerRecord> {
        let mut matches = self.players.iter().filter(|player| player.name == name);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Always false; an empty roster is rejected at construction
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
