use crate::normalize::team_display_name;
use crate::types::{RegistryError, Result, TeamId, TeamRecord};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Historical abbreviations mapped to the franchise's current abbreviation
const ABBREVIATION_ALIASES: &[(&str, &str)] = &[
    ("NOH", "NOP"),
    ("NOK", "NOP"),
    ("NJN", "BKN"),
    ("BRK", "BKN"),
    ("SEA", "OKC"),
    ("VAN", "MEM"),
    ("CHH", "CHA"),
    ("CHO", "CHA"),
    ("PHO", "PHX"),
    ("GOS", "GSW"),
    ("KCK", "SAC"),
    ("SDC", "LAC"),
    ("WSB", "WAS"),
];

/// Rewrite a historical abbreviation to the current one, if it is an alias
pub fn current_abbreviation(abbreviation: &str) -> &str {
    ABBREVIATION_ALIASES
        .iter()
        .find(|(old, _)| *old == abbreviation)
        .map(|(_, current)| *current)
        .unwrap_or(abbreviation)
}

/// Team Index - Lookup from team names and abbreviations to team ids
#[derive(Debug, Clone, Default)]
pub struct TeamIndex {
    /// Map from display name ("Los Angeles Lakers") to team id
    by_name: HashMap<String, TeamId>,

    /// Map from nickname ("Lakers") to team id
    by_nickname: HashMap<String, TeamId>,

    /// Map from current abbreviation ("LAL") to team id
    by_abbreviation: HashMap<String, TeamId>,
}

impl TeamIndex {
    /// Build the index from team records
    pub fn new(teams: Vec<TeamRecord>) -> Self {
        let mut index = Self::default();
        for team in teams {
            index.by_name.insert(team.name, team.id);
            if let Some(nickname) = team.nickname {
                index.by_nickname.insert(nickname, team.id);
            }
            index.by_abbreviation.insert(team.abbreviation.to_uppercase(), team.id);
        }
        index
    }

    /// Build the index from the identity store's name and abbreviation maps
    pub fn from_maps(
        names: HashMap<String, TeamId>,
        abbreviations: HashMap<String, TeamId>,
    ) -> Self {
        let by_abbreviation =
            abbreviations.into_iter().map(|(abbr, id)| (abbr.to_uppercase(), id)).collect();
        Self { by_name: names, by_nickname: HashMap::new(), by_abbreviation }
    }

    /// Load a team snapshot (JSON array of `{id, name, nickname, abbreviation}`)
    pub fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        info!("Loading team snapshot from: {:?}", file_path.as_ref());

        let json_content = std::fs::read_to_string(&file_path)?;
        let teams: Vec<TeamRecord> = serde_json::from_str(&json_content)?;

        info!("Loaded {} teams from team snapshot", teams.len());

        Ok(Self::new(teams))
    }

    /// Resolve a free-text team name or abbreviation to a team id
    ///
    /// Three character queries are abbreviations; anything else is normalized
    /// and matched against display names, then nicknames.
    pub fn get_team(&self, query: &str) -> Result<TeamId> {
        let trimmed = query.trim();

        if trimmed.chars().count() == 3 {
            let upper = trimmed.to_uppercase();
            let abbreviation = current_abbreviation(&upper);
            debug!("Team abbreviation lookup: {} -> {}", trimmed, abbreviation);
            return self
                .by_abbreviation
                .get(abbreviation)
                .copied()
                .ok_or_else(|| RegistryError::TeamNotFound(query.to_string()));
        }

        let display = team_display_name(trimmed);
        self.by_name
            .get(&display)
            .or_else(|| self.by_nickname.get(&display))
            .copied()
            .ok_or_else(|| RegistryError::TeamNotFound(query.to_string()))
    }

    /// Number of distinct franchises known by abbreviation
    pub fn len(&self) -> usize {
        self.by_abbreviation.len()
    }

    /// Check if no teams are loaded
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_abbreviation.is_empty()
    }
}
