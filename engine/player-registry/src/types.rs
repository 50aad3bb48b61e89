use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Internal player identifier (primary key of the players table)
pub type PlayerId = u32;

/// Internal team identifier (primary key of the teams table)
pub type TeamId = u32;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// A known player as exported by the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player ID
    pub id: PlayerId,

    /// Date of birth
    #[serde(deserialize_with = "deserialize_birth_date")]
    pub birth_date: NaiveDate,

    /// Display name (e.g., "Luka Doncic")
    pub name: String,
}

impl PlayerRecord {
    /// Create a new player record
    pub fn new(id: PlayerId, birth_date: NaiveDate, name: impl Into<String>) -> Self {
        Self { id, birth_date, name: name.into() }
    }

    /// Calendar year of birth
    pub fn birth_year(&self) -> i32 {
        self.birth_date.year()
    }
}

/// A known franchise as exported by the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team ID
    pub id: TeamId,

    /// Full display name (e.g., "Los Angeles Lakers")
    pub name: String,

    /// Nickname (e.g., "Lakers")
    #[serde(default)]
    pub nickname: Option<String>,

    /// Current three letter abbreviation (e.g., "LAL")
    pub abbreviation: String,
}

/// Errors that can occur while loading or querying the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The roster snapshot contained no players
    #[error("Roster snapshot is empty; at least one player is required")]
    EmptyRoster,

    /// Two roster rows share an id
    #[error("Duplicate player id in roster snapshot: {0}")]
    DuplicatePlayerId(PlayerId),

    /// No team matched the query after normalization
    #[error("Team '{0}' not found in registry")]
    TeamNotFound(String),

    /// I/O errors reading snapshot files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed snapshot files
    #[error("Snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accepts both `1998-05-19` and `1998-05-19T00:00:00`
fn deserialize_birth_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birth_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid birth_date '{raw}', expected ISO-8601 date"))
    })
}

/// Parse an ISO-8601 date or datetime, keeping only the date part
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_record_from_json() {
        let json = r#"{"id": 1, "birth_date": "1998-02-28", "name": "Luka Doncic"}"#;
        let player: PlayerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(player.id, 1);
        assert_eq!(player.name, "Luka Doncic");
        assert_eq!(player.birth_year(), 1998);
    }

    #[test]
    fn test_birth_date_accepts_datetime() {
        let json = r#"{"id": 7, "birth_date": "1984-12-30T00:00:00", "name": "LeBron James"}"#;
        let player: PlayerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(player.birth_date, NaiveDate::from_ymd_opt(1984, 12, 30).unwrap());
    }

    #[test]
    fn test_birth_date_rejects_garbage() {
        let json = r#"{"id": 7, "birth_date": "December 30th", "name": "LeBron James"}"#;
        assert!(serde_json::from_str::<PlayerRecord>(json).is_err());
    }

    #[test]
    fn test_team_record_nickname_is_optional() {
        let json = r#"{"id": 3, "name": "Boston Celtics", "abbreviation": "BOS"}"#;
        let team: TeamRecord = serde_json::from_str(json).unwrap();

        assert_eq!(team.nickname, None);
        assert_eq!(team.abbreviation, "BOS");
    }
}
