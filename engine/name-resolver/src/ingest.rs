//! Raw scraped rows and the cleanup applied before resolution

use player_registry::normalize::name_from_slug;
use serde::{Deserialize, Serialize};

/// Placeholder row payroll tables use for cap charges with no player
const INCOMPLETE_ROSTER_CHARGE: &str = "Incomplete Roster Charge";

/// Separator between the rank prefix and the name in payroll cells
const PAYROLL_SEPARATOR: &str = "   ";

/// How the `name` field of a row was scraped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    /// Used verbatim
    #[default]
    Plain,

    /// Player column of a team payroll table
    PayrollCell,

    /// Profile URL slug such as `luka-doncic`
    Slug,
}

/// One scraped `(name, year, age)` triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNameRow {
    pub name: String,

    /// Start year of the season the row was scraped for
    pub year: i32,

    #[serde(default)]
    pub age: Option<u32>,

    #[serde(default)]
    pub kind: NameKind,

    /// The caller knows the player is on the roster
    #[serde(default)]
    pub assume_match_exists: bool,
}

impl RawNameRow {
    /// The name to resolve, or `None` when the row carries no player
    pub fn player_name(&self) -> Option<String> {
        match self.kind {
            NameKind::Plain => Some(self.name.clone()),
            NameKind::PayrollCell => payroll_player_name(&self.name).map(str::to_string),
            NameKind::Slug => {
                let name = name_from_slug(&self.name);
                (!name.is_empty()).then_some(name)
            }
        }
    }
}

/// Extract the player name from a payroll table cell
///
/// Cells look like `"12   Luka Doncic"`. Empty cells, roster charges and
/// draft-pick rows ("2025 Round 1 Pick") name no player.
pub fn payroll_player_name(cell: &str) -> Option<&str> {
    if cell.is_empty() || cell == INCOMPLETE_ROSTER_CHARGE || cell.contains("Round") {
        return None;
    }

    cell.rsplit(PAYROLL_SEPARATOR).next().map(str::trim)
}
