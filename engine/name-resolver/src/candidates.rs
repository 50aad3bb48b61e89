//! Candidate narrowing: birth-year window and surname token

use player_registry::{PlayerRecord, RosterIndex};

/// Whether a player born in `birth_year` can be `age` during the season that
/// starts in `reference_year`, allowing one year of slack either side
///
/// Computed in `i64` so no `u32` age can overflow; absurd ages simply match no one.
pub fn age_eligible(birth_year: i32, age: u32, reference_year: i32) -> bool {
    let turns = i64::from(birth_year) + i64::from(age);
    let reference_year = i64::from(reference_year);
    turns - 1 <= reference_year && reference_year < turns + 1
}

/// Second whitespace-delimited token of a name
pub fn surname_token(name: &str) -> Option<&str> {
    name.split_whitespace().nth(1)
}

/// Whether two names share a second token; single-token names only match
/// other single-token names
pub fn same_surname(query: &str, candidate: &str) -> bool {
    surname_token(query) == surname_token(candidate)
}

/// Players inside the age window (every player when there is no hint)
pub fn age_window<'a>(
    roster: &'a RosterIndex,
    reference_year: i32,
    age_hint: Option<u32>,
) -> Vec<&'a PlayerRecord> {
    match age_hint {
        Some(age) => roster
            .players()
            .iter()
            .filter(|player| age_eligible(player.birth_year(), age, reference_year))
            .collect(),
        None => roster.players().iter().collect(),
    }
}

/// Age-windowed players that share the query's surname token
///
/// A blank query has no tokens to compare and yields no candidates.
pub fn narrow<'a>(
    roster: &'a RosterIndex,
    raw_name: &str,
    reference_year: i32,
    age_hint: Option<u32>,
) -> Vec<&'a PlayerRecord> {
    if raw_name.trim().is_empty() {
        return Vec::new();
    }

    age_window(roster, reference_year, age_hint)
        .into_iter()
        .filter(|player| same_surname(raw_name, &player.name))
        .collect()
}
