use crate::candidates;
use crate::config::ResolverConfig;
use crate::confirm::{ConfirmationPort, ProposedMatch, Verdict};
use crate::error::{ResolveError, Result};
use crate::similarity;
use persistence::{Decision, DecisionStore};
use player_registry::{PlayerId, RegistryError, RosterIndex, TeamId, TeamIndex};
use tracing::{debug, info, warn};

/// What one resolution attempt produced
enum Outcome {
    /// A final answer, to be cached
    Decided(Decision),

    /// The operator gave no answer; nothing is cached
    Undecided,
}

/// Name Resolver - Maps scraped player names to roster ids
///
/// The only state that changes between calls is the decision store. Close the
/// resolver with [`NameResolver::close`] to flush it.
pub struct NameResolver<S, C> {
    roster: RosterIndex,
    teams: TeamIndex,
    store: S,
    confirm: C,
    config: ResolverConfig,
}

impl<S: DecisionStore, C: ConfirmationPort> NameResolver<S, C> {
    /// Create a resolver over a loaded roster, team index and decision store
    pub fn new(
        roster: RosterIndex,
        teams: TeamIndex,
        store: S,
        confirm: C,
        config: ResolverConfig,
    ) -> Result<Self> {
        config.validate().map_err(ResolveError::Config)?;

        info!(
            "Name resolver ready: {} players, {} teams, {} cached decisions",
            roster.len(),
            teams.len(),
            store.len()
        );

        Ok(Self { roster, teams, store, confirm, config })
    }

    /// Resolve a raw name to a player id
    ///
    /// Returns `Ok(None)` for a confirmed non-match and for a prompt the
    /// operator left unanswered; only the former is cached.
    pub fn resolve(
        &mut self,
        raw_name: &str,
        reference_year: i32,
        age_hint: Option<u32>,
        assume_match_exists: bool,
    ) -> Result<Option<PlayerId>> {
        if let Some(decision) = self.store.get(raw_name) {
            return self.cached(raw_name, decision);
        }

        match self.guess(raw_name, reference_year, age_hint, assume_match_exists)? {
            Outcome::Decided(decision) => {
                self.store.put(raw_name, decision)?;
                Ok(decision)
            }
            Outcome::Undecided => Ok(None),
        }
    }

    fn cached(&self, raw_name: &str, decision: Decision) -> Result<Option<PlayerId>> {
        match decision {
            Some(player_id) if !self.roster.contains(player_id) => {
                Err(ResolveError::StaleDecision { raw_name: raw_name.to_string(), player_id })
            }
            _ => Ok(decision),
        }
    }

    fn guess(
        &mut self,
        raw_name: &str,
        reference_year: i32,
        age_hint: Option<u32>,
        assume_match_exists: bool,
    ) -> Result<Outcome> {
        if let Some(player) = self.roster.unique_exact(raw_name) {
            debug!("'{}' is a unique roster name -> {}", raw_name, player.id);
            return Ok(Outcome::Decided(Some(player.id)));
        }

        let narrowed = candidates::narrow(&self.roster, raw_name, reference_year, age_hint);
        if let Some((index, score)) =
            similarity::closest(raw_name, narrowed.iter().map(|player| player.name.as_str()))
        {
            let player = narrowed[index];
            debug!(
                "'{}' -> '{}' ({}) among {} surname candidates, score {:.3}",
                raw_name,
                player.name,
                player.id,
                narrowed.len(),
                score
            );
            return Ok(Outcome::Decided(Some(player.id)));
        }

        let players = self.roster.players();
        let Some((index, score)) =
            similarity::closest(raw_name, players.iter().map(|player| player.name.as_str()))
        else {
            return Err(RegistryError::EmptyRoster.into());
        };
        let best = &players[index];

        if assume_match_exists {
            if score >= self.config.min_assumed_score {
                info!(
                    "Assuming '{}' is '{}' ({}) with no surname candidate, score {:.3}",
                    raw_name, best.name, best.id, score
                );
                return Ok(Outcome::Decided(Some(best.id)));
            }
            return Err(ResolveError::AmbiguousMatch {
                raw_name: raw_name.to_string(),
                best: best.name.clone(),
                score,
            });
        }

        let proposal = ProposedMatch {
            raw_name: raw_name.to_string(),
            matched_name: best.name.clone(),
            player_id: best.id,
            score,
        };
        warn!(
            "Escalating '{}': closest roster name '{}' scored {:.3}",
            raw_name, proposal.matched_name, score
        );

        let outcome = match self.confirm.confirm(&proposal)? {
            Verdict::NoMatch => Outcome::Decided(None),
            Verdict::AcceptMatch => Outcome::Decided(Some(proposal.player_id)),
            Verdict::Unanswered => Outcome::Undecided,
        };
        Ok(outcome)
    }

    /// Resolve a free-text team name or abbreviation
    pub fn get_team(&self, query: &str) -> Result<TeamId> {
        Ok(self.teams.get_team(query)?)
    }

    /// Cached decision for a raw name, if any
    pub fn decision(&self, raw_name: &str) -> Option<Decision> {
        self.store.get(raw_name)
    }

    /// The roster this resolver matches against
    pub fn roster(&self) -> &RosterIndex {
        &self.roster
    }

    /// The confirmation port
    pub fn confirmation(&self) -> &C {
        &self.confirm
    }

    /// Flush the decision cache and hand the store back
    pub fn close(mut self) -> Result<S> {
        self.store.flush()?;
        info!("Name resolver closed with {} cached decisions", self.store.len());
        Ok(self.store)
    }
}
