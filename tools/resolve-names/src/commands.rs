//! Subcommand implementations

use crate::config::ResolveNamesConfig;
use crate::signals::{should_stop, ShutdownFlag};
use anyhow::{Context, Result};
use colored::*;
use name_resolver::{
    ConfirmationPort, DecisionStore, DenyAll, NameResolver, PlayerId, RawNameRow, ResolveError,
    TerminalConfirmation,
};
use persistence::{create_local_store, JsonFileStore};
use player_registry::{RosterIndex, TeamIndex};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// Resolver wired to the on-disk cache and a runtime-selected prompt
pub type CliResolver = NameResolver<JsonFileStore, Box<dyn ConfirmationPort>>;

/// One line of `resolve` output
#[derive(Debug, Serialize)]
struct ResolvedRow<'a> {
    name: &'a str,
    year: i32,
    age: Option<u32>,
    player_id: Option<PlayerId>,
}

/// Counts reported at the end of a batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveSummary {
    pub resolved: usize,
    pub no_match: usize,
    pub unanswered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

impl ResolveSummary {
    /// Rows handled, whatever the outcome
    pub fn total(&self) -> usize {
        self.resolved + self.no_match + self.unanswered + self.skipped + self.failed
    }
}

/// Interactive runs must write every answer through
///
/// A blocked prompt ignores the first Ctrl+C and the second one exits without
/// closing the resolver, so answers held back for the final flush would be lost.
pub fn check_interactive_persistence(config: &ResolveNamesConfig, interactive: bool) -> Result<()> {
    if interactive && !config.persistence.write_through {
        anyhow::bail!(
            "persistence.write_through = false is only allowed with --non-interactive; \
             operator answers could be lost on a forced exit"
        );
    }
    Ok(())
}

/// Load the roster and team snapshots and open the decision cache
pub fn open_resolver(config: &ResolveNamesConfig, interactive: bool) -> Result<CliResolver> {
    check_interactive_persistence(config, interactive)?;

    let roster = RosterIndex::load_from_file(&config.registry.roster_file)
        .with_context(|| format!("Failed to load roster {:?}", config.registry.roster_file))?;
    let teams = TeamIndex::load_from_file(&config.registry.teams_file)
        .with_context(|| format!("Failed to load teams {:?}", config.registry.teams_file))?;
    let store = create_local_store(&config.persistence).context("Failed to open decision cache")?;

    let confirm: Box<dyn ConfirmationPort> = if interactive {
        Box::new(TerminalConfirmation::new(config.resolver.prompt_timeout()))
    } else {
        Box::new(DenyAll)
    };

    Ok(NameResolver::new(roster, teams, store, confirm, config.resolver.clone())?)
}

/// Resolve every JSON line of `input`, writing one output line per named row
///
/// Rows that fail (bad JSON, no confident match, stale cache entry) are logged
/// and counted; cache and prompt failures abort the batch.
pub fn resolve_rows<S, C, R, W>(
    resolver: &mut NameResolver<S, C>,
    input: R,
    mut output: W,
    assume_match_exists: bool,
    shutdown: &ShutdownFlag,
) -> Result<ResolveSummary>
where
    S: DecisionStore,
    C: ConfirmationPort,
    R: BufRead,
    W: Write,
{
    let mut summary = ResolveSummary::default();

    for (index, line) in input.lines().enumerate() {
        if should_stop(shutdown) {
            summary.interrupted = true;
            break;
        }

        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let row: RawNameRow = match serde_json::from_str(&line) {
            Ok(row) => row,
            Err(e) => {
                error!("Line {}: invalid row: {}", index + 1, e);
                summary.failed += 1;
                continue;
            }
        };

        let Some(name) = row.player_name() else {
            summary.skipped += 1;
            continue;
        };

        let assume = assume_match_exists || row.assume_match_exists;
        let player_id = match resolver.resolve(&name, row.year, row.age, assume) {
            Ok(player_id) => player_id,
            Err(e @ (ResolveError::AmbiguousMatch { .. } | ResolveError::StaleDecision { .. })) => {
                error!("Line {}: {}", index + 1, e);
                summary.failed += 1;
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("Line {}: resolving '{}'", index + 1, name)),
        };

        match (player_id, resolver.decision(&name)) {
            (Some(_), _) => summary.resolved += 1,
            (None, Some(None)) => summary.no_match += 1,
            (None, _) => summary.unanswered += 1,
        }

        let resolved = ResolvedRow { name: &row.name, year: row.year, age: row.age, player_id };
        serde_json::to_writer(&mut output, &resolved)?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    Ok(summary)
}

/// `resolve` subcommand
pub fn run_resolve(
    config: &ResolveNamesConfig,
    input: &Path,
    output: Option<&Path>,
    assume_match_exists: bool,
    interactive: bool,
    shutdown: &ShutdownFlag,
) -> Result<ResolveSummary> {
    let mut resolver = open_resolver(config, interactive)?;

    let reader = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open input {:?}", input))?,
    );
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let result = resolve_rows(&mut resolver, reader, writer, assume_match_exists, shutdown);

    // The cache is flushed even when the batch stopped early
    resolver.close().context("Failed to flush decision cache")?;
    let summary = result?;

    info!(
        "Resolved {} rows: {} matched, {} no match, {} unanswered, {} skipped, {} failed",
        summary.total(),
        summary.resolved,
        summary.no_match,
        summary.unanswered,
        summary.skipped,
        summary.failed
    );
    print_summary(&summary);

    Ok(summary)
}

fn print_summary(summary: &ResolveSummary) {
    eprintln!("{}", "Resolution summary".bold());
    eprintln!("  {:<12} {}", "matched", summary.resolved.to_string().green());
    eprintln!("  {:<12} {}", "no match", summary.no_match.to_string().yellow());
    eprintln!("  {:<12} {}", "unanswered", summary.unanswered.to_string().yellow());
    eprintln!("  {:<12} {}", "skipped", summary.skipped);
    eprintln!("  {:<12} {}", "failed", summary.failed.to_string().red());
    if summary.interrupted {
        eprintln!("{}", "Stopped early on request; rerun to continue.".yellow());
    }
}

/// `name` subcommand
pub fn run_name(
    config: &ResolveNamesConfig,
    name: &str,
    year: i32,
    age: Option<u32>,
    assume_match_exists: bool,
) -> Result<Option<PlayerId>> {
    let mut resolver = open_resolver(config, true)?;
    let result = resolver.resolve(name, year, age, assume_match_exists);
    resolver.close().context("Failed to flush decision cache")?;

    match result? {
        Some(player_id) => {
            println!("{} -> {}", name.bold(), player_id.to_string().green());
            Ok(Some(player_id))
        }
        None => {
            println!("{} -> {}", name.bold(), "no match".yellow());
            Ok(None)
        }
    }
}

/// `team` subcommand
pub fn run_team(config: &ResolveNamesConfig, query: &str) -> Result<()> {
    let teams = TeamIndex::load_from_file(&config.registry.teams_file)
        .with_context(|| format!("Failed to load teams {:?}", config.registry.teams_file))?;

    let team_id = teams.get_team(query)?;
    println!("{} -> {}", query.bold(), team_id.to_string().green());
    Ok(())
}

/// `cache list` subcommand
pub fn run_cache_list(config: &ResolveNamesConfig, no_match_only: bool) -> Result<()> {
    let store = create_local_store(&config.persistence).context("Failed to open decision cache")?;

    let mut shown = 0;
    for (name, decision) in store.entries() {
        match decision {
            Some(player_id) if !no_match_only => println!("{}\t{}", name, player_id),
            None => println!("{}\t{}", name, "no match".yellow()),
            Some(_) => continue,
        }
        shown += 1;
    }

    info!("{} of {} cached decisions shown", shown, store.len());
    Ok(())
}

/// `cache forget` subcommand
pub fn run_cache_forget(config: &ResolveNamesConfig, name: &str) -> Result<()> {
    let mut store =
        create_local_store(&config.persistence).context("Failed to open decision cache")?;

    match store.remove(name)? {
        Some(decision) => {
            store.flush()?;
            let previous = decision.map_or_else(|| "no match".to_string(), |id| id.to_string());
            println!("Forgot {} (was {})", name.bold(), previous);
        }
        None => {
            warn!("No cached decision for '{}'", name);
            println!("No cached decision for {}", name.bold());
        }
    }
    Ok(())
}
