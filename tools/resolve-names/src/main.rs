//! Resolve Names CLI
//!
//! Maps scraped player names to roster ids, asking the operator only about
//! weak matches, and lets the decision cache be inspected and corrected.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use resolve_names::{commands, initialize_logging, load_configuration, setup_signal_handlers};

#[derive(Parser)]
#[command(name = "resolve-names")]
#[command(about = "Resolve scraped player names to roster ids")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a JSON-lines file of scraped rows
    Resolve {
        /// Input rows: {"name", "year", "age"?, "kind"?, "assume_match_exists"?}
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat every row as naming a rostered player
        #[arg(long)]
        assume_match_exists: bool,

        /// Never prompt; weak matches stay unanswered
        #[arg(long)]
        non_interactive: bool,
    },

    /// Resolve a single name
    Name {
        name: String,

        /// Start year of the season
        #[arg(short, long)]
        year: i32,

        /// Player age during that season
        #[arg(short, long)]
        age: Option<u32>,

        #[arg(long)]
        assume_match_exists: bool,
    },

    /// Look up a team by name, nickname or abbreviation
    Team { query: String },

    /// Inspect or correct the decision cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Print every cached decision
    List {
        /// Only names confirmed to be no known player
        #[arg(long)]
        no_match_only: bool,
    },

    /// Drop a cached decision so the name is resolved again
    Forget { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
        resolve_names::config::validate_config(&config)?;
    }
    initialize_logging(&config.logging.level, &config.logging.format)?;

    info!("Starting resolve-names v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Resolve { input, output, assume_match_exists, non_interactive } => {
            let shutdown = setup_signal_handlers()?;
            commands::run_resolve(
                &config,
                &input,
                output.as_deref(),
                assume_match_exists,
                !non_interactive,
                &shutdown,
            )?;
        }
        Commands::Name { name, year, age, assume_match_exists } => {
            commands::run_name(&config, &name, year, age, assume_match_exists)?;
        }
        Commands::Team { query } => commands::run_team(&config, &query)?,
        Commands::Cache { command } => match command {
            CacheCommands::List { no_match_only } => commands::run_cache_list(&config, no_match_only)?,
            CacheCommands::Forget { name } => commands::run_cache_forget(&config, &name)?,
        },
    }

    Ok(())
}
