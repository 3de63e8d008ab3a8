//! Cricket scorer CLI
//!
//! Creates matches, replays scoring command scripts against a stored match
//! and prints scorecards.

mod scorecard;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cricket_core::save::document_schema;
use cricket_core::{
    JsonFileStore, Match, MatchStore, MatchType, ScoringCommand, ScoringConfig, ScoringEngine,
    Team, TeamSide, Toss, TossDecision,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cricket", version = cricket_core::VERSION)]
#[command(about = "Ball-by-ball limited-overs cricket scorer", long_about = None)]
struct Cli {
    /// Directory holding one JSON document per match
    #[arg(long, global = true, default_value = "matches")]
    store: PathBuf,

    /// Scoring config JSON (overrides CRICKET_SCORING_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Team1,
    Team2,
}

#[derive(Clone, Copy, ValueEnum)]
enum Decision {
    Bat,
    Bowl,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a match at toss completion
    New {
        /// Team JSON document for team 1
        #[arg(long)]
        team1: PathBuf,

        /// Team JSON document for team 2
        #[arg(long)]
        team2: PathBuf,

        #[arg(long, default_value = "20")]
        overs: u32,

        #[arg(long, value_enum, default_value = "team1")]
        toss_winner: Side,

        #[arg(long, value_enum, default_value = "bat")]
        decision: Decision,

        #[arg(long)]
        venue: Option<String>,
    },

    /// Apply a JSON array of scoring commands to a stored match
    Score {
        id: String,

        /// Command script file
        #[arg(long)]
        script: PathBuf,

        /// Print each command outcome as JSON
        #[arg(long, default_value = "false")]
        verbose: bool,
    },

    /// Print the scorecard of a stored match
    Show {
        id: String,

        /// Print the raw match document instead
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List stored matches, most recent first
    List,

    /// Delete a stored match
    Delete { id: String },

    /// Print the JSON schema of the stored match document
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = JsonFileStore::new(&cli.store);

    match cli.command {
        Commands::New { team1, team2, overs, toss_winner, decision, venue } => {
            let toss = Toss {
                winner: match toss_winner {
                    Side::Team1 => TeamSide::Team1,
                    Side::Team2 => TeamSide::Team2,
                },
                decision: match decision {
                    Decision::Bat => TossDecision::Bat,
                    Decision::Bowl => TossDecision::Bowl,
                },
            };
            let mut m = Match::new(read_team(&team1)?, read_team(&team2)?, overs, toss)
                .with_match_type(MatchType::for_overs(overs));
            if let Some(venue) = venue {
                m = m.with_venue(venue);
            }
            store.save(&m).context("Failed to save new match")?;
            println!("{}", m.id);
        }

        Commands::Score { id, script, verbose } => {
            let config = load_config(cli.config.as_deref())?;
            let mut m = store.fetch(&id).with_context(|| format!("Failed to load match {}", id))?;
            let commands = read_script(&script)?;
            let outcome = replay(&mut ScoringEngine::new(config.clone()), &mut m, commands, verbose);

            // The in-memory match stands even if it cannot be stored.
            if let Err(e) = store.save(&m) {
                log::warn!("Match {} scored but not saved: {}", m.id, e);
            }
            print!("{}", scorecard::render(&m, &config));
            outcome?;
        }

        Commands::Show { id, json } => {
            let m = store.fetch(&id).with_context(|| format!("Failed to load match {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&m)?);
            } else {
                let config = load_config(cli.config.as_deref())?;
                print!("{}", scorecard::render(&m, &config));
            }
        }

        Commands::List => {
            for m in store.fetch_all().context("Failed to list matches")? {
                println!("{}", scorecard::summary_line(&m));
            }
        }

        Commands::Delete { id } => {
            store.delete(&id).with_context(|| format!("Failed to delete match {}", id))?;
        }

        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&document_schema())?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let config = match path {
        Some(path) => ScoringConfig::from_file(path),
        None => ScoringConfig::from_env(),
    };
    config.context("Failed to load scoring config")
}

fn read_team(path: &Path) -> Result<Team> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read team file {}", path.display()))?;
    let team: Team = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse team file {}", path.display()))?;
    if let Err(reason) = team.validate() {
        bail!("Invalid team in {}: {}", path.display(), reason);
    }
    Ok(team)
}

fn read_script(path: &Path) -> Result<Vec<ScoringCommand>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse script {}", path.display()))
}

/// Apply commands in order, stopping at the first one the engine refuses.
fn replay(
    engine: &mut ScoringEngine,
    m: &mut Match,
    commands: Vec<ScoringCommand>,
    verbose: bool,
) -> Result<usize> {
    let total = commands.len();
    for (index, command) in commands.into_iter().enumerate() {
        let label = format!("{:?}", command);
        let outcome = engine
            .apply(m, command)
            .with_context(|| format!("Command {} of {} refused: {}", index + 1, total, label))?;
        if verbose {
            println!("{}", serde_json::to_string(&outcome)?);
        }
    }
    log::info!("Applied {} commands to match {}", total, m.id);
    Ok(total)
}
