//! Command line entry point for the squad draw service
//!
//! Balances a roster snapshot into two squads, stores draws, and reads
//! stored draws and participation history back.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use squad_draw::config::AppConfig;
use squad_draw::directory::RosterSnapshot;
use squad_draw::draw::DrawRecord;
use squad_draw::service::{open_store, AppState};
use squad_draw::{PoolSelection, RosterBalancer, Squad, SquadSplit, StaticPlayerDirectory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Squad Draw - split a pickup game pool into two balanced squads
#[derive(Parser)]
#[command(name = "squad-draw", version, about)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Database path override
    #[arg(long, value_name = "PATH", help = "Override SQLite database path")]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Balance a roster and print the squads without saving
    Balance {
        /// Roster snapshot (JSON)
        #[arg(long, value_name = "FILE")]
        players: PathBuf,

        /// Player ids to include, in order; defaults to the whole roster
        #[arg(long = "select", value_name = "ID", num_args = 1..)]
        select: Vec<String>,
    },

    /// Balance a roster and store the draw
    Save {
        /// Roster snapshot (JSON)
        #[arg(long, value_name = "FILE")]
        players: PathBuf,

        /// Group id; defaults to the snapshot's group
        #[arg(long)]
        group: Option<String>,

        /// Draw date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Who is saving the draw
        #[arg(long)]
        actor: String,

        /// Player ids to include, in order; defaults to the whole roster
        #[arg(long = "select", value_name = "ID", num_args = 1..)]
        select: Vec<String>,
    },

    /// Print the draw stored for a group and date
    Show {
        #[arg(long)]
        group: String,

        #[arg(long)]
        date: NaiveDate,
    },

    /// List the draws a player took part in
    History {
        #[arg(long)]
        player: String,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if let Some(database) = &args.database {
        config.storage.database_path = database.clone();
    }

    squad_draw::config::validate_config(&config)?;
    Ok(config)
}

fn load_snapshot(path: &Path) -> Result<RosterSnapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    RosterSnapshot::from_json(&contents)
        .with_context(|| format!("Failed to parse roster {}", path.display()))
}

/// Selection from explicit ids, or every roster player in roster order
fn selection_for(snapshot: &RosterSnapshot, select: &[String]) -> PoolSelection {
    if select.is_empty() {
        PoolSelection::from_ids(snapshot.players.iter().map(|p| p.id.clone()))
    } else {
        PoolSelection::from_ids(select.iter().cloned())
    }
}

fn print_squad(squad: &Squad) {
    println!(
        "{} ({} players, average {:.2})",
        squad.label,
        squad.len(),
        squad.average_rating
    );
    for player in &squad.members {
        println!("  {:<20} {:<10} level {}", player.name, player.role, player.level);
    }
}

fn print_split(split: &SquadSplit) {
    for squad in split.squads() {
        print_squad(squad);
    }
    println!("Rating gap: {:.2}", split.rating_gap());
}

fn print_record(record: &DrawRecord) {
    println!(
        "Draw {} saved by {} at {}",
        record.key,
        record.created_by,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    print_split(&record.split());
}

fn run_balance(config: &AppConfig, players: &Path, select: &[String]) -> Result<()> {
    let snapshot = load_snapshot(players)?;
    let selection = selection_for(&snapshot, select);

    let pool = snapshot
        .players_by_id(selection.ids())
        .into_iter()
        .zip(selection.ids())
        .map(|(player, id)| {
            player
                .cloned()
                .with_context(|| format!("Player {} is not in the roster", id))
        })
        .collect::<Result<Vec<_>>>()?;

    let balancer = RosterBalancer::new(
        Arc::new(squad_draw::WeightedRatingCalculator::default()),
        config.balancer_config(),
    );
    let split = balancer.balance(&pool)?;
    print_split(&split);
    Ok(())
}

async fn run_save(
    config: AppConfig,
    players: &Path,
    group: Option<String>,
    date: NaiveDate,
    actor: &str,
    select: &[String],
) -> Result<()> {
    let mut snapshot = load_snapshot(players)?;
    if let Some(group) = group {
        snapshot.group_id = group;
    }
    let group_id = snapshot.group_id.clone();
    let selection = selection_for(&snapshot, select);

    let directory = Arc::new(StaticPlayerDirectory::from_snapshot(snapshot));
    let state = AppState::new(config, directory)?;
    let service = &state.service;

    let pending = service.prepare_draw(&group_id, date, &selection).await?;
    if let Some(existing) = service.existing_draw(&group_id, date).await? {
        warn!(
            "Replacing draw {} saved by {} at {}",
            existing.key, existing.created_by, existing.created_at
        );
    }

    let record = service.commit_draw(&pending, &selection, actor).await?;
    print_record(&record);
    Ok(())
}

async fn run_show(config: &AppConfig, group: &str, date: NaiveDate) -> Result<()> {
    let store = open_store(&config.storage)?;
    let key = squad_draw::DrawKey::new(group, date);

    match store.find(&key).await? {
        Some(record) => print_record(&record),
        None => bail!("No draw stored for {}", key),
    }
    Ok(())
}

async fn run_history(config: &AppConfig, player: &str) -> Result<()> {
    let store = open_store(&config.storage)?;
    let history = store.participation_history(player).await?;

    if history.is_empty() {
        info!("No draws found for player {}", player);
    }
    for key in history {
        println!("{}  {}", key.date, key.group_id);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match args.command {
        Command::Balance { players, select } => run_balance(&config, &players, &select),
        Command::Save {
            players,
            group,
            date,
            actor,
            select,
        } => run_save(config, &players, group, date, &actor, &select).await,
        Command::Show { group, date } => run_show(&config, &group, date).await,
        Command::History { player } => run_history(&config, &player).await,
    }
}
