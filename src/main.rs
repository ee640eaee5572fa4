mod analysis;
mod api;
mod cache;
mod config;
mod display;
mod error;
mod logging;
mod scout;

use analysis::role_stats::analyze_role_performance;
use analysis::roles::{Role, RoleTable};
use anyhow::{Context, Result};
use api::client::{AiBackend, ScoutAiClient};
use api::models::{sample_players, PlayerData};
use api::stats::{fetch_players, HttpStatsSource, LocalStatsSource, StatsSource};
use cache::{CachedStatsSource, PlayerCache};
use clap::{Args, Parser, Subcommand};
use config::Config;
use display::output::{
    display_error, display_info, display_role_performance, display_scout_response,
    display_success,
};
use indicatif::{ProgressBar, ProgressStyle};
use scout::response::ScoutResponse;
use scout::Scout;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Valorant team scouting: role analysis, lineups and agent picks", long_about = None)]
struct Cli {
    /// Ignore cached player stats and fetch again
    #[arg(long, global = true)]
    refresh: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PlayerInput {
    /// JSON file holding an array of players with their per-agent stats
    #[arg(long, value_name = "FILE", conflicts_with = "sample")]
    players: Option<PathBuf>,

    /// Use the built-in sample players
    #[arg(long)]
    sample: bool,

    /// JSON object mapping agent names to roles, replacing the built-in roster
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the four roles by aggregated performance
    Roles {
        #[command(flatten)]
        input: PlayerInput,
    },
    /// Recommend a five-player lineup
    Lineup {
        #[command(flatten)]
        input: PlayerInput,

        /// Players to fetch stats for (defaults to everyone in the input)
        names: Vec<String>,
    },
    /// Recommend agents for a map
    Agents {
        map: String,

        /// Agents already locked in, e.g. --team Jett,Omen
        #[arg(long, value_name = "AGENT", value_delimiter = ',')]
        team: Vec<String>,

        /// JSON player stats to send along as context
        #[arg(long, value_name = "FILE")]
        players: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Ask the scout a free-form question
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but produced a failure result.
fn run(cli: Cli) -> Result<bool> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    logging::init_tracing(config.json_logs, level);

    match cli.command {
        Command::Roles { input } => {
            let table = load_roster(&input)?;
            let players = load_local(&input)?.players().to_vec();
            let performance = analyze_role_performance(&players, &table);

            if input.json {
                println!("{}", serde_json::to_string_pretty(&performance)?);
            } else {
                display_role_performance(&performance);
            }
            Ok(!performance.is_empty())
        }
        Command::Lineup { input, names } => {
            let table = load_roster(&input)?;
            let (players, stats) = if names.is_empty() {
                let local = load_local(&input)?;
                if !input.json {
                    display_info(&format!("Analyzing {}", local.names().join(", ")));
                }
                (local.players().to_vec(), Box::new(local) as Box<dyn StatsSource>)
            } else {
                let stats = stats_source(&config, &input, cli.refresh)?;
                let players = fetch_with_progress(stats.as_ref(), &names, !input.json);
                (players, stats)
            };

            let scout = Scout::new(ai_backend(&config), stats, table);
            emit(&scout.analyze_players(players), input.json)
        }
        Command::Agents {
            map,
            team,
            players,
            json,
        } => {
            let player_stats = match &players {
                Some(path) => Some(
                    LocalStatsSource::load(path)
                        .with_context(|| format!("Failed to load players from {}", path.display()))?
                        .players()
                        .to_vec(),
                ),
                None => None,
            };
            let scout = Scout::new(
                ai_backend(&config),
                Box::new(LocalStatsSource::default()),
                RoleTable::default(),
            );
            emit(&scout.select_agents(&map, player_stats, team), json)
        }
        Command::Ask { prompt, json } => {
            let input = PlayerInput {
                players: None,
                sample: false,
                roster: None,
                json,
            };
            let stats = stats_source(&config, &input, cli.refresh)?;
            let scout = Scout::new(ai_backend(&config), stats, RoleTable::default());
            emit(&scout.ask(&prompt.join(" ")), json)
        }
    }
}

fn emit(response: &ScoutResponse, json: bool) -> Result<bool> {
    tracing::debug!(fallback = response.is_fallback(), "scout response ready");
    if json {
        println!("{}", serde_json::to_string_pretty(&response.to_payload())?);
    } else {
        display_scout_response(response);
    }
    Ok(!matches!(response, ScoutResponse::Error { .. }))
}

fn ai_backend(config: &Config) -> Option<Box<dyn AiBackend>> {
    match ScoutAiClient::from_config(config) {
        Some(client) => Some(Box::new(client)),
        None => {
            tracing::info!("SCOUT_AI_URL not set, using built-in analysis only");
            None
        }
    }
}

fn load_roster(input: &PlayerInput) -> Result<RoleTable> {
    match &input.roster {
        Some(path) => {
            let table = RoleTable::load(path)
                .with_context(|| format!("Failed to load roster {}", path.display()))?;
            for role in Role::ALL {
                tracing::debug!(%role, agents = ?table.agents_for(role), "roster entries");
            }
            if !input.json {
                display_success(&format!("Loaded roster with {} agents", table.len()));
            }
            Ok(table)
        }
        None => Ok(RoleTable::default()),
    }
}

/// Players from `--players FILE`, or the samples. Without either flag the
/// samples are used as well.
fn load_local(input: &PlayerInput) -> Result<LocalStatsSource> {
    match &input.players {
        Some(path) => LocalStatsSource::load(path)
            .with_context(|| format!("Failed to load players from {}", path.display())),
        None => Ok(LocalStatsSource::from_players(sample_players())?),
    }
}

/// The HTTP stats service (behind the disk cache) when `SCOUT_STATS_URL` is
/// set and no local file was given; otherwise local players.
fn stats_source(config: &Config, input: &PlayerInput, refresh: bool) -> Result<Box<dyn StatsSource>> {
    match (&config.stats_url, input.players.is_some() || input.sample) {
        (Some(url), false) => {
            let cache = PlayerCache::new(PlayerCache::default_dir());
            Ok(Box::new(CachedStatsSource::new(
                HttpStatsSource::new(url),
                cache,
                config.cache_max_age_mins,
                refresh,
            )))
        }
        _ => Ok(Box::new(load_local(input)?)),
    }
}

fn fetch_with_progress(source: &dyn StatsSource, names: &[String], show: bool) -> Vec<PlayerData> {
    let pb = if show {
        ProgressBar::new(names.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Fetching player stats");

    let players = fetch_players(source, names, |name| {
        pb.set_message(name.to_string());
        pb.inc(1);
    });

    pb.finish_with_message(format!("✓ Stats for {} of {} players", players.len(), names.len()));
    players
}
