//! Frontier CLI - generate, advance, inspect, and soak-test colony boards.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Frontier - a deterministic hex colony simulation
#[derive(Parser, Debug)]
#[command(name = "frontier")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file (world and rules); missing keys use defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding stored games
    #[arg(long, global = true, default_value = "games")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new board and store it
    Generate {
        /// Game id (file name in the store)
        #[arg(required = true)]
        game: String,

        /// Owning player
        #[arg(short, long, default_value = "player")]
        owner: String,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid width (overrides config)
        #[arg(long)]
        cols: Option<u16>,

        /// Grid height (overrides config)
        #[arg(long)]
        rows: Option<u16>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// End turns on a stored board
    Advance {
        /// Game id
        #[arg(required = true)]
        game: String,

        /// Player ending the turn
        #[arg(short, long, default_value = "player")]
        player: String,

        /// Number of turns to end (default: 1)
        #[arg(short, long, default_value = "1")]
        turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Print a stored board
    Show {
        /// Game id
        #[arg(required = true)]
        game: String,

        /// Only show what the colony has discovered
        #[arg(long)]
        fog: bool,

        /// List every unit under the map
        #[arg(long)]
        roster: bool,
    },

    /// Run many seeded boards in parallel and check invariants every turn
    Soak {
        /// Number of boards (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Turns per board (default: 50)
        #[arg(short, long, default_value = "50")]
        turns: u32,

        /// Starting seed (increments for each board)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Move friendly units at random between turns
        #[arg(long)]
        wander: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match cli::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Commands::Generate {
            game,
            owner,
            seed,
            cols,
            rows,
            format,
        } => cli::generate::execute(config, &args.store, &game, &owner, seed, cols, rows, format),

        Commands::Advance {
            game,
            player,
            turns,
            format,
        } => cli::advance::execute(config, &args.store, &game, &player, turns, format),

        Commands::Show { game, fog, roster } => {
            cli::show::execute(config, &args.store, &game, fog, roster)
        }

        Commands::Soak {
            games,
            turns,
            seed,
            threads,
            wander,
            format,
            progress,
        } => cli::soak::execute(&config, games, turns, seed, threads, wander, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
