//! Soak command implementation.
//!
//! Generates many seeded boards, plays each for a number of turns, and
//! checks every board invariant after generation and after every turn.
//! Turns go through `advance_turn` so violations are counted rather than
//! panicking in debug builds.

use super::{CliError, OutputFormat, seed_or_clock};
use frontier::game::{
    Action, AttackTarget, Board, PlayerHandle, advance_turn, check_invariants, visibility,
};
use frontier::{GameConfig, worldgen};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Violations kept per run; the count is always exact.
const MAX_REPORTED: usize = 20;

/// One invariant failure.
#[derive(Debug, Clone, Serialize)]
struct Failure {
    seed: u64,
    turn: u32,
    message: String,
}

/// Aggregate over every soaked board.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct SoakStats {
    boards: u64,
    turns: u64,
    generation_failures: u64,
    colonies_lost: u64,
    raiders_spawned: u64,
    friendly_losses: u64,
    player_actions: u64,
    violation_count: u64,
    violations: Vec<Failure>,
}

impl SoakStats {
    fn record(&mut self, seed: u64, turn: u32, board: &Board) {
        for v in check_invariants(board) {
            self.violation_count += 1;
            if self.violations.len() < MAX_REPORTED {
                self.violations.push(Failure {
                    seed,
                    turn,
                    message: v.message,
                });
            }
        }
    }

    fn merge(&mut self, other: Self) {
        self.boards += other.boards;
        self.turns += other.turns;
        self.generation_failures += other.generation_failures;
        self.colonies_lost += other.colonies_lost;
        self.raiders_spawned += other.raiders_spawned;
        self.friendly_losses += other.friendly_losses;
        self.player_actions += other.player_actions;
        self.violation_count += other.violation_count;
        let room = MAX_REPORTED.saturating_sub(self.violations.len());
        self.violations.extend(other.violations.into_iter().take(room));
    }
}

/// Random player: each friendly unit attacks a visible raider if it can,
/// otherwise steps to a random neighbor. Rejected actions are ignored.
fn wander<R: Rng>(
    board: &mut Board,
    config: &GameConfig,
    player: &PlayerHandle,
    rng: &mut R,
) -> u64 {
    let mut applied = 0;
    let ids: Vec<_> = board.pieces.iter().map(|u| u.id).collect();
    for id in ids {
        let Some(unit) = board.piece(id) else {
            continue;
        };
        let from = unit.position();
        let target = visibility::visible_hostiles(board)
            .into_iter()
            .filter(|h| h.position().distance(from) <= unit.range)
            .map(|h| h.id)
            .min();

        let action = if let Some(target) = target {
            Action::Attack {
                unit: id,
                target: AttackTarget::Unit(target),
            }
        } else {
            let mut steps: Vec<_> = board.map.neighbors(from).collect();
            steps.shuffle(rng);
            let Some(&to) = steps.first() else {
                continue;
            };
            Action::Move { unit: id, to }
        };
        if frontier::game::apply(board, &config.rules, player, action).is_ok() {
            applied += 1;
        }
    }
    applied
}

fn soak_one(config: &GameConfig, seed: u64, turns: u32, wander_units: bool) -> SoakStats {
    let mut stats = SoakStats {
        boards: 1,
        ..SoakStats::default()
    };
    let mut board = match worldgen::generate(&config.world, &config.rules, seed) {
        Ok(board) => board,
        Err(e) => {
            tracing::warn!(seed, error = %e, "generation failed");
            stats.generation_failures = 1;
            return stats;
        }
    };
    stats.record(seed, board.turn, &board);

    let player = PlayerHandle::new("soak");
    let mut rng = ChaCha8Rng::seed_from_u64(seed.rotate_left(17));
    for _ in 0..turns {
        if wander_units {
            stats.player_actions += wander(&mut board, config, &player, &mut rng);
            stats.record(seed, board.turn, &board);
        }
        let report = advance_turn(&mut board, &config.rules, &player);
        stats.turns += 1;
        stats.raiders_spawned += report.hostiles.spawned.len() as u64;
        stats.friendly_losses += report.hostiles.killed.len() as u64;
        stats.record(seed, board.turn, &board);
        if board.pieces.is_empty() {
            stats.colonies_lost = 1;
            break;
        }
    }
    stats
}

fn format_text(stats: &SoakStats) -> String {
    let mut output = format!(
        "Soak Results ({} boards, {} turns)\n  Generation failures: {}\n  Colonies lost: {}\n  Raiders spawned: {}\n  Friendly losses: {}\n  Player actions: {}\n  Invariant violations: {}\n",
        stats.boards,
        stats.turns,
        stats.generation_failures,
        stats.colonies_lost,
        stats.raiders_spawned,
        stats.friendly_losses,
        stats.player_actions,
        stats.violation_count,
    );
    for failure in &stats.violations {
        output.push_str(&format!(
            "    seed {} turn {}: {}\n",
            failure.seed, failure.turn, failure.message
        ));
    }
    output
}

/// Execute the soak command.
///
/// # Errors
///
/// Returns an error if any invariant was violated.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    config: &GameConfig,
    games: u64,
    turns: u32,
    seed: Option<u64>,
    threads: Option<usize>,
    wander_units: bool,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }
    let base_seed = seed_or_clock(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} boards ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = (0..games)
        .into_par_iter()
        .fold(SoakStats::default, |mut local, i| {
            local.merge(soak_one(config, base_seed.wrapping_add(i), turns, wander_units));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SoakStats::default, |mut a, b| {
            a.merge(b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_text(&stats));
            println!();
            println!("Base seed: {base_seed}");
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    if stats.violation_count > 0 {
        return Err(CliError::new(format!(
            "{} invariant violations",
            stats.violation_count
        )));
    }
    Ok(())
}
