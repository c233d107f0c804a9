//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use frontier::game::{AiReport, Board, TurnReport};
use serde::Serialize;

/// `[rations, material, weapons]`.
type Triple = [i64; 3];

/// JSON-serializable board summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonBoardSummary {
    /// Game id.
    pub(super) game: String,
    /// Board seed.
    pub(super) seed: u64,
    /// Current turn.
    pub(super) turn: u32,
    /// Grid size.
    pub(super) cols: u16,
    /// Grid size.
    pub(super) rows: u16,
    /// Stockpile.
    pub(super) resources: Triple,
    /// Friendly units.
    pub(super) pieces: usize,
    /// Hostile units.
    pub(super) hostiles: usize,
    /// Neutral units.
    pub(super) neutrals: usize,
    /// Rivers carved.
    pub(super) rivers: usize,
    /// Tiles discovered so far.
    pub(super) discovered: usize,
}

impl JsonBoardSummary {
    /// Summarize a board.
    pub(super) fn from_board(game: &str, board: &Board) -> Self {
        let r = board.resources;
        Self {
            game: game.to_string(),
            seed: board.seed,
            turn: board.turn,
            cols: board.map.cols(),
            rows: board.map.rows(),
            resources: [r.rations, r.material, r.weapons],
            pieces: board.pieces.len(),
            hostiles: board.hostile_pieces.len(),
            neutrals: board.neutral_pieces.len(),
            rivers: board.river_paths.len(),
            discovered: board.map.iter().filter(|t| t.discovered).count(),
        }
    }
}

/// JSON-serializable turn report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonTurnReport {
    /// Turn after the advance.
    pub(super) turn: u32,
    /// Net resource change.
    pub(super) net: Triple,
    /// Stockpile after the change.
    pub(super) resources: Triple,
    /// Upgrades completed, as `kind@(q, r)`.
    pub(super) completed_upgrades: Vec<String>,
    /// Raiders spawned.
    pub(super) spawned: usize,
    /// Friendly units lost.
    pub(super) lost: usize,
    /// Raider strikes.
    pub(super) strikes: usize,
    /// Tiles discovered this turn.
    pub(super) newly_discovered: usize,
}

impl JsonTurnReport {
    /// Create from a TurnReport.
    pub(super) fn from_report(report: &TurnReport) -> Self {
        let net = report.delta.net;
        let res = report.resources;
        Self {
            turn: report.turn,
            net: [net.rations, net.material, net.weapons],
            resources: [res.rations, res.material, res.weapons],
            completed_upgrades: report
                .completed_upgrades
                .iter()
                .map(|u| format!("{:?}@{}", u.kind, u.at))
                .collect(),
            spawned: report.hostiles.spawned.len(),
            lost: report.hostiles.killed.len(),
            strikes: report.hostiles.strikes,
            newly_discovered: report.visibility.newly_discovered,
        }
    }
}

fn hostile_line(hostiles: &AiReport) -> String {
    format!(
        "raiders: {} spawned, {} moved, {} strikes, {} kills",
        hostiles.spawned.len(),
        hostiles.moves,
        hostiles.strikes,
        hostiles.killed.len()
    )
}

/// Format a turn report as human-readable text.
pub(super) fn format_turn_text(report: &TurnReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Turn {}", report.turn);
    let _ = writeln!(output, "  net:       {}", report.delta.net);
    let _ = writeln!(output, "  stockpile: {}", report.resources);
    if report.resources.any_negative() {
        output.push_str("  warning: stockpile is negative\n");
    }
    for upgrade in &report.completed_upgrades {
        let _ = writeln!(output, "  upgrade complete: {:?} at {}", upgrade.kind, upgrade.at);
    }
    let _ = writeln!(output, "  {}", hostile_line(&report.hostiles));
    let _ = writeln!(
        output,
        "  sight: {} visible, {} newly discovered",
        report.visibility.visible, report.visibility.newly_discovered
    );
    output
}

/// Format a board summary as human-readable text.
pub(super) fn format_summary_text(summary: &JsonBoardSummary) -> String {
    let [rations, material, weapons] = summary.resources;
    format!(
        "Game {} (seed: {})\n  Turn: {}\n  Grid: {}x{}\n  Stockpile: {rations} rations / {material} material / {weapons} weapons\n  Units: {} colony, {} hostile, {} neutral\n  Rivers: {}\n  Discovered: {} tiles\n",
        summary.game,
        summary.seed,
        summary.turn,
        summary.cols,
        summary.rows,
        summary.pieces,
        summary.hostiles,
        summary.neutrals,
        summary.rivers,
        summary.discovered,
    )
}
