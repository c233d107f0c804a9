//! Board invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger on a board produced by generation and
//! advanced through actions and turns. If they do, it indicates a bug.
//! Negative stockpiles are legal and are not checked here.

use std::collections::HashSet;

use crate::game::{Board, Terrain};
use crate::worldgen;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = check_structure(board);
    check_fog(board, &mut violations);
    violations
}

/// Check every invariant except the fog flags.
///
/// Fog flags are derived state, rebuilt by the next visibility pass, so a
/// loaded board only has to get everything else right.
#[must_use]
pub fn check_structure(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    check_units(board, &mut violations);
    check_tiles(board, &mut violations);
    check_rivers(board, &mut violations);
    violations
}

fn check_units(board: &Board, violations: &mut Vec<InvariantViolation>) {
    let mut ids = HashSet::new();
    for unit in board.all_units() {
        if !ids.insert(unit.id) {
            violations.push(violation(format!("Unit id {} is used twice", unit.id)));
        }
        if !board.map.in_bounds(unit.position()) {
            violations.push(violation(format!(
                "Unit {} stands off the board at {}",
                unit.id,
                unit.position()
            )));
        }
        if unit.moves_left > unit.move_points {
            violations.push(violation(format!(
                "Unit {} has {} moves left of {}",
                unit.id, unit.moves_left, unit.move_points
            )));
        }
        if unit.stats.current_health > unit.stats.health {
            violations.push(violation(format!(
                "Unit {} health {} exceeds max {}",
                unit.id, unit.stats.current_health, unit.stats.health
            )));
        }
        if !unit.is_alive() {
            violations.push(violation(format!(
                "Dead unit {} still on the board",
                unit.id
            )));
        }
    }

    let mut positions = HashSet::new();
    for unit in board.all_units() {
        if !positions.insert(unit.position()) {
            violations.push(violation(format!(
                "Two units share tile {}",
                unit.position()
            )));
        }
    }
}

fn check_tiles(board: &Board, violations: &mut Vec<InvariantViolation>) {
    let map = &board.map;
    for tile in map.iter() {
        let at = tile.coord();
        if tile.building.is_some() != tile.stats.is_some() {
            violations.push(violation(format!(
                "Tile {at} has building {:?} but stats {:?}",
                tile.building, tile.stats
            )));
        }
        if !(1..=5).contains(&tile.height) {
            violations.push(violation(format!(
                "Tile {at} height {} outside 1-5",
                tile.height
            )));
        }
        if tile.terrain == Terrain::ImpassableMountain
            && map
                .neighbors(at)
                .any(|n| map.terrain(n).is_some_and(|t| !t.is_mountain()))
        {
            violations.push(violation(format!(
                "Impassable mountain at {at} borders open terrain"
            )));
        }
    }

    for at in worldgen::landlocked_water(map) {
        violations.push(violation(format!("Landlocked water at {at} is not a lake")));
    }
}

fn check_fog(board: &Board, violations: &mut Vec<InvariantViolation>) {
    for tile in board.map.iter() {
        let at = tile.coord();
        if tile.visible && !tile.discovered {
            violations.push(violation(format!("Tile {at} is visible but undiscovered")));
        }
        let semi = tile.discovered && tile.building.is_none() && !tile.visible;
        if tile.semi_fogged != semi {
            violations.push(violation(format!(
                "Tile {at} semi-fog flag is {} but should be {semi}",
                tile.semi_fogged
            )));
        }
    }
}

fn check_rivers(board: &Board, violations: &mut Vec<InvariantViolation>) {
    for (index, path) in board.river_paths.iter().enumerate() {
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !from.is_adjacent(to) {
                violations.push(violation(format!(
                    "River {index} jumps from {from} to {to}"
                )));
            }
            let (Some(a), Some(b)) = (board.map.get(from), board.map.get(to)) else {
                violations.push(violation(format!("River {index} leaves the board")));
                continue;
            };
            if b.height > a.height {
                violations.push(violation(format!(
                    "River {index} climbs from {from} (height {}) to {to} (height {})",
                    a.height, b.height
                )));
            }
        }
    }
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}
