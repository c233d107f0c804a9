//! Turn pipeline.
//!
//! `end_turn` runs, in order: economy, turn increment, allowance reset,
//! upgrade completion, the hostile phase, and a visibility recompute. The
//! hostile phase draws from an RNG seeded by the board seed and the new
//! turn number. In debug builds `end_turn` then asserts every board
//! invariant; [`advance_turn`] runs the same pipeline without the assertion
//! for callers that collect violations themselves.

use crate::config::RulesConfig;
use crate::game::visibility::{self, VisibilitySummary};
use crate::game::{
    AiReport, Board, PlayerHandle, ResourceDelta, Resources, UpgradeKind, ai, economy, invariants,
};
use crate::hex::Coord;

/// An upgrade that finished this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedUpgrade {
    /// Shelter tile.
    pub at: Coord,
    /// Upgrade kind.
    pub kind: UpgradeKind,
}

/// Summary of one turn advance, for the persistence layer and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number after the advance.
    pub turn: u32,
    /// Economy delta applied.
    pub delta: ResourceDelta,
    /// Stockpile after the delta.
    pub resources: Resources,
    /// Upgrades finished this turn.
    pub completed_upgrades: Vec<CompletedUpgrade>,
    /// Hostile phase summary.
    pub hostiles: AiReport,
    /// Visibility after the turn.
    pub visibility: VisibilitySummary,
}

/// Restore movement and attack allowances of every friendly unit.
pub fn reset_allowances(board: &mut Board) {
    for unit in &mut board.pieces {
        unit.refresh();
    }
}

/// Move finished upgrades from in-progress to installed.
pub fn advance_upgrades(board: &mut Board) -> Vec<CompletedUpgrade> {
    let turn = board.turn;
    let mut completed = Vec::new();
    for tile in board.map.tiles_mut() {
        if let Some(upgrade) = tile.upgrade_in_progress
            && upgrade.is_complete(turn)
        {
            tile.upgrade_in_progress = None;
            tile.upgrades.push(upgrade.key);
            completed.push(CompletedUpgrade {
                at: tile.coord(),
                kind: upgrade.key,
            });
        }
    }
    completed
}

/// Advance the board by one turn, asserting invariants in debug builds.
pub fn end_turn(board: &mut Board, rules: &RulesConfig, player: &PlayerHandle) -> TurnReport {
    let report = advance_turn(board, rules, player);
    invariants::assert_invariants(board);
    report
}

/// Advance the board by one turn without checking invariants.
pub fn advance_turn(board: &mut Board, rules: &RulesConfig, player: &PlayerHandle) -> TurnReport {
    let span = tracing::info_span!("end_turn", %player, from = board.turn);
    let _enter = span.enter();

    let delta = economy::calculate_delta(board);
    let resources = economy::apply_delta(board, &delta);

    board.turn += 1;
    reset_allowances(board);
    let completed_upgrades = advance_upgrades(board);
    for done in &completed_upgrades {
        tracing::debug!(at = %done.at, kind = %done.kind, "upgrade complete");
    }

    let mut rng = board.turn_rng();
    let hostiles = ai::run_hostiles(board, rules, &mut rng);
    let fog = visibility::recompute(board);

    tracing::info!(
        turn = board.turn,
        %resources,
        upgrades = completed_upgrades.len(),
        spawned = hostiles.spawned.len(),
        killed = hostiles.killed.len(),
        "turn advanced"
    );

    TurnReport {
        turn: board.turn,
        delta,
        resources,
        completed_upgrades,
        hostiles,
        visibility: fog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BuildingKind, Map, Unit, UnitKind, UpgradeInProgress};

    fn create_colony() -> Board {
        let mut board = Board::new(Map::new(10, 10).unwrap(), 99);
        board
            .map
            .get_mut(Coord::new(2, 2))
            .unwrap()
            .place_building(BuildingKind::Shelter);
        board
            .pieces
            .push(Unit::new(1, UnitKind::Engineer, Coord::new(2, 2)));
        board
    }

    #[test]
    fn test_allowances_reset() {
        let mut board = create_colony();
        board.pieces[0].moves_left = 0;
        board.pieces[0].attacked = true;
        end_turn(&mut board, &RulesConfig::default(), &PlayerHandle::new("p"));
        let unit = board.piece(1).unwrap();
        assert_eq!(unit.moves_left, unit.move_points);
        assert!(!unit.attacked);
    }

    #[test]
    fn test_turn_increments_and_delta_applied() {
        let mut board = create_colony();
        let report = end_turn(&mut board, &RulesConfig::default(), &PlayerHandle::new("p"));
        assert_eq!(board.turn, 2);
        assert_eq!(report.turn, 2);
        // Shelter (2, 1, 0) minus engineer upkeep (1, 0, 0).
        assert_eq!(report.delta.net, Resources::new(1, 1, 0));
        assert_eq!(board.resources, Resources::new(1, 1, 0));
    }

    #[test]
    fn test_upgrade_completes_on_schedule() {
        let mut board = create_colony();
        let shelter = Coord::new(2, 2);
        board.turn = 5;
        board.map.get_mut(shelter).unwrap().upgrade_in_progress = Some(UpgradeInProgress {
            duration: 3,
            ..UpgradeInProgress::start(UpgradeKind::Hydroponics, 5)
        });
        let rules = RulesConfig::default();
        let player = PlayerHandle::new("p");

        end_turn(&mut board, &rules, &player);
        end_turn(&mut board, &rules, &player);
        assert_eq!(board.turn, 7);
        assert!(board.map.get(shelter).unwrap().upgrade_in_progress.is_some());

        let report = end_turn(&mut board, &rules, &player);
        assert_eq!(board.turn, 8);
        assert_eq!(
            report.completed_upgrades,
            vec![CompletedUpgrade {
                at: shelter,
                kind: UpgradeKind::Hydroponics
            }]
        );
        let tile = board.map.get(shelter).unwrap();
        assert!(tile.upgrade_in_progress.is_none());
        assert!(tile.has_upgrade(UpgradeKind::Hydroponics));
    }

    #[test]
    fn test_end_turn_is_deterministic() {
        let mut a = create_colony();
        a.map
            .get_mut(Coord::new(7, 7))
            .unwrap()
            .place_building(BuildingKind::Fortress);
        a.hostile_pieces
            .push(Unit::raider(2, Coord::new(7, 6), Some(Coord::new(7, 7))));
        let mut b = a.clone();
        let rules = RulesConfig::default();
        let player = PlayerHandle::new("p");
        for _ in 0..10 {
            end_turn(&mut a, &rules, &player);
            end_turn(&mut b, &rules, &player);
        }
        assert_eq!(a, b);
    }

    fn stacked_colony() -> Board {
        let mut board = create_colony();
        board
            .pieces
            .push(Unit::new(2, UnitKind::Scout, Coord::new(2, 2)));
        board
    }

    #[test]
    fn test_advance_turn_leaves_checking_to_caller() {
        let mut board = stacked_colony();
        let report = advance_turn(&mut board, &RulesConfig::default(), &PlayerHandle::new("p"));
        assert_eq!(report.turn, 2);
        assert!(!invariants::check_invariants(&board).is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "Two units share tile")]
    fn test_end_turn_asserts_in_debug() {
        let mut board = stacked_colony();
        end_turn(&mut board, &RulesConfig::default(), &PlayerHandle::new("p"));
    }
}
