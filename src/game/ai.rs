//! Hostile AI: fortress spawning, target acquisition, engagement, patrol.
//!
//! Raiders act one at a time, grouped by home fortress and in id order
//! within a group, so a seeded RNG always produces the same turn. Each
//! raider sees the board as left by the raiders before it.

use rand::Rng;

use crate::config::RulesConfig;
use crate::game::{AiBehavior, Board, Unit, UnitId, UnitKind, can_enter, combat};
use crate::hex::Coord;

/// What the hostile faction did this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiReport {
    /// Raiders spawned by fortresses.
    pub spawned: Vec<UnitId>,
    /// Friendly units killed by raiders.
    pub killed: Vec<UnitId>,
    /// Raiders that changed tile.
    pub moves: usize,
    /// Strikes landed on friendly units.
    pub strikes: usize,
}

/// Roll against a probability. Values outside `[0, 1]` saturate.
fn roll<R: Rng>(rng: &mut R, chance: f64) -> bool {
    rng.gen_range(0.0..1.0) < chance
}

/// Pick one element uniformly.
fn choose<R: Rng, T: Copy>(rng: &mut R, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}

/// A free tile a raider could stand on.
fn is_open_for_raider(board: &Board, at: Coord) -> bool {
    board.is_vacant(at) && can_enter(&UnitKind::Raider.profile().abilities, &board.map, at)
}

/// Run the hostile faction for one turn.
pub fn run_hostiles<R: Rng>(board: &mut Board, rules: &RulesConfig, rng: &mut R) -> AiReport {
    let mut report = AiReport::default();
    spawn_raiders(board, rules, rng, &mut report);

    let mut order: Vec<(Option<Coord>, UnitId)> = board
        .hostile_pieces
        .iter()
        .filter(|u| u.ai_behavior.is_some())
        .map(|u| (u.home_fortress, u.id))
        .collect();
    order.sort_unstable();

    for (_, id) in order {
        act(board, id, rng, &mut report);
    }

    tracing::debug!(
        spawned = report.spawned.len(),
        killed = report.killed.len(),
        moves = report.moves,
        strikes = report.strikes,
        "hostile phase complete"
    );
    report
}

/// Each fortress below its pack cap spawns a raider on a free neighbor
/// with `spawn_chance`.
fn spawn_raiders<R: Rng>(
    board: &mut Board,
    rules: &RulesConfig,
    rng: &mut R,
    report: &mut AiReport,
) {
    for home in board.fortresses() {
        if board.pack_of(home).count() >= rules.max_pack_size {
            continue;
        }
        if !roll(rng, rules.spawn_chance) {
            continue;
        }
        let free: Vec<Coord> = board
            .map
            .neighbors(home)
            .filter(|&n| is_open_for_raider(board, n))
            .collect();
        let Some(at) = choose(rng, &free) else {
            continue;
        };
        let id = board.next_unit_id();
        board.hostile_pieces.push(Unit::raider(id, at, Some(home)));
        report.spawned.push(id);
        tracing::debug!(raider = id, fortress = %home, at = %at, "raider spawned");
    }
}

/// Whether `raider` notices `friendly`.
///
/// Stealthy units are only noticed from an adjacent tile.
fn detects(raider: &Unit, behavior: &AiBehavior, friendly: &Unit) -> bool {
    let distance = raider.position().distance(friendly.position());
    distance <= behavior.detection_range && (!friendly.abilities.stealthy || distance <= 1)
}

/// Keep a live target that is still detected, else take the nearest
/// detected friendly. Ties go to the lowest id.
fn acquire_target(board: &Board, raider: &Unit, behavior: &AiBehavior) -> Option<UnitId> {
    if let Some(id) = raider.aggro_target
        && let Some(current) = board.piece(id)
        && detects(raider, behavior, current)
    {
        return Some(id);
    }
    let origin = raider.position();
    board
        .pieces
        .iter()
        .filter(|f| detects(raider, behavior, f))
        .min_by_key(|f| (origin.distance(f.position()), f.id))
        .map(|f| f.id)
}

fn act<R: Rng>(board: &mut Board, id: UnitId, rng: &mut R, report: &mut AiReport) {
    let Some(raider) = board.hostile(id) else {
        return;
    };
    let Some(behavior) = raider.ai_behavior else {
        return;
    };

    match acquire_target(board, raider, &behavior) {
        Some(target) => engage(board, id, target, &behavior, rng, report),
        None => {
            if let Some(raider) = board.hostile_mut(id) {
                raider.calm();
            }
            patrol(board, id, &behavior, rng, report);
        }
    }
}

/// Free tile next to `target` closest to `from`; ties by coordinate.
fn approach_tile(board: &Board, from: Coord, target: Coord) -> Option<Coord> {
    board
        .map
        .neighbors(target)
        .filter(|&n| is_open_for_raider(board, n))
        .min_by_key(|&n| (from.distance(n), n))
}

fn engage<R: Rng>(
    board: &mut Board,
    id: UnitId,
    target: UnitId,
    behavior: &AiBehavior,
    rng: &mut R,
    report: &mut AiReport,
) {
    if let Some(raider) = board.hostile_mut(id) {
        raider.aggro_target = Some(target);
    }
    if !roll(rng, behavior.aggression_level) {
        return;
    }
    let (Some(raider), Some(friendly)) = (board.hostile(id), board.piece(target)) else {
        return;
    };
    let from = raider.position();
    let target_at = friendly.position();
    let dest = if from.is_adjacent(target_at) {
        None
    } else {
        approach_tile(board, from, target_at)
    };

    if let Some(raider) = board.hostile_mut(id) {
        raider.aggro = true;
        if let Some(to) = dest {
            raider.place(to);
            report.moves += 1;
        }
    }

    strike(board, id, target, report);
}

/// An adjacent raider hits its target once.
fn strike(board: &mut Board, id: UnitId, target: UnitId, report: &mut AiReport) {
    let Some(raider) = board.hostile(id) else {
        return;
    };
    let attack = raider.stats.attack;
    let at = raider.position();
    let Some(friendly) = board.piece_mut(target) else {
        return;
    };
    if !at.is_adjacent(friendly.position()) {
        return;
    }

    let dealt = combat::damage(attack, friendly.stats.defense);
    let died = friendly.take_damage(dealt);
    report.strikes += 1;
    tracing::debug!(raider = id, target, damage = dealt, died, "raider strike");

    if died {
        board.pieces.retain(|u| u.id != target);
        report.killed.push(target);
        if let Some(raider) = board.hostile_mut(id) {
            raider.calm();
        }
    }
}

/// Wander to a random free neighbor within the home leash.
///
/// The leash is `patrol_radius`, plus one per packmate when the raider
/// uses pack tactics. Raiders whose fortress is gone wander freely.
fn patrol<R: Rng>(
    board: &mut Board,
    id: UnitId,
    behavior: &AiBehavior,
    rng: &mut R,
    report: &mut AiReport,
) {
    let Some(raider) = board.hostile(id) else {
        return;
    };
    let from = raider.position();
    let leash = raider
        .home_fortress
        .filter(|&home| board.fortress_at(home).is_some())
        .map(|home| {
            let pack = u32::try_from(board.pack_of(home).count()).unwrap_or(u32::MAX);
            let bonus = if behavior.pack_tactics {
                pack.saturating_sub(1)
            } else {
                0
            };
            (home, behavior.patrol_radius.saturating_add(bonus))
        });

    let options: Vec<Coord> = board
        .map
        .neighbors(from)
        .filter(|&n| is_open_for_raider(board, n))
        .filter(|&n| leash.is_none_or(|(home, radius)| n.distance(home) <= radius))
        .collect();

    if let Some(to) = choose(rng, &options)
        && let Some(raider) = board.hostile_mut(id)
    {
        raider.place(to);
        report.moves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BuildingKind, Map, Terrain};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const FORTRESS: Coord = Coord::new(10, 10);

    fn create_arena() -> Board {
        let mut board = Board::new(Map::new(20, 20).unwrap(), 11);
        board
            .map
            .get_mut(FORTRESS)
            .unwrap()
            .place_building(BuildingKind::Fortress);
        board
    }

    fn always_aggressive(board: &mut Board, id: UnitId) {
        if let Some(behavior) = board.hostile_mut(id).unwrap().ai_behavior.as_mut() {
            behavior.aggression_level = 1.0;
        }
    }

    fn quiet_rules() -> RulesConfig {
        RulesConfig {
            spawn_chance: 0.0,
            ..RulesConfig::default()
        }
    }

    #[test]
    fn test_detects_at_two_not_four() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Engineer, Coord::new(7, 4)));
        always_aggressive(&mut board, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        run_hostiles(&mut board, &quiet_rules(), &mut rng);
        let raider = board.hostile(1).unwrap();
        assert!(raider.aggro);
        assert_eq!(raider.aggro_target, Some(2));

        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Engineer, Coord::new(9, 4)));
        always_aggressive(&mut board, 1);
        run_hostiles(&mut board, &quiet_rules(), &mut rng);
        let raider = board.hostile(1).unwrap();
        assert!(!raider.aggro);
        assert_eq!(raider.aggro_target, None);
    }

    #[test]
    fn test_engagement_moves_adjacent_and_strikes() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Ranger, Coord::new(7, 4)));
        always_aggressive(&mut board, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = run_hostiles(&mut board, &quiet_rules(), &mut rng);

        let raider = board.hostile(1).unwrap();
        assert!(raider.position().is_adjacent(Coord::new(7, 4)));
        assert_eq!(report.strikes, 1);
        // Raider attack 3 vs ranger defense 2.
        let ranger = board.piece(2).unwrap();
        assert_eq!(ranger.stats.current_health, ranger.stats.health - 1);
    }

    #[test]
    fn test_long_sighted_raider_closes_full_distance() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Engineer, Coord::new(10, 4)));
        // A mountain on the straight line does not stop the approach.
        board.map.get_mut(Coord::new(7, 4)).unwrap().terrain = Terrain::Mountain;
        if let Some(behavior) = board.hostile_mut(1).unwrap().ai_behavior.as_mut() {
            behavior.detection_range = 6;
            behavior.aggression_level = 1.0;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let report = run_hostiles(&mut board, &quiet_rules(), &mut rng);

        let raider = board.hostile(1).unwrap();
        assert!(raider.aggro);
        assert_eq!(raider.position(), Coord::new(9, 4));
        assert_eq!(report.moves, 1);
        assert_eq!(report.strikes, 1);
    }

    #[test]
    fn test_tie_break_lowest_id() {
        let mut board = create_arena();
        let raider_at = Coord::new(5, 4);
        board
            .hostile_pieces
            .push(Unit::raider(1, raider_at, Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(9, UnitKind::Engineer, Coord::new(7, 4)));
        board
            .pieces
            .push(Unit::new(4, UnitKind::Engineer, Coord::new(3, 4)));
        let behavior = AiBehavior::RAIDER;
        let raider = board.hostile(1).unwrap();
        assert_eq!(acquire_target(&board, raider, &behavior), Some(4));
    }

    #[test]
    fn test_stealthy_only_detected_adjacent() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Scout, Coord::new(7, 4)));
        let behavior = AiBehavior::RAIDER;
        assert_eq!(acquire_target(&board, board.hostile(1).unwrap(), &behavior), None);

        board.pieces[0].place(Coord::new(6, 4));
        assert_eq!(
            acquire_target(&board, board.hostile(1).unwrap(), &behavior),
            Some(2)
        );
    }

    #[test]
    fn test_sticky_target_kept_over_nearer() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Engineer, Coord::new(8, 4)));
        board
            .pieces
            .push(Unit::new(3, UnitKind::Engineer, Coord::new(4, 4)));
        board.hostile_mut(1).unwrap().aggro_target = Some(2);
        let behavior = AiBehavior::RAIDER;
        assert_eq!(
            acquire_target(&board, board.hostile(1).unwrap(), &behavior),
            Some(2)
        );
    }

    #[test]
    fn test_failed_roll_holds_position() {
        let mut board = create_arena();
        let start = Coord::new(5, 4);
        board
            .hostile_pieces
            .push(Unit::raider(1, start, Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Engineer, Coord::new(7, 4)));
        if let Some(behavior) = board.hostile_mut(1).unwrap().ai_behavior.as_mut() {
            behavior.aggression_level = 0.0;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        run_hostiles(&mut board, &quiet_rules(), &mut rng);
        let raider = board.hostile(1).unwrap();
        assert_eq!(raider.position(), start);
        assert!(!raider.aggro);
        assert_eq!(raider.aggro_target, Some(2));
    }

    #[test]
    fn test_patrol_stays_on_leash() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(11, 10), Some(FORTRESS)));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            run_hostiles(&mut board, &quiet_rules(), &mut rng);
            let at = board.hostile(1).unwrap().position();
            assert!(at.distance(FORTRESS) <= AiBehavior::RAIDER.patrol_radius);
            assert_ne!(at, FORTRESS);
        }
    }

    #[test]
    fn test_pack_widens_leash() {
        let mut board = create_arena();
        let starts = [
            (1, Coord::new(11, 10)),
            (2, Coord::new(9, 10)),
            (3, Coord::new(10, 9)),
        ];
        for (id, at) in starts {
            board
                .hostile_pieces
                .push(Unit::raider(id, at, Some(FORTRESS)));
        }
        let leash = AiBehavior::RAIDER.patrol_radius + 2;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut farthest = 0;
        for _ in 0..300 {
            run_hostiles(&mut board, &quiet_rules(), &mut rng);
            for raider in &board.hostile_pieces {
                let distance = raider.position().distance(FORTRESS);
                assert!(distance <= leash, "raider {} at {distance}", raider.id);
                farthest = farthest.max(distance);
            }
        }
        assert_eq!(farthest, leash);
    }

    #[test]
    fn test_orphan_patrols_freely() {
        let mut board = create_arena();
        board.map.get_mut(FORTRESS).unwrap().clear_building();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(11, 10), Some(FORTRESS)));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut farthest = 0;
        for _ in 0..200 {
            run_hostiles(&mut board, &quiet_rules(), &mut rng);
            farthest = farthest.max(board.hostile(1).unwrap().position().distance(FORTRESS));
        }
        assert!(farthest > AiBehavior::RAIDER.patrol_radius);
    }

    #[test]
    fn test_spawn_respects_pack_cap() {
        let mut board = create_arena();
        let rules = RulesConfig {
            spawn_chance: 1.0,
            max_pack_size: 2,
            ..RulesConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..5 {
            run_hostiles(&mut board, &rules, &mut rng);
        }
        assert_eq!(board.pack_of(FORTRESS).count(), 2);
        assert!(
            board
                .hostile_pieces
                .iter()
                .all(|u| u.home_fortress == Some(FORTRESS))
        );
    }

    #[test]
    fn test_strike_kills_and_calms() {
        let mut board = create_arena();
        board
            .hostile_pieces
            .push(Unit::raider(1, Coord::new(5, 4), Some(FORTRESS)));
        board
            .pieces
            .push(Unit::new(2, UnitKind::Drone, Coord::new(6, 4)));
        board.pieces[0].stats.current_health = 1;
        always_aggressive(&mut board, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let report = run_hostiles(&mut board, &quiet_rules(), &mut rng);
        assert_eq!(report.killed, vec![2]);
        assert!(board.pieces.is_empty());
        assert!(!board.hostile(1).unwrap().aggro);
    }
}
