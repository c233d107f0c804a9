//! End-to-end scenarios for the colony rules.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use frontier::game::{
    Action, ActionOutcome, AttackTarget, Board, BuildingKind, Map, PlayerHandle, Resources,
    Unit, UnitKind, UpgradeKind, end_turn, run_hostiles, visibility,
};
use frontier::hex::Coord;
use frontier::{ActionError, RulesConfig, WorldConfig, worldgen};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn player() -> PlayerHandle {
    PlayerHandle::new("scenario")
}

fn open_board() -> Board {
    Board::new(Map::new(10, 10).unwrap(), 11)
}

#[test]
fn test_seeded_generation_reproduces_layout() {
    let world = WorldConfig {
        cols: 10,
        rows: 10,
        ..WorldConfig::default()
    };
    let rules = RulesConfig::default();
    let a = worldgen::generate(&world, &rules, 77).unwrap();
    let b = worldgen::generate(&world, &rules, 77).unwrap();
    assert_eq!(a.map, b.map);
    assert_eq!(a.river_paths, b.river_paths);
    assert_eq!(a, b);
}

#[test]
fn test_raider_detection_range() {
    let raider_at = Coord::new(2, 5);
    let rules = RulesConfig {
        spawn_chance: 0.0,
        ..RulesConfig::default()
    };

    for (friendly_at, expect_aggro) in [(Coord::new(4, 5), true), (Coord::new(6, 5), false)] {
        let mut board = open_board();
        board
            .pieces
            .push(Unit::new(1, UnitKind::Engineer, friendly_at));
        let mut raider = Unit::raider(2, raider_at, None);
        raider.ai_behavior.as_mut().unwrap().detection_range = 3;
        board.hostile_pieces.push(raider);
        assert_eq!(
            raider_at.distance(friendly_at),
            if expect_aggro { 2 } else { 4 }
        );

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        run_hostiles(&mut board, &rules, &mut rng);
        let target = board.hostile(2).unwrap().aggro_target;
        if expect_aggro {
            assert_eq!(target, Some(1));
        } else {
            assert_eq!(target, None);
        }
    }
}

#[test]
fn test_weak_attack_deals_minimum_damage() {
    let mut board = open_board();
    let engineer_at = Coord::new(3, 3);
    let raider_at = Coord::new(4, 3);
    board
        .pieces
        .push(Unit::new(1, UnitKind::Engineer, engineer_at));
    let mut raider = Unit::raider(2, raider_at, None);
    raider.stats.defense = 4;
    board.hostile_pieces.push(raider);
    visibility::recompute(&mut board);
    assert_eq!(board.piece(1).unwrap().stats.attack, 1);

    let health_before = board.hostile(2).unwrap().stats.current_health;
    let rules = RulesConfig::default();
    let outcome = frontier::game::apply(
        &mut board,
        &rules,
        &player(),
        Action::Attack {
            unit: 1,
            target: AttackTarget::Unit(2),
        },
    )
    .unwrap();
    let ActionOutcome::Attacked(hit) = outcome else {
        panic!("expected an attack outcome, got {outcome:?}");
    };
    assert_eq!(hit.damage, 1);
    assert_eq!(
        board.hostile(2).unwrap().stats.current_health,
        health_before - 1
    );

    // Same attacker, same turn.
    let again = frontier::game::apply(
        &mut board,
        &rules,
        &player(),
        Action::Attack {
            unit: 1,
            target: AttackTarget::Unit(2),
        },
    );
    assert_eq!(again, Err(ActionError::AlreadyAttacked(1)));
}

#[test]
fn test_upgrade_completes_three_turns_later() {
    let mut board = open_board();
    let shelter = Coord::new(5, 5);
    board
        .map
        .get_mut(shelter)
        .unwrap()
        .place_building(BuildingKind::Shelter);
    board
        .pieces
        .push(Unit::new(1, UnitKind::Engineer, shelter));
    board.resources = Resources::new(100, 100, 100);
    board.turn = 5;
    let rules = RulesConfig::default();
    assert_eq!(UpgradeKind::Hydroponics.spec().duration, 3);

    frontier::game::apply(
        &mut board,
        &rules,
        &player(),
        Action::StartUpgrade {
            at: shelter,
            kind: UpgradeKind::Hydroponics,
        },
    )
    .unwrap();

    for expected_turn in [6, 7] {
        let report = end_turn(&mut board, &rules, &player());
        assert_eq!(report.turn, expected_turn);
        assert!(report.completed_upgrades.is_empty());
        assert!(!board.map.get(shelter).unwrap().has_upgrade(UpgradeKind::Hydroponics));
    }

    let report = end_turn(&mut board, &rules, &player());
    assert_eq!(report.turn, 8);
    assert_eq!(report.completed_upgrades.len(), 1);
    assert!(board.map.get(shelter).unwrap().has_upgrade(UpgradeKind::Hydroponics));
}

#[test]
fn test_colony_survives_a_generated_game() {
    let rules = RulesConfig::default();
    let mut board = worldgen::generate(&WorldConfig::default(), &rules, 9).unwrap();
    let start_turn = board.turn;
    for _ in 0..20 {
        end_turn(&mut board, &rules, &player());
        assert!(frontier::game::check_invariants(&board).is_empty());
    }
    assert_eq!(board.turn, start_turn + 20);
    assert!(board.hostile_pieces.len() <= board.fortresses().len() * rules.max_pack_size + 2);
}
