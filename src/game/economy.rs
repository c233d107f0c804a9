//! Economy: per-turn production and upkeep.
//!
//! # Production
//!
//! - Shelters yield a fixed amount regardless of terrain.
//! - Extractors yield by the terrain they stand on.
//! - Each completed upgrade adds its bonus to the shelter's yield.
//!
//! # Upkeep
//!
//! Every friendly unit and every completed upgrade charges upkeep.
//!
//! The net delta is added to the stockpile without a floor. A stockpile
//! that goes negative stays negative until production catches up.

use crate::config::RulesConfig;
use crate::game::{Board, Resources};

/// Resource change for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceDelta {
    /// Gross production.
    pub production: Resources,
    /// Gross upkeep.
    pub upkeep: Resources,
    /// `production - upkeep`.
    pub net: Resources,
}

/// Total production of friendly structures.
#[must_use]
pub fn production(board: &Board) -> Resources {
    board
        .map
        .iter()
        .filter_map(|tile| {
            let kind = tile.building.filter(|k| !k.is_hostile())?;
            let base = kind.production(tile.terrain);
            let bonus: Resources = tile.upgrades.iter().map(|u| u.spec().bonus).sum();
            Some(base + bonus)
        })
        .sum()
}

/// Total upkeep of friendly units and completed upgrades.
#[must_use]
pub fn upkeep(board: &Board) -> Resources {
    let units: Resources = board.pieces.iter().map(|u| u.kind.profile().upkeep).sum();
    let upgrades: Resources = board
        .map
        .iter()
        .flat_map(|tile| tile.upgrades.iter())
        .map(|u| u.spec().upkeep)
        .sum();
    units + upgrades
}

/// Calculate the resource delta for the current board.
#[must_use]
pub fn calculate_delta(board: &Board) -> ResourceDelta {
    let production = production(board);
    let upkeep = upkeep(board);
    ResourceDelta {
        production,
        upkeep,
        net: production - upkeep,
    }
}

/// Add a delta to the stockpile and return the new totals.
pub fn apply_delta(board: &mut Board, delta: &ResourceDelta) -> Resources {
    board.resources += delta.net;
    if board.resources.any_negative() {
        tracing::warn!(
            turn = board.turn,
            resources = %board.resources,
            "stockpile went negative"
        );
    }
    board.resources
}

/// Number of outposts the colony may hold.
#[must_use]
pub fn outpost_cap(board: &Board, rules: &RulesConfig) -> usize {
    board
        .map
        .count_buildings(crate::game::BuildingKind::Shelter)
        .saturating_mul(rules.outposts_per_shelter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BuildingKind, Map, Terrain, Unit, UnitKind, UpgradeKind};
    use crate::hex::Coord;

    fn create_colony() -> Board {
        let mut board = Board::new(Map::new(8, 8).unwrap(), 3);
        let shelter = Coord::new(3, 3);
        board
            .map
            .get_mut(shelter)
            .unwrap()
            .place_building(BuildingKind::Shelter);
        let forest = Coord::new(4, 3);
        let tile = board.map.get_mut(forest).unwrap();
        tile.terrain = Terrain::Forest;
        tile.place_building(BuildingKind::Extractor);
        board
            .pieces
            .push(Unit::new(1, UnitKind::Engineer, shelter));
        board
    }

    #[test]
    fn test_production_sums_structures() {
        let board = create_colony();
        assert_eq!(production(&board), Resources::new(2, 4, 0));
    }

    #[test]
    fn test_fortress_produces_nothing() {
        let mut board = create_colony();
        board
            .map
            .get_mut(Coord::new(6, 6))
            .unwrap()
            .place_building(BuildingKind::Fortress);
        assert_eq!(production(&board), Resources::new(2, 4, 0));
    }

    #[test]
    fn test_completed_upgrade_adds_bonus_and_upkeep() {
        let mut board = create_colony();
        board
            .map
            .get_mut(Coord::new(3, 3))
            .unwrap()
            .upgrades
            .push(UpgradeKind::Hydroponics);
        let delta = calculate_delta(&board);
        assert_eq!(delta.production, Resources::new(5, 4, 0));
        assert_eq!(delta.upkeep, Resources::new(1, 1, 0));
        assert_eq!(delta.net, Resources::new(4, 3, 0));
    }

    #[test]
    fn test_negative_stockpile_not_clamped() {
        let mut board = create_colony();
        board.resources = Resources::new(0, 0, 0);
        let delta = ResourceDelta {
            net: Resources::new(-3, 1, 0),
            ..ResourceDelta::default()
        };
        assert_eq!(apply_delta(&mut board, &delta), Resources::new(-3, 1, 0));
    }

    #[test]
    fn test_outpost_cap_scales_with_shelters() {
        let mut board = create_colony();
        let rules = RulesConfig::default();
        assert_eq!(outpost_cap(&board, &rules), 3);
        board
            .map
            .get_mut(Coord::new(1, 1))
            .unwrap()
            .place_building(BuildingKind::Shelter);
        assert_eq!(outpost_cap(&board, &rules), 6);
    }
}
