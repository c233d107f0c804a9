//! Initial placement of the colony, the hostile fortress, and neutral camps.
//!
//! Shortfalls degrade the board instead of failing: a map with no room for a
//! fortress simply has none.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::WorldConfig;
use crate::game::{Board, BuildingKind, Map, Unit, UnitKind, can_enter};
use crate::hex::Coord;

/// Where the key sites ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Colony shelter.
    pub start: Option<Coord>,
    /// Hostile fortress.
    pub fortress: Option<Coord>,
}

/// Place the colony, fortress, garrison, and neutral camps.
pub fn populate<R: Rng>(board: &mut Board, world: &WorldConfig, rng: &mut R) -> Placement {
    let Some(start) = find_start(&board.map) else {
        tracing::warn!("no lowland tile for the colony; board has no units");
        return Placement::default();
    };
    found_colony(board, start);

    let fortress = find_fortress_site(board, start, world.min_fortress_distance);
    match fortress {
        Some(site) => {
            if let Some(tile) = board.map.get_mut(site) {
                tile.place_building(BuildingKind::Fortress);
            }
            garrison(board, site, world.initial_raiders, rng);
        }
        None => tracing::warn!(
            min_distance = world.min_fortress_distance,
            "no fortress site far enough from the colony"
        ),
    }

    place_drifters(board, start, world, rng);
    Placement {
        start: Some(start),
        fortress,
    }
}

/// Lowland tile nearest the grid center; ties by coordinate.
fn find_start(map: &Map) -> Option<Coord> {
    let center = Coord::new(i32::from(map.cols()) / 2, i32::from(map.rows()) / 2);
    map.iter()
        .filter(|t| t.terrain.is_lowland())
        .map(|t| t.coord())
        .min_by_key(|&at| (at.distance(center), at))
}

/// Shelter and engineer on the start; scout and ranger on free neighbors.
fn found_colony(board: &mut Board, start: Coord) {
    if let Some(tile) = board.map.get_mut(start) {
        tile.place_building(BuildingKind::Shelter);
    }
    let id = board.next_unit_id();
    board.pieces.push(Unit::new(id, UnitKind::Engineer, start));

    for kind in [UnitKind::Scout, UnitKind::Ranger] {
        let abilities = kind.profile().abilities;
        let spot = board
            .map
            .neighbors(start)
            .find(|&n| board.is_vacant(n) && can_enter(&abilities, &board.map, n));
        match spot {
            Some(at) => {
                let id = board.next_unit_id();
                board.pieces.push(Unit::new(id, kind, at));
            }
            None => tracing::warn!(%kind, %start, "no room for starting unit"),
        }
    }
}

/// Farthest fortress-capable tile at least `min_distance` from the start.
fn find_fortress_site(board: &Board, start: Coord, min_distance: u32) -> Option<Coord> {
    board
        .map
        .iter()
        .filter(|t| BuildingKind::Fortress.allowed_on(t.terrain))
        .map(|t| t.coord())
        .filter(|&at| board.is_vacant(at))
        .map(|at| (start.distance(at), at))
        .filter(|&(distance, _)| distance >= min_distance)
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, at)| at)
}

/// Raiders on random free neighbors of the fortress.
fn garrison<R: Rng>(board: &mut Board, fortress: Coord, count: usize, rng: &mut R) {
    let abilities = UnitKind::Raider.profile().abilities;
    let mut spots: Vec<Coord> = board
        .map
        .neighbors(fortress)
        .filter(|&n| board.is_vacant(n) && can_enter(&abilities, &board.map, n))
        .collect();
    spots.shuffle(rng);

    for at in spots.into_iter().take(count) {
        let id = board.next_unit_id();
        board
            .hostile_pieces
            .push(Unit::raider(id, at, Some(fortress)));
    }
}

/// Up to `neutral_sites` drifters on random free lowland away from the start.
fn place_drifters<R: Rng>(board: &mut Board, start: Coord, world: &WorldConfig, rng: &mut R) {
    let mut spots: Vec<Coord> = board
        .map
        .iter()
        .filter(|t| t.terrain.is_lowland())
        .map(|t| t.coord())
        .filter(|&at| start.distance(at) >= world.neutral_min_distance && board.is_vacant(at))
        .collect();
    spots.shuffle(rng);

    let placed = spots.len().min(world.neutral_sites);
    if placed < world.neutral_sites {
        tracing::warn!(
            placed,
            wanted = world.neutral_sites,
            "not enough room for neutral camps"
        );
    }
    for at in spots.into_iter().take(placed) {
        let id = board.next_unit_id();
        board
            .neutral_pieces
            .push(Unit::new(id, UnitKind::Drifter, at));
    }
}
