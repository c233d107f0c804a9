//! River carving.
//!
//! Rivers start on band-4 mountains and walk downhill toward the nearest
//! water. A river never steps onto a higher tile, ends on reaching water,
//! and may end early in a new lake once it has run long enough.

use std::collections::HashSet;

use rand::Rng;

use crate::config::WorldConfig;
use crate::game::{Map, Terrain};
use crate::hex::Coord;

/// Height of mountains that can source a river.
const SOURCE_HEIGHT: u8 = 4;

/// Carve rivers across the map and return their paths, source first.
///
/// Every band-4 mountain rolls once, in map order, to become a source.
/// Walks that cannot leave their source are dropped.
pub fn carve_rivers<R: Rng>(map: &mut Map, world: &WorldConfig, rng: &mut R) -> Vec<Vec<Coord>> {
    let mut water = map.water_tiles();
    let sources: Vec<Coord> = map
        .iter()
        .filter(|t| t.terrain == Terrain::Mountain && t.height == SOURCE_HEIGHT)
        .map(|t| t.coord())
        .collect();

    let mut paths = Vec::new();
    for source in sources {
        if rng.gen_range(0.0..1.0) >= world.river_source_chance {
            continue;
        }
        let path = trace(map, world, source, &mut water, rng);
        if path.len() > 1 {
            tracing::trace!(%source, len = path.len(), "river carved");
            paths.push(path);
        }
    }
    paths
}

/// Squared pixel distance from a tile to the nearest water tile.
fn water_distance_sq(at: Coord, spacing: f64, water: &[Coord]) -> f64 {
    water
        .iter()
        .map(|&w| at.pixel_distance_sq(w, spacing))
        .fold(f64::INFINITY, f64::min)
}

/// Chance of ending in a lake at `step`: rises linearly from the decay
/// start and reaches 1 on the last step.
fn lake_chance(step: u32, world: &WorldConfig) -> f64 {
    if step < world.river_decay_start {
        return 0.0;
    }
    let span = world
        .river_max_steps
        .saturating_sub(world.river_decay_start)
        .saturating_add(1);
    f64::from(step - world.river_decay_start + 1) / f64::from(span)
}

fn trace<R: Rng>(
    map: &mut Map,
    world: &WorldConfig,
    source: Coord,
    water: &mut Vec<Coord>,
    rng: &mut R,
) -> Vec<Coord> {
    let mut path = vec![source];
    let mut visited = HashSet::from([source]);
    let mut current = source;
    if let Some(tile) = map.get_mut(source) {
        tile.river_present = true;
    }

    for step in 1..=world.river_max_steps {
        let Some(height) = map.get(current).map(|t| t.height) else {
            break;
        };
        let candidates: Vec<(Coord, u8)> = map
            .neighbors(current)
            .filter(|n| !visited.contains(n))
            .filter_map(|n| map.get(n).map(|t| (n, t.height)))
            .filter(|&(_, h)| h <= height)
            .collect();
        let downhill = candidates.iter().any(|&(_, h)| h < height);

        let next = candidates
            .into_iter()
            .filter(|&(_, h)| !downhill || h < height)
            .map(|(n, _)| (n, water_distance_sq(n, world.spacing, water)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(n, _)| n);
        let Some(next) = next else {
            break;
        };

        visited.insert(next);
        path.push(next);
        current = next;

        let rims_core = map
            .neighbors(next)
            .any(|n| map.terrain(n) == Some(Terrain::ImpassableMountain));
        let Some(tile) = map.get_mut(next) else {
            break;
        };
        if tile.terrain.is_water() {
            break;
        }
        tile.river_present = true;

        if rng.gen_range(0.0..1.0) < lake_chance(step, world) {
            // The rim of an impassable core stays mountain.
            if !rims_core && tile.terrain != Terrain::ImpassableMountain {
                tile.terrain = Terrain::Lake;
                water.push(next);
            }
            break;
        }
    }
    path
}
