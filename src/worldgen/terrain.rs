//! Terrain shaping: noise fields, biomes, lakes, impassable cores.

// Noise seeds are folded from the 64-bit board seed.
#![allow(clippy::cast_possible_truncation)]

use std::collections::VecDeque;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::WorldConfig;
use crate::game::{Map, Terrain};
use crate::hex::Coord;

/// Biome sample below which lowland is plains.
const PLAINS_BELOW: f64 = 0.45;

/// Biome sample below which lowland is grassland; forest above.
const GRASSLAND_BELOW: f64 = 0.7;

/// Height given to impassable mountains.
pub const IMPASSABLE_HEIGHT: u8 = 5;

/// Salt separating the biome field from the elevation field.
const BIOME_SALT: u32 = 0x9e37_79b9;

fn noise_seed(seed: u64, salt: u32) -> u32 {
    ((seed ^ (seed >> 32)) as u32).wrapping_add(salt)
}

/// Map an Fbm sample from roughly `[-1, 1]` onto `[0, 1]`.
fn normalize(sample: f64) -> f64 {
    ((sample + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Elevation band 1-4 of a normalized elevation sample.
fn band(elevation: f64, edges: &[f64; 3]) -> u8 {
    1 + edges.iter().filter(|&&edge| elevation >= edge).count() as u8
}

/// Terrain for an elevation band and a normalized biome sample.
#[must_use]
pub fn classify(band: u8, biome: f64) -> Terrain {
    match band {
        0 | 1 => Terrain::Water,
        2 | 3 => {
            if biome < PLAINS_BELOW {
                Terrain::Plains
            } else if biome < GRASSLAND_BELOW {
                Terrain::Grassland
            } else {
                Terrain::Forest
            }
        }
        _ => Terrain::Mountain,
    }
}

/// Assign terrain and height to every tile from two seeded noise fields.
///
/// Fields are sampled at rendered tile centers so odd-row offsets line up.
pub fn shape(map: &mut Map, world: &WorldConfig, seed: u64) {
    let elevation: Fbm<Perlin> = Fbm::new(noise_seed(seed, 0))
        .set_frequency(world.elevation_frequency)
        .set_octaves(world.octaves);
    let biome: Fbm<Perlin> = Fbm::new(noise_seed(seed, BIOME_SALT))
        .set_frequency(world.biome_frequency)
        .set_octaves(world.octaves);

    for tile in map.tiles_mut() {
        let (x, y) = tile.coord().pixel(1.0);
        let height = band(normalize(elevation.get([x, y])), &world.band_edges);
        tile.terrain = classify(height, normalize(biome.get([x, y])));
        tile.height = height;
    }
}

/// Connected regions of water and lake tiles.
fn water_regions(map: &Map) -> Vec<Vec<Coord>> {
    let mut seen = vec![false; map.tiles().len()];
    let mut regions = Vec::new();

    for start in map.coords() {
        let Some(idx) = map.index(start) else {
            continue;
        };
        if seen[idx] || !map.terrain(start).is_some_and(Terrain::is_water) {
            continue;
        }
        seen[idx] = true;

        let mut region = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(at) = queue.pop_front() {
            region.push(at);
            for n in map.neighbors(at) {
                if let Some(n_idx) = map.index(n)
                    && !seen[n_idx]
                    && map.terrain(n).is_some_and(Terrain::is_water)
                {
                    seen[n_idx] = true;
                    queue.push_back(n);
                }
            }
        }
        regions.push(region);
    }
    regions
}

/// Water tiles in regions that never touch the grid border.
#[must_use]
pub fn landlocked_water(map: &Map) -> Vec<Coord> {
    water_regions(map)
        .into_iter()
        .filter(|region| !region.iter().any(|&at| map.is_border(at)))
        .flatten()
        .filter(|&at| map.terrain(at) == Some(Terrain::Water))
        .collect()
}

/// Turn landlocked water into lake. Returns the number of tiles changed.
pub fn mark_lakes(map: &mut Map) -> usize {
    let landlocked = landlocked_water(map);
    for &at in &landlocked {
        if let Some(tile) = map.get_mut(at) {
            tile.terrain = Terrain::Lake;
        }
    }
    landlocked.len()
}

/// Promote mountains whose six neighbors are all mountains.
///
/// Border tiles have fewer than six neighbors on the grid and are never
/// promoted. Returns the number of tiles promoted.
pub fn promote_impassable(map: &mut Map) -> usize {
    let enclosed: Vec<Coord> = map
        .iter()
        .filter(|t| t.terrain == Terrain::Mountain && !map.is_border(t.coord()))
        .map(|t| t.coord())
        .filter(|&at| {
            map.neighbors(at)
                .all(|n| map.terrain(n).is_some_and(Terrain::is_mountain))
        })
        .collect();

    for &at in &enclosed {
        if let Some(tile) = map.get_mut(at) {
            tile.terrain = Terrain::ImpassableMountain;
            tile.height = IMPASSABLE_HEIGHT;
        }
    }
    enclosed.len()
}
