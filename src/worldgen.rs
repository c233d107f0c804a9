//! Deterministic world generation.
//!
//! A board is a pure function of `(WorldConfig, RulesConfig, seed)`:
//!
//! 1. Terrain from two fractal noise fields (elevation, biome)
//! 2. Landlocked water becomes lake
//! 3. Fully enclosed mountains become impassable
//! 4. Rivers run downhill from a few mountain sources
//! 5. Colony start, hostile fortress, and neutral camps are placed
//! 6. Visibility is computed once for the starting units

mod placement;
mod rivers;
mod terrain;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{RulesConfig, WorldConfig};
use crate::error::GenError;
use crate::game::{Board, Map, visibility};

pub use placement::{Placement, populate};
pub use rivers::carve_rivers;
pub use terrain::{classify, landlocked_water, mark_lakes, promote_impassable, shape};

/// Generate a new board.
///
/// # Errors
///
/// Returns [`GenError::InvalidDimensions`] if either dimension is zero.
pub fn generate(world: &WorldConfig, rules: &RulesConfig, seed: u64) -> Result<Board, GenError> {
    let span = tracing::info_span!("generate", seed, cols = world.cols, rows = world.rows);
    let _enter = span.enter();

    let mut map = Map::new(world.cols, world.rows).ok_or(GenError::InvalidDimensions {
        cols: world.cols,
        rows: world.rows,
    })?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    shape(&mut map, world, seed);
    let lakes = mark_lakes(&mut map);
    let impassable = promote_impassable(&mut map);
    let river_paths = carve_rivers(&mut map, world, &mut rng);
    tracing::debug!(lakes, impassable, rivers = river_paths.len(), "terrain ready");

    let mut board = Board::new(map, seed);
    board.spacing = world.spacing;
    board.river_paths = river_paths;
    board.resources = rules.starting_resources;

    let placement = populate(&mut board, world, &mut rng);
    visibility::recompute(&mut board);

    tracing::info!(
        start = ?placement.start,
        fortress = ?placement.fortress,
        units = board.pieces.len(),
        raiders = board.hostile_pieces.len(),
        drifters = board.neutral_pieces.len(),
        "world generated"
    );
    Ok(board)
}
