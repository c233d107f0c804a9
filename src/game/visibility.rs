//! Fog of war: line of sight, discovery, and remembered terrain.
//!
//! Visibility is recomputed in full after every mutation batch. Discovery is
//! sticky; `visible` and `semi_fogged` are rebuilt from scratch each time.

use crate::game::{Board, Map, Unit};
use crate::hex::{self, Coord};

/// A point that grants vision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionSource {
    /// Where the viewer stands.
    pub origin: Coord,
    /// Vision radius.
    pub range: u32,
}

/// Counts from one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilitySummary {
    /// Tiles visible now.
    pub visible: usize,
    /// Tiles discovered for the first time.
    pub newly_discovered: usize,
}

/// Every friendly unit plus every friendly structure that grants vision.
#[must_use]
pub fn vision_sources(board: &Board) -> Vec<VisionSource> {
    let units = board.pieces.iter().map(|u| VisionSource {
        origin: u.position(),
        range: u.vision,
    });

    let structures = board.map.iter().filter_map(|tile| {
        let kind = tile.building.filter(|k| !k.is_hostile())?;
        let base = kind.vision()?;
        let bonus: u32 = tile.upgrades.iter().map(|u| u.spec().vision_bonus).sum();
        Some(VisionSource {
            origin: tile.coord(),
            range: base + bonus,
        })
    });

    units.chain(structures).collect()
}

/// Walk the line from `from` toward `toward` and report whether it reaches
/// `target` before any sight-blocking cell.
///
/// The viewer's own cell never blocks, and `target` itself never blocks.
fn ray_reaches(map: &Map, from: Coord, toward: Coord, target: Coord) -> bool {
    for cell in hex::line(from, toward).into_iter().skip(1) {
        if cell == target {
            return true;
        }
        if map.get(cell).is_some_and(|t| t.terrain.blocks_vision()) {
            return false;
        }
    }
    false
}

/// Whether `target` can be seen from `from`.
///
/// The direct ray is tried first. Rays toward each neighbor of the target
/// also count when they pass through the target unobstructed, which avoids
/// false negatives where the direct ray grazes a hex corner.
#[must_use]
pub fn has_line_of_sight(map: &Map, from: Coord, target: Coord) -> bool {
    if from == target {
        return true;
    }
    if ray_reaches(map, from, target, target) {
        return true;
    }
    target
        .neighbors()
        .into_iter()
        .filter(|&n| n != from)
        .any(|n| ray_reaches(map, from, n, target))
}

/// Tiles visible from a single source, as map indices.
fn visible_from(map: &Map, source: VisionSource) -> Vec<usize> {
    source
        .origin
        .within(source.range)
        .into_iter()
        .filter_map(|coord| map.index(coord).map(|idx| (coord, idx)))
        .filter(|&(coord, _)| has_line_of_sight(map, source.origin, coord))
        .map(|(_, idx)| idx)
        .collect()
}

/// Recompute `visible`, `discovered`, and `semi_fogged` for every tile.
pub fn recompute(board: &mut Board) -> VisibilitySummary {
    let mut seen = vec![false; board.map.tiles().len()];
    for source in vision_sources(board) {
        for idx in visible_from(&board.map, source) {
            seen[idx] = true;
        }
    }

    let mut summary = VisibilitySummary::default();
    for (tile, &visible) in board.map.tiles_mut().iter_mut().zip(&seen) {
        if visible && !tile.discovered {
            summary.newly_discovered += 1;
        }
        tile.visible = visible;
        tile.discovered |= visible;
        tile.semi_fogged = tile.discovered && tile.building.is_none() && !visible;
        if visible {
            summary.visible += 1;
        }
    }

    tracing::trace!(
        visible = summary.visible,
        newly_discovered = summary.newly_discovered,
        "visibility recomputed"
    );
    summary
}

/// Hostile units standing on currently visible tiles.
///
/// Units under fog are hidden from the player even though the tile itself
/// may be remembered.
#[must_use]
pub fn visible_hostiles(board: &Board) -> Vec<&Unit> {
    board
        .hostile_pieces
        .iter()
        .filter(|u| board.map.get(u.position()).is_some_and(|t| t.visible))
        .collect()
}
