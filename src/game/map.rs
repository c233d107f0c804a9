//! Map and tile types.

use serde::{Deserialize, Serialize};

use crate::game::{BuildingKind, Stats, UpgradeInProgress, UpgradeKind};
use crate::hex::Coord;

/// Type of terrain on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    /// Open water connected to the board edge.
    Water,
    /// Landlocked water.
    Lake,
    /// Flat open land.
    Plains,
    /// Fertile land.
    Grassland,
    /// Wooded land.
    Forest,
    /// High ground; blocks sight.
    Mountain,
    /// Mountain interior; blocks sight, closed to everything but flyers.
    ImpassableMountain,
}

impl Terrain {
    /// Water or lake.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Water | Self::Lake)
    }

    /// Plains, grassland, or forest.
    #[must_use]
    pub const fn is_lowland(self) -> bool {
        matches!(self, Self::Plains | Self::Grassland | Self::Forest)
    }

    /// Anything that is not water.
    #[must_use]
    pub const fn is_land(self) -> bool {
        !self.is_water()
    }

    /// Mountain or impassable mountain.
    #[must_use]
    pub const fn is_mountain(self) -> bool {
        matches!(self, Self::Mountain | Self::ImpassableMountain)
    }

    /// Terrain that stops line of sight.
    #[must_use]
    pub const fn blocks_vision(self) -> bool {
        self.is_mountain()
    }

    /// Single-character symbol for text dumps.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Water => '~',
            Self::Lake => 'o',
            Self::Plains => '.',
            Self::Grassland => ',',
            Self::Forest => 'f',
            Self::Mountain => '^',
            Self::ImpassableMountain => 'A',
        }
    }
}

/// A single tile on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Column.
    pub q: i32,
    /// Row.
    pub r: i32,
    /// Terrain.
    #[serde(rename = "type")]
    pub terrain: Terrain,
    /// Elevation band 1-5, also the render height.
    pub height: u8,
    /// Seen at least once. Never reverts.
    #[serde(default)]
    pub discovered: bool,
    /// Seen by a vision source right now.
    #[serde(default)]
    pub visible: bool,
    /// Discovered, no building, not currently visible.
    #[serde(default)]
    pub semi_fogged: bool,
    /// A river runs through the tile.
    #[serde(default)]
    pub river_present: bool,
    /// Structure on the tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingKind>,
    /// Stats of the structure. Present exactly when `building` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    /// Upgrade under construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_in_progress: Option<UpgradeInProgress>,
    /// Completed upgrades, in completion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upgrades: Vec<UpgradeKind>,
}

impl Tile {
    /// Create an undiscovered tile with no structure.
    #[must_use]
    pub const fn new(coord: Coord, terrain: Terrain, height: u8) -> Self {
        Self {
            q: coord.q,
            r: coord.r,
            terrain,
            height,
            discovered: false,
            visible: false,
            semi_fogged: false,
            river_present: false,
            building: None,
            stats: None,
            upgrade_in_progress: None,
            upgrades: Vec::new(),
        }
    }

    /// Coordinate of this tile.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.q, self.r)
    }

    /// Place a structure with fresh catalog stats.
    pub fn place_building(&mut self, kind: BuildingKind) {
        self.building = Some(kind);
        self.stats = Some(kind.stats());
    }

    /// Remove the structure and everything attached to it.
    pub fn clear_building(&mut self) {
        self.building = None;
        self.stats = None;
        self.upgrade_in_progress = None;
        self.upgrades.clear();
    }

    /// Whether the tile carries the given structure.
    #[must_use]
    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.building == Some(kind)
    }

    /// Whether a completed upgrade of this kind is present.
    #[must_use]
    pub fn has_upgrade(&self, kind: UpgradeKind) -> bool {
        self.upgrades.contains(&kind)
    }
}

/// The game map: a fixed `cols × rows` grid in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Width of the map in tiles.
    cols: u16,
    /// Height of the map in tiles.
    rows: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a new map filled with plains at height 2.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Option<Self> {
        if cols == 0 || rows == 0 {
            return None;
        }

        let tiles = (0..i32::from(rows))
            .flat_map(|r| (0..i32::from(cols)).map(move |q| Coord::new(q, r)))
            .map(|coord| Tile::new(coord, Terrain::Plains, 2))
            .collect();

        Some(Self { cols, rows, tiles })
    }

    /// Rebuild a map from tiles in any order.
    ///
    /// Returns the tile vector back if it is not exactly one tile per
    /// in-bounds coordinate.
    pub(crate) fn from_tiles(cols: u16, rows: u16, tiles: Vec<Tile>) -> Result<Self, Vec<Tile>> {
        let Some(mut map) = Self::new(cols, rows) else {
            return Err(tiles);
        };
        if tiles.len() != map.tiles.len() {
            return Err(tiles);
        }

        let mut seen = vec![false; map.tiles.len()];
        let unique = tiles.iter().all(|tile| match map.index(tile.coord()) {
            Some(idx) if !seen[idx] => {
                seen[idx] = true;
                true
            }
            _ => false,
        });
        if !unique {
            return Err(tiles);
        }

        for tile in tiles {
            if let Some(idx) = map.index(tile.coord()) {
                map.tiles[idx] = tile;
            }
        }
        Ok(map)
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Get a reference to the raw tiles slice for efficient iteration.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Get a mutable reference to the raw tiles slice.
    #[must_use]
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        (0..i32::from(self.cols)).contains(&coord.q) && (0..i32::from(self.rows)).contains(&coord.r)
    }

    /// Convert a coordinate to an index into the tiles array.
    #[must_use]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            let q = usize::try_from(coord.q).ok()?;
            let r = usize::try_from(coord.r).ok()?;
            Some(r * usize::from(self.cols) + q)
        } else {
            None
        }
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.index(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Terrain at a coordinate, if in bounds.
    #[must_use]
    pub fn terrain(&self, coord: Coord) -> Option<Terrain> {
        self.get(coord).map(|t| t.terrain)
    }

    /// In-bounds neighbors of a coordinate.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |&n| self.in_bounds(n))
    }

    /// Whether the tile sits on the outer edge of the grid.
    #[must_use]
    pub fn is_border(&self, coord: Coord) -> bool {
        coord.q == 0
            || coord.r == 0
            || coord.q == i32::from(self.cols) - 1
            || coord.r == i32::from(self.rows) - 1
    }

    /// Iterate over all tiles.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles.iter().map(Tile::coord)
    }

    /// Tiles carrying a structure of the given kind.
    pub fn buildings_of(&self, kind: BuildingKind) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.building == Some(kind))
    }

    /// Count tiles carrying a structure of the given kind.
    #[must_use]
    pub fn count_buildings(&self, kind: BuildingKind) -> usize {
        self.buildings_of(kind).count()
    }

    /// Every water and lake tile, in map order.
    #[must_use]
    pub fn water_tiles(&self) -> Vec<Coord> {
        self.tiles
            .iter()
            .filter(|t| t.terrain.is_water())
            .map(Tile::coord)
            .collect()
    }
}
