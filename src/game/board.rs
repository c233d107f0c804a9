//! Board state management.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::{BuildingKind, Map, Resources, Tile, Unit, UnitId};
use crate::hex::Coord;

/// Default rendered hex size carried in persisted documents.
pub const DEFAULT_SPACING: f64 = 1.0;

/// Which collection a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    /// Player-controlled `pieces`.
    Friendly,
    /// AI-controlled `hostile_pieces`.
    Hostile,
    /// Static `neutral_pieces`.
    Neutral,
}

/// Complete board state: the aggregate root passed through every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// The tile grid.
    pub map: Map,
    /// Rendered hex size.
    pub spacing: f64,
    /// Seed for generation and per-turn randomness.
    pub seed: u64,
    /// Current turn number, starting at 1.
    pub turn: u32,
    /// Colony stockpile.
    pub resources: Resources,
    /// River courses carved at generation, source first.
    pub river_paths: Vec<Vec<Coord>>,
    /// Player units.
    pub pieces: Vec<Unit>,
    /// Hostile units.
    pub hostile_pieces: Vec<Unit>,
    /// Neutral units.
    pub neutral_pieces: Vec<Unit>,
}

impl Board {
    /// Create a board on turn 1 with no units.
    #[must_use]
    pub fn new(map: Map, seed: u64) -> Self {
        Self {
            map,
            spacing: DEFAULT_SPACING,
            seed,
            turn: 1,
            resources: Resources::ZERO,
            river_paths: Vec::new(),
            pieces: Vec::new(),
            hostile_pieces: Vec::new(),
            neutral_pieces: Vec::new(),
        }
    }

    /// Get the current turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Deterministic RNG for the current turn.
    ///
    /// Derived from the board seed and turn so a reloaded board advances
    /// exactly as the original would have.
    #[must_use]
    pub fn turn_rng(&self) -> ChaCha8Rng {
        let turn_base = u64::from(self.turn).wrapping_mul(1_000_000);
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(turn_base))
    }

    /// Iterate over every unit in every collection.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.pieces
            .iter()
            .chain(&self.hostile_pieces)
            .chain(&self.neutral_pieces)
    }

    /// Look up a unit anywhere on the board.
    #[must_use]
    pub fn find_unit(&self, id: UnitId) -> Option<(Faction, &Unit)> {
        if let Some(unit) = self.piece(id) {
            return Some((Faction::Friendly, unit));
        }
        if let Some(unit) = self.hostile(id) {
            return Some((Faction::Hostile, unit));
        }
        self.neutral_pieces
            .iter()
            .find(|u| u.id == id)
            .map(|u| (Faction::Neutral, u))
    }

    /// Get a friendly unit.
    #[must_use]
    pub fn piece(&self, id: UnitId) -> Option<&Unit> {
        self.pieces.iter().find(|u| u.id == id)
    }

    /// Get a mutable friendly unit.
    #[must_use]
    pub fn piece_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.pieces.iter_mut().find(|u| u.id == id)
    }

    /// Get a hostile unit.
    #[must_use]
    pub fn hostile(&self, id: UnitId) -> Option<&Unit> {
        self.hostile_pieces.iter().find(|u| u.id == id)
    }

    /// Get a mutable hostile unit.
    #[must_use]
    pub fn hostile_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.hostile_pieces.iter_mut().find(|u| u.id == id)
    }

    /// The unit standing on a tile, if any.
    #[must_use]
    pub fn unit_at(&self, at: Coord) -> Option<&Unit> {
        self.all_units().find(|u| u.position() == at)
    }

    /// Whether any unit stands on a tile.
    #[must_use]
    pub fn is_occupied(&self, at: Coord) -> bool {
        self.unit_at(at).is_some()
    }

    /// In bounds, no unit, and no structure.
    #[must_use]
    pub fn is_vacant(&self, at: Coord) -> bool {
        self.map
            .get(at)
            .is_some_and(|t| t.building.is_none() && !self.is_occupied(at))
    }

    /// Allocate an id one past the largest in use.
    #[must_use]
    pub fn next_unit_id(&self) -> UnitId {
        self.all_units().map(|u| u.id).max().map_or(1, |id| id + 1)
    }

    /// Resolve a raider's home fortress.
    ///
    /// Returns `None` when the tile no longer carries a fortress, which
    /// leaves the raider orphaned.
    #[must_use]
    pub fn fortress_at(&self, at: Coord) -> Option<&Tile> {
        self.map
            .get(at)
            .filter(|t| t.has_building(BuildingKind::Fortress))
    }

    /// Coordinates of every standing fortress, in map order.
    #[must_use]
    pub fn fortresses(&self) -> Vec<Coord> {
        self.map
            .buildings_of(BuildingKind::Fortress)
            .map(Tile::coord)
            .collect()
    }

    /// Raiders whose home is the given fortress.
    pub fn pack_of(&self, home: Coord) -> impl Iterator<Item = &Unit> {
        self.hostile_pieces
            .iter()
            .filter(move |u| u.home_fortress == Some(home))
    }

    /// Count of outpost structures (extractors and sensors).
    #[must_use]
    pub fn outpost_count(&self) -> usize {
        self.map
            .iter()
            .filter(|t| t.building.is_some_and(BuildingKind::is_outpost))
            .count()
    }

    /// Drop units at zero health from every collection.
    ///
    /// Returns the ids removed.
    pub fn remove_dead(&mut self) -> Vec<UnitId> {
        let mut removed = Vec::new();
        for units in [
            &mut self.pieces,
            &mut self.hostile_pieces,
            &mut self.neutral_pieces,
        ] {
            units.retain(|u| {
                if u.is_alive() {
                    true
                } else {
                    removed.push(u.id);
                    false
                }
            });
        }
        removed
    }
}
