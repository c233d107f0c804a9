//! Units: friendly pieces, hostile raiders, and neutral drifters.

use serde::{Deserialize, Serialize};

use crate::game::{Abilities, Map, Terrain, UnitKind};
use crate::hex::Coord;

/// Unique identifier for a unit, shared across all unit collections.
pub type UnitId = u32;

/// Combat stats of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    /// Maximum health.
    pub health: i32,
    /// Current health; the unit is removed at zero or below.
    pub current_health: i32,
    /// Attack strength.
    pub attack: i32,
    /// Damage absorbed per hit.
    pub defense: i32,
}

/// Decision parameters for a hostile unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiBehavior {
    /// Hex distance at which friendlies are noticed.
    pub detection_range: u32,
    /// Chance per turn to act on an acquired target.
    pub aggression_level: f64,
    /// Patrol leash around the home fortress.
    pub patrol_radius: u32,
    /// Larger packs range farther from home.
    pub pack_tactics: bool,
}

impl AiBehavior {
    /// Default raider temperament.
    pub const RAIDER: Self = Self {
        detection_range: 3,
        aggression_level: 0.75,
        patrol_radius: 2,
        pack_tactics: true,
    };
}

const fn default_range() -> u32 {
    1
}

const fn default_vision() -> u32 {
    2
}

/// A unit on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unique id.
    pub id: UnitId,
    /// Column.
    pub q: i32,
    /// Row.
    pub r: i32,
    /// Kind; drives base stats.
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Vision radius.
    #[serde(default = "default_vision")]
    pub vision: u32,
    /// Movement allowance per turn.
    #[serde(rename = "move")]
    pub move_points: u32,
    /// Movement left this turn.
    pub moves_left: u32,
    /// Terrain abilities.
    #[serde(default)]
    pub abilities: Abilities,
    /// Combat stats.
    pub stats: UnitStats,
    /// Attack range.
    #[serde(default = "default_range")]
    pub range: u32,
    /// Already attacked this turn.
    #[serde(default)]
    pub attacked: bool,
    /// Hostile decision parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_behavior: Option<AiBehavior>,
    /// Committed to pursuing `aggro_target`.
    #[serde(default)]
    pub aggro: bool,
    /// Friendly unit being pursued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggro_target: Option<UnitId>,
    /// Weak reference to the spawning fortress, by tile.
    #[serde(
        default,
        rename = "homeFortressId",
        skip_serializing_if = "Option::is_none"
    )]
    pub home_fortress: Option<Coord>,
}

impl Unit {
    /// Create a unit at full health with catalog stats.
    #[must_use]
    pub fn new(id: UnitId, kind: UnitKind, at: Coord) -> Self {
        let profile = kind.profile();
        let ai_behavior = matches!(kind, UnitKind::Raider).then_some(AiBehavior::RAIDER);
        Self {
            id,
            q: at.q,
            r: at.r,
            kind,
            vision: profile.vision,
            move_points: profile.move_points,
            moves_left: profile.move_points,
            abilities: profile.abilities,
            stats: UnitStats {
                health: profile.health,
                current_health: profile.health,
                attack: profile.attack,
                defense: profile.defense,
            },
            range: profile.range,
            attacked: false,
            ai_behavior,
            aggro: false,
            aggro_target: None,
            home_fortress: None,
        }
    }

    /// Create a raider bound to a fortress.
    #[must_use]
    pub fn raider(id: UnitId, at: Coord, home: Option<Coord>) -> Self {
        Self {
            home_fortress: home,
            ..Self::new(id, UnitKind::Raider, at)
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Coord {
        Coord::new(self.q, self.r)
    }

    /// Move to a new position without any checks.
    pub fn place(&mut self, at: Coord) {
        self.q = at.q;
        self.r = at.r;
    }

    /// Whether the unit is still standing.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.stats.current_health > 0
    }

    /// Apply damage. Returns `true` if the unit died.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.stats.current_health -= damage;
        !self.is_alive()
    }

    /// Restore the per-turn allowances.
    pub fn refresh(&mut self) {
        self.moves_left = self.move_points;
        self.attacked = false;
    }

    /// Drop any pursuit.
    pub fn calm(&mut self) {
        self.aggro = false;
        self.aggro_target = None;
    }

    /// Whether this unit may stand on the given tile.
    #[must_use]
    pub fn can_enter(&self, map: &Map, at: Coord) -> bool {
        can_enter(&self.abilities, map, at)
    }
}

/// Terrain passability for a set of abilities.
///
/// Coastfaring units reach water tiles only when the tile touches land.
#[must_use]
pub fn can_enter(abilities: &Abilities, map: &Map, at: Coord) -> bool {
    let Some(terrain) = map.terrain(at) else {
        return false;
    };
    if abilities.flying {
        return true;
    }
    match terrain {
        Terrain::ImpassableMountain => false,
        Terrain::Mountain => abilities.mountaineering,
        Terrain::Lake => abilities.seafaring || abilities.coastfaring || abilities.amphibious,
        Terrain::Water => {
            abilities.seafaring
                || abilities.amphibious
                || (abilities.coastfaring
                    && map
                        .neighbors(at)
                        .any(|n| map.terrain(n).is_some_and(Terrain::is_land)))
        }
        Terrain::Plains | Terrain::Grassland | Terrain::Forest => {
            !(abilities.seafaring || abilities.coastfaring) || abilities.amphibious
        }
    }
}
