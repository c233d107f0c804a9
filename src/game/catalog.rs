//! Building, unit, and upgrade catalogs.
//!
//! Every kind is a closed enum; stats, costs, production, and upkeep are
//! exhaustive matches so a new kind cannot be added without pricing it.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::game::Terrain;

/// Colony stockpile: rations, printing material, weapons.
///
/// Persisted as a three-element array. Values are signed because upkeep is
/// charged without a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 3]", into = "[i64; 3]")]
pub struct Resources {
    /// Food for units.
    pub rations: i64,
    /// Feedstock for printing buildings and equipment.
    pub material: i64,
    /// Munitions.
    pub weapons: i64,
}

impl Resources {
    /// Empty stockpile.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a new resource tuple.
    #[must_use]
    pub const fn new(rations: i64, material: i64, weapons: i64) -> Self {
        Self {
            rations,
            material,
            weapons,
        }
    }

    /// Check that every component of `self` is at least the matching
    /// component of `cost`.
    #[must_use]
    pub const fn covers(&self, cost: &Resources) -> bool {
        self.rations >= cost.rations
            && self.material >= cost.material
            && self.weapons >= cost.weapons
    }

    /// Check whether any component is below zero.
    #[must_use]
    pub const fn any_negative(&self) -> bool {
        self.rations < 0 || self.material < 0 || self.weapons < 0
    }
}

impl From<[i64; 3]> for Resources {
    fn from([rations, material, weapons]: [i64; 3]) -> Self {
        Self::new(rations, material, weapons)
    }
}

impl From<Resources> for [i64; 3] {
    fn from(r: Resources) -> Self {
        [r.rations, r.material, r.weapons]
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.rations + rhs.rations,
            self.material + rhs.material,
            self.weapons + rhs.weapons,
        )
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Resources {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Resources {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.rations, -self.material, -self.weapons)
    }
}

impl std::iter::Sum for Resources {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rations / {} material / {} weapons",
            self.rations, self.material, self.weapons
        )
    }
}

/// Combat stats of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Remaining structure points.
    pub health: i32,
    /// Attack strength.
    pub attack: i32,
    /// Damage absorbed per hit.
    pub defense: i32,
}

/// Kind of structure that can occupy a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingKind {
    /// Settlement: fixed production, vision, recruitment, upgrades.
    Shelter,
    /// Resource extractor; yield depends on the terrain underneath.
    Extractor,
    /// Long-range vision post.
    Sensor,
    /// Hostile stronghold that spawns raiders.
    Fortress,
}

impl BuildingKind {
    /// Starting stats when the structure is placed.
    #[must_use]
    pub const fn stats(self) -> Stats {
        match self {
            Self::Shelter => Stats {
                health: 20,
                attack: 0,
                defense: 3,
            },
            Self::Extractor => Stats {
                health: 10,
                attack: 0,
                defense: 1,
            },
            Self::Sensor => Stats {
                health: 8,
                attack: 0,
                defense: 1,
            },
            Self::Fortress => Stats {
                health: 40,
                attack: 3,
                defense: 4,
            },
        }
    }

    /// Construction cost.
    #[must_use]
    pub const fn cost(self) -> Resources {
        match self {
            Self::Shelter => Resources::new(10, 20, 0),
            Self::Extractor => Resources::new(0, 10, 0),
            Self::Sensor => Resources::new(0, 8, 2),
            Self::Fortress => Resources::ZERO,
        }
    }

    /// Base vision radius granted by the structure, if any.
    #[must_use]
    pub const fn vision(self) -> Option<u32> {
        match self {
            Self::Shelter => Some(2),
            Self::Sensor => Some(4),
            Self::Extractor | Self::Fortress => None,
        }
    }

    /// Per-turn production on the given terrain.
    #[must_use]
    pub const fn production(self, terrain: Terrain) -> Resources {
        match self {
            Self::Shelter => Resources::new(2, 1, 0),
            Self::Extractor => match terrain {
                Terrain::Plains => Resources::new(3, 0, 0),
                Terrain::Grassland => Resources::new(2, 1, 0),
                Terrain::Forest => Resources::new(0, 3, 0),
                Terrain::Mountain => Resources::new(0, 1, 2),
                Terrain::Water | Terrain::Lake | Terrain::ImpassableMountain => Resources::ZERO,
            },
            Self::Sensor | Self::Fortress => Resources::ZERO,
        }
    }

    /// Structures owned by the hostile faction.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Fortress)
    }

    /// Outposts count against the shelter-driven outpost cap.
    #[must_use]
    pub const fn is_outpost(self) -> bool {
        matches!(self, Self::Extractor | Self::Sensor)
    }

    /// Whether the player may construct this kind.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        !self.is_hostile()
    }

    /// Whether this kind may be placed on the given terrain.
    #[must_use]
    pub const fn allowed_on(self, terrain: Terrain) -> bool {
        match terrain {
            Terrain::Plains | Terrain::Grassland | Terrain::Forest => true,
            Terrain::Mountain => matches!(self, Self::Extractor | Self::Fortress),
            Terrain::Water | Terrain::Lake | Terrain::ImpassableMountain => false,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shelter => "shelter",
            Self::Extractor => "extractor",
            Self::Sensor => "sensor",
            Self::Fortress => "fortress",
        };
        f.write_str(name)
    }
}

/// Movement and terrain abilities of a unit.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Abilities {
    /// Open water and lakes; no land.
    pub seafaring: bool,
    /// Lakes and water tiles touching land.
    pub coastfaring: bool,
    /// Land and water.
    pub amphibious: bool,
    /// Enter mountains.
    pub mountaineering: bool,
    /// Ignores terrain entirely.
    pub flying: bool,
    /// Only detected by hostiles when adjacent.
    pub stealthy: bool,
}

impl Abilities {
    /// No special abilities.
    pub const NONE: Self = Self {
        seafaring: false,
        coastfaring: false,
        amphibious: false,
        mountaineering: false,
        flying: false,
        stealthy: false,
    };
}

/// Base profile of a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProfile {
    /// Movement allowance per turn.
    pub move_points: u32,
    /// Vision radius.
    pub vision: u32,
    /// Attack range.
    pub range: u32,
    /// Maximum health.
    pub health: i32,
    /// Attack strength.
    pub attack: i32,
    /// Damage absorbed per hit.
    pub defense: i32,
    /// Terrain abilities.
    pub abilities: Abilities,
    /// Per-turn upkeep charged to the colony.
    pub upkeep: Resources,
    /// Recruitment cost.
    pub cost: Resources,
}

/// Kind of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    /// Builder; weak in combat.
    Engineer,
    /// Fast, stealthy, wide vision.
    Scout,
    /// Ranged fighter.
    Ranger,
    /// Amphibious transport.
    Hovercraft,
    /// Flying observer.
    Drone,
    /// Hostile raider spawned by fortresses.
    Raider,
    /// Neutral wanderer camp; never moves.
    Drifter,
}

impl UnitKind {
    /// Base stats for this kind.
    #[must_use]
    pub const fn profile(self) -> UnitProfile {
        match self {
            Self::Engineer => UnitProfile {
                move_points: 2,
                vision: 2,
                range: 1,
                health: 8,
                attack: 1,
                defense: 1,
                abilities: Abilities::NONE,
                upkeep: Resources::new(1, 0, 0),
                cost: Resources::new(5, 5, 0),
            },
            Self::Scout => UnitProfile {
                move_points: 4,
                vision: 3,
                range: 1,
                health: 6,
                attack: 1,
                defense: 1,
                abilities: Abilities {
                    stealthy: true,
                    ..Abilities::NONE
                },
                upkeep: Resources::new(1, 0, 0),
                cost: Resources::new(4, 2, 0),
            },
            Self::Ranger => UnitProfile {
                move_points: 2,
                vision: 3,
                range: 2,
                health: 10,
                attack: 4,
                defense: 2,
                abilities: Abilities::NONE,
                upkeep: Resources::new(1, 0, 1),
                cost: Resources::new(4, 2, 4),
            },
            Self::Hovercraft => UnitProfile {
                move_points: 3,
                vision: 2,
                range: 1,
                health: 8,
                attack: 2,
                defense: 2,
                abilities: Abilities {
                    amphibious: true,
                    ..Abilities::NONE
                },
                upkeep: Resources::new(1, 1, 0),
                cost: Resources::new(2, 8, 0),
            },
            Self::Drone => UnitProfile {
                move_points: 5,
                vision: 4,
                range: 1,
                health: 4,
                attack: 1,
                defense: 0,
                abilities: Abilities {
                    flying: true,
                    ..Abilities::NONE
                },
                upkeep: Resources::new(0, 1, 0),
                cost: Resources::new(0, 6, 1),
            },
            Self::Raider => UnitProfile {
                move_points: 2,
                vision: 2,
                range: 1,
                health: 8,
                attack: 3,
                defense: 1,
                abilities: Abilities::NONE,
                upkeep: Resources::ZERO,
                cost: Resources::ZERO,
            },
            Self::Drifter => UnitProfile {
                move_points: 0,
                vision: 1,
                range: 0,
                health: 6,
                attack: 0,
                defense: 1,
                abilities: Abilities::NONE,
                upkeep: Resources::ZERO,
                cost: Resources::ZERO,
            },
        }
    }

    /// Whether a shelter can recruit this kind.
    #[must_use]
    pub const fn is_recruitable(self) -> bool {
        !matches!(self, Self::Raider | Self::Drifter)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Engineer => "engineer",
            Self::Scout => "scout",
            Self::Ranger => "ranger",
            Self::Hovercraft => "hovercraft",
            Self::Drone => "drone",
            Self::Raider => "raider",
            Self::Drifter => "drifter",
        };
        f.pad(name)
    }
}

/// Static description of a shelter upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeSpec {
    /// Turns from start to completion.
    pub duration: u32,
    /// Paid up front when the upgrade starts.
    pub cost: Resources,
    /// Charged every turn once complete.
    pub upkeep: Resources,
    /// Extra production once complete.
    pub bonus: Resources,
    /// Extra vision radius once complete.
    pub vision_bonus: u32,
}

/// Shelter upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeKind {
    /// Rations.
    Hydroponics,
    /// Printing material.
    Printworks,
    /// Weapons.
    Armory,
    /// Vision.
    Watchtower,
}

impl UpgradeKind {
    /// All upgrade kinds.
    pub const ALL: [Self; 4] = [
        Self::Hydroponics,
        Self::Printworks,
        Self::Armory,
        Self::Watchtower,
    ];

    /// Catalog entry.
    #[must_use]
    pub const fn spec(self) -> UpgradeSpec {
        match self {
            Self::Hydroponics => UpgradeSpec {
                duration: 3,
                cost: Resources::new(0, 12, 0),
                upkeep: Resources::new(0, 1, 0),
                bonus: Resources::new(3, 0, 0),
                vision_bonus: 0,
            },
            Self::Printworks => UpgradeSpec {
                duration: 4,
                cost: Resources::new(6, 6, 0),
                upkeep: Resources::new(1, 0, 0),
                bonus: Resources::new(0, 3, 0),
                vision_bonus: 0,
            },
            Self::Armory => UpgradeSpec {
                duration: 4,
                cost: Resources::new(4, 10, 0),
                upkeep: Resources::new(1, 0, 0),
                bonus: Resources::new(0, 0, 2),
                vision_bonus: 0,
            },
            Self::Watchtower => UpgradeSpec {
                duration: 2,
                cost: Resources::new(0, 8, 0),
                upkeep: Resources::ZERO,
                bonus: Resources::ZERO,
                vision_bonus: 2,
            },
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hydroponics => "hydroponics",
            Self::Printworks => "printworks",
            Self::Armory => "armory",
            Self::Watchtower => "watchtower",
        };
        f.write_str(name)
    }
}

/// An upgrade under construction on a shelter.
///
/// Only `duration` is read back, to decide completion. `cost` and `upkeep`
/// copy the catalog entry into the persisted record for collaborators that
/// display it; the economy always charges the catalog upkeep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInProgress {
    /// Which upgrade.
    pub key: UpgradeKind,
    /// Turn on which construction began.
    pub started_turn: u32,
    /// Turns required.
    pub duration: u32,
    /// Cost already paid.
    pub cost: Resources,
    /// Upkeep once complete.
    pub upkeep: Resources,
}

impl UpgradeInProgress {
    /// Begin an upgrade on `turn` with catalog terms.
    #[must_use]
    pub const fn start(key: UpgradeKind, turn: u32) -> Self {
        let spec = key.spec();
        Self {
            key,
            started_turn: turn,
            duration: spec.duration,
            cost: spec.cost,
            upkeep: spec.upkeep,
        }
    }

    /// Whether the upgrade is finished as of `current_turn`.
    #[must_use]
    pub const fn is_complete(&self, current_turn: u32) -> bool {
        current_turn.saturating_sub(self.started_turn) >= self.duration
    }
}
