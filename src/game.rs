//! Game layer for Frontier.
//!
//! Implements the colony rules on top of the hex grid:
//! - Map of tiles with terrain, structures, and fog flags
//! - Friendly, hostile, and neutral units
//! - Visibility, combat, and the hostile AI
//! - Economy and the turn pipeline
//! - Player actions

pub mod actions;
pub mod ai;
mod board;
mod catalog;
pub mod combat;
pub mod economy;
pub mod invariants;
mod map;
pub mod turn;
mod unit;
pub mod visibility;

pub use actions::{Action, ActionOutcome, PlayerHandle, apply};
pub use ai::{AiReport, run_hostiles};
pub use board::{Board, DEFAULT_SPACING, Faction};
pub use catalog::{
    Abilities, BuildingKind, Resources, Stats, UnitKind, UnitProfile, UpgradeInProgress,
    UpgradeKind, UpgradeSpec,
};
pub use combat::{AttackOutcome, AttackTarget, attack};
pub use economy::{ResourceDelta, calculate_delta};
pub use invariants::{InvariantViolation, check_invariants, check_structure};
pub use map::{Map, Terrain, Tile};
pub use turn::{TurnReport, advance_turn, end_turn};
pub use unit::{AiBehavior, Unit, UnitId, UnitStats, can_enter};
