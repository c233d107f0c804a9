//! Player actions: move, attack, build, upgrade, recruit.
//!
//! Each action validates against the current board and either applies in
//! full or returns an [`ActionError`] with the board untouched. Visibility
//! is recomputed after every applied action.

use std::fmt;

use crate::config::RulesConfig;
use crate::error::{ActionError, ActionResult};
use crate::game::{
    AttackOutcome, AttackTarget, Board, BuildingKind, Resources, Unit, UnitId, UnitKind,
    UpgradeInProgress, UpgradeKind, can_enter, combat, economy, visibility,
};
use crate::hex::Coord;

/// Opaque identity of the player issuing an operation.
///
/// Recorded in logs; ownership is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerHandle(String);

impl PlayerHandle {
    /// Wrap a player identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player-initiated board mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move a friendly unit.
    Move {
        /// Unit to move.
        unit: UnitId,
        /// Destination.
        to: Coord,
    },
    /// Attack with a friendly unit.
    Attack {
        /// Attacker.
        unit: UnitId,
        /// Defender.
        target: AttackTarget,
    },
    /// Construct a structure.
    Build {
        /// Structure kind.
        kind: BuildingKind,
        /// Site.
        at: Coord,
    },
    /// Begin a shelter upgrade.
    StartUpgrade {
        /// Shelter tile.
        at: Coord,
        /// Upgrade kind.
        kind: UpgradeKind,
    },
    /// Recruit a unit at a shelter.
    Recruit {
        /// Shelter tile.
        at: Coord,
        /// Unit kind.
        kind: UnitKind,
    },
}

/// Result of an applied action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Unit moved, spending `spent` movement.
    Moved {
        /// Unit moved.
        unit: UnitId,
        /// New position.
        to: Coord,
        /// Movement spent.
        spent: u32,
    },
    /// Attack resolved.
    Attacked(AttackOutcome),
    /// Structure placed.
    Built {
        /// Structure kind.
        kind: BuildingKind,
        /// Site.
        at: Coord,
    },
    /// Upgrade started.
    UpgradeStarted {
        /// Shelter tile.
        at: Coord,
        /// Upgrade kind.
        kind: UpgradeKind,
    },
    /// Unit recruited.
    Recruited {
        /// New unit id.
        unit: UnitId,
        /// Where it appeared.
        at: Coord,
    },
}

/// Validate and apply one action.
///
/// # Errors
///
/// Returns the first failed check; the board is left unchanged.
pub fn apply(
    board: &mut Board,
    rules: &RulesConfig,
    player: &PlayerHandle,
    action: Action,
) -> ActionResult<ActionOutcome> {
    let span = tracing::debug_span!("action", %player, turn = board.turn);
    let _enter = span.enter();

    let result = match action {
        Action::Move { unit, to } => move_unit(board, unit, to),
        Action::Attack { unit, target } => {
            combat::attack(board, unit, target).map(ActionOutcome::Attacked)
        }
        Action::Build { kind, at } => build(board, rules, kind, at),
        Action::StartUpgrade { at, kind } => start_upgrade(board, at, kind),
        Action::Recruit { at, kind } => recruit(board, at, kind),
    };

    match &result {
        Ok(outcome) => tracing::debug!(?outcome, "action applied"),
        Err(err) => tracing::debug!(?action, %err, "action rejected"),
    }
    result
}

fn require_funds(board: &Board, cost: Resources) -> ActionResult<()> {
    if board.resources.covers(&cost) {
        Ok(())
    } else {
        Err(ActionError::InsufficientResources {
            needed: cost,
            available: board.resources,
        })
    }
}

/// Move a friendly unit up to its remaining movement.
///
/// # Errors
///
/// Rejects unknown units, off-board or impassable destinations, occupied
/// tiles, and moves longer than the movement left.
pub fn move_unit(board: &mut Board, id: UnitId, to: Coord) -> ActionResult<ActionOutcome> {
    let unit = board.piece(id).ok_or(ActionError::UnknownUnit(id))?;
    if !board.map.in_bounds(to) {
        return Err(ActionError::OutOfBounds(to));
    }
    let distance = unit.position().distance(to);
    if distance > unit.moves_left {
        return Err(ActionError::InsufficientMoves {
            needed: distance,
            left: unit.moves_left,
        });
    }
    if !unit.can_enter(&board.map, to) {
        return Err(ActionError::Impassable(to));
    }
    if board.unit_at(to).is_some_and(|other| other.id != id) {
        return Err(ActionError::Occupied(to));
    }

    if let Some(unit) = board.piece_mut(id) {
        unit.place(to);
        unit.moves_left -= distance;
    }
    visibility::recompute(board);
    Ok(ActionOutcome::Moved {
        unit: id,
        to,
        spent: distance,
    })
}

/// Construct a structure next to a friendly unit.
///
/// # Errors
///
/// Rejects fortresses, undiscovered or taken sites, unsuitable terrain,
/// sites with no friendly unit within one tile, outposts past the cap,
/// and unaffordable structures.
pub fn build(
    board: &mut Board,
    rules: &RulesConfig,
    kind: BuildingKind,
    at: Coord,
) -> ActionResult<ActionOutcome> {
    if !kind.is_buildable() {
        return Err(ActionError::NotBuildable(kind));
    }
    let tile = board.map.get(at).ok_or(ActionError::OutOfBounds(at))?;
    if !tile.discovered {
        return Err(ActionError::Undiscovered(at));
    }
    if tile.building.is_some() {
        return Err(ActionError::SiteTaken(at));
    }
    if !kind.allowed_on(tile.terrain) {
        return Err(ActionError::UnsuitableTerrain {
            kind,
            terrain: tile.terrain,
        });
    }
    if !board.pieces.iter().any(|u| u.position().distance(at) <= 1) {
        return Err(ActionError::NoBuilder(at));
    }
    if kind.is_outpost() {
        let cap = economy::outpost_cap(board, rules);
        if board.outpost_count() >= cap {
            return Err(ActionError::OutpostCapReached { cap });
        }
    }
    require_funds(board, kind.cost())?;

    board.resources -= kind.cost();
    if let Some(tile) = board.map.get_mut(at) {
        tile.place_building(kind);
    }
    visibility::recompute(board);
    Ok(ActionOutcome::Built { kind, at })
}

/// Begin an upgrade on a shelter.
///
/// # Errors
///
/// Rejects tiles without a shelter, shelters already upgrading, upgrades
/// already installed, and unaffordable upgrades.
pub fn start_upgrade(
    board: &mut Board,
    at: Coord,
    kind: UpgradeKind,
) -> ActionResult<ActionOutcome> {
    let tile = board.map.get(at).ok_or(ActionError::OutOfBounds(at))?;
    if !tile.has_building(BuildingKind::Shelter) {
        return Err(ActionError::NoShelter(at));
    }
    if tile.upgrade_in_progress.is_some() {
        return Err(ActionError::UpgradeBusy(at));
    }
    if tile.has_upgrade(kind) {
        return Err(ActionError::AlreadyUpgraded(kind));
    }
    let cost = kind.spec().cost;
    require_funds(board, cost)?;

    board.resources -= cost;
    let turn = board.turn;
    if let Some(tile) = board.map.get_mut(at) {
        tile.upgrade_in_progress = Some(UpgradeInProgress::start(kind, turn));
    }
    visibility::recompute(board);
    Ok(ActionOutcome::UpgradeStarted { at, kind })
}

/// Recruit a unit on the shelter tile, or the first free neighbor if the
/// shelter tile is taken.
///
/// # Errors
///
/// Rejects tiles without a shelter, kinds that cannot be recruited,
/// unaffordable units, and shelters with no room around them.
pub fn recruit(board: &mut Board, at: Coord, kind: UnitKind) -> ActionResult<ActionOutcome> {
    let tile = board.map.get(at).ok_or(ActionError::OutOfBounds(at))?;
    if !tile.has_building(BuildingKind::Shelter) {
        return Err(ActionError::NoShelter(at));
    }
    if !kind.is_recruitable() {
        return Err(ActionError::NotRecruitable(kind));
    }
    let profile = kind.profile();
    require_funds(board, profile.cost)?;

    let spot = std::iter::once(at)
        .chain(board.map.neighbors(at))
        .find(|&c| {
            let free = if c == at {
                !board.is_occupied(c)
            } else {
                board.is_vacant(c)
            };
            free && can_enter(&profile.abilities, &board.map, c)
        })
        .ok_or(ActionError::NoRoom(at))?;

    board.resources -= profile.cost;
    let id = board.next_unit_id();
    board.pieces.push(Unit::new(id, kind, spot));
    visibility::recompute(board);
    Ok(ActionOutcome::Recruited { unit: id, at: spot })
}
