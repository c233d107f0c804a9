//! Error types for player actions and world generation.
//!
//! Every rejected action leaves the board untouched; the variant says why.

use thiserror::Error;

use crate::game::{BuildingKind, Resources, Terrain, UnitId, UnitKind, UpgradeKind};
use crate::hex::Coord;

/// Reason a player action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No friendly unit with this id.
    #[error("no friendly unit with id {0}")]
    UnknownUnit(UnitId),
    /// No hostile unit with this id.
    #[error("no hostile unit with id {0}")]
    UnknownTarget(UnitId),
    /// Coordinate is off the board.
    #[error("{0} is outside the board")]
    OutOfBounds(Coord),
    /// Unit already attacked this turn.
    #[error("unit {0} has already attacked this turn")]
    AlreadyAttacked(UnitId),
    /// Target farther than the attacker's range.
    #[error("target at distance {distance} is beyond range {range}")]
    OutOfRange {
        /// Hex distance to the target.
        distance: u32,
        /// Attacker range.
        range: u32,
    },
    /// Target farther than the attacker's vision.
    #[error("target at distance {distance} is beyond vision {vision}")]
    OutOfSight {
        /// Hex distance to the target.
        distance: u32,
        /// Attacker vision.
        vision: u32,
    },
    /// Tile has never been seen.
    #[error("{0} has not been discovered")]
    Undiscovered(Coord),
    /// Tile has nothing that can be attacked.
    #[error("nothing to attack at {0}")]
    NoDefender(Coord),
    /// Not enough movement left.
    #[error("move needs {needed} points but only {left} remain")]
    InsufficientMoves {
        /// Points required.
        needed: u32,
        /// Points left.
        left: u32,
    },
    /// Terrain closed to this unit.
    #[error("{0} is impassable for this unit")]
    Impassable(Coord),
    /// Another unit stands there.
    #[error("{0} is occupied")]
    Occupied(Coord),
    /// A structure already stands there.
    #[error("{0} already has a structure")]
    SiteTaken(Coord),
    /// This structure cannot be built by the player.
    #[error("{0} cannot be built")]
    NotBuildable(BuildingKind),
    /// Structure not allowed on this terrain.
    #[error("{kind} cannot be built on {terrain:?}")]
    UnsuitableTerrain {
        /// Requested structure.
        kind: BuildingKind,
        /// Terrain at the site.
        terrain: Terrain,
    },
    /// No friendly unit on or next to the site.
    #[error("no friendly unit near {0}")]
    NoBuilder(Coord),
    /// Outpost limit reached.
    #[error("outpost cap of {cap} reached")]
    OutpostCapReached {
        /// Current cap.
        cap: usize,
    },
    /// Stockpile does not cover the cost.
    #[error("needs {needed}, have {available}")]
    InsufficientResources {
        /// Cost.
        needed: Resources,
        /// Stockpile.
        available: Resources,
    },
    /// No shelter on this tile.
    #[error("no shelter at {0}")]
    NoShelter(Coord),
    /// Shelter is already upgrading.
    #[error("shelter at {0} is already upgrading")]
    UpgradeBusy(Coord),
    /// Upgrade already completed on this shelter.
    #[error("{0} is already installed")]
    AlreadyUpgraded(UpgradeKind),
    /// Kind cannot be recruited.
    #[error("{0} cannot be recruited")]
    NotRecruitable(UnitKind),
    /// No free tile at or around the shelter.
    #[error("no room to recruit around {0}")]
    NoRoom(Coord),
}

/// World generation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// Zero-sized grid.
    #[error("invalid map dimensions {cols}x{rows} (must be > 0)")]
    InvalidDimensions {
        /// Requested columns.
        cols: u16,
        /// Requested rows.
        rows: u16,
    },
}

/// Result type for player actions.
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::OutOfRange {
            distance: 3,
            range: 1,
        };
        assert_eq!(err.to_string(), "target at distance 3 is beyond range 1");
        let err = ActionError::Undiscovered(Coord::new(2, 5));
        assert!(err.to_string().contains("(2, 5)"));
    }
}
