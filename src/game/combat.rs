//! Combat resolution.
//!
//! Damage is `attack - defense` with a floor of 1, so every accepted attack
//! hurts. Attacks are gated by range, vision, and discovery.

use crate::error::{ActionError, ActionResult};
use crate::game::{Board, UnitId, visibility};
use crate::hex::Coord;

/// Minimum damage of an accepted attack.
pub const MIN_DAMAGE: i32 = 1;

/// What is being attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTarget {
    /// A hostile unit.
    Unit(UnitId),
    /// A hostile structure on a tile.
    Site(Coord),
}

/// Result of an accepted attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Damage dealt.
    pub damage: i32,
    /// Defender health after the hit.
    pub remaining_health: i32,
    /// Defender was removed (unit) or razed (structure).
    pub destroyed: bool,
}

/// Damage dealt by `attack` against `defense`.
#[must_use]
pub const fn damage(attack: i32, defense: i32) -> i32 {
    let raw = attack.saturating_sub(defense);
    if raw < MIN_DAMAGE { MIN_DAMAGE } else { raw }
}

/// Validated defender: where it stands and its defense.
struct Defender {
    at: Coord,
    defense: i32,
}

fn locate_defender(board: &Board, target: AttackTarget) -> ActionResult<Defender> {
    match target {
        AttackTarget::Unit(id) => {
            let unit = board.hostile(id).ok_or(ActionError::UnknownTarget(id))?;
            Ok(Defender {
                at: unit.position(),
                defense: unit.stats.defense,
            })
        }
        AttackTarget::Site(at) => {
            let tile = board.map.get(at).ok_or(ActionError::OutOfBounds(at))?;
            match (tile.building, tile.stats) {
                (Some(kind), Some(stats)) if kind.is_hostile() => Ok(Defender {
                    at,
                    defense: stats.defense,
                }),
                _ => Err(ActionError::NoDefender(at)),
            }
        }
    }
}

/// Attack a hostile unit or structure with a friendly unit.
///
/// # Errors
///
/// Rejects without touching the board if the attacker is unknown, already
/// attacked this turn, or the defender is out of range, out of vision, or
/// on an undiscovered tile.
pub fn attack(
    board: &mut Board,
    attacker_id: UnitId,
    target: AttackTarget,
) -> ActionResult<AttackOutcome> {
    let attacker = board
        .piece(attacker_id)
        .ok_or(ActionError::UnknownUnit(attacker_id))?;
    if attacker.attacked {
        return Err(ActionError::AlreadyAttacked(attacker_id));
    }

    let defender = locate_defender(board, target)?;
    let distance = attacker.position().distance(defender.at);
    if distance > attacker.range {
        return Err(ActionError::OutOfRange {
            distance,
            range: attacker.range,
        });
    }
    if distance > attacker.vision {
        return Err(ActionError::OutOfSight {
            distance,
            vision: attacker.vision,
        });
    }
    if !board.map.get(defender.at).is_some_and(|t| t.discovered) {
        return Err(ActionError::Undiscovered(defender.at));
    }

    let dealt = damage(attacker.stats.attack, defender.defense);
    if let Some(attacker) = board.piece_mut(attacker_id) {
        attacker.attacked = true;
    }

    let outcome = match target {
        AttackTarget::Unit(id) => {
            let (remaining_health, destroyed) = match board.hostile_mut(id) {
                Some(unit) => {
                    let died = unit.take_damage(dealt);
                    (unit.stats.current_health, died)
                }
                None => (0, true),
            };
            if destroyed {
                board.hostile_pieces.retain(|u| u.id != id);
            }
            AttackOutcome {
                damage: dealt,
                remaining_health,
                destroyed,
            }
        }
        AttackTarget::Site(at) => {
            let mut outcome = AttackOutcome {
                damage: dealt,
                remaining_health: 0,
                destroyed: false,
            };
            if let Some(tile) = board.map.get_mut(at)
                && let Some(stats) = tile.stats.as_mut()
            {
                stats.health -= dealt;
                outcome.remaining_health = stats.health;
                if stats.health <= 0 {
                    tile.clear_building();
                    outcome.destroyed = true;
                }
            }
            outcome
        }
    };

    tracing::debug!(
        attacker = attacker_id,
        ?target,
        damage = outcome.damage,
        destroyed = outcome.destroyed,
        "attack resolved"
    );

    if outcome.destroyed {
        visibility::recompute(board);
    }
    Ok(outcome)
}
