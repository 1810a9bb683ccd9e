//! Per-turn resolution of hazards, capture and escape.

use crate::entity::Position;
use crate::level::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    SpikeDeath,
    /// The player stood on this turret's base and destroyed it.
    TurretDestroyed(usize),
    TurretBeamDeath,
    CaughtByPursuer,
    Win,
}

impl Outcome {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Outcome::SpikeDeath | Outcome::TurretBeamDeath | Outcome::CaughtByPursuer
        )
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Continue => "",
            Outcome::SpikeDeath => "You stepped on spikes!",
            Outcome::TurretDestroyed(_) => "You destroyed a turret!",
            Outcome::TurretBeamDeath => "Hit by turret!",
            Outcome::CaughtByPursuer => "The duck got you!",
            Outcome::Win => "You escaped!",
        }
    }
}

/// Resolves the player's cell after both movers have stepped.
///
/// A turret under the player is removed before beams are scanned, so a
/// turret never kills the player standing on its own base. Other turrets'
/// beams still apply, and a fatal result outranks the destruction report
/// even though the removal persists.
pub fn evaluate(level: &mut Level, player: Position) -> Outcome {
    if level.spikes.contains(&player) {
        return Outcome::SpikeDeath;
    }

    let destroyed = level.turret_at(player);
    if let Some(index) = destroyed {
        level.remove_turret(index);
    }

    if level
        .live_turrets()
        .any(|(_, turret)| level.in_bounds(player) && turret.covers(player))
    {
        return Outcome::TurretBeamDeath;
    }

    if player == level.pursuer {
        return Outcome::CaughtByPursuer;
    }

    if player == level.exit {
        return Outcome::Win;
    }

    match destroyed {
        Some(index) => Outcome::TurretDestroyed(index),
        None => Outcome::Continue,
    }
}
