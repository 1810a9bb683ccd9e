//! Static occupancy queries over a level's grid.

use crate::entity::Position;
use crate::level::Level;

/// Levels per extra row and column of grid.
pub const GROWTH_INTERVAL: u32 = 3;

/// Largest side length the generator will lay out.
pub const MAX_GRID_SIZE: i32 = 256;

pub fn grid_size_for_level(base_size: i32, level: u32) -> i32 {
    // u32::MAX / 3 fits in i32, so the cast happens after the division.
    let growth = ((level.max(1) - 1) / GROWTH_INTERVAL) as i32;
    base_size.saturating_add(growth)
}

/// Number of cells on a board, or `None` when the side is negative or the
/// area does not fit.
pub fn cell_count(grid_size: i32) -> Option<usize> {
    let side = usize::try_from(grid_size).ok()?;
    side.checked_mul(side)
}

pub fn in_bounds(grid_size: i32, pos: Position) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.x < grid_size && pos.y < grid_size
}

/// Spikes and live turret bases block movement. The player, exit and
/// pursuer cells never do.
pub fn is_blocked(level: &Level, pos: Position) -> bool {
    level.spikes.contains(&pos) || level.turret_at(pos).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Direction, Turret};

    #[test]
    fn grid_grows_every_three_levels() {
        assert_eq!(grid_size_for_level(6, 1), 6);
        assert_eq!(grid_size_for_level(6, 3), 6);
        assert_eq!(grid_size_for_level(6, 4), 7);
        assert_eq!(grid_size_for_level(6, 7), 8);
    }

    #[test]
    fn extreme_levels_do_not_overflow() {
        assert_eq!(grid_size_for_level(6, u32::MAX), 6 + ((u32::MAX - 1) / 3) as i32);
        assert_eq!(grid_size_for_level(i32::MAX, u32::MAX), i32::MAX);
        assert_eq!(cell_count(-1), None);
        assert_eq!(cell_count(7), Some(49));
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(in_bounds(6, Position::new(0, 0)));
        assert!(in_bounds(6, Position::new(5, 5)));
        assert!(!in_bounds(6, Position::new(6, 0)));
        assert!(!in_bounds(6, Position::new(0, -1)));
    }

    #[test]
    fn spikes_and_live_turrets_block() {
        let mut level = Level::empty(
            6,
            Position::new(0, 0),
            Position::new(5, 5),
            Position::new(5, 0),
        );
        level.spikes.insert(Position::new(2, 2));
        level
            .turrets
            .push(Some(Turret::new(Position::new(3, 3), Direction::Up)));

        assert!(is_blocked(&level, Position::new(2, 2)));
        assert!(is_blocked(&level, Position::new(3, 3)));
        assert!(!is_blocked(&level, Position::new(0, 0)));
        assert!(!is_blocked(&level, Position::new(5, 5)));

        level.remove_turret(0);
        assert!(!is_blocked(&level, Position::new(3, 3)));
    }
}
