//! Shortest-path pursuit for the duck.

use crate::entity::Position;
use crate::grid;
use crate::level::Level;
use std::collections::VecDeque;

/// Expansion order: left, right, up, down. Equal-length paths resolve to the
/// first one discovered in this order.
const NEIGHBOR_DELTAS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Returns the single step the pursuer takes toward the player this turn,
/// or `(0, 0)` when it is already there or no path exists.
///
/// The search is rebuilt from scratch each call; the pursuer keeps no memory
/// of previous paths.
pub fn next_step(level: &Level, pursuer: Position, player: Position) -> (i32, i32) {
    if pursuer == player || !level.in_bounds(pursuer) || !level.in_bounds(player) {
        return (0, 0);
    }

    let size = level.grid_size as usize;
    let index = |pos: Position| pos.y as usize * size + pos.x as usize;

    // parent[i] is the cell we reached i from; the start points at itself.
    let mut parent: Vec<Option<Position>> = vec![None; size * size];
    parent[index(pursuer)] = Some(pursuer);

    let mut queue = VecDeque::new();
    queue.push_back(pursuer);

    while let Some(cell) = queue.pop_front() {
        if cell == player {
            return first_step(&parent, index, pursuer, player);
        }

        for delta in NEIGHBOR_DELTAS {
            let next = cell.offset(delta);
            if !level.in_bounds(next) || grid::is_blocked(level, next) {
                continue;
            }
            let slot = &mut parent[index(next)];
            if slot.is_some() {
                continue;
            }
            *slot = Some(cell);
            queue.push_back(next);
        }
    }

    (0, 0)
}

fn first_step(
    parent: &[Option<Position>],
    index: impl Fn(Position) -> usize,
    start: Position,
    goal: Position,
) -> (i32, i32) {
    let mut cursor = goal;
    while let Some(prev) = parent[index(cursor)] {
        if prev == start {
            return (cursor.x - start.x, cursor.y - start.y);
        }
        cursor = prev;
    }
    (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Direction, Turret};
    use crate::level::LevelGenerator;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_level(size: i32) -> Level {
        Level::empty(
            size,
            Position::new(0, 0),
            Position::new(size - 1, size - 1),
            Position::new(size - 1, 0),
        )
    }

    #[test]
    fn walks_straight_along_an_open_row() {
        let level = open_level(6);

        let step = next_step(&level, Position::new(0, 0), Position::new(2, 0));
        assert_eq!(step, (1, 0));

        let step = next_step(&level, Position::new(1, 0), Position::new(2, 0));
        assert_eq!(step, (1, 0));
    }

    #[test]
    fn holds_position_when_on_player() {
        let level = open_level(6);
        assert_eq!(next_step(&level, Position::new(3, 3), Position::new(3, 3)), (0, 0));
    }

    #[test]
    fn ties_prefer_horizontal_moves() {
        let level = open_level(6);
        // Player is up and to the left; both (-1,0) and (0,-1) start a
        // shortest path. Left is expanded first.
        assert_eq!(next_step(&level, Position::new(3, 3), Position::new(1, 1)), (-1, 0));
        assert_eq!(next_step(&level, Position::new(1, 1), Position::new(3, 3)), (1, 0));
    }

    #[test]
    fn routes_around_spikes() {
        let mut level = open_level(6);
        level.spikes.insert(Position::new(1, 0));
        // Direct route is blocked, so the duck detours through row 1.
        let step = next_step(&level, Position::new(0, 0), Position::new(2, 0));
        assert_eq!(step, (0, 1));
    }

    #[test]
    fn stays_put_when_player_is_walled_in() {
        let mut level = open_level(6);
        level.spikes.insert(Position::new(1, 0));
        level
            .turrets
            .push(Some(Turret::new(Position::new(0, 1), Direction::Down)));

        assert_eq!(next_step(&level, Position::new(4, 4), Position::new(0, 0)), (0, 0));
    }

    #[test]
    fn destroyed_turrets_no_longer_block() {
        let mut level = open_level(3);
        level.turrets = vec![Some(Turret::new(Position::new(1, 0), Direction::Down))];
        level.spikes.insert(Position::new(1, 1));
        level.spikes.insert(Position::new(1, 2));

        assert_eq!(next_step(&level, Position::new(2, 0), Position::new(0, 0)), (0, 0));

        level.remove_turret(0);
        assert_eq!(next_step(&level, Position::new(2, 0), Position::new(0, 0)), (-1, 0));
    }

    proptest! {
        #[test]
        fn prop_step_is_legal(
            level_no in 1u32..20,
            seed in any::<u64>(),
        ) {
            let level = LevelGenerator::default()
                .generate(level_no, &mut StdRng::seed_from_u64(seed))
                .unwrap();

            let step = next_step(&level, level.pursuer, level.player);
            prop_assert!(
                [(-1, 0), (1, 0), (0, -1), (0, 1), (0, 0)].contains(&step),
                "illegal delta {:?}",
                step
            );
            if step != (0, 0) {
                let target = level.pursuer.offset(step);
                prop_assert!(level.in_bounds(target));
                prop_assert!(!grid::is_blocked(&level, target));
            }
        }
    }
}
