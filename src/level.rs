use crate::config::Config;
use crate::entity::{Direction, Position, Turret};
use crate::error::{GameError, Result};
use crate::grid;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Cells reserved for the player, exit, pursuer and two spare cells when
/// capping hazard counts.
const RESERVED_CELLS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub grid_size: i32,
    pub player: Position,
    pub exit: Position,
    pub pursuer: Position,
    pub spikes: HashSet<Position>,
    /// Destroyed turrets leave a `None` so indices stay stable.
    pub turrets: Vec<Option<Turret>>,
}

impl Level {
    /// A hazard-free level, mostly useful for scripted setups.
    pub fn empty(grid_size: i32, player: Position, exit: Position, pursuer: Position) -> Self {
        Self {
            grid_size,
            player,
            exit,
            pursuer,
            spikes: HashSet::new(),
            turrets: Vec::new(),
        }
    }

    pub fn live_turrets(&self) -> impl Iterator<Item = (usize, &Turret)> {
        self.turrets
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|turret| (idx, turret)))
    }

    pub fn turret_at(&self, pos: Position) -> Option<usize> {
        self.live_turrets()
            .find(|(_, turret)| turret.position == pos)
            .map(|(idx, _)| idx)
    }

    /// Tombstones the turret at `index`. Removing twice is a no-op.
    pub fn remove_turret(&mut self, index: usize) -> Option<Turret> {
        self.turrets.get_mut(index).and_then(Option::take)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        grid::in_bounds(self.grid_size, pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGenerator {
    pub base_grid_size: i32,
    pub base_spikes: usize,
    pub base_turrets: usize,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LevelGenerator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_grid_size: config.base_grid_size,
            base_spikes: config.base_spikes,
            base_turrets: config.base_turrets,
        }
    }

    pub fn grid_size(&self, level: u32) -> i32 {
        grid::grid_size_for_level(self.base_grid_size, level)
    }

    pub fn spike_count(&self, level: u32, grid_size: i32) -> usize {
        let cells = grid::cell_count(grid_size).unwrap_or(0);
        self.base_spikes
            .saturating_add(level as usize / 2)
            .min(cells.saturating_sub(RESERVED_CELLS))
    }

    pub fn turret_count(&self, level: u32, grid_size: i32, spikes: usize) -> usize {
        let cells = grid::cell_count(grid_size).unwrap_or(0);
        self.base_turrets
            .saturating_add(level as usize / 3)
            .min(cells.saturating_sub(RESERVED_CELLS.saturating_add(spikes)))
    }

    /// Samples a fresh level. Every placement draws uniformly from the cells
    /// still free at that point.
    pub fn generate<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Result<Level> {
        let grid_size = self.grid_size(level);
        if grid_size > grid::MAX_GRID_SIZE {
            return Err(GameError::GridTooLarge { grid_size });
        }
        match grid::cell_count(grid_size) {
            Some(cells) if cells >= RESERVED_CELLS => {}
            _ => return Err(GameError::InsufficientSpace { grid_size }),
        }

        let mut free: Vec<Position> = (0..grid_size)
            .flat_map(|x| (0..grid_size).map(move |y| Position::new(x, y)))
            .collect();

        // Size was checked above, so the first three draws always succeed.
        let player = draw(&mut free, rng).ok_or(GameError::InsufficientSpace { grid_size })?;
        let exit = draw(&mut free, rng).ok_or(GameError::InsufficientSpace { grid_size })?;
        let pursuer = draw(&mut free, rng).ok_or(GameError::InsufficientSpace { grid_size })?;

        let mut spikes = HashSet::new();
        for _ in 0..self.spike_count(level, grid_size) {
            match draw(&mut free, rng) {
                Some(cell) => {
                    spikes.insert(cell);
                }
                None => break,
            }
        }

        let mut turrets = Vec::new();
        for _ in 0..self.turret_count(level, grid_size, spikes.len()) {
            let Some(cell) = draw(&mut free, rng) else {
                break;
            };
            let direction = *Direction::ALL
                .choose(rng)
                .unwrap_or(&Direction::Up);
            turrets.push(Some(Turret::new(cell, direction)));
        }

        tracing::debug!(
            level,
            grid_size,
            spikes = spikes.len(),
            turrets = turrets.len(),
            "generated level"
        );

        Ok(Level {
            grid_size,
            player,
            exit,
            pursuer,
            spikes,
            turrets,
        })
    }
}

fn draw<R: Rng + ?Sized>(free: &mut Vec<Position>, rng: &mut R) -> Option<Position> {
    if free.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..free.len());
    Some(free.swap_remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn occupied_cells(level: &Level) -> Vec<Position> {
        let mut cells = vec![level.player, level.exit, level.pursuer];
        cells.extend(level.spikes.iter().copied());
        cells.extend(level.live_turrets().map(|(_, t)| t.position));
        cells
    }

    #[test]
    fn counts_follow_progression_formulas() {
        let generator = LevelGenerator::default();
        assert_eq!(generator.spike_count(1, 6), 3);
        assert_eq!(generator.spike_count(4, 7), 5);
        assert_eq!(generator.turret_count(1, 6, 3), 2);
        assert_eq!(generator.turret_count(6, 7, 6), 4);
    }

    #[test]
    fn counts_are_capped_by_free_space() {
        let generator = LevelGenerator {
            base_grid_size: 3,
            base_spikes: 10,
            base_turrets: 10,
        };
        // 9 cells: at most 4 spikes, then nothing left for turrets
        assert_eq!(generator.spike_count(1, 3), 4);
        assert_eq!(generator.turret_count(1, 3, 4), 0);

        let mut rng = StdRng::seed_from_u64(3);
        let level = generator.generate(1, &mut rng).unwrap();
        assert_eq!(level.spikes.len(), 4);
        assert!(level.turrets.is_empty());
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let generator = LevelGenerator {
            base_grid_size: 2,
            base_spikes: 0,
            base_turrets: 0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let err = generator.generate(1, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InsufficientSpace { grid_size: 2 }));
    }

    #[test]
    fn oversized_levels_are_rejected_without_panicking() {
        let generator = LevelGenerator::default();
        let mut rng = StdRng::seed_from_u64(0);
        for level in [200_000, u32::MAX] {
            let err = generator.generate(level, &mut rng).unwrap_err();
            assert!(matches!(err, GameError::GridTooLarge { .. }), "level {level}: {err}");
        }
        assert_eq!(generator.spike_count(u32::MAX, -1), 0);
        assert_eq!(generator.turret_count(u32::MAX, 6, usize::MAX), 0);
    }

    #[test]
    fn same_seed_reproduces_the_level() {
        let generator = LevelGenerator::default();
        let a = generator.generate(5, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generator.generate(5, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn remove_turret_is_idempotent_and_index_stable() {
        let mut level = Level::empty(
            6,
            Position::new(0, 0),
            Position::new(5, 5),
            Position::new(5, 0),
        );
        level.turrets = vec![
            Some(Turret::new(Position::new(1, 1), Direction::Up)),
            Some(Turret::new(Position::new(2, 2), Direction::Down)),
        ];

        assert!(level.remove_turret(0).is_some());
        assert!(level.remove_turret(0).is_none());
        assert_eq!(level.turret_at(Position::new(2, 2)), Some(1));
        assert_eq!(level.live_turrets().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_generated_cells_are_distinct_and_in_bounds(
            level_no in 1u32..60,
            seed in any::<u64>(),
        ) {
            let generator = LevelGenerator::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generator.generate(level_no, &mut rng).unwrap();

            let cells = occupied_cells(&level);
            let unique: HashSet<_> = cells.iter().copied().collect();
            prop_assert_eq!(unique.len(), cells.len(), "duplicate placement in {:?}", cells);
            prop_assert!(cells.iter().all(|&c| level.in_bounds(c)));

            let size = generator.grid_size(level_no);
            prop_assert_eq!(level.grid_size, size);
            prop_assert_eq!(level.spikes.len(), generator.spike_count(level_no, size));
            prop_assert_eq!(
                level.turrets.len(),
                generator.turret_count(level_no, size, level.spikes.len())
            );
            prop_assert!(cells.len() <= (size * size) as usize);
        }
    }
}
