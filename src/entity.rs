use crate::error::GameError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        self.offset(direction.delta())
    }

    pub fn offset(&self, (dx, dy): (i32, i32)) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates; y grows downward.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Maps the WASD layout onto directions.
    pub fn from_key(key: char) -> Result<Self, GameError> {
        match key.to_ascii_lowercase() {
            'w' => Ok(Direction::Up),
            's' => Ok(Direction::Down),
            'a' => Ok(Direction::Left),
            'd' => Ok(Direction::Right),
            other => Err(GameError::InvalidCommand(other)),
        }
    }
}

/// Stationary hazard that fires along `direction` from its base cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turret {
    pub position: Position,
    pub direction: Direction,
}

impl Turret {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// True when `target` lies strictly beyond the base along the firing line.
    /// Does not check grid bounds.
    pub fn covers(&self, target: Position) -> bool {
        let base = self.position;
        match self.direction {
            Direction::Up => target.x == base.x && target.y < base.y,
            Direction::Down => target.x == base.x && target.y > base.y,
            Direction::Left => target.y == base.y && target.x < base.x,
            Direction::Right => target.y == base.y && target.x > base.x,
        }
    }

    /// Cells hit by the beam, nearest first.
    pub fn beam(&self, grid_size: i32) -> Vec<Position> {
        let mut cells = Vec::new();
        let mut cursor = self.position.moved(self.direction);
        while cursor.x >= 0 && cursor.y >= 0 && cursor.x < grid_size && cursor.y < grid_size {
            cells.push(cursor);
            cursor = cursor.moved(self.direction);
        }
        cells
    }
}
