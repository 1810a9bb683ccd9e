use crate::entity::{Direction, Position, Turret};
use crate::game::GameState;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A movement key went down.
    Direction(Direction),
    /// A movement key came up.
    Release(Direction),
    /// Enter/space: start from the menu, or move past a finished level.
    Confirm,
    DeleteData,
    Quit,
    /// Any other key. Finished levels treat it like `Confirm`.
    Other,
}

/// Read-only view of the game published after every committed turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub grid_size: i32,
    pub player: Position,
    pub pursuer: Position,
    pub exit: Position,
    pub spikes: Vec<Position>,
    /// Live turrets only.
    pub turrets: Vec<Turret>,
    pub beams: Vec<Position>,
    pub level: u32,
    pub escapes: u32,
    pub achievements: Vec<String>,
    pub status: String,
    pub notification: Option<String>,
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends.
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the given snapshot
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
