pub mod animation;
pub mod cli_renderer;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod grid;
pub mod hazard;
pub mod input;
pub mod level;
pub mod persistence;
pub mod progress;
pub mod pursuer;
pub mod renderer;

pub use animation::MoveAnimation;
pub use cli_renderer::CliRenderer;
pub use config::Config;
pub use entity::{Direction, Position, Turret};
pub use error::{GameError, Result};
pub use game::{Game, GameState, TurnReport};
pub use hazard::Outcome;
pub use input::KeyRepeat;
pub use level::{Level, LevelGenerator};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use progress::{Progress, ProgressionTracker};
pub use renderer::{Input, Renderer, Snapshot};
