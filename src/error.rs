use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("grid of size {grid_size} cannot hold the player, exit and pursuer")]
    InsufficientSpace { grid_size: i32 },

    #[error("grid of size {grid_size} exceeds the largest playable board")]
    GridTooLarge { grid_size: i32 },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unrecognized command key: {0:?}")]
    InvalidCommand(char),
}

pub type Result<T> = std::result::Result<T, GameError>;
