//! Tunable constants, optionally loaded from a TOML file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid edge length at progression level 1
    pub base_grid_size: i32,
    /// Spikes placed before per-level scaling
    pub base_spikes: usize,
    /// Turrets placed before per-level scaling
    pub base_turrets: usize,
    /// Directory holding the save store
    pub save_dir: PathBuf,

    // === Input ===
    /// Delay before a held key starts repeating
    pub repeat_delay_ms: u64,
    /// Interval between repeats while held
    pub repeat_interval_ms: u64,

    // === Presentation ===
    /// Frames used to slide an entity one cell
    pub animation_steps: u32,
    /// Time per animation frame
    pub animation_frame_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_grid_size: 6,
            base_spikes: 3,
            base_turrets: 2,
            save_dir: PathBuf::from(".escape-duck"),

            repeat_delay_ms: 120,
            repeat_interval_ms: 60,

            animation_steps: 12,
            animation_frame_ms: 10,
        }
    }
}

impl Config {
    /// Reads `path` as TOML. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_delay_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    pub fn animation_frame(&self) -> Duration {
        Duration::from_millis(self.animation_frame_ms)
    }
}
