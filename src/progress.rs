//! Level counter, escape count and achievement unlocking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Escape thresholds and the achievement each one unlocks, in ascending order.
pub const ACHIEVEMENTS: [(u32, &str); 3] = [
    (3, "Escaped 3 times!"),
    (5, "Evaded the duck 5 times!"),
    (10, "Duck Master: 10 Escapes!"),
];

/// Highest level the counter reaches. Further escapes still count but replay
/// the largest board.
pub const MAX_LEVEL: u32 = 600;

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub escapes: u32,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 1,
            escapes: 0,
            achievements: BTreeSet::new(),
        }
    }
}

impl Progress {
    /// Level 0 never occurs in a genuine save, nor does a level past the cap
    /// or one ahead of the escapes that earned it.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_LEVEL).contains(&self.level) && self.level - 1 <= self.escapes
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressionTracker {
    progress: Progress,
}

impl ProgressionTracker {
    pub fn new(progress: Progress) -> Self {
        Self { progress }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn escapes(&self) -> u32 {
        self.progress.escapes
    }

    /// Counts a completed level and returns the achievements it unlocked.
    pub fn record_escape(&mut self) -> Vec<String> {
        self.progress.escapes = self.progress.escapes.saturating_add(1);
        self.progress.level = self.progress.level.saturating_add(1).min(MAX_LEVEL);

        let mut unlocked = Vec::new();
        for (threshold, name) in ACHIEVEMENTS {
            if self.progress.escapes >= threshold && self.progress.achievements.insert(name.to_string()) {
                tracing::info!(achievement = name, "achievement unlocked");
                unlocked.push(name.to_string());
            }
        }
        unlocked
    }

    /// Losing neither rolls back nor advances progress.
    pub fn record_loss(&mut self) {
        tracing::debug!(level = self.progress.level, "level lost");
    }

    pub fn reset(&mut self) {
        self.progress = Progress::default();
    }
}
