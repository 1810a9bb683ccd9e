use crate::config::Config;
use crate::entity::{Direction, Position};
use crate::error::Result;
use crate::hazard::{self, Outcome};
use crate::level::{Level, LevelGenerator};
use crate::progress::{Progress, ProgressionTracker};
use crate::pursuer;
use crate::renderer::Snapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameState {
    /// No level loaded; the menu is showing.
    #[default]
    Idle,
    Running,
    Won,
    Lost,
}

/// Everything one committed turn changed, for animation and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub outcome: Outcome,
    pub player_from: Position,
    pub player_to: Position,
    pub pursuer_from: Position,
    pub pursuer_to: Position,
    /// Achievements unlocked by this turn's escape, if any.
    pub unlocked: Vec<String>,
}

impl TurnReport {
    /// True when progress changed and should be written out.
    pub fn ends_level(&self) -> bool {
        self.outcome == Outcome::Win || self.outcome.is_fatal()
    }
}

pub struct Game {
    pub state: GameState,
    level: Option<Level>,
    generator: LevelGenerator,
    tracker: ProgressionTracker,
    rng: StdRng,
    last_outcome: Option<Outcome>,
    notification: Option<String>,
}

impl Game {
    pub fn new(config: &Config, progress: Progress, rng: StdRng) -> Self {
        Self {
            state: GameState::Idle,
            level: None,
            generator: LevelGenerator::from_config(config),
            tracker: ProgressionTracker::new(progress),
            rng,
            last_outcome: None,
            notification: None,
        }
    }

    pub fn with_seed(config: &Config, progress: Progress, seed: u64) -> Self {
        Self::new(config, progress, StdRng::seed_from_u64(seed))
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn progress(&self) -> &Progress {
        self.tracker.progress()
    }

    /// Generates a level for the current progression level and starts it.
    pub fn start(&mut self) -> Result<()> {
        let level = self.generator.generate(self.tracker.level(), &mut self.rng)?;
        tracing::info!(
            level = self.tracker.level(),
            grid_size = level.grid_size,
            "level started"
        );
        self.play_level(level);
        Ok(())
    }

    /// Starts a prepared level, bypassing the generator.
    pub(crate) fn play_level(&mut self, level: Level) {
        self.level = Some(level);
        self.state = GameState::Running;
        self.last_outcome = None;
        self.notification = None;
    }

    /// Processes one player command to completion. Returns `None` when no
    /// level is running and the command was ignored.
    pub fn apply_command(&mut self, direction: Direction) -> Option<TurnReport> {
        if self.state != GameState::Running {
            return None;
        }
        let level = self.level.as_mut()?;

        let player_from = level.player;
        let candidate = player_from.moved(direction);
        if level.in_bounds(candidate) {
            level.player = candidate;
        }

        // The duck steps even when the player bumped into a wall.
        let pursuer_from = level.pursuer;
        let step = pursuer::next_step(level, pursuer_from, level.player);
        let pursuer_to = pursuer_from.offset(step);
        if level.in_bounds(pursuer_to) {
            level.pursuer = pursuer_to;
        }

        let player = level.player;
        let outcome = hazard::evaluate(level, player);
        tracing::debug!(
            ?direction,
            ?player,
            pursuer = ?level.pursuer,
            ?outcome,
            "turn resolved"
        );

        let mut report = TurnReport {
            outcome,
            player_from,
            player_to: level.player,
            pursuer_from,
            pursuer_to: level.pursuer,
            unlocked: Vec::new(),
        };

        match outcome {
            Outcome::SpikeDeath | Outcome::TurretBeamDeath | Outcome::CaughtByPursuer => {
                self.state = GameState::Lost;
                self.tracker.record_loss();
                self.notification = None;
            }
            Outcome::Win => {
                self.state = GameState::Won;
                report.unlocked = self.tracker.record_escape();
                tracing::info!(
                    escapes = self.tracker.escapes(),
                    next_level = self.tracker.level(),
                    "escaped"
                );
                // The first threshold gets the banner; later ones are quieter.
                self.notification = report.unlocked.first().cloned();
            }
            Outcome::TurretDestroyed(index) => {
                tracing::info!(index, "turret destroyed");
            }
            Outcome::Continue => {}
        }
        self.last_outcome = Some(outcome);

        Some(report)
    }

    /// Moves past a finished level: a win continues to the next level, a
    /// loss returns to the menu.
    pub fn acknowledge(&mut self) -> Result<()> {
        match self.state {
            GameState::Won => self.start(),
            GameState::Lost => {
                self.return_to_menu();
                Ok(())
            }
            GameState::Idle | GameState::Running => Ok(()),
        }
    }

    pub fn return_to_menu(&mut self) {
        self.state = GameState::Idle;
        self.level = None;
        self.last_outcome = None;
        self.notification = None;
    }

    /// Wipes progress back to level 1 and returns to the menu.
    pub fn reset_progress(&mut self) {
        self.tracker.reset();
        self.return_to_menu();
    }

    fn status_line(&self) -> String {
        let progress = self.tracker.progress();
        let running = format!(
            "Level {}   Escapes: {}   Use arrows or WASD",
            progress.level, progress.escapes
        );
        match (self.state, self.last_outcome) {
            (GameState::Idle, _) => String::new(),
            (GameState::Won, _) => "You escaped! Press any key for next level.".to_string(),
            (GameState::Lost, Some(outcome)) => {
                format!("{} Press any key for menu.", outcome.message())
            }
            (GameState::Lost, None) => "Press any key for menu.".to_string(),
            (GameState::Running, Some(outcome @ Outcome::TurretDestroyed(_))) => {
                outcome.message().to_string()
            }
            (GameState::Running, _) => running,
        }
    }

    /// Read-only view of everything the renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        let progress = self.tracker.progress();
        let mut snapshot = Snapshot {
            state: self.state,
            level: progress.level,
            escapes: progress.escapes,
            achievements: progress.achievements.iter().cloned().collect(),
            status: self.status_line(),
            notification: self.notification.clone(),
            ..Snapshot::default()
        };

        if let Some(level) = &self.level {
            snapshot.grid_size = level.grid_size;
            snapshot.player = level.player;
            snapshot.pursuer = level.pursuer;
            snapshot.exit = level.exit;
            snapshot.spikes = level.spikes.iter().copied().collect();
            snapshot.spikes.sort();
            snapshot.turrets = level.live_turrets().map(|(_, t)| *t).collect();
            snapshot.beams = snapshot
                .turrets
                .iter()
                .flat_map(|t| t.beam(level.grid_size))
                .collect();
        }

        snapshot
    }
}
