use crate::entity::Position;
use crate::game::TurnReport;

/// Slides the player, then the duck, across the cells of the last committed
/// turn. Purely visual: the game has already moved both to their final cells.
/// Separated from the renderer for testing.
#[derive(Clone, Debug)]
pub struct MoveAnimation {
    player: Segment,
    pursuer: Segment,
    steps: u32,
    frame: u32,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    from: Position,
    to: Position,
}

impl Segment {
    fn is_still(&self) -> bool {
        self.from == self.to
    }

    fn at(&self, t: f32) -> (f32, f32) {
        let t = t.clamp(0.0, 1.0);
        (
            self.from.x as f32 + (self.to.x - self.from.x) as f32 * t,
            self.from.y as f32 + (self.to.y - self.from.y) as f32 * t,
        )
    }
}

impl MoveAnimation {
    pub fn new(report: &TurnReport, steps: u32) -> Self {
        Self {
            player: Segment {
                from: report.player_from,
                to: report.player_to,
            },
            pursuer: Segment {
                from: report.pursuer_from,
                to: report.pursuer_to,
            },
            steps: steps.max(1),
            frame: 0,
        }
    }

    /// Total frames: one leg per mover that actually changed cell.
    pub fn total_frames(&self) -> u32 {
        let legs = [self.player, self.pursuer]
            .iter()
            .filter(|segment| !segment.is_still())
            .count() as u32;
        legs * self.steps
    }

    /// While busy, the input layer holds back new commands.
    pub fn is_busy(&self) -> bool {
        self.frame < self.total_frames()
    }

    /// Advance one frame. Returns whether frames remain.
    pub fn advance(&mut self) -> bool {
        if self.is_busy() {
            self.frame += 1;
        }
        self.is_busy()
    }

    pub fn finish(&mut self) {
        self.frame = self.total_frames();
    }

    /// Fractional positions of the player and duck for the current frame.
    pub fn interpolated(&self) -> ((f32, f32), (f32, f32)) {
        let steps = self.steps as f32;
        let (player_t, pursuer_frame) = if self.player.is_still() {
            (1.0, self.frame)
        } else {
            (
                self.frame as f32 / steps,
                self.frame.saturating_sub(self.steps),
            )
        };
        let pursuer_t = if self.pursuer.is_still() {
            1.0
        } else {
            pursuer_frame as f32 / steps
        };
        (self.player.at(player_t), self.pursuer.at(pursuer_t))
    }

    /// Interpolated positions snapped to the nearest cell, for grid renderers.
    pub fn cells(&self) -> (Position, Position) {
        let ((px, py), (dx, dy)) = self.interpolated();
        (
            Position::new(px.round() as i32, py.round() as i32),
            Position::new(dx.round() as i32, dy.round() as i32),
        )
    }
}
