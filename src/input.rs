use crate::entity::Direction;
use std::time::{Duration, Instant};

/// Repeat-while-held policy for movement keys.
///
/// A press fires once immediately. While the key stays down it fires again
/// after `delay`, then every `interval`. Releasing stops it; pressing a
/// different direction takes over.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    delay: Duration,
    interval: Duration,
    held: Option<Held>,
}

#[derive(Debug, Clone, Copy)]
struct Held {
    direction: Direction,
    next_fire: Instant,
}

impl KeyRepeat {
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Self {
            delay,
            interval,
            held: None,
        }
    }

    /// Returns the command to issue right away, if any.
    pub fn press(&mut self, direction: Direction, now: Instant) -> Option<Direction> {
        if matches!(self.held, Some(held) if held.direction == direction) {
            return None;
        }
        self.held = Some(Held {
            direction,
            next_fire: now + self.delay,
        });
        Some(direction)
    }

    pub fn release(&mut self, direction: Direction) {
        if matches!(self.held, Some(held) if held.direction == direction) {
            self.held = None;
        }
    }

    pub fn release_all(&mut self) {
        self.held = None;
    }

    /// Fires at most once per call. Missed repeats are not replayed.
    pub fn poll(&mut self, now: Instant) -> Option<Direction> {
        let held = self.held.as_mut()?;
        if now < held.next_fire {
            return None;
        }
        held.next_fire = now + self.interval;
        Some(held.direction)
    }
}
