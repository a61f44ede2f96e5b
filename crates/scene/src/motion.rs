//! Linear interpolation toward a target position.

use glam::Vec2;

/// Interpolation progress past which the move snaps to its target.
pub const ARRIVAL_FACTOR: f32 = 0.99;

/// A move from one point to another.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    from: Vec2,
    to: Vec2,
    /// Progress per second.
    speed: f32,
    factor: f32,
}

/// Outcome of advancing a [`Motion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still on the way, at this position.
    Moving(Vec2),
    /// Reached the target.
    Arrived(Vec2),
}

impl Step {
    #[inline]
    pub fn position(self) -> Vec2 {
        match self {
            Step::Moving(p) | Step::Arrived(p) => p,
        }
    }
}

impl Motion {
    pub fn new(from: Vec2, to: Vec2, speed: f32) -> Self {
        Self {
            from,
            to,
            speed,
            factor: 0.0,
        }
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.to
    }

    /// Progress in `[0, 1)` while moving.
    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Step {
        self.factor += dt * self.speed;
        if self.factor > ARRIVAL_FACTOR {
            Step::Arrived(self.to)
        } else {
            Step::Moving(self.from.lerp(self.to, self.factor))
        }
    }
}
