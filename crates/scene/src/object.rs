//! Scene objects.
//!
//! Every object exposes its bounds through [`Bounded`]; the index only ever
//! sees those bounds and the object's id.

use crate::motion::{Motion, Step};
use glam::Vec2;
use spatial::{Bounded, Rectangle};

/// A rectangle that wanders between targets.
#[derive(Debug, Clone)]
pub struct MovingQuad {
    bound: Rectangle,
    motion: Option<Motion>,
}

impl MovingQuad {
    pub fn new(bound: Rectangle) -> Self {
        Self {
            bound,
            motion: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.bound.center()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Current target, if moving.
    pub fn target(&self) -> Option<Vec2> {
        self.motion.as_ref().map(Motion::target)
    }

    /// Start moving from the current position toward `target`.
    pub fn move_to(&mut self, target: Vec2, speed: f32) {
        self.motion = Some(Motion::new(self.position(), target, speed));
    }

    /// Advance the current move by `dt` seconds.
    /// Returns true if the quad is still moving.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        match motion.advance(dt) {
            Step::Moving(p) => {
                self.bound.reposition(p.x, p.y);
                true
            }
            Step::Arrived(p) => {
                self.bound.reposition(p.x, p.y);
                self.motion = None;
                false
            }
        }
    }
}

impl Bounded for MovingQuad {
    #[inline]
    fn bound(&self) -> Rectangle {
        self.bound
    }
}

/// A logical record with fixed bounds.
#[derive(Debug, Clone)]
pub struct StaticBody {
    bound: Rectangle,
}

impl StaticBody {
    pub fn new(bound: Rectangle) -> Self {
        Self { bound }
    }
}

impl Bounded for StaticBody {
    #[inline]
    fn bound(&self) -> Rectangle {
        self.bound
    }
}

/// An object stored in the world.
#[derive(Debug, Clone)]
pub enum SceneObject {
    Quad(MovingQuad),
    Static(StaticBody),
}

impl SceneObject {
    /// Get the moving quad, if this is one.
    pub fn as_quad_mut(&mut self) -> Option<&mut MovingQuad> {
        match self {
            SceneObject::Quad(q) => Some(q),
            SceneObject::Static(_) => None,
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self, SceneObject::Static(_))
    }
}

impl Bounded for SceneObject {
    #[inline]
    fn bound(&self) -> Rectangle {
        match self {
            SceneObject::Quad(q) => q.bound(),
            SceneObject::Static(s) => s.bound(),
        }
    }
}

impl From<MovingQuad> for SceneObject {
    fn from(quad: MovingQuad) -> Self {
        SceneObject::Quad(quad)
    }
}

impl From<StaticBody> for SceneObject {
    fn from(body: StaticBody) -> Self {
        SceneObject::Static(body)
    }
}
