//! Camera viewport that samples the index every tick.

use crate::object::{MovingQuad, SceneObject};
use glam::Vec2;
use spatial::{Bounded, ObjectId, ObjectTable, QuadTree, QueryBuffer, Rectangle};

/// Result of a viewport query.
#[derive(Debug, Clone, Default)]
pub struct ViewReport {
    /// Broad-phase result: every member of every leaf the view overlaps.
    pub candidates: Vec<ObjectId>,
    /// Candidates whose current bounds really overlap the view.
    pub hits: Vec<ObjectId>,
}

impl ViewReport {
    /// Candidates that turned out not to overlap the view.
    pub fn misses(&self) -> usize {
        self.candidates.len() - self.hits.len()
    }
}

/// A moving viewport.
#[derive(Debug)]
pub struct Camera {
    view: MovingQuad,
    speed: f32,
    buffer: QueryBuffer,
}

impl Camera {
    pub fn new(size: Vec2, speed: f32) -> Self {
        Self {
            view: MovingQuad::new(Rectangle::from_center(Vec2::ZERO, size)),
            speed,
            buffer: QueryBuffer::new(),
        }
    }

    #[inline]
    pub fn bound(&self) -> Rectangle {
        self.view.bound()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.view.is_moving()
    }

    /// Head toward a new target.
    pub fn move_to(&mut self, target: Vec2) {
        self.view.move_to(target, self.speed);
    }

    /// Advance the current move. Returns true while still moving.
    pub fn update(&mut self, dt: f32) -> bool {
        self.view.update(dt)
    }

    /// Query the index with the viewport and classify the result.
    pub fn query(&mut self, tree: &QuadTree, objects: &ObjectTable<SceneObject>) -> ViewReport {
        let view = self.view.bound();
        tree.query_range_into(&view, &mut self.buffer);

        let candidates = self.buffer.results().to_vec();
        let hits = candidates
            .iter()
            .copied()
            .filter(|&id| objects.get(id).is_some_and(|o| o.bound().intersects(&view)))
            .collect();
        ViewReport { candidates, hits }
    }
}
