//! World state management.
//!
//! Owns every scene object and the quadtree that indexes them.

use crate::camera::{Camera, ViewReport};
use crate::config::Config;
use crate::object::{MovingQuad, SceneObject, StaticBody};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial::{Bounded, ObjectId, ObjectTable, QuadTree, Rectangle};
use tracing::{info, warn};

/// World border bounds, centered on the origin.
#[derive(Debug, Clone, Copy)]
pub struct WorldBorder {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
}

impl WorldBorder {
    pub fn new(width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            min_x: -half_w,
            min_y: -half_h,
            max_x: half_w,
            max_y: half_h,
            width,
            height,
        }
    }

    #[inline]
    pub fn bound(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }

    /// Check that a rectangle of `size` centered at `position` stays inside.
    #[inline]
    pub fn fits(&self, position: Vec2, size: Vec2) -> bool {
        let half = size * 0.5;
        position.x - half.x >= self.min_x
            && position.x + half.x <= self.max_x
            && position.y - half.y >= self.min_y
            && position.y + half.y <= self.max_y
    }

    /// Get a random center for a rectangle of `size` that keeps it inside.
    pub fn random_position<R: Rng>(&self, rng: &mut R, size: Vec2) -> Vec2 {
        let half = size * 0.5;
        Vec2::new(
            random_between(rng, self.min_x + half.x, self.max_x - half.x),
            random_between(rng, self.min_y + half.y, self.max_y - half.y),
        )
    }
}

#[inline]
fn random_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// The scene: objects, their index and the camera.
#[derive(Debug)]
pub struct World {
    objects: ObjectTable<SceneObject>,
    tree: QuadTree,
    border: WorldBorder,
    camera: Option<Camera>,
    /// Size given to spawned quads.
    object_size: Vec2,
    /// Interpolation speed given to spawned quads.
    object_speed: f32,
    moving: bool,
    camera_size: Vec2,
    camera_speed: f32,
    rng: StdRng,
}

impl World {
    /// Create an empty world from configuration.
    pub fn new(config: &Config) -> Self {
        let border = WorldBorder::new(config.world.width, config.world.height);
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let camera_size = Vec2::new(config.camera.width, config.camera.height);
        Self {
            objects: ObjectTable::with_capacity(config.objects.count + config.objects.static_count),
            tree: QuadTree::with_config(border.bound(), config.tree),
            border,
            camera: config
                .camera
                .enabled
                .then(|| Camera::new(camera_size, config.camera.speed)),
            object_size: Vec2::new(config.objects.width, config.objects.height),
            object_speed: config.objects.speed,
            moving: config.objects.moving,
            camera_size,
            camera_speed: config.camera.speed,
            rng,
        }
    }

    /// Create a world and spawn the configured population.
    pub fn populated(config: &Config) -> Self {
        let mut world = Self::new(config);
        world.spawn_objects(config.objects.count);
        world.spawn_static(config.objects.static_count);
        world
    }

    #[inline]
    pub fn objects(&self) -> &ObjectTable<SceneObject> {
        &self.objects
    }

    #[inline]
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    #[inline]
    pub fn border(&self) -> WorldBorder {
        self.border
    }

    #[inline]
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Start or stop object movement.
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Enable or disable the camera. A new camera starts at the origin.
    pub fn set_camera(&mut self, enabled: bool) {
        match (enabled, self.camera.is_some()) {
            (true, false) => self.camera = Some(Camera::new(self.camera_size, self.camera_speed)),
            (false, true) => self.camera = None,
            _ => {}
        }
    }

    /// Store an object and index it right away.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let bound = object.bound();
        let id = self.objects.insert(object);
        self.tree.insert(id, &bound);
        id
    }

    /// Add a quad at `position`. Positions that would put it outside the
    /// border are rejected.
    pub fn add_quad(&mut self, position: Vec2) -> Option<ObjectId> {
        if !self.border.fits(position, self.object_size) {
            warn!("Position ({}, {}) is out of range", position.x, position.y);
            return None;
        }
        let bound = Rectangle::from_center(position, self.object_size);
        Some(self.add_object(MovingQuad::new(bound).into()))
    }

    /// Add a fixed object.
    pub fn add_static(&mut self, bound: Rectangle) -> ObjectId {
        self.add_object(StaticBody::new(bound).into())
    }

    /// Spawn `count` quads at random positions.
    pub fn spawn_objects(&mut self, count: usize) {
        for _ in 0..count {
            let position = self.border.random_position(&mut self.rng, self.object_size);
            let bound = Rectangle::from_center(position, self.object_size);
            self.add_object(MovingQuad::new(bound).into());
        }
    }

    /// Spawn `count` fixed objects at random positions.
    pub fn spawn_static(&mut self, count: usize) {
        for _ in 0..count {
            let position = self.border.random_position(&mut self.rng, self.object_size);
            self.add_static(Rectangle::from_center(position, self.object_size));
        }
    }

    /// Remove every object and spawn `count` new quads.
    pub fn reset(&mut self, count: usize) {
        self.tree.clear();
        self.objects.clear();
        self.spawn_objects(count);
        info!("World reset with {} objects", count);
    }

    /// Advance object and camera motion by `dt` seconds.
    ///
    /// Quads that reached their target pick a new random one.
    pub fn update(&mut self, dt: f32) {
        if self.moving {
            let Self {
                objects,
                border,
                rng,
                object_speed,
                ..
            } = self;
            for (_, object) in objects.iter_mut() {
                let Some(quad) = object.as_quad_mut() else {
                    continue;
                };
                if quad.is_moving() {
                    quad.update(dt);
                } else {
                    let target = border.random_position(rng, quad.bound().size());
                    quad.move_to(target, *object_speed);
                }
            }
        }

        if let Some(camera) = self.camera.as_mut() {
            if camera.is_moving() {
                camera.update(dt);
            } else {
                let target = self.border.random_position(&mut self.rng, camera.bound().size());
                camera.move_to(target);
            }
        }
    }

    /// Clear the index and insert every object again.
    pub fn rebuild_index(&mut self) {
        self.tree.rebuild(&self.objects);
    }

    /// Broad-phase query of the index.
    pub fn query(&self, range: &Rectangle) -> Vec<ObjectId> {
        self.tree.query_range(range)
    }

    /// Query the index with the camera viewport.
    pub fn query_camera(&mut self) -> Option<ViewReport> {
        let camera = self.camera.as_mut()?;
        Some(camera.query(&self.tree, &self.objects))
    }

    /// Get the count of each object kind.
    pub fn object_counts(&self) -> ObjectCounts {
        let statics = self.objects.iter().filter(|(_, o)| o.is_static()).count();
        ObjectCounts {
            quads: self.objects.len() - statics,
            statics,
            total: self.objects.len(),
        }
    }
}

/// Object count statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub quads: usize,
    pub statics: usize,
    pub total: usize,
}
