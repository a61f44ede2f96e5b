//! Center-anchored axis-aligned rectangle.

use glam::Vec2;

/// Axis-aligned box described by its center and size.
///
/// The world is y-up: "top" quadrants have the larger `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rectangle {
    /// Create a rectangle centered at `(x, y)`.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle size must be non-negative, got {width}x{height}"
        );
        Self { x, y, width, height }
    }

    /// Create a rectangle from a center point and a size.
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x, center.y, size.x, size.y)
    }

    /// Center X.
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Center Y.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.x - self.width * 0.5
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.y - self.height * 0.5
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    /// Check if a point lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x() && x <= self.max_x() && y >= self.min_y() && y <= self.max_y()
    }

    /// Check if two rectangles overlap with a non-zero area.
    ///
    /// Rectangles that only share an edge do not intersect, and a zero-area
    /// rectangle never intersects anything.
    #[inline]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min_x().max(other.min_x()) < self.max_x().min(other.max_x())
            && self.min_y().max(other.min_y()) < self.max_y().min(other.max_y())
    }

    /// Move the center, keeping the size. Returns the updated rectangle.
    ///
    /// No check is made against any containing region.
    #[inline]
    pub fn reposition(&mut self, x: f32, y: f32) -> Rectangle {
        self.x = x;
        self.y = y;
        *self
    }

    /// Change the size, keeping the center. Returns the updated rectangle.
    #[inline]
    pub fn resize(&mut self, width: f32, height: f32) -> Rectangle {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle size must be non-negative, got {width}x{height}"
        );
        self.width = width;
        self.height = height;
        *self
    }

    /// Split into four equal quadrants: left-top, right-top, right-bottom,
    /// left-bottom.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        let (qx, qy) = (w * 0.5, h * 0.5);
        [
            Rectangle::new(self.x - qx, self.y + qy, w, h),
            Rectangle::new(self.x + qx, self.y + qy, w, h),
            Rectangle::new(self.x + qx, self.y - qy, w, h),
            Rectangle::new(self.x - qx, self.y - qy, w, h),
        ]
    }
}
