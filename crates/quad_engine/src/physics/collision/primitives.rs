//! Primitive collision shapes and intersection algorithms
//!
//! World-space circles and rectangles with overlap tests. Every test is
//! strict: shapes that only touch do not intersect, and degenerate shapes
//! (zero or negative size) never intersect anything.

use crate::foundation::math::{Rect, Vec2};

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// The center position of the circle in world space
    pub center: Vec2,
    /// The radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A circle with zero, negative or NaN radius
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0)
    }

    /// Axis-aligned bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::from_center_extents(self.center, Vec2::new(self.radius, self.radius))
    }

    /// Check if this circle overlaps another
    pub fn intersects(&self, other: &Circle) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }

        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }

    /// Check if this circle overlaps a rectangle
    ///
    /// Uses the point of the rectangle closest to the circle center.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        if self.is_degenerate() || rect.is_degenerate() {
            return false;
        }

        let closest = closest_point(rect, self.center);
        (self.center - closest).magnitude_squared() < self.radius * self.radius
    }
}

/// Point of `rect` closest to `point`
pub fn closest_point(rect: &Rect, point: Vec2) -> Vec2 {
    Vec2::new(
        point.x.clamp(rect.min.x, rect.max.x),
        point.y.clamp(rect.min.y, rect.max.y),
    )
}

/// Overlap region of two circles, approximated by their bounding boxes
pub fn circle_circle_overlap(a: &Circle, b: &Circle) -> Option<Rect> {
    if !a.intersects(b) {
        return None;
    }
    a.bounds().intersection(&b.bounds())
}

/// Overlap region of a rectangle and a circle
///
/// The region is the part of the rectangle covered by the circle's bounding
/// box, reported only when the circle itself reaches the rectangle.
pub fn rect_circle_overlap(rect: &Rect, circle: &Circle) -> Option<Rect> {
    if !circle.intersects_rect(rect) {
        return None;
    }
    rect.intersection(&circle.bounds())
}
