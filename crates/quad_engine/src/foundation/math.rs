//! Math utilities and types
//!
//! Provides the 2D vector alias and the axis-aligned rectangle used for
//! world bounds, collider bounds and overlap regions.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle described by its minimum and maximum corners
///
/// The y axis grows downwards (screen space), so `min.y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum (top-left) corner
    pub min: Vec2,
    /// Maximum (bottom-right) corner
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its top-left corner and size
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Create a rectangle centered at a point with given half extents
    pub fn from_center_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the rectangle
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Width of the rectangle (negative when inverted)
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle (negative when inverted)
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Area of the rectangle, zero for degenerate rectangles
    pub fn area(&self) -> f32 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// A rectangle with zero, negative or NaN width or height
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if another rectangle lies entirely inside this one (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x && other.max.x <= self.max.x &&
        other.min.y >= self.min.y && other.max.y <= self.max.y
    }

    /// Check if this rectangle overlaps another with positive area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Overlapping region of two rectangles
    ///
    /// Touching edges and degenerate inputs produce `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }

        let overlap = Rect {
            min: Vec2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Vec2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };

        (!overlap.is_degenerate()).then_some(overlap)
    }
}

/// Math utility functions
pub mod utils {
    /// Wrap an angle in degrees into `[0, 360)`
    pub fn wrap_degrees(angle: f32) -> f32 {
        let wrapped = angle.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(5.0, 2.0, 10.0, 4.0);

        let overlap = a.intersection(&b).expect("rectangles overlap");
        assert_relative_eq!(overlap.width(), 5.0);
        assert_relative_eq!(overlap.height(), 4.0);
        assert_eq!(overlap.min, Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_degenerate_rect_never_intersects() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::from_origin_size(2.0, 2.0, 0.0, 5.0);
        let inverted = Rect::from_origin_size(2.0, 2.0, -4.0, 5.0);

        assert!(flat.is_degenerate());
        assert!(inverted.is_degenerate());
        assert!(!a.intersects(&flat));
        assert!(!a.intersects(&inverted));
        assert_eq!(inverted.area(), 0.0);
    }

    #[test]
    fn test_contains() {
        let bounds = Rect::from_origin_size(0.0, 0.0, 100.0, 50.0);
        assert!(bounds.contains_point(Vec2::new(100.0, 50.0)));
        assert!(!bounds.contains_point(Vec2::new(100.1, 25.0)));
        assert!(bounds.contains_rect(&Rect::from_origin_size(10.0, 10.0, 5.0, 5.0)));
        assert!(!bounds.contains_rect(&Rect::from_origin_size(95.0, 10.0, 10.0, 5.0)));
    }

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(utils::wrap_degrees(370.0), 10.0);
        assert_relative_eq!(utils::wrap_degrees(-90.0), 270.0);
        assert_eq!(utils::wrap_degrees(360.0), 0.0);
        assert!(utils::wrap_degrees(-1e-9) < 360.0);
    }
}
