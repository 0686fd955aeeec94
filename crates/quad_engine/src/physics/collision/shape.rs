//! Collider shape abstractions
//!
//! Shapes are stored in model space (dimensions only) and placed in the world
//! on demand during collision tests, from the collider's absolute center.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect, Vec2};
use super::primitives::{self, Circle};

/// Kind of a collider shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    Rectangle,
    /// Circle
    Circle,
}

/// Collider shape (stored in MODEL SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Axis-aligned rectangle centered on the collider
    Rectangle {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Circle centered on the collider
    Circle {
        /// Radius
        radius: f32,
    },
}

impl ColliderShape {
    /// Creates a rectangular shape
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::Rectangle { width, height }
    }

    /// Creates a circular shape
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Shape kind tag
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Width and height; a circle reports its radius for both
    pub fn extent(&self) -> Vec2 {
        match *self {
            Self::Rectangle { width, height } => Vec2::new(width, height),
            Self::Circle { radius } => Vec2::new(radius, radius),
        }
    }

    /// Half-size of the shape's bounding box
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Self::Rectangle { width, height } => Vec2::new(width * 0.5, height * 0.5),
            Self::Circle { radius } => Vec2::new(radius, radius),
        }
    }

    /// Any dimension zero, negative or NaN
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Rectangle { width, height } => !(width > 0.0 && height > 0.0),
            Self::Circle { radius } => !(radius > 0.0),
        }
    }

    /// Place this shape in the world at `center`
    pub fn to_world_space(&self, center: Vec2) -> WorldSpaceShape {
        match *self {
            Self::Rectangle { .. } => {
                WorldSpaceShape::Rectangle(Rect::from_center_extents(center, self.half_extents()))
            }
            Self::Circle { radius } => WorldSpaceShape::Circle(Circle::new(center, radius)),
        }
    }
}

/// World-space shape (temporary, for testing only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space rectangle
    Rectangle(Rect),
    /// World-space circle
    Circle(Circle),
}

impl WorldSpaceShape {
    /// Get center position
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Rectangle(rect) => rect.center(),
            Self::Circle(circle) => circle.center,
        }
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rectangle(rect) => *rect,
            Self::Circle(circle) => circle.bounds(),
        }
    }

    /// Overlapping region of two shapes, `None` when disjoint
    ///
    /// Exact for two rectangles; otherwise the overlap of the bounding boxes,
    /// reported only when the shapes themselves overlap.
    pub fn intersection(&self, other: &WorldSpaceShape) -> Option<Rect> {
        match (self, other) {
            (Self::Rectangle(a), Self::Rectangle(b)) => a.intersection(b),
            (Self::Circle(a), Self::Circle(b)) => primitives::circle_circle_overlap(a, b),
            (Self::Rectangle(rect), Self::Circle(circle))
            | (Self::Circle(circle), Self::Rectangle(rect)) => {
                primitives::rect_circle_overlap(rect, circle)
            }
        }
    }
}
