//! Collider attached to an entity

use crate::foundation::math::{Rect, Vec2};
use crate::world::EntityId;
use super::shape::{ColliderShape, ShapeKind, WorldSpaceShape};

/// A shape attached to an entity, used purely for overlap testing
///
/// The absolute center always equals the owner's position plus `origin`; the
/// registry re-aligns it whenever the owner moves. Rotation is carried for
/// rendering and does not affect intersection tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    owner: EntityId,
    shape: ColliderShape,
    origin: Vec2,
    center: Vec2,
    rotation: f32,
}

impl Collider {
    /// Create a collider for `owner`, offset by `origin` from the owner position
    pub fn new(owner: EntityId, shape: ColliderShape, origin: Vec2) -> Self {
        Self {
            owner,
            shape,
            origin,
            center: origin,
            rotation: 0.0,
        }
    }

    /// Entity that owns this collider
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Model-space shape
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Shape kind tag
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Width and height (radius for both on circles)
    pub fn extent(&self) -> Vec2 {
        self.shape.extent()
    }

    /// Absolute center in world space
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Move the absolute center
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Offset from the owner's position
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Change the offset; takes effect at the next alignment
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Visual rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Snap to the owner's current position and angle
    pub fn align(&mut self, owner_position: Vec2, owner_angle: f32) {
        self.center = owner_position + self.origin;
        self.rotation = owner_angle;
    }

    /// Shape placed at the absolute center
    pub fn world_shape(&self) -> WorldSpaceShape {
        self.shape.to_world_space(self.center)
    }

    /// Axis-aligned bounds in world space
    pub fn bounds(&self) -> Rect {
        self.world_shape().bounds()
    }

    /// Overlapping region with another collider, `None` when disjoint
    pub fn intersect(&self, other: &Collider) -> Option<Rect> {
        self.world_shape().intersection(&other.world_shape())
    }

    /// Either collider has a zero or negative dimension
    pub fn is_degenerate_pair(&self, other: &Collider) -> bool {
        self.shape.is_degenerate() || other.shape.is_degenerate()
    }
}
