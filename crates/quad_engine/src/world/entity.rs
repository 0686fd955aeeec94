//! Entities and their handles
//!
//! An [`Entity`] is plain simulation data: position, velocity, facing angle,
//! collision roles and the handles of its colliders. Game logic lives in a
//! [`Behavior`](super::Behavior) stored next to it by the registry.

use slotmap::new_key_type;

use crate::foundation::math::{utils, Rect, Vec2};
use crate::physics::collision::ColliderShape;
use crate::physics::collision_roles::CollisionRole;

new_key_type! {
    /// Generational handle of an entity
    pub struct EntityId;

    /// Generational handle of a collider
    pub struct ColliderId;
}

/// A simulated object
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    role: CollisionRole,
    existence_bounds: Option<Rect>,
    pub(crate) colliders: Vec<ColliderId>,
    pub(crate) staged_colliders: Vec<(ColliderShape, Vec2)>,
}

impl Entity {
    /// Create a collidable entity at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::default(),
            name: name.into(),
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            angle: 0.0,
            role: CollisionRole::default(),
            existence_bounds: None,
            colliders: Vec::new(),
            staged_colliders: Vec::new(),
        }
    }

    /// Builder: starting position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder: starting velocity (units per tick)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: starting facing angle in degrees
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.set_angle(degrees);
        self
    }

    /// Builder: replace the collision role set
    pub fn with_role(mut self, role: CollisionRole) -> Self {
        self.role = role;
        self
    }

    /// Builder: never the active side of a collision query
    pub fn as_static(mut self) -> Self {
        self.role.insert(CollisionRole::STATIC);
        self
    }

    /// Builder: hits notify instead of block
    pub fn as_trigger(mut self) -> Self {
        self.role.insert(CollisionRole::TRIGGER);
        self
    }

    /// Builder: despawn once the position leaves `bounds`
    pub fn with_existence_bounds(mut self, bounds: Rect) -> Self {
        self.existence_bounds = Some(bounds);
        self
    }

    /// Builder: attach a collider when the entity is spawned
    pub fn with_collider(mut self, shape: ColliderShape, origin: Vec2) -> Self {
        self.staged_colliders.push((shape, origin));
        self
    }

    /// Handle assigned at spawn (null before)
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the entity; colliders follow after the current hook returns
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Facing angle in degrees, in `[0, 360)`
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set facing angle in degrees
    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = utils::wrap_degrees(degrees);
    }

    /// Turn by `amount` degrees
    pub fn rotate(&mut self, amount: f32) {
        self.set_angle(self.angle + amount);
    }

    /// Unit vector along the facing angle
    pub fn forward(&self) -> Vec2 {
        let radians = utils::deg_to_rad(self.angle);
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Move at `speed` along the facing angle
    pub fn set_velocity_forward(&mut self, speed: f32) {
        self.velocity = self.forward() * speed;
    }

    /// Advance position by one tick of velocity
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Collision role set
    pub fn role(&self) -> CollisionRole {
        self.role
    }

    /// Replace the collision role set
    pub fn set_role(&mut self, role: CollisionRole) {
        self.role = role;
    }

    /// Check if the entity takes part in collision testing
    pub fn is_collidable(&self) -> bool {
        self.role.is_collidable()
    }

    /// Check if the entity is never the active side of a query
    pub fn is_static(&self) -> bool {
        self.role.is_static()
    }

    /// Check if hits against the entity are notifications
    pub fn is_trigger(&self) -> bool {
        self.role.is_trigger()
    }

    /// Enable or disable collision testing
    pub fn set_collidable(&mut self, collidable: bool) {
        self.role.set(CollisionRole::COLLIDABLE, collidable);
    }

    /// Region the entity must stay inside to keep existing
    pub fn existence_bounds(&self) -> Option<Rect> {
        self.existence_bounds
    }

    /// Change or clear the existence bounds
    pub fn set_existence_bounds(&mut self, bounds: Option<Rect>) {
        self.existence_bounds = bounds;
    }

    /// False once the position has left the existence bounds
    pub fn is_within_existence_bounds(&self) -> bool {
        self.existence_bounds
            .map_or(true, |bounds| bounds.contains_point(self.position))
    }

    /// Attached colliders, in attachment order
    pub fn colliders(&self) -> &[ColliderId] {
        &self.colliders
    }
}
