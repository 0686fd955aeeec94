//! Per-entity game logic hooks

use crate::physics::collision_system::Contact;
use crate::physics::response;
use super::commands::Commands;
use super::entity::Entity;

/// Game logic attached to an entity
///
/// Every hook receives the entity it belongs to and a [`Commands`] context
/// for spawning, despawning and collider changes. Those requests are queued
/// and take effect at the registry's commit points, never in the middle of
/// a phase.
///
/// Hook order within one tick:
///
/// 1. [`fixed_update`](Behavior::fixed_update) (motion phase)
/// 2. [`on_collision`](Behavior::on_collision) /
///    [`on_trigger`](Behavior::on_trigger) (collision pass)
/// 3. [`update`](Behavior::update) then
///    [`post_update`](Behavior::post_update) (presentation phase)
pub trait Behavior {
    /// Motion-phase hook; integrates velocity by default
    fn fixed_update(&mut self, entity: &mut Entity, _commands: &mut Commands<'_>) {
        entity.integrate();
    }

    /// Presentation-phase hook
    fn update(&mut self, _entity: &mut Entity, _commands: &mut Commands<'_>) {}

    /// Runs after every live entity finished its presentation-phase hook
    fn post_update(&mut self, _entity: &mut Entity, _commands: &mut Commands<'_>) {}

    /// This entity's collider hit a blocking collider of `other`
    ///
    /// Defaults to [`response::resolve_penetration`].
    fn on_collision(
        &mut self,
        entity: &mut Entity,
        contact: &Contact,
        other: &Entity,
        _commands: &mut Commands<'_>,
    ) {
        response::resolve_penetration(entity, &contact.overlap, other);
    }

    /// A trigger was involved in a hit between this entity and `other`
    fn on_trigger(
        &mut self,
        _entity: &mut Entity,
        _contact: &Contact,
        _other: &Entity,
        _commands: &mut Commands<'_>,
    ) {
    }
}

/// Behaviour that keeps every default hook
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl Behavior for Inert {}
