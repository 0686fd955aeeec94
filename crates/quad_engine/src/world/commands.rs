//! World access from inside behaviour hooks

use crate::foundation::math::Vec2;
use crate::physics::collision::{Collider, ColliderShape};
use super::behavior::Behavior;
use super::entity::{ColliderId, Entity, EntityId};
use super::ledger::{Ledger, Lifecycle};

/// Deferred world operations available to a running hook
///
/// Everything requested here is queued. Spawned entities and added colliders
/// join the simulation at the next commit point; despawns and collider
/// removals leave it there.
pub struct Commands<'a> {
    ledger: &'a mut Ledger,
    frame: u64,
}

impl<'a> Commands<'a> {
    pub(crate) fn new(ledger: &'a mut Ledger, frame: u64) -> Self {
        Self { ledger, frame }
    }

    /// Tick currently being simulated
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Queue a new entity
    pub fn spawn(&mut self, entity: Entity, behavior: impl Behavior + 'static) -> EntityId {
        self.ledger.spawn(entity, Box::new(behavior))
    }

    /// Queue removal of an entity (the hook's own included)
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.ledger.despawn(id)
    }

    /// Attach a collider to the hook's entity
    pub fn add_collider(&mut self, entity: &mut Entity, shape: ColliderShape, origin: Vec2) -> ColliderId {
        self.ledger.colliders.attach(entity, shape, origin)
    }

    /// Detach one of the hook entity's colliders
    pub fn remove_collider(&mut self, entity: &mut Entity, id: ColliderId) -> bool {
        self.ledger.colliders.detach(entity, id)
    }

    /// Change one of the hook entity's colliders (its origin offset, usually)
    ///
    /// The collider is re-aligned to `entity` right after `f` runs.
    pub fn modify_collider(&mut self, entity: &Entity, id: ColliderId, f: impl FnOnce(&mut Collider)) -> bool {
        self.ledger.colliders.modify(entity, id, f)
    }

    /// Lifecycle state of any entity
    pub fn lifecycle(&self, id: EntityId) -> Option<Lifecycle> {
        self.ledger.lifecycle(id)
    }
}
