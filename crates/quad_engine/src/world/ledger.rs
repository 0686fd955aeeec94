//! Deferred add/remove bookkeeping
//!
//! Nothing here touches the live entity or collider lists. Spawns, despawns
//! and collider changes are recorded as pending and only become visible when
//! the registry commits them.

use slotmap::SlotMap;

use crate::foundation::math::Vec2;
use crate::physics::collision::{Collider, ColliderShape};
use super::behavior::Behavior;
use super::entity::{ColliderId, Entity, EntityId};

/// Lifecycle state of a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Queued, joins the live list at the next commit
    PendingAdd,
    /// Simulated every tick
    Live,
    /// Leaves the live list at the next commit
    PendingRemove,
}

/// An entity together with its logic
pub(crate) struct EntityRecord {
    pub(crate) entity: Entity,
    pub(crate) behavior: Box<dyn Behavior>,
}

/// Collider arena with its pending queues
pub(crate) struct ColliderStore {
    pub(crate) arena: SlotMap<ColliderId, Collider>,
    pub(crate) adds: Vec<ColliderId>,
    pub(crate) removals: Vec<ColliderId>,
}

impl ColliderStore {
    fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            adds: Vec::new(),
            removals: Vec::new(),
        }
    }

    /// Create a collider for `entity` and queue it for the next index rebuild
    pub(crate) fn attach(&mut self, entity: &mut Entity, shape: ColliderShape, origin: Vec2) -> ColliderId {
        let mut collider = Collider::new(entity.id(), shape, origin);
        collider.align(entity.position(), entity.angle());

        let id = self.arena.insert(collider);
        entity.colliders.push(id);
        self.adds.push(id);
        id
    }

    /// Detach a collider from `entity` and queue its removal
    pub(crate) fn detach(&mut self, entity: &mut Entity, id: ColliderId) -> bool {
        let Some(index) = entity.colliders.iter().position(|&owned| owned == id) else {
            return false;
        };

        entity.colliders.remove(index);
        self.removals.push(id);
        true
    }

    /// Change one of `entity`'s colliders, then snap it back onto the entity
    pub(crate) fn modify(&mut self, entity: &Entity, id: ColliderId, f: impl FnOnce(&mut Collider)) -> bool {
        if !entity.colliders.contains(&id) {
            return false;
        }
        let Some(collider) = self.arena.get_mut(id) else {
            return false;
        };

        f(collider);
        collider.align(entity.position(), entity.angle());
        true
    }

    /// Move every collider of `entity` to its current position and angle
    pub(crate) fn align(&mut self, entity: &Entity) {
        for &id in &entity.colliders {
            if let Some(collider) = self.arena.get_mut(id) {
                collider.align(entity.position(), entity.angle());
            }
        }
    }

    /// Drop colliders outright, pending or not
    fn drop_all(&mut self, ids: &[ColliderId]) {
        for &id in ids {
            self.arena.remove(id);
        }
        self.adds.retain(|queued| !ids.contains(queued));
        self.removals.retain(|queued| !ids.contains(queued));
    }
}

/// Pending entity queues, lifecycle states and the collider store
pub(crate) struct Ledger {
    lifecycle: SlotMap<EntityId, Lifecycle>,
    pub(crate) entity_adds: Vec<EntityRecord>,
    pub(crate) entity_removals: Vec<EntityId>,
    pub(crate) colliders: ColliderStore,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self {
            lifecycle: SlotMap::with_key(),
            entity_adds: Vec::new(),
            entity_removals: Vec::new(),
            colliders: ColliderStore::new(),
        }
    }

    pub(crate) fn lifecycle(&self, id: EntityId) -> Option<Lifecycle> {
        self.lifecycle.get(id).copied()
    }

    pub(crate) fn is_live(&self, id: EntityId) -> bool {
        self.lifecycle(id) == Some(Lifecycle::Live)
    }

    pub(crate) fn set_lifecycle(&mut self, id: EntityId, state: Lifecycle) {
        if let Some(slot) = self.lifecycle.get_mut(id) {
            *slot = state;
        }
    }

    /// Queue a new entity; its staged colliders are attached right away
    pub(crate) fn spawn(&mut self, mut entity: Entity, behavior: Box<dyn Behavior>) -> EntityId {
        let id = self.lifecycle.insert(Lifecycle::PendingAdd);
        entity.set_id(id);

        for (shape, origin) in std::mem::take(&mut entity.staged_colliders) {
            self.colliders.attach(&mut entity, shape, origin);
        }

        log::debug!("Queued entity '{}' ({:?}) with {} colliders", entity.name(), id, entity.colliders.len());
        self.entity_adds.push(EntityRecord { entity, behavior });
        id
    }

    /// Queue removal of an entity
    ///
    /// An entity that is still pending add is dropped on the spot together
    /// with its colliders. Returns false for unknown or already queued ids.
    pub(crate) fn despawn(&mut self, id: EntityId) -> bool {
        match self.lifecycle(id) {
            Some(Lifecycle::Live) => {
                self.set_lifecycle(id, Lifecycle::PendingRemove);
                self.entity_removals.push(id);
                log::debug!("Queued removal of {:?}", id);
                true
            }
            Some(Lifecycle::PendingAdd) => {
                if let Some(index) = self.entity_adds.iter().position(|record| record.entity.id() == id) {
                    let record = self.entity_adds.remove(index);
                    self.colliders.drop_all(&record.entity.colliders);
                }
                self.lifecycle.remove(id);
                log::debug!("Dropped {:?} before it went live", id);
                true
            }
            Some(Lifecycle::PendingRemove) | None => false,
        }
    }

    /// Forget a removed entity once the registry committed it
    pub(crate) fn retire(&mut self, record: &EntityRecord) {
        self.colliders.drop_all(&record.entity.colliders);
        self.lifecycle.remove(record.entity.id());
    }

    /// Pending entity with the given id
    pub(crate) fn pending_entity(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entity_adds.iter().find(|record| record.entity.id() == id)
    }
}
