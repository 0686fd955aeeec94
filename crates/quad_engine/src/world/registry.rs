//! Entity and collider registry
//!
//! Owns every entity, behaviour and collider of a world and runs the per-tick
//! phases in a fixed order:
//!
//! 1. **Motion**: every live entity runs [`Behavior::fixed_update`]; its
//!    colliders follow; entities that left their existence bounds are queued
//!    for removal.
//! 2. **Index rebuild**: pending collider changes are committed and the
//!    quad-tree is rebuilt from scratch from the live colliders.
//! 3. **Collision pass**: every collider of an active (collidable, non-static)
//!    entity queries the quad-tree and dispatches collision or trigger
//!    callbacks.
//! 4. **Commit**: pending entities go live and pending removals leave.
//! 5. **Presentation**: every live entity runs [`Behavior::update`], then
//!    every live entity runs [`Behavior::post_update`].
//!
//! Steps 1-4 make up [`Registry::fixed_update`], step 5 is
//! [`Registry::update`]. Spawns and despawns requested at any point are
//! deferred to the next commit, so no phase ever sees the entity list change
//! under it. An entity queued for removal is skipped by every phase that
//! runs before its removal commits.
//!
//! Dispatch is one-directional: a plain hit only notifies the owner of the
//! querying collider. The other side hears about it when its own collider
//! runs its query, which never happens for static entities. Trigger hits
//! notify both sides.

use slotmap::SecondaryMap;

use crate::config::WorldConfig;
use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::{Collider, ColliderShape};
use crate::physics::collision_roles::{dispatch_for, CollisionRole, Dispatch};
use crate::physics::collision_system::{CollisionStats, CollisionSystem, Contact};
use crate::spatial::{QuadTree, QuadTreeConfig};
use super::behavior::Behavior;
use super::commands::Commands;
use super::entity::{ColliderId, Entity, EntityId};
use super::ledger::{EntityRecord, Ledger, Lifecycle};

/// Counters of the most recent tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number passed to [`Registry::fixed_update`]
    pub frame: u64,
    /// Entities that ran their motion hook
    pub motion_updates: usize,
    /// Entities that ran their presentation hook
    pub presentation_updates: usize,
    /// Pending entities that went live
    pub entities_committed: usize,
    /// Entities removed for good
    pub entities_removed: usize,
    /// Pending colliders that entered the live list
    pub colliders_committed: usize,
    /// Colliders destroyed, explicitly or with their owner
    pub colliders_removed: usize,
    /// Collision pass counters
    pub collision: CollisionStats,
}

type PhaseHook = fn(&mut EntityRecord, &mut Commands<'_>);
type HitHook = fn(&mut EntityRecord, &Contact, &Entity, &mut Commands<'_>);

/// Owner of all entities and colliders of one world
pub struct Registry {
    records: SecondaryMap<EntityId, EntityRecord>,
    live: Vec<EntityId>,
    live_colliders: Vec<ColliderId>,
    ledger: Ledger,
    collisions: CollisionSystem,
    stats: TickStats,
}

impl Registry {
    /// Create an empty world whose quad-tree covers `world_bounds`
    pub fn new(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            records: SecondaryMap::new(),
            live: Vec::new(),
            live_colliders: Vec::new(),
            ledger: Ledger::new(),
            collisions: CollisionSystem::new(world_bounds, config),
            stats: TickStats::default(),
        }
    }

    /// Create an empty world from configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.bounds, config.quadtree)
    }

    /// Queue a new entity; it goes live at the next commit
    pub fn spawn(&mut self, entity: Entity, behavior: impl Behavior + 'static) -> EntityId {
        self.ledger.spawn(entity, Box::new(behavior))
    }

    /// Queue removal of an entity
    ///
    /// A pending entity is dropped immediately and never goes live. Returns
    /// false when the id is unknown or already queued for removal.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.ledger.despawn(id)
    }

    /// Queue removal of every entity, live or pending; returns how many
    pub fn despawn_all(&mut self) -> usize {
        let pending: Vec<EntityId> = self.ledger.entity_adds.iter().map(|record| record.entity.id()).collect();

        self.live
            .iter()
            .chain(pending.iter())
            .filter(|&&id| self.ledger.despawn(id))
            .count()
    }

    /// Attach a collider to an entity; it joins the index at the next rebuild
    pub fn add_collider(&mut self, id: EntityId, shape: ColliderShape, origin: Vec2) -> Option<ColliderId> {
        if let Some(record) = self.records.get_mut(id) {
            return Some(self.ledger.colliders.attach(&mut record.entity, shape, origin));
        }

        let ledger = &mut self.ledger;
        let record = ledger.entity_adds.iter_mut().find(|record| record.entity.id() == id)?;
        Some(ledger.colliders.attach(&mut record.entity, shape, origin))
    }

    /// Detach a collider; it leaves the index at the next rebuild
    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        let Some(owner) = self.ledger.colliders.arena.get(id).map(Collider::owner) else {
            return false;
        };

        if let Some(record) = self.records.get_mut(owner) {
            return self.ledger.colliders.detach(&mut record.entity, id);
        }

        let ledger = &mut self.ledger;
        match ledger.entity_adds.iter_mut().find(|record| record.entity.id() == owner) {
            Some(record) => ledger.colliders.detach(&mut record.entity, id),
            None => false,
        }
    }

    /// Change an entity from outside a hook; its colliders follow
    pub fn modify(&mut self, id: EntityId, f: impl FnOnce(&mut Entity)) -> bool {
        if let Some(record) = self.records.get_mut(id) {
            f(&mut record.entity);
            self.ledger.colliders.align(&record.entity);
            return true;
        }

        let ledger = &mut self.ledger;
        match ledger.entity_adds.iter_mut().find(|record| record.entity.id() == id) {
            Some(record) => {
                f(&mut record.entity);
                ledger.colliders.align(&record.entity);
                true
            }
            None => false,
        }
    }

    /// Change a collider from outside a hook
    ///
    /// The collider is re-aligned to its owner afterwards, so a new origin
    /// offset shows in [`Collider::center`] right away.
    pub fn modify_collider(&mut self, id: ColliderId, f: impl FnOnce(&mut Collider)) -> bool {
        let Some(owner) = self.ledger.colliders.arena.get(id).map(Collider::owner) else {
            return false;
        };

        if let Some(record) = self.records.get(owner) {
            return self.ledger.colliders.modify(&record.entity, id, f);
        }

        let ledger = &mut self.ledger;
        match ledger.entity_adds.iter().find(|record| record.entity.id() == owner) {
            Some(record) => ledger.colliders.modify(&record.entity, id, f),
            None => false,
        }
    }

    /// Entity by id, live or pending
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.records
            .get(id)
            .or_else(|| self.ledger.pending_entity(id))
            .map(|record| &record.entity)
    }

    /// Collider by id, live or pending
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.ledger.colliders.arena.get(id)
    }

    /// Lifecycle state, `None` once an entity is gone
    pub fn lifecycle(&self, id: EntityId) -> Option<Lifecycle> {
        self.ledger.lifecycle(id)
    }

    /// Live entities in commit order
    pub fn live_entities(&self) -> &[EntityId] {
        &self.live
    }

    /// Colliders present in the last index rebuild
    pub fn live_colliders(&self) -> &[ColliderId] {
        &self.live_colliders
    }

    /// Entities waiting for the next commit
    pub fn pending_entity_count(&self) -> usize {
        self.ledger.entity_adds.len()
    }

    /// Broad-phase index as of the last rebuild
    pub fn quadtree(&self) -> &QuadTree {
        self.collisions.quadtree()
    }

    /// Counters of the most recent tick
    pub fn last_tick_stats(&self) -> &TickStats {
        &self.stats
    }

    /// Run a full tick: simulation steps then presentation
    pub fn tick(&mut self, frame: u64) {
        self.fixed_update(frame);
        self.update(frame);
    }

    /// Simulation steps of one tick: motion, index rebuild, collisions, commit
    pub fn fixed_update(&mut self, frame: u64) {
        self.stats = TickStats {
            frame,
            ..TickStats::default()
        };

        self.motion_phase(frame);
        self.rebuild_index();
        self.collision_pass(frame);
        self.commit();

        self.stats.collision = self.collisions.stats();
    }

    /// Presentation step of one tick
    pub fn update(&mut self, frame: u64) {
        self.stats.presentation_updates +=
            self.run_phase(frame, |record, commands| record.behavior.update(&mut record.entity, commands));
        self.run_phase(frame, |record, commands| record.behavior.post_update(&mut record.entity, commands));
    }

    fn motion_phase(&mut self, frame: u64) {
        for &id in &self.live {
            if !self.ledger.is_live(id) {
                continue;
            }
            let Some(record) = self.records.get_mut(id) else {
                continue;
            };

            let mut commands = Commands::new(&mut self.ledger, frame);
            record.behavior.fixed_update(&mut record.entity, &mut commands);
            self.ledger.colliders.align(&record.entity);
            self.stats.motion_updates += 1;

            if !record.entity.is_within_existence_bounds() {
                log::debug!("'{}' ({:?}) left its existence bounds", record.entity.name(), id);
                self.ledger.despawn(id);
            }
        }
    }

    fn run_phase(&mut self, frame: u64, hook: PhaseHook) -> usize {
        let mut visited = 0;

        for &id in &self.live {
            if !self.ledger.is_live(id) {
                continue;
            }
            let Some(record) = self.records.get_mut(id) else {
                continue;
            };

            let mut commands = Commands::new(&mut self.ledger, frame);
            hook(record, &mut commands);
            self.ledger.colliders.align(&record.entity);
            visited += 1;
        }

        visited
    }

    fn rebuild_index(&mut self) {
        let store = &mut self.ledger.colliders;

        for id in std::mem::take(&mut store.removals) {
            if store.arena.remove(id).is_some() {
                self.stats.colliders_removed += 1;
            }
            self.live_colliders.retain(|&live| live != id);
            store.adds.retain(|&queued| queued != id);
        }

        // Colliders of entities queued for removal sit out the rest of the tick
        let ledger = &self.ledger;
        self.live_colliders.retain(|&id| {
            ledger
                .colliders
                .arena
                .get(id)
                .map_or(false, |collider| ledger.is_live(collider.owner()))
        });

        for id in std::mem::take(&mut self.ledger.colliders.adds) {
            let owner_state = self
                .ledger
                .colliders
                .arena
                .get(id)
                .and_then(|collider| self.ledger.lifecycle(collider.owner()));

            match owner_state {
                Some(Lifecycle::Live) => {
                    self.live_colliders.push(id);
                    self.stats.colliders_committed += 1;
                }
                Some(Lifecycle::PendingAdd) => self.ledger.colliders.adds.push(id),
                Some(Lifecycle::PendingRemove) | None => {
                    self.ledger.colliders.arena.remove(id);
                }
            }
        }

        let arena = &self.ledger.colliders.arena;
        self.collisions.rebuild(
            self.live_colliders
                .iter()
                .filter_map(|&id| arena.get(id).map(|collider| (id, collider))),
        );
    }

    fn collision_pass(&mut self, frame: u64) {
        for index in 0..self.live_colliders.len() {
            let primary = self.live_colliders[index];
            let Some(&collider) = self.ledger.colliders.arena.get(primary) else {
                continue;
            };
            if !self.is_active(collider.owner()) {
                continue;
            }

            let candidates = self.collisions.broad_phase(primary, &collider, &self.live_colliders);
            for &candidate in &candidates {
                if candidate != primary {
                    self.test_pair(primary, candidate, frame);
                }
            }
            self.collisions.recycle(candidates);
        }
    }

    fn test_pair(&mut self, primary: ColliderId, candidate: ColliderId, frame: u64) {
        let arena = &self.ledger.colliders.arena;
        let (Some(&a), Some(&b)) = (arena.get(primary), arena.get(candidate)) else {
            return;
        };

        let (owner_a, owner_b) = (a.owner(), b.owner());
        if owner_a == owner_b {
            return;
        }

        // Callbacks earlier in the pass may have despawned or re-roled either side
        let (Some(role_a), Some(role_b)) = (self.live_role(owner_a), self.live_role(owner_b)) else {
            return;
        };
        if !self.is_active(owner_a) || !role_b.is_collidable() {
            return;
        }

        let Some(overlap) = self.collisions.narrow_phase(&a, &b) else {
            return;
        };

        let contact = Contact {
            overlap,
            collider: primary,
            other_collider: candidate,
        };
        let dispatch = dispatch_for(role_a, role_b);
        self.collisions.record(dispatch);

        match dispatch {
            Dispatch::Collision => {
                self.notify(owner_a, owner_b, &contact, frame, |record, contact, other, commands| {
                    record.behavior.on_collision(&mut record.entity, contact, other, commands);
                });
            }
            Dispatch::Trigger => {
                let hook: HitHook = |record, contact, other, commands| {
                    record.behavior.on_trigger(&mut record.entity, contact, other, commands);
                };
                self.notify(owner_a, owner_b, &contact, frame, hook);
                self.notify(owner_b, owner_a, &contact.mirrored(), frame, hook);
            }
            Dispatch::None => {}
        }
    }

    fn notify(&mut self, target: EntityId, other: EntityId, contact: &Contact, frame: u64, hook: HitHook) {
        let Some([target_record, other_record]) = self.records.get_disjoint_mut([target, other]) else {
            return;
        };

        let mut commands = Commands::new(&mut self.ledger, frame);
        hook(target_record, contact, &other_record.entity, &mut commands);
        self.ledger.colliders.align(&target_record.entity);
    }

    fn commit(&mut self) {
        for id in std::mem::take(&mut self.ledger.entity_removals) {
            if let Some(record) = self.records.remove(id) {
                let owned = record.entity.colliders();
                self.live_colliders.retain(|live| !owned.contains(live));
                self.stats.colliders_removed += owned.len();
                self.stats.entities_removed += 1;

                log::debug!("Removed entity '{}' ({:?})", record.entity.name(), id);
                self.ledger.retire(&record);
            }
            self.live.retain(|&live| live != id);
        }

        for record in std::mem::take(&mut self.ledger.entity_adds) {
            let id = record.entity.id();
            self.ledger.set_lifecycle(id, Lifecycle::Live);
            self.records.insert(id, record);
            self.live.push(id);
            self.stats.entities_committed += 1;
        }
    }

    /// Collidable, not static, and still owning a collider
    fn is_active(&self, id: EntityId) -> bool {
        self.live_role(id).map_or(false, CollisionRole::is_active)
            && self.records.get(id).map_or(false, |record| !record.entity.colliders().is_empty())
    }

    fn live_role(&self, id: EntityId) -> Option<CollisionRole> {
        if !self.ledger.is_live(id) {
            return None;
        }
        self.records.get(id).map(|record| record.entity.role())
    }
}
