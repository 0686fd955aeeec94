//! Core collision detection system
//!
//! Collision detection is split into two phases:
//!
//! - **Broad phase**: the quad-tree narrows each active collider down to the
//!   colliders sharing its quadrant lineage. A collider that straddles a
//!   split boundary (or leaves the world bounds) makes the quad-tree answer
//!   ambiguous, and the broad phase falls back to every live collider. That
//!   full scan is a known O(n) degradation path and is counted in
//!   [`CollisionStats::full_scans`].
//! - **Narrow phase**: exact shape intersection of one collider pair.
//!
//! The system knows nothing about entities or behaviours. The registry walks
//! the live colliders, asks this system for candidates and overlaps, and
//! dispatches callbacks itself so that positions corrected by one callback
//! are seen by the next test.

use crate::foundation::math::Rect;
use crate::physics::collision::Collider;
use crate::physics::collision_roles::Dispatch;
use crate::spatial::{QuadTree, QuadTreeConfig};
use crate::world::ColliderId;

/// A detected overlap, as seen from one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Overlapping region in world space
    pub overlap: Rect,
    /// Collider of the entity receiving the callback
    pub collider: ColliderId,
    /// Collider of the other entity
    pub other_collider: ColliderId,
}

impl Contact {
    /// Same contact seen from the other collider
    pub fn mirrored(&self) -> Self {
        Self {
            overlap: self.overlap,
            collider: self.other_collider,
            other_collider: self.collider,
        }
    }
}

/// Per-tick collision pass counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Colliders that ran a query as the active side
    pub primaries: usize,
    /// Narrow-phase pair tests
    pub candidate_tests: usize,
    /// Queries that fell back to every live collider
    pub full_scans: usize,
    /// Pairs skipped because a shape has a zero or negative dimension
    pub degenerate_pairs: usize,
    /// Collision callbacks dispatched
    pub collisions: usize,
    /// Trigger hits dispatched (each notifies both owners)
    pub triggers: usize,
}

/// Broad-phase index and narrow-phase tests for one world
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    /// Spatial partitioning structure for broad-phase
    quadtree: QuadTree,

    /// Reusable candidate buffer
    scratch: Vec<ColliderId>,

    /// Counters for the current pass
    stats: CollisionStats,
}

impl CollisionSystem {
    /// Create a collision system covering `world_bounds`
    pub fn new(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            quadtree: QuadTree::new(world_bounds, config),
            scratch: Vec::new(),
            stats: CollisionStats::default(),
        }
    }

    /// Clear the index and insert every given collider
    ///
    /// Also starts a fresh set of counters.
    pub fn rebuild<'a>(&mut self, colliders: impl IntoIterator<Item = (ColliderId, &'a Collider)>) {
        self.quadtree.clear();
        self.stats = CollisionStats::default();

        for (id, collider) in colliders {
            self.quadtree.insert(id, collider.bounds());
        }
    }

    /// Broad-phase: colliders that may overlap `collider`
    ///
    /// The returned buffer should be handed back through
    /// [`CollisionSystem::recycle`] once the caller is done with it.
    pub fn broad_phase(&mut self, id: ColliderId, collider: &Collider, live: &[ColliderId]) -> Vec<ColliderId> {
        let mut candidates = std::mem::take(&mut self.scratch);
        candidates.clear();
        self.stats.primaries += 1;

        if self.quadtree.retrieve(&mut candidates, &collider.bounds()).is_none() {
            self.stats.full_scans += 1;
            log::trace!("Collider {:?} straddles the quad-tree, scanning all {} colliders", id, live.len());

            candidates.clear();
            candidates.extend_from_slice(live);
        }

        candidates
    }

    /// Return a candidate buffer for reuse
    pub fn recycle(&mut self, buffer: Vec<ColliderId>) {
        self.scratch = buffer;
    }

    /// Narrow-phase: overlap of one pair, `None` when disjoint
    pub fn narrow_phase(&mut self, a: &Collider, b: &Collider) -> Option<Rect> {
        self.stats.candidate_tests += 1;

        if a.is_degenerate_pair(b) {
            self.stats.degenerate_pairs += 1;
            return None;
        }

        a.intersect(b)
    }

    /// Count a dispatched hit
    pub fn record(&mut self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Collision => self.stats.collisions += 1,
            Dispatch::Trigger => self.stats.triggers += 1,
            Dispatch::None => {}
        }
    }

    /// Counters of the current (or last) pass
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// The broad-phase index
    pub fn quadtree(&self) -> &QuadTree {
        &self.quadtree
    }
}
