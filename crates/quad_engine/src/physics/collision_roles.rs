//! Collision roles for filtering collision dispatch
//!
//! An entity's role set decides whether it takes part in collision testing
//! at all, whether it can be the active side of a query, and whether hits
//! against it are notifications instead of blocking contacts.

use bitflags::bitflags;

bitflags! {
    /// Collision role flags of an entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionRole: u8 {
        /// Takes part in collision testing
        const COLLIDABLE = 1 << 0;
        /// Never the active side of a collision query (can still be hit)
        const STATIC = 1 << 1;
        /// Hits fire trigger callbacks on both sides instead of collisions
        const TRIGGER = 1 << 2;
    }
}

impl Default for CollisionRole {
    fn default() -> Self {
        Self::COLLIDABLE
    }
}

impl CollisionRole {
    /// Check if this entity is tested for collisions at all
    pub fn is_collidable(self) -> bool {
        self.contains(Self::COLLIDABLE)
    }

    /// Check if this entity only ever gets hit
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Check if hits against this entity are notifications
    pub fn is_trigger(self) -> bool {
        self.contains(Self::TRIGGER)
    }

    /// Check if this entity drives its own collision queries
    pub fn is_active(self) -> bool {
        self.is_collidable() && !self.is_static()
    }
}

/// Callback produced by a hit between an active entity and a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Trigger callbacks on both owners
    Trigger,
    /// Collision callback on the active owner only
    Collision,
    /// Nothing fires
    None,
}

/// Decide which callbacks a hit fires
///
/// A trigger candidate always notifies both sides. Otherwise only a
/// non-trigger active entity gets a collision callback; a trigger hitting a
/// plain entity fires nothing from its own query.
pub fn dispatch_for(active: CollisionRole, candidate: CollisionRole) -> Dispatch {
    if candidate.is_trigger() {
        Dispatch::Trigger
    } else if !active.is_trigger() {
        Dispatch::Collision
    } else {
        Dispatch::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_collidable_only() {
        let role = CollisionRole::default();
        assert!(role.is_collidable());
        assert!(role.is_active());
        assert!(!role.is_static());
        assert!(!role.is_trigger());
    }

    #[test]
    fn test_static_is_not_active() {
        let role = CollisionRole::COLLIDABLE | CollisionRole::STATIC;
        assert!(role.is_collidable());
        assert!(!role.is_active());
    }

    #[test]
    fn test_dispatch_table() {
        let plain = CollisionRole::COLLIDABLE;
        let trigger = CollisionRole::COLLIDABLE | CollisionRole::TRIGGER;

        assert_eq!(dispatch_for(plain, plain), Dispatch::Collision);
        assert_eq!(dispatch_for(plain, trigger), Dispatch::Trigger);
        assert_eq!(dispatch_for(trigger, trigger), Dispatch::Trigger);
        assert_eq!(dispatch_for(trigger, plain), Dispatch::None);
    }
}
