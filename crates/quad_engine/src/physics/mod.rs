//! Physics module for collision detection and response
//!
//! Provides quad-tree accelerated collision detection between rectangles and
//! circles, the role rules deciding which callbacks a hit fires, and the
//! default axis push-out response.

pub mod collision;
pub mod collision_roles;
pub mod collision_system;
pub mod response;

pub use collision::{Collider, ColliderShape, ShapeKind, WorldSpaceShape};
pub use collision_roles::{CollisionRole, Dispatch};
pub use collision_system::{CollisionStats, CollisionSystem, Contact};
