//! Entities, behaviours and the registry that simulates them
//!
//! Entities and colliders live in arenas owned by the [`Registry`] and are
//! addressed through generational handles ([`EntityId`], [`ColliderId`]).
//! Game logic talks to the world only through the [`Commands`] context handed
//! to each [`Behavior`] hook.

pub mod entity;
pub mod behavior;
pub mod commands;
pub mod registry;
mod ledger;

#[cfg(test)]
mod tests;

pub use entity::{ColliderId, Entity, EntityId};
pub use behavior::{Behavior, Inert};
pub use commands::Commands;
pub use ledger::Lifecycle;
pub use registry::{Registry, TickStats};
