//! # Quad Engine
//!
//! A small real-time 2D game engine core: a fixed-timestep simulation loop
//! driving movable, collidable entities, with a quad-tree keeping per-tick
//! collision testing sub-quadratic.
//!
//! ## Features
//!
//! - **Fixed Timestep**: steady simulation rate independent of rendering rate
//! - **Deferred Lifecycle**: spawns and despawns commit at fixed points of a tick
//! - **Quad-Tree Broad Phase**: rebuilt every tick from the live colliders
//! - **Collision Roles**: static, trigger and plain entities with one-directional dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use quad_engine::prelude::*;
//!
//! struct Ball;
//!
//! impl Behavior for Ball {
//!     fn update(&mut self, entity: &mut Entity, _commands: &mut Commands<'_>) {
//!         log::info!("ball at {:?}", entity.position());
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default())?;
//!
//!     engine.registry_mut().spawn(
//!         Entity::new("ball")
//!             .with_position(Vec2::new(100.0, 100.0))
//!             .with_velocity(Vec2::new(2.0, 0.0))
//!             .with_collider(ColliderShape::circle(8.0), Vec2::zeros()),
//!         Ball,
//!     );
//!
//!     loop {
//!         engine.advance(Duration::from_millis(16));
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;
pub mod world;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError,
        config::{Config, EngineConfig},
        foundation::{
            math::{Rect, Vec2},
            time::{Clock, Cooldown},
        },
        physics::{ColliderShape, CollisionRole, Contact},
        world::{Behavior, Commands, Entity, EntityId, ColliderId, Inert, Registry},
    };
}
