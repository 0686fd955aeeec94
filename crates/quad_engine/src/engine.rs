//! Core engine implementation

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, EngineConfig};
use crate::foundation::time::Clock;
use crate::world::Registry;

/// Main engine struct
///
/// Couples the fixed-timestep [`Clock`] to the [`Registry`]. The rendering
/// driver calls [`Engine::advance`] once per presented frame.
pub struct Engine {
    /// Fixed-timestep clock
    clock: Clock,

    /// Every entity and collider of the world
    registry: Registry,

    /// Engine configuration
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let clock = Clock::from_config(&config.clock);
        log::info!(
            "Initializing '{}' ({:?} per tick, world {:?})",
            config.name,
            clock.fixed_timestep(),
            config.world.bounds
        );

        Ok(Self {
            clock,
            registry: Registry::from_config(&config.world),
            config,
        })
    }

    /// Feed one rendering frame's elapsed wall-clock time
    ///
    /// Runs every fixed tick that elapsed, each one simulation steps first
    /// and presentation second. Returns the number of ticks run.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let ticks = self.clock.advance(delta);

        // The clock already counted these ticks; replay their frame numbers
        let first = self.clock.frame_count() + 1 - u64::from(ticks);
        for frame in first..=self.clock.frame_count() {
            self.registry.fixed_update(frame);
            self.registry.update(frame);
        }

        ticks
    }

    /// Drop accumulated time; the next [`Engine::advance`] runs no ticks
    pub fn reset(&mut self) {
        self.clock.reset();
    }

    /// The fixed-timestep clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable clock access (time scale changes)
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// The world
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable world access for spawning from outside hooks
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Configuration the engine was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected at start-up
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rect, Vec2};
    use crate::physics::collision::ColliderShape;
    use crate::world::{Entity, Inert};
    use approx::assert_relative_eq;

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.clock.fixed_timestep_secs = 0.02;
        config.world.bounds = Rect::from_origin_size(-100.0, -100.0, 200.0, 200.0);
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config();
        config.clock.fixed_timestep_secs = -1.0;
        assert!(matches!(Engine::new(config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_timestep_is_an_error() {
        let mut config = config();
        config.clock.fixed_timestep_secs = 1e20;
        assert!(matches!(Engine::new(config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_advance_runs_one_tick_per_timestep() {
        let mut engine = Engine::new(config()).expect("valid config");
        let id = engine
            .registry_mut()
            .spawn(Entity::new("mover").with_velocity(Vec2::new(1.0, 0.0)), Inert);

        let step = Duration::from_millis(20);
        let ticks: u32 = (0..5).map(|_| engine.advance(step)).sum();

        assert_eq!(ticks, 5);
        assert_eq!(engine.clock().frame_count(), 5);
        assert_eq!(engine.registry().last_tick_stats().frame, 5);
        // Committed during tick 1, moved on ticks 2..=5
        assert_relative_eq!(engine.registry().entity(id).map_or(0.0, |e| e.position().x), 4.0);
    }

    #[test]
    fn test_half_frames_and_reset() {
        let mut engine = Engine::new(config()).expect("valid config");
        let half = Duration::from_millis(10);

        assert_eq!(engine.advance(half), 0);
        assert_eq!(engine.advance(half), 1);

        engine.reset();
        assert_eq!(engine.advance(Duration::from_millis(20)), 0);
        assert_eq!(engine.advance(Duration::from_millis(20)), 1);
        assert_eq!(engine.clock().frame_count(), 2);
    }

    #[test]
    fn test_circle_meets_box_through_engine() {
        let mut engine = Engine::new(config()).expect("valid config");
        let circle = engine.registry_mut().spawn(
            Entity::new("circle")
                .with_velocity(Vec2::new(5.0, 0.0))
                .with_collider(ColliderShape::circle(10.0), Vec2::zeros()),
            Inert,
        );
        engine.registry_mut().spawn(
            Entity::new("box")
                .as_static()
                .with_position(Vec2::new(30.0, 10.0))
                .with_collider(ColliderShape::rectangle(20.0, 20.0), Vec2::zeros()),
            Inert,
        );

        for _ in 0..4 {
            engine.advance(Duration::from_millis(20));
        }

        let circle = engine.registry().entity(circle).expect("alive");
        assert_eq!(engine.registry().last_tick_stats().collision.collisions, 1);
        assert_relative_eq!(circle.position().x, 10.0);
        assert_relative_eq!(circle.velocity().x, 0.0);
    }
}
