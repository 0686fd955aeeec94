//! Configuration system
//!
//! Engine settings can be built in code or loaded from TOML / RON files:
//!
//! ```toml
//! name = "arena"
//! log_level = "debug"
//!
//! [clock]
//! fixed_timestep_secs = 0.0166
//! time_scale = 1.0
//!
//! [world.bounds]
//! min = [0.0, 0.0]
//! max = [1024.0, 768.0]
//!
//! [world.quadtree]
//! max_colliders_per_node = 4
//! max_depth = 50
//! ```

pub use serde::{Serialize, Deserialize};

use std::time::Duration;

use crate::foundation::math::{Rect, Vec2};
use crate::spatial::QuadTreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse configuration from a TOML string
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value that the engine cannot run with
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Fixed-timestep clock settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Nominal duration of one simulation tick in seconds
    pub fixed_timestep_secs: f64,
    /// Initial time scale; out-of-range values are ignored by the clock
    pub time_scale: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            fixed_timestep_secs: 1.0 / 60.0,
            time_scale: 1.0,
        }
    }
}

/// Simulated world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Root extent of the spatial index
    pub bounds: Rect,
    /// Spatial index tuning
    pub quadtree: QuadTreeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::new(Vec2::zeros(), Vec2::new(800.0, 600.0)),
            quadtree: QuadTreeConfig::default(),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the game or scene
    pub name: String,
    /// Default log filter (`RUST_LOG` overrides it)
    pub log_level: String,
    /// Clock settings
    pub clock: ClockConfig,
    /// World settings
    pub world: WorldConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "Quad Engine Application".to_string(),
            log_level: "info".to_string(),
            clock: ClockConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check the values the engine cannot recover from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timestep = self.clock.fixed_timestep_secs;
        // Negative, NaN, too large for a Duration, or shorter than a nanosecond
        let usable = Duration::try_from_secs_f64(timestep).map_or(false, |step| !step.is_zero());
        if !usable {
            return Err(ConfigError::Invalid(format!(
                "fixed timestep must be a positive number of seconds that fits a Duration, got {}",
                timestep
            )));
        }

        if self.world.bounds.is_degenerate() {
            return Err(ConfigError::Invalid(format!(
                "world bounds must have positive width and height, got {:?}",
                self.world.bounds
            )));
        }

        if self.world.quadtree.max_colliders_per_node == 0 {
            return Err(ConfigError::Invalid(
                "quadtree split threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            name = "arena"

            [world.bounds]
            min = [0.0, 0.0]
            max = [1024.0, 768.0]
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.name, "arena");
        assert_eq!(config.world.bounds.max, Vec2::new(1024.0, 768.0));
        assert_eq!(config.world.quadtree, QuadTreeConfig::default());
        assert_eq!(config.clock, ClockConfig::default());
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let mut config = EngineConfig::default();
        config.clock.fixed_timestep_secs = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unusable_timesteps_rejected() {
        for secs in [1e20, f64::INFINITY, f64::NAN, -1.0, 1e-12] {
            let mut config = EngineConfig::default();
            config.clock.fixed_timestep_secs = secs;
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_degenerate_world_rejected() {
        let mut config = EngineConfig::default();
        config.world.bounds = Rect::from_origin_size(0.0, 0.0, 0.0, 100.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_time_scale_is_not_a_config_error() {
        let mut config = EngineConfig::default();
        config.clock.time_scale = 500.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::load_from_file("settings.ini");
        assert!(result.is_err());
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("quad_engine_config_{}.ron", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let mut config = EngineConfig::default();
        config.name = "ron scene".to_string();
        config.clock.time_scale = 0.5;

        config.save_to_file(&path).expect("save config");
        let loaded = EngineConfig::load_from_file(&path).expect("load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
