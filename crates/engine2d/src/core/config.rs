//! # Unified Configuration System
//!
//! All runtime configuration for the engine lives here. Structures are
//! serializable (TOML, RON) through the [`Config`] trait and carry defaults
//! suitable for a 60 Hz host loop with 50 Hz physics.
//!
//! ## Configuration Categories
//!
//! - **Time Config**: time scaling and frame delta clamping
//! - **Physics Config**: fixed timestep cadence
//! - **Debug Config**: collider gizmo drawing
//! - **Engine Config**: top-level structure combining the above plus logging

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec4;

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// # Time Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Multiplier applied to every frame delta (0 pauses the simulation)
    pub time_scale: f32,
    /// Upper bound on a single frame delta, in seconds
    pub max_delta: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta: 0.25,
        }
    }
}

/// # Physics Configuration
///
/// Cadence of `fixed_update`, which drives rigid-body integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed step length in seconds
    pub fixed_timestep: f32,
    /// Maximum fixed steps run in one frame
    pub max_fixed_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 50.0,
            max_fixed_steps: 5,
        }
    }
}

/// # Debug Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Draw collider outlines every frame
    pub draw_colliders: bool,
    /// RGBA color for solid colliders
    pub collider_color: [f32; 4],
    /// RGBA color for trigger colliders
    pub trigger_color: [f32; 4],
}

impl DebugConfig {
    /// Solid collider color as a vector
    pub fn collider_color(&self) -> Vec4 {
        Vec4::from(self.collider_color)
    }

    /// Trigger collider color as a vector
    pub fn trigger_color(&self) -> Vec4 {
        Vec4::from(self.trigger_color)
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            draw_colliders: cfg!(debug_assertions),
            collider_color: [0.0, 1.0, 0.0, 1.0],
            trigger_color: [1.0, 1.0, 0.0, 1.0],
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (`RUST_LOG` overrides it)
    pub log_level: String,
    /// Frame timing configuration
    pub time: TimeConfig,
    /// Physics cadence configuration
    pub physics: PhysicsConfig,
    /// Debug drawing configuration
    pub debug: DebugConfig,
}

impl EngineConfig {
    /// Create a new engine configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            time: TimeConfig::default(),
            physics: PhysicsConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the fixed physics timestep
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.physics.fixed_timestep = step;
        self
    }

    /// Set the time scale
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time.time_scale = time_scale;
        self
    }

    /// Enable or disable collider gizmos
    pub fn with_collider_gizmos(mut self, enabled: bool) -> Self {
        self.debug.draw_colliders = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid("fixed_timestep must be positive".to_string()));
        }
        if self.physics.max_fixed_steps == 0 {
            return Err(ConfigError::Invalid("max_fixed_steps must be at least 1".to_string()));
        }
        if self.time.time_scale < 0.0 {
            return Err(ConfigError::Invalid("time_scale cannot be negative".to_string()));
        }
        if !(self.time.max_delta > 0.0) {
            return Err(ConfigError::Invalid("max_delta must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_timestep() {
        let config = EngineConfig::new().with_fixed_timestep(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            log_level = "debug"

            [physics]
            fixed_timestep = 0.01
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.physics.fixed_timestep, 0.01);
        assert_eq!(config.physics.max_fixed_steps, 5);
        assert_eq!(config.time.time_scale, 1.0);
    }

    #[test]
    fn test_round_trip_through_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");

        let config = EngineConfig::new().with_time_scale(0.5).with_collider_gizmos(true);
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.time.time_scale, 0.5);
        assert!(loaded.debug.draw_colliders);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::load_from_file("engine.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
