//! Core engine implementation
//!
//! The engine is the host frame driver: it owns the scene manager and the
//! clocks, and turns raw frame durations into the update, late update and
//! fixed update passes of the active scene.

use thiserror::Error;

use crate::application::Application;
use crate::config::ConfigError;
use crate::core::config::EngineConfig;
use crate::debug::DebugDrawSystem;
use crate::ecs::persistence::SceneError;
use crate::ecs::{Scene, SceneManager};
use crate::foundation::time::{FixedTimestep, FrameClock, Timer};

/// Main engine struct
///
/// Headless: drawing goes to the recording [`DebugDrawSystem`], which a
/// host can replay onto its own surface.
pub struct Engine {
    /// Scenes and the active scene
    pub scene_manager: SceneManager,

    /// Recorded debug shapes (collider gizmos and user shapes)
    pub debug_draw: DebugDrawSystem,

    /// Frame timing
    clock: FrameClock,

    /// Physics step accumulator
    fixed_timestep: FixedTimestep,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let clock = FrameClock::new()
            .with_time_scale(config.time.time_scale)
            .with_max_delta(config.time.max_delta);
        let fixed_timestep = FixedTimestep::new(config.physics.fixed_timestep, config.physics.max_fixed_steps);

        Ok(Self {
            scene_manager: SceneManager::new(),
            debug_draw: DebugDrawSystem::new(),
            clock,
            fixed_timestep,
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Frames are timed with the wall clock. The loop ends when the
    /// application reports `should_exit`, calls [`Engine::quit`], or returns
    /// an error from `update`. Cleanup runs in every case once
    /// initialization has succeeded.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;
        engine.scene_manager.start();

        log::info!("Starting main loop...");

        let result = engine.main_loop(app);
        if let Err(e) = &result {
            log::error!("Main loop stopped: {}", e);
        }
        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.2}s simulated)",
            engine.clock.frame_count(),
            engine.clock.total_time()
        );
        result
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        let mut timer = Timer::new();
        while self.running && !app.should_exit(self) {
            let delta_time = self.tick(timer.tick());

            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;
        }
        Ok(())
    }

    /// Advance one frame by a raw (unscaled) duration in seconds
    ///
    /// Runs update, late update, then as many fixed updates as the
    /// accumulator owes, and finally records collider gizmos. Returns the
    /// scaled delta time used.
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        self.clock.advance(raw_delta);
        let delta_time = self.clock.delta_time();

        self.scene_manager.update(delta_time);
        self.scene_manager.late_update(delta_time);

        let steps = self.fixed_timestep.accumulate(delta_time);
        let step = self.fixed_timestep.step();
        for _ in 0..steps {
            self.scene_manager.fixed_update(step);
        }
        log::trace!("Frame {}: dt={:.4} fixed_steps={}", self.clock.frame_count(), delta_time, steps);

        self.debug_draw.update(delta_time);
        if self.config.debug.draw_colliders {
            if let Some(scene) = self.scene_manager.active_scene() {
                scene.world().draw_collider_gizmos(&mut self.debug_draw, &self.config.debug);
            }
        }

        delta_time
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame timing
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Change the time scale at runtime
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.clock.set_time_scale(time_scale);
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&Scene> {
        self.scene_manager.active_scene()
    }

    /// The active scene, mutable
    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene_manager.active_scene_mut()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene file could not be read or written
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
