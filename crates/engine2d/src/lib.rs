//! # engine2d
//!
//! The core of a small 2D game engine: entities with hierarchical
//! transforms, pluggable behaviors with a Unity-style lifecycle, box and
//! circle collision detection, and a minimal rigid-body integrator.
//!
//! ## Features
//!
//! - **Entity-Behavior model**: entities own a transform plus at most one behavior per type
//! - **Scene graph**: parent/child transforms with cached, lazily rebuilt matrices
//! - **Collision detection**: axis-aligned boxes and circles, layer masks, point queries
//! - **Rigid bodies**: gravity, forces, drag and axis constraints on a fixed timestep
//! - **Scenes**: deferred destruction, deferred scene switching, RON/TOML persistence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engine2d::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let scene = engine.scene_manager.create_scene("main");
//!         if let Some(scene) = engine.scene_manager.scene_mut(scene) {
//!             let ball = scene.create_entity("ball");
//!             scene.world_mut().add_behavior(ball, RigidBody::new());
//!             scene.world_mut().add_behavior(ball, CircleCollider::new().with_radius(8.0));
//!         }
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if engine.clock().total_time() > 5.0 {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     Engine::run(config, &mut MyApp)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod physics;
pub mod debug;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        config::Config,
        core::config::{EngineConfig, TimeConfig, PhysicsConfig, DebugConfig},
        foundation::{
            math::{Vec2, Vec4, Mat3},
            time::{FrameClock, FixedTimestep, Stopwatch},
        },
        ecs::{
            World, Entity, EntityId, Scene, SceneManager, SceneId,
            Behavior, BehaviorContext, TransformView, TransformMut,
            components::{Collider, BoxCollider, CircleCollider, RigidBody, BodyType},
        },
        physics::{CollisionInfo, CollisionLayers},
        debug::{DebugDrawSystem, DrawSurface},
    };
}
