//! # Core Engine Module
//!
//! Shared abstractions used throughout the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system for all engine subsystems
//! - **Foundation**: Low-level utilities (math, identity, time, logging)
//! - **ECS**: Entity / behavior / scene implementation

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;
pub use crate::ecs;

// Re-export commonly used config types
pub use config::{
    EngineConfig,
    TimeConfig,
    PhysicsConfig,
    DebugConfig,
    Config,
    ConfigError,
};
