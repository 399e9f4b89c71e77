//! Physics module for collision detection and rigid-body motion
//!
//! Collision is detection only. Rigid bodies are integrated by the
//! [`RigidBody`](crate::ecs::components::RigidBody) behavior during
//! `fixed_update`.

pub mod collision;
pub mod collision_layers;

pub use collision::{CollisionInfo, CollisionShape, WorldBox, WorldCircle, WorldSpaceShape};
pub use collision_layers::CollisionLayers;

use crate::foundation::math::Vec2;

/// Gravity acceleration in pixel units per second squared (+y is down)
pub const GRAVITY: Vec2 = Vec2::new(0.0, 9.81 * 50.0);
