//! Debug module for visualization and debugging tools
//!
//! Collider gizmos are drawn by
//! [`World::draw_collider_gizmos`](crate::ecs::World::draw_collider_gizmos)
//! onto any [`DrawSurface`]; [`DebugDrawSystem`] is the recording surface the
//! engine owns.

pub mod draw;

pub use draw::{DebugDrawSystem, DebugShape, DebugShapeId, DrawSurface};
