//! Collision detection between colliders
//!
//! Detection only: queries report overlap and never resolve it.
//!
//! # Architecture
//!
//! - **Model Space Storage**: collider shapes store local size/radius and offset
//! - **On-Demand Transformation**: shapes are moved to world space only during tests
//! - **Coordinate Decoupling**: shape geometry is separate from the Transform
//!
//! # Module Organization
//!
//! - [`primitives`] - World-space boxes, circles and the pairwise tests
//! - [`shape`] - Model-space shapes and their world-space counterparts

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{CollisionInfo, WorldBox, WorldCircle};
pub use shape::{CollisionShape, WorldSpaceShape};
