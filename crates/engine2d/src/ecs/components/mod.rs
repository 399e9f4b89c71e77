//! Built-in behaviors and the transform component
//!
//! `Transform` is owned by every entity; colliders and rigid bodies are
//! ordinary behaviors that the engine knows how to persist and query.

pub mod transform;
pub mod collider;
pub mod rigid_body;

pub use transform::Transform;
pub use collider::{Collider, ColliderBase, BoxCollider, CircleCollider};
pub use rigid_body::{RigidBody, BodyType};
