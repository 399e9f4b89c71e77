//! Entity-Behavior implementation
//!
//! Entities own a transform and an ordered set of behaviors. A [`World`]
//! stores the entities of one scene and drives behavior lifecycles; a
//! [`Scene`] wraps a world with a name and persistence, and the
//! [`SceneManager`] switches between scenes.

pub mod behavior;
pub mod entity;
pub mod world;
pub mod hierarchy;
pub mod components;
pub mod scene;
pub mod scene_manager;
pub mod persistence;

pub use behavior::{Behavior, BehaviorContext, Capability};
pub use entity::{Entity, EntityId, UNTAGGED};
pub use world::World;
pub use hierarchy::{TransformView, TransformMut};
pub use scene::Scene;
pub use scene_manager::{SceneManager, SceneId};
pub use persistence::{SceneDocument, EntityRecord, SceneError};
