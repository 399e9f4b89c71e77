//! Scene: a named world
//!
//! Entity factory and lookup front end plus the frame entry points a host
//! calls. Everything else (behaviors, hierarchy, collision queries) is on
//! the [`World`] reachable through [`Scene::world`] and [`Scene::world_mut`].

use std::path::{Path, PathBuf};

use crate::ecs::entity::EntityId;
use crate::ecs::persistence::{SceneDocument, SceneError};
use crate::ecs::world::World;
use crate::foundation::identity::Identity;

/// A named collection of entities
#[derive(Debug)]
pub struct Scene {
    identity: Identity,
    world: World,
    loaded: bool,
    path: Option<PathBuf>,
}

impl Scene {
    /// Create an empty, unloaded scene
    pub fn new(name: impl Into<String>) -> Self {
        let identity = Identity::new(name);
        log::debug!("Created scene '{}' ({})", identity.name(), identity.instance_id());
        Self {
            identity,
            world: World::new(),
            loaded: false,
            path: None,
        }
    }

    /// Identity (instance id, name, active flag)
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Scene name
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Whether the scene manager has made this scene current at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// File this scene was last loaded from or saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Entity storage
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Entity storage, mutable
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // Entities

    /// Create a root entity
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        self.world.create_entity(name)
    }

    /// Create an entity parented to `parent`
    ///
    /// A missing parent leaves the new entity at the root.
    pub fn instantiate_child(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        let id = self.world.create_entity(name);
        self.world.set_parent(id, Some(parent));
        id
    }

    /// First entity with the given name
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.world.find_entity(name)
    }

    /// First entity with the given tag
    pub fn find_entity_with_tag(&self, tag: &str) -> Option<EntityId> {
        self.world.find_entity_with_tag(tag)
    }

    /// Every entity with the given tag, in creation order
    pub fn find_entities_with_tag(&self, tag: &str) -> Vec<EntityId> {
        self.world.find_entities_with_tag(tag)
    }

    /// Queue an entity for destruction at the next update
    pub fn destroy_entity(&mut self, id: EntityId) {
        self.world.destroy_entity(id);
    }

    /// Destroy an entity now
    pub fn destroy_entity_immediate(&mut self, id: EntityId) -> bool {
        self.world.destroy_entity_immediate(id)
    }

    // Frame

    /// Fire `on_start` on everything that has not started
    pub fn start(&mut self) {
        self.world.start();
    }

    /// Drain the destroy queue, then run `on_update`
    pub fn update(&mut self, delta_time: f32) {
        self.world.update(delta_time);
    }

    /// Run `on_late_update`
    pub fn late_update(&mut self, delta_time: f32) {
        self.world.late_update(delta_time);
    }

    /// Run `on_fixed_update`
    pub fn fixed_update(&mut self, fixed_delta_time: f32) {
        self.world.fixed_update(fixed_delta_time);
    }

    // Persistence

    /// Snapshot the scene
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument::capture(self.name(), &self.world)
    }

    /// Build a scene from a snapshot
    pub fn from_document(document: &SceneDocument) -> Result<Self, SceneError> {
        let mut scene = Self::new(document.name.clone());
        document.instantiate(&mut scene.world)?;
        Ok(scene)
    }

    /// Write the scene to a `.ron` or `.toml` file
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        self.to_document().save_to_file(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Read a scene from a `.ron` or `.toml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let mut scene = Self::from_document(&SceneDocument::load_from_file(path)?)?;
        scene.path = Some(path.to_path_buf());
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{BoxCollider, RigidBody};
    use crate::foundation::math::Vec2;

    #[test]
    fn test_new_scene_is_empty_and_unloaded() {
        let scene = Scene::new("menu");
        assert_eq!(scene.name(), "menu");
        assert!(!scene.is_loaded());
        assert!(scene.path().is_none());
        assert_eq!(scene.world().entity_count(), 0);
    }

    #[test]
    fn test_instantiate_child() {
        let mut scene = Scene::new("s");
        let parent = scene.create_entity("parent");
        let child = scene.instantiate_child(parent, "child");

        assert_eq!(scene.world().parent(child), Some(parent));
        assert_eq!(scene.world().children(parent), &[child]);
    }

    #[test]
    fn test_find_by_tag() {
        let mut scene = Scene::new("s");
        let a = scene.create_entity("a");
        let b = scene.create_entity("b");
        for id in [a, b] {
            scene.world_mut().entity_mut(id).unwrap().set_tag("Enemy");
        }

        assert_eq!(scene.find_entity("b"), Some(b));
        assert_eq!(scene.find_entity_with_tag("Enemy"), Some(a));
        assert_eq!(scene.find_entities_with_tag("Enemy"), vec![a, b]);
        assert!(scene.find_entity_with_tag("Player").is_none());
    }

    #[test]
    fn test_deferred_destroy_waits_for_update() {
        let mut scene = Scene::new("s");
        let id = scene.create_entity("doomed");

        scene.destroy_entity(id);
        scene.destroy_entity(id);
        scene.late_update(0.1);
        scene.fixed_update(0.1);
        assert!(scene.world().contains(id));

        scene.update(0.1);
        assert!(!scene.world().contains(id));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.toml");

        let mut scene = Scene::new("level");
        let floor = scene.create_entity("floor");
        scene.world_mut().add_behavior(floor, BoxCollider::new().with_size(Vec2::new(100.0, 10.0)));
        let ball = scene.instantiate_child(floor, "ball");
        scene.world_mut().add_behavior(ball, RigidBody::new());
        scene.save(&path).unwrap();
        assert_eq!(scene.path(), Some(path.as_path()));

        let loaded = Scene::load(&path).unwrap();
        assert_eq!(loaded.name(), "level");
        let ball = loaded.find_entity("ball").unwrap();
        assert_eq!(loaded.world().parent(ball), loaded.find_entity("floor"));
        assert!(loaded.world().get_behavior::<RigidBody>(ball).is_some());
        assert_eq!(loaded.path(), Some(path.as_path()));
    }
}
