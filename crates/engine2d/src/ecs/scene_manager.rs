//! # Scene Manager
//!
//! Owns every [`Scene`], tracks the active one and defers scene switches to
//! the top of the next update so a switch requested from inside a behavior
//! never swaps the world out from under the running frame.

use std::path::Path;

use slotmap::SlotMap;

use crate::ecs::persistence::SceneError;
use crate::ecs::scene::Scene;

slotmap::new_key_type! {
    /// Handle to a scene owned by a [`SceneManager`]
    pub struct SceneId;
}

/// Registry of scenes with one active scene
#[derive(Debug, Default)]
pub struct SceneManager {
    scenes: SlotMap<SceneId, Scene>,
    order: Vec<SceneId>,
    active: Option<SceneId>,
    next: Option<SceneId>,
}

impl SceneManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty scene
    ///
    /// The first scene created becomes active and is marked loaded, without
    /// being started.
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        self.add_scene(Scene::new(name))
    }

    /// Take ownership of an existing scene (for example one read from disk)
    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        let id = self.scenes.insert(scene);
        self.order.push(id);
        if self.active.is_none() {
            self.active = Some(id);
            if let Some(scene) = self.scenes.get_mut(id) {
                scene.set_loaded(true);
                log::info!("Active scene: '{}'", scene.name());
            }
        }
        id
    }

    /// Read a scene file and register it
    pub fn load_scene_file(&mut self, path: impl AsRef<Path>) -> Result<SceneId, SceneError> {
        Ok(self.add_scene(Scene::load(path)?))
    }

    /// Request a switch to the scene named `name`
    ///
    /// Takes effect at the start of the next [`update`](Self::update).
    /// Unknown names are ignored.
    pub fn load_scene(&mut self, name: &str) -> bool {
        match self.scene_id(name) {
            Some(id) => {
                self.next = Some(id);
                true
            }
            None => {
                log::warn!("Cannot load unknown scene '{}'", name);
                false
            }
        }
    }

    /// Request a switch to the scene at `index` in creation order
    pub fn load_scene_index(&mut self, index: usize) -> bool {
        match self.order.get(index).copied() {
            Some(id) => {
                self.next = Some(id);
                true
            }
            None => false,
        }
    }

    /// Apply a pending switch right away
    pub fn load_next_scene(&mut self) {
        self.switch_scene();
    }

    /// Whether a switch is pending
    pub fn has_pending_switch(&self) -> bool {
        self.next.is_some()
    }

    /// Handle of the active scene
    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.active
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.and_then(|id| self.scenes.get(id))
    }

    /// The active scene, mutable
    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.and_then(|id| self.scenes.get_mut(id))
    }

    /// Scene by handle
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Scene by handle, mutable
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// Handle of the first scene named `name`
    pub fn scene_id(&self, name: &str) -> Option<SceneId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.scenes.get(*id).is_some_and(|scene| scene.name() == name))
    }

    /// Handle of the scene at `index` in creation order
    pub fn scene_id_at(&self, index: usize) -> Option<SceneId> {
        self.order.get(index).copied()
    }

    /// Number of scenes
    pub fn scene_count(&self) -> usize {
        self.order.len()
    }

    /// Start the active scene
    pub fn start(&mut self) {
        if let Some(scene) = self.active_scene_mut() {
            scene.start();
        }
    }

    /// Apply a pending switch, then update the active scene
    pub fn update(&mut self, delta_time: f32) {
        self.switch_scene();
        if let Some(scene) = self.active_scene_mut() {
            scene.update(delta_time);
        }
    }

    /// Late-update the active scene
    pub fn late_update(&mut self, delta_time: f32) {
        if let Some(scene) = self.active_scene_mut() {
            scene.late_update(delta_time);
        }
    }

    /// Fixed-update the active scene
    pub fn fixed_update(&mut self, fixed_delta_time: f32) {
        if let Some(scene) = self.active_scene_mut() {
            scene.fixed_update(fixed_delta_time);
        }
    }

    fn switch_scene(&mut self) {
        let Some(next) = self.next.take() else {
            return;
        };
        if self.active == Some(next) {
            return;
        }
        self.active = Some(next);
        if let Some(scene) = self.scenes.get_mut(next) {
            log::info!("Switching to scene '{}'", scene.name());
            scene.set_loaded(true);
            scene.start();
        }
    }
}
