//! Scene persistence
//!
//! A [`SceneDocument`] is a plain-data snapshot of a world: per entity its
//! name, tag, layer, active flag, local transform, parent index and the
//! built-in behaviors (colliders and rigid body). User behaviors are not
//! part of the document. Files are RON or TOML depending on extension.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::components::{BoxCollider, CircleCollider, RigidBody};
use crate::ecs::entity::{EntityId, UNTAGGED};
use crate::ecs::world::World;
use crate::foundation::math::Vec2;

/// Scene persistence errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Entity record references a parent that cannot be used
    #[error("Entity {entity} has invalid parent index {parent}")]
    InvalidParent {
        /// Index of the offending record
        entity: usize,
        /// Parent index it references
        parent: usize,
    },

    /// Parent links of the records form a loop
    #[error("Entity {entity} is part of a parent cycle")]
    ParentCycle {
        /// Index of the first record found on the loop
        entity: usize,
    },
}

/// On-disk format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    /// Rusty Object Notation
    Ron,
    /// TOML
    Toml,
}

impl SceneFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Self::Ron),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SceneError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Snapshot of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRecord {
    /// Display name
    pub name: String,
    /// Tag string
    pub tag: String,
    /// Layer index
    pub layer: i32,
    /// Local active flag
    pub active: bool,
    /// Local position
    pub position: Vec2,
    /// Local rotation in degrees
    pub rotation: f32,
    /// Local scale
    pub scale: Vec2,
    /// Index of the parent record
    pub parent: Option<usize>,
    /// Box collider, if attached
    pub box_collider: Option<BoxCollider>,
    /// Circle collider, if attached
    pub circle_collider: Option<CircleCollider>,
    /// Rigid body, if attached
    pub rigid_body: Option<RigidBody>,
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            tag: UNTAGGED.to_string(),
            layer: 0,
            active: true,
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            parent: None,
            box_collider: None,
            circle_collider: None,
            rigid_body: None,
        }
    }
}

/// Snapshot of a whole scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    /// Scene name
    pub name: String,
    /// Entities in creation order
    pub entities: Vec<EntityRecord>,
}

impl SceneDocument {
    /// Capture every entity of `world`
    pub fn capture(name: impl Into<String>, world: &World) -> Self {
        let index: HashMap<EntityId, usize> = world
            .entity_ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let entities = world
            .entities()
            .map(|(id, entity)| {
                let transform = entity.transform();
                EntityRecord {
                    name: entity.name().to_string(),
                    tag: entity.tag().to_string(),
                    layer: entity.layer(),
                    active: entity.is_active(),
                    position: transform.local_position(),
                    rotation: transform.local_rotation(),
                    scale: transform.local_scale(),
                    parent: world.parent(id).and_then(|parent| index.get(&parent).copied()),
                    box_collider: entity.get_behavior::<BoxCollider>().cloned(),
                    circle_collider: entity.get_behavior::<CircleCollider>().cloned(),
                    rigid_body: entity.get_behavior::<RigidBody>().cloned(),
                }
            })
            .collect();

        Self {
            name: name.into(),
            entities,
        }
    }

    /// Check that every parent index points at another record and that no
    /// parent chain loops back on itself
    pub fn validate(&self) -> Result<(), SceneError> {
        for (entity, record) in self.entities.iter().enumerate() {
            if let Some(parent) = record.parent {
                if parent >= self.entities.len() || parent == entity {
                    return Err(SceneError::InvalidParent { entity, parent });
                }
            }
        }

        for (entity, record) in self.entities.iter().enumerate() {
            let mut visited = HashSet::from([entity]);
            let mut next = record.parent;
            while let Some(parent) = next {
                if !visited.insert(parent) {
                    return Err(SceneError::ParentCycle { entity });
                }
                next = self.entities[parent].parent;
            }
        }
        Ok(())
    }

    /// Create the recorded entities in `world`
    ///
    /// Built-in behaviors are attached through the normal lifecycle. Returns
    /// the new ids in record order.
    pub fn instantiate(&self, world: &mut World) -> Result<Vec<EntityId>, SceneError> {
        self.validate()?;

        let ids: Vec<EntityId> = self
            .entities
            .iter()
            .map(|record| world.create_entity(record.name.clone()))
            .collect();

        // Link first: with every transform still at identity, parenting
        // leaves local values untouched.
        for (entity, record) in self.entities.iter().enumerate() {
            if let Some(parent) = record.parent {
                if !world.set_parent(ids[entity], Some(ids[parent])) {
                    for id in &ids {
                        world.destroy_entity_immediate(*id);
                    }
                    return Err(SceneError::InvalidParent { entity, parent });
                }
            }
        }

        for (record, id) in self.entities.iter().zip(&ids) {
            let id = *id;
            if let Some(entity) = world.entity_mut(id) {
                entity.set_tag(record.tag.clone());
                entity.set_layer(record.layer);
            }
            if let Some(mut transform) = world.transform_mut(id) {
                transform.set_local_position(record.position);
                transform.set_local_rotation(record.rotation);
                transform.set_local_scale(record.scale);
            }
            if let Some(collider) = &record.box_collider {
                world.add_behavior(id, collider.clone());
            }
            if let Some(collider) = &record.circle_collider {
                let mut collider = collider.clone();
                let radius = collider.radius();
                collider.set_radius(radius);
                world.add_behavior(id, collider);
            }
            if let Some(body) = &record.rigid_body {
                world.add_behavior(id, body.clone().clamped());
            }
            if !record.active {
                world.set_active(id, false);
            }
        }

        Ok(ids)
    }

    /// Serialize in the given format
    pub fn to_text(&self, format: SceneFormat) -> Result<String, SceneError> {
        match format {
            SceneFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| SceneError::Serialize(e.to_string())),
            SceneFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| SceneError::Serialize(e.to_string()))
            }
        }
    }

    /// Parse from the given format
    pub fn from_text(contents: &str, format: SceneFormat) -> Result<Self, SceneError> {
        match format {
            SceneFormat::Ron => ron::from_str(contents).map_err(|e| SceneError::Parse(e.to_string())),
            SceneFormat::Toml => toml::from_str(contents).map_err(|e| SceneError::Parse(e.to_string())),
        }
    }

    /// Write to a `.ron` or `.toml` file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let contents = self.to_text(SceneFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        log::info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Read from a `.ron` or `.toml` file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        let document = Self::from_text(&contents, format)?;
        log::info!("Loaded scene '{}' from {}", document.name, path.display());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Collider;
    use approx::assert_relative_eq;

    fn sample_world() -> World {
        let mut world = World::new();
        let root = world.create_entity("root");
        let child = world.create_entity("child");
        world.set_parent(child, Some(root));

        if let Some(mut transform) = world.transform_mut(root) {
            transform.set_local_position(Vec2::new(10.0, 0.0));
            transform.set_local_rotation(90.0);
        }
        if let Some(mut transform) = world.transform_mut(child) {
            transform.set_local_position(Vec2::new(2.0, 0.0));
            transform.set_local_scale(Vec2::new(2.0, 2.0));
        }
        if let Some(entity) = world.entity_mut(child) {
            entity.set_tag("Player");
            entity.set_layer(3);
        }
        world.add_behavior(root, BoxCollider::new().with_size(Vec2::new(4.0, 2.0)).with_trigger(true));
        world.add_behavior(child, CircleCollider::new().with_radius(1.5));
        world.add_behavior(child, RigidBody::new().with_mass(3.0));
        world.set_active(child, false);
        world
    }

    #[test]
    fn test_capture_records_hierarchy_and_behaviors() {
        let document = SceneDocument::capture("level", &sample_world());

        assert_eq!(document.name, "level");
        assert_eq!(document.entities.len(), 2);
        let child = &document.entities[1];
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.tag, "Player");
        assert_eq!(child.layer, 3);
        assert!(!child.active);
        assert_eq!(child.position, Vec2::new(2.0, 0.0));
        assert!(child.circle_collider.is_some());
        assert_relative_eq!(child.rigid_body.as_ref().unwrap().mass(), 3.0);
        assert!(document.entities[0].box_collider.as_ref().unwrap().is_trigger());
    }

    #[test]
    fn test_ron_and_toml_text_round_trip() {
        let document = SceneDocument::capture("level", &sample_world());
        for format in [SceneFormat::Ron, SceneFormat::Toml] {
            let text = document.to_text(format).unwrap();
            assert_eq!(SceneDocument::from_text(&text, format).unwrap(), document);
        }
    }

    #[test]
    fn test_instantiate_rebuilds_world_pose() {
        let original = sample_world();
        let document = SceneDocument::capture("level", &original);

        let mut world = World::new();
        let ids = document.instantiate(&mut world).unwrap();

        assert_eq!(world.parent(ids[1]), Some(ids[0]));
        let child = world.transform(ids[1]).unwrap();
        assert_relative_eq!(child.position(), Vec2::new(10.0, 2.0), epsilon = 1e-4);
        assert_relative_eq!(child.rotation(), 90.0);
        assert!(!world.entity(ids[1]).unwrap().is_active());
        assert_eq!(world.colliders(ids[1]).len(), 1);
    }

    #[test]
    fn test_invalid_parent_is_rejected() {
        let document = SceneDocument {
            name: "broken".into(),
            entities: vec![EntityRecord {
                name: "orphan".into(),
                parent: Some(4),
                ..EntityRecord::default()
            }],
        };

        let mut world = World::new();
        assert!(matches!(
            document.instantiate(&mut world),
            Err(SceneError::InvalidParent { entity: 0, parent: 4 })
        ));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_parent_cycle_is_rejected() {
        let record = |name: &str, parent| EntityRecord {
            name: name.into(),
            parent: Some(parent),
            ..EntityRecord::default()
        };
        let document = SceneDocument {
            name: "loop".into(),
            entities: vec![record("a", 1), record("b", 2), record("c", 0)],
        };

        let mut world = World::new();
        world.create_entity("existing");
        assert!(matches!(
            document.instantiate(&mut world),
            Err(SceneError::ParentCycle { entity: 0 })
        ));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            SceneFormat::from_path(Path::new("scene.json")),
            Err(SceneError::UnsupportedFormat(_))
        ));
        assert_eq!(SceneFormat::from_path(Path::new("a/b.toml")).unwrap(), SceneFormat::Toml);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.ron");
        let document = SceneDocument::capture("level", &sample_world());

        document.save_to_file(&path).unwrap();
        assert_eq!(SceneDocument::load_from_file(&path).unwrap(), document);
    }
}
