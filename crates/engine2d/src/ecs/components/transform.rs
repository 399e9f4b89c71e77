//! Transform component
//!
//! Every entity owns exactly one [`Transform`]. It stores the local
//! position/rotation/scale, the hierarchy links and a lazily recomputed
//! world matrix. Operations that touch the hierarchy (world-space setters,
//! re-parenting, dirty propagation) live on the world views in
//! [`crate::ecs::hierarchy`], because they need to reach other entities.

use std::cell::Cell;

use crate::ecs::entity::EntityId;
use crate::foundation::math::{self, Mat3, Vec2};

/// Hierarchical 2D transform with cached world matrices
///
/// Rotation is in degrees. The cache uses interior mutability so matrix
/// reads work through shared references.
#[derive(Debug)]
pub struct Transform {
    local_position: Vec2,
    local_rotation: f32,
    local_scale: Vec2,

    parent: Option<EntityId>,
    children: Vec<EntityId>,

    local_to_world: Cell<Mat3>,
    world_to_local: Cell<Mat3>,
    dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform with no parent
    pub fn new() -> Self {
        Self {
            local_position: Vec2::zeros(),
            local_rotation: 0.0,
            local_scale: Vec2::new(1.0, 1.0),
            parent: None,
            children: Vec::new(),
            local_to_world: Cell::new(Mat3::identity()),
            world_to_local: Cell::new(Mat3::identity()),
            dirty: Cell::new(true),
        }
    }

    /// Builder pattern: set the local position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.local_position = position;
        self
    }

    /// Builder pattern: set the local rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.local_rotation = degrees;
        self
    }

    /// Builder pattern: set the local scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.local_scale = scale;
        self
    }

    /// Position relative to the parent
    pub fn local_position(&self) -> Vec2 {
        self.local_position
    }

    /// Rotation relative to the parent, in degrees
    pub fn local_rotation(&self) -> f32 {
        self.local_rotation
    }

    /// Scale relative to the parent
    pub fn local_scale(&self) -> Vec2 {
        self.local_scale
    }

    /// `T(position) * R(rotation) * S(scale)`
    pub fn local_matrix(&self) -> Mat3 {
        math::trs(&self.local_position, self.local_rotation, &self.local_scale)
    }

    /// Parent entity, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in attach order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Whether the cached matrices are stale
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    // Raw setters below return whether the value changed. Callers are
    // responsible for dirtying descendants.

    pub(crate) fn assign_local_position(&mut self, position: Vec2) -> bool {
        if self.local_position == position {
            return false;
        }
        self.local_position = position;
        true
    }

    pub(crate) fn assign_local_rotation(&mut self, degrees: f32) -> bool {
        if self.local_rotation == degrees {
            return false;
        }
        self.local_rotation = degrees;
        true
    }

    pub(crate) fn assign_local_scale(&mut self, scale: Vec2) -> bool {
        if self.local_scale == scale {
            return false;
        }
        self.local_scale = scale;
        true
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: EntityId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub(crate) fn cached_matrices(&self) -> Option<(Mat3, Mat3)> {
        if self.dirty.get() {
            None
        } else {
            Some((self.local_to_world.get(), self.world_to_local.get()))
        }
    }

    pub(crate) fn store_matrices(&self, local_to_world: Mat3) -> (Mat3, Mat3) {
        let world_to_local = math::affine_inverse(&local_to_world);
        self.local_to_world.set(local_to_world);
        self.world_to_local.set(world_to_local);
        self.dirty.set(false);
        (local_to_world, world_to_local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_transform_is_identity_and_dirty() {
        let transform = Transform::new();
        assert_eq!(transform.local_position(), Vec2::zeros());
        assert_eq!(transform.local_rotation(), 0.0);
        assert_eq!(transform.local_scale(), Vec2::new(1.0, 1.0));
        assert!(transform.is_dirty());
        assert!(transform.parent().is_none());
    }

    #[test]
    fn test_assign_short_circuits_on_equal_value() {
        let mut transform = Transform::new().with_position(Vec2::new(1.0, 2.0));
        assert!(!transform.assign_local_position(Vec2::new(1.0, 2.0)));
        assert!(transform.assign_local_position(Vec2::new(2.0, 2.0)));
        assert!(!transform.assign_local_rotation(0.0));
        assert!(transform.assign_local_scale(Vec2::new(2.0, 1.0)));
    }

    #[test]
    fn test_store_matrices_cleans_and_caches_inverse() {
        let transform = Transform::new()
            .with_position(Vec2::new(3.0, 4.0))
            .with_rotation(45.0);
        let (world, inverse) = transform.store_matrices(transform.local_matrix());

        assert!(!transform.is_dirty());
        assert_relative_eq!(world * inverse, Mat3::identity(), epsilon = 1e-5);
        assert_eq!(transform.cached_matrices(), Some((world, inverse)));

        transform.mark_dirty();
        assert!(transform.cached_matrices().is_none());
    }
}
