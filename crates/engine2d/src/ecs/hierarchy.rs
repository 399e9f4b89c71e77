//! World-space transform views
//!
//! A [`Transform`] only knows its local values and links. World-space
//! queries and hierarchy edits need the ancestors and descendants too, so
//! they go through views borrowed from the [`World`]:
//!
//! - [`TransformView`] for reads (`world.transform(id)`)
//! - [`TransformMut`] for writes (`world.transform_mut(id)`)
//!
//! Every local setter short-circuits on an equal value and otherwise marks
//! the node and all of its descendants dirty. World matrices are recomputed
//! on the next read.

use crate::ecs::components::Transform;
use crate::ecs::entity::EntityId;
use crate::ecs::world::World;
use crate::foundation::math::{self, directions, utils, Mat3, Vec2};

impl World {
    /// Cached `(local_to_world, world_to_local)`, recomputed if dirty
    pub(crate) fn matrices(&self, id: EntityId) -> Option<(Mat3, Mat3)> {
        let transform = &self.entity(id)?.transform;
        if let Some(cached) = transform.cached_matrices() {
            return Some(cached);
        }

        let local = transform.local_matrix();
        let world = match transform.parent().and_then(|parent| self.matrices(parent)) {
            Some((parent_world, _)) => parent_world * local,
            None => local,
        };
        Some(transform.store_matrices(world))
    }

    /// Mark `id` and every descendant dirty
    pub(crate) fn mark_subtree_dirty(&self, id: EntityId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entity(current) {
                entity.transform.mark_dirty();
                stack.extend_from_slice(entity.transform.children());
            }
        }
    }

    /// Whether `id` is `ancestor` or lies somewhere below it
    pub(crate) fn is_in_subtree(&self, id: EntityId, ancestor: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.entity(node).and_then(|entity| entity.transform.parent());
        }
        false
    }
}

/// Read-only world-space view of one entity's transform
#[derive(Clone, Copy)]
pub struct TransformView<'w> {
    world: &'w World,
    id: EntityId,
    transform: &'w Transform,
}

impl<'w> TransformView<'w> {
    pub(crate) fn new(world: &'w World, id: EntityId) -> Option<Self> {
        let transform = &world.entity(id)?.transform;
        Some(Self { world, id, transform })
    }

    /// Entity owning this transform
    pub fn entity(&self) -> EntityId {
        self.id
    }

    /// Local data and links
    pub fn local(&self) -> &'w Transform {
        self.transform
    }

    /// Position relative to the parent
    pub fn local_position(&self) -> Vec2 {
        self.transform.local_position()
    }

    /// Rotation relative to the parent, in degrees
    pub fn local_rotation(&self) -> f32 {
        self.transform.local_rotation()
    }

    /// Scale relative to the parent
    pub fn local_scale(&self) -> Vec2 {
        self.transform.local_scale()
    }

    /// Whether the cached matrices are stale
    pub fn is_dirty(&self) -> bool {
        self.transform.is_dirty()
    }

    /// World matrix (`parent.world * local`)
    pub fn local_to_world_matrix(&self) -> Mat3 {
        self.world.matrices(self.id).map_or_else(Mat3::identity, |(world, _)| world)
    }

    /// Inverse of the world matrix (identity if singular)
    pub fn world_to_local_matrix(&self) -> Mat3 {
        self.world.matrices(self.id).map_or_else(Mat3::identity, |(_, inverse)| inverse)
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        match self.parent_view() {
            Some(parent) => parent.transform_point(&self.local_position()),
            None => self.local_position(),
        }
    }

    /// World rotation in degrees (sum of local rotations up the chain)
    pub fn rotation(&self) -> f32 {
        self.ancestors().map(|view| view.local_rotation()).sum()
    }

    /// Component-wise product of every ancestor's local scale
    ///
    /// Ignores rotation, hence lossy.
    pub fn lossy_scale(&self) -> Vec2 {
        self.ancestors()
            .fold(Vec2::new(1.0, 1.0), |scale, view| scale.component_mul(&view.local_scale()))
    }

    /// Local point to world space
    pub fn transform_point(&self, point: &Vec2) -> Vec2 {
        math::transform_point(&self.local_to_world_matrix(), point)
    }

    /// Local direction to world space
    pub fn transform_vector(&self, vector: &Vec2) -> Vec2 {
        math::transform_vector(&self.local_to_world_matrix(), vector)
    }

    /// World point to local space
    pub fn inverse_transform_point(&self, point: &Vec2) -> Vec2 {
        math::transform_point(&self.world_to_local_matrix(), point)
    }

    /// World direction to local space
    pub fn inverse_transform_vector(&self, vector: &Vec2) -> Vec2 {
        math::transform_vector(&self.world_to_local_matrix(), vector)
    }

    /// Local +x rotated by the world rotation
    pub fn right(&self) -> Vec2 {
        utils::rotate(&directions::right(), self.rotation())
    }

    /// Screen up (-y) rotated by the world rotation
    pub fn up(&self) -> Vec2 {
        utils::rotate(&directions::up(), self.rotation())
    }

    /// Facing direction; same as [`up`](Self::up)
    pub fn forward(&self) -> Vec2 {
        self.up()
    }

    /// Parent entity
    pub fn parent(&self) -> Option<EntityId> {
        self.transform.parent()
    }

    /// Children in attach order
    pub fn children(&self) -> &'w [EntityId] {
        self.transform.children()
    }

    /// Child at `index`, if in range
    pub fn child(&self, index: usize) -> Option<EntityId> {
        self.transform.children().get(index).copied()
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.transform.children().len()
    }

    /// Whether `ancestor` is a strict ancestor of this transform
    pub fn is_child_of(&self, ancestor: EntityId) -> bool {
        ancestor != self.id && self.world.is_in_subtree(self.id, ancestor)
    }

    fn parent_view(&self) -> Option<TransformView<'w>> {
        self.parent().and_then(|parent| TransformView::new(self.world, parent))
    }

    /// This view followed by each ancestor up to the root
    fn ancestors(&self) -> impl Iterator<Item = TransformView<'w>> {
        std::iter::successors(Some(*self), TransformView::parent_view)
    }
}

/// Mutable view of one entity's transform
pub struct TransformMut<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> TransformMut<'w> {
    pub(crate) fn new(world: &'w mut World, id: EntityId) -> Option<Self> {
        if world.entity(id).is_none() {
            return None;
        }
        Some(Self { world, id })
    }

    /// Read-only view of the same transform
    pub fn view(&self) -> Option<TransformView<'_>> {
        TransformView::new(self.world, self.id)
    }

    fn update_local(&mut self, assign: impl FnOnce(&mut Transform) -> bool) {
        let changed = self
            .world
            .entity_mut(self.id)
            .is_some_and(|entity| assign(&mut entity.transform));
        if changed {
            self.world.mark_subtree_dirty(self.id);
        }
    }

    /// Set the position relative to the parent
    pub fn set_local_position(&mut self, position: Vec2) {
        self.update_local(|t| t.assign_local_position(position));
    }

    /// Set the rotation relative to the parent, in degrees
    pub fn set_local_rotation(&mut self, degrees: f32) {
        self.update_local(|t| t.assign_local_rotation(degrees));
    }

    /// Set the scale relative to the parent
    pub fn set_local_scale(&mut self, scale: Vec2) {
        self.update_local(|t| t.assign_local_scale(scale));
    }

    /// Set the world position
    pub fn set_position(&mut self, position: Vec2) {
        let local = match self.view().and_then(|view| view.parent_view()) {
            Some(parent) => parent.inverse_transform_point(&position),
            None => position,
        };
        self.set_local_position(local);
    }

    /// Set the world rotation in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        let parent_rotation = self
            .view()
            .and_then(|view| view.parent_view())
            .map_or(0.0, |parent| parent.rotation());
        self.set_local_rotation(degrees - parent_rotation);
    }

    /// Move by `translation` in parent space
    pub fn translate(&mut self, translation: Vec2) {
        if let Some(position) = self.view().map(|view| view.local_position() + translation) {
            self.set_local_position(position);
        }
    }

    /// Rotate by `degrees`
    pub fn rotate(&mut self, degrees: f32) {
        if let Some(rotation) = self.view().map(|view| view.local_rotation() + degrees) {
            self.set_local_rotation(rotation);
        }
    }

    /// Multiply the local scale component-wise
    pub fn scale(&mut self, factor: Vec2) {
        if let Some(scale) = self.view().map(|view| view.local_scale().component_mul(&factor)) {
            self.set_local_scale(scale);
        }
    }

    /// Rotate so that `up` points at a world-space target
    ///
    /// No-op when the target coincides with the current position.
    pub fn look_at(&mut self, target: Vec2) {
        let Some(position) = self.view().map(|view| view.position()) else {
            return;
        };
        let offset = target - position;
        if offset.magnitude_squared() == 0.0 {
            return;
        }
        let direction = offset.normalize();
        let mut angle = utils::angle_between(&directions::up(), &direction);
        if direction.x < 0.0 {
            angle = -angle;
        }
        self.set_rotation(angle);
    }

    /// Re-parent while preserving world position, rotation and lossy scale
    ///
    /// Returns `false` (and changes nothing) if `parent` is missing, is this
    /// entity, or is one of its descendants.
    pub fn set_parent(&mut self, parent: Option<EntityId>) -> bool {
        let Some((current, world_position, world_rotation, world_scale)) = self
            .view()
            .map(|view| (view.parent(), view.position(), view.rotation(), view.lossy_scale()))
        else {
            return false;
        };
        if current == parent {
            return true;
        }

        if let Some(new_parent) = parent {
            if self.world.entity(new_parent).is_none() {
                return false;
            }
            if self.world.is_in_subtree(new_parent, self.id) {
                log::warn!("Rejected re-parenting {:?} under its own descendant {:?}", self.id, new_parent);
                return false;
            }
        }

        if let Some(old_parent) = current.and_then(|p| self.world.entity_mut(p)) {
            old_parent.transform.remove_child(self.id);
        }
        if let Some(new_parent) = parent.and_then(|p| self.world.entity_mut(p)) {
            new_parent.transform.push_child(self.id);
        }
        if let Some(entity) = self.world.entity_mut(self.id) {
            entity.transform.set_parent_link(parent);
        }
        self.world.mark_subtree_dirty(self.id);

        self.set_lossy_scale(world_scale);
        self.set_position(world_position);
        self.set_rotation(world_rotation);
        true
    }

    /// Set the local scale so the lossy scale matches `scale`
    ///
    /// Axes where the parent's lossy scale is zero keep the requested value.
    fn set_lossy_scale(&mut self, scale: Vec2) {
        let parent_scale = self
            .view()
            .and_then(|view| view.parent_view())
            .map_or_else(|| Vec2::new(1.0, 1.0), |parent| parent.lossy_scale());
        let divide = |value: f32, by: f32| if by == 0.0 { value } else { value / by };
        self.set_local_scale(Vec2::new(
            divide(scale.x, parent_scale.x),
            divide(scale.y, parent_scale.y),
        ));
    }
}
