//! Collider behaviors
//!
//! Colliders store their geometry in model space (size or radius plus an
//! offset) and derive world extents from the owner's transform at query
//! time. They only detect overlap; nothing here moves a body.

use serde::{Deserialize, Serialize};

use crate::debug::DrawSurface;
use crate::ecs::behavior::Behavior;
use crate::ecs::hierarchy::TransformView;
use crate::foundation::math::{Vec2, Vec4};
use crate::physics::{CollisionInfo, CollisionShape, WorldSpaceShape};

/// State shared by every collider type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderBase {
    /// World-space offset from the owner's position (not rotated)
    pub offset: Vec2,
    /// Trigger colliders report overlap but are drawn differently
    pub is_trigger: bool,
    /// Disabled colliders never report collisions
    pub enabled: bool,
}

impl Default for ColliderBase {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            is_trigger: false,
            enabled: true,
        }
    }
}

/// Collision geometry attached to an entity
///
/// The `enabled` flag here is independent of the behavior lifecycle flag.
pub trait Collider: Behavior {
    /// Shared collider state
    fn base(&self) -> &ColliderBase;

    /// Shared collider state, mutable
    fn base_mut(&mut self) -> &mut ColliderBase;

    /// Model-space shape
    fn shape(&self) -> CollisionShape;

    /// Offset from the owner's world position
    fn offset(&self) -> Vec2 {
        self.base().offset
    }

    /// Set the offset
    fn set_offset(&mut self, offset: Vec2) {
        self.base_mut().offset = offset;
    }

    /// Whether this is a trigger
    fn is_trigger(&self) -> bool {
        self.base().is_trigger
    }

    /// Mark as trigger
    fn set_trigger(&mut self, trigger: bool) {
        self.base_mut().is_trigger = trigger;
    }

    /// Whether collision checks are enabled
    fn is_enabled(&self) -> bool {
        self.base().enabled
    }

    /// Enable or disable collision checks
    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().enabled = enabled;
    }

    /// World position of the owner plus the offset
    fn world_center(&self, transform: &TransformView<'_>) -> Vec2 {
        transform.position() + self.offset()
    }

    /// Shape in world space
    fn world_shape(&self, transform: &TransformView<'_>) -> WorldSpaceShape {
        self.shape()
            .to_world_space(self.world_center(transform), transform.lossy_scale())
    }

    /// Inclusive world-space point containment
    fn contains_point(&self, transform: &TransformView<'_>, point: &Vec2) -> bool {
        self.world_shape(transform).contains_point(point)
    }

    /// Test against another collider; the normal points toward `other`
    ///
    /// A disabled collider on either side never collides.
    fn check_collision(
        &self,
        transform: &TransformView<'_>,
        other: &dyn Collider,
        other_transform: &TransformView<'_>,
    ) -> CollisionInfo {
        if !self.is_enabled() || !other.is_enabled() {
            return CollisionInfo::none();
        }
        self.world_shape(transform)
            .collide(&other.world_shape(other_transform))
    }

    /// Outline the world shape
    fn draw_debug(&self, transform: &TransformView<'_>, surface: &mut dyn DrawSurface, color: Vec4) {
        if !self.is_enabled() {
            return;
        }
        match self.world_shape(transform) {
            WorldSpaceShape::Box(shape) => surface.draw_rect(shape.min(), shape.size, color),
            WorldSpaceShape::Circle(shape) => surface.draw_circle(shape.center, shape.radius, color),
        }
    }
}

/// Axis-aligned box collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxCollider {
    base: ColliderBase,
    size: Vec2,
}

impl BoxCollider {
    /// 1x1 box
    pub fn new() -> Self {
        Self {
            base: ColliderBase::default(),
            size: Vec2::new(1.0, 1.0),
        }
    }

    /// Builder pattern: set the full size
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Builder pattern: set the offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.base.offset = offset;
        self
    }

    /// Builder pattern: mark as trigger
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.base.is_trigger = trigger;
        self
    }

    /// Full model-space size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Set the full model-space size
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Size scaled by the owner's lossy scale
    pub fn world_size(&self, transform: &TransformView<'_>) -> Vec2 {
        let scale = transform.lossy_scale();
        Vec2::new(self.size.x * scale.x.abs(), self.size.y * scale.y.abs())
    }
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for BoxCollider {
    fn as_collider(&self) -> Option<&(dyn Collider + 'static)> {
        Some(self)
    }
}

impl Collider for BoxCollider {
    fn base(&self) -> &ColliderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColliderBase {
        &mut self.base
    }

    fn shape(&self) -> CollisionShape {
        CollisionShape::rect(self.size)
    }
}

/// Circle collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleCollider {
    base: ColliderBase,
    radius: f32,
}

impl CircleCollider {
    /// Circle of radius 0.5
    pub fn new() -> Self {
        Self {
            base: ColliderBase::default(),
            radius: 0.5,
        }
    }

    /// Builder pattern: set the radius (clamped to be non-negative)
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.set_radius(radius);
        self
    }

    /// Builder pattern: set the offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.base.offset = offset;
        self
    }

    /// Builder pattern: mark as trigger
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.base.is_trigger = trigger;
        self
    }

    /// Model-space radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius (clamped to be non-negative)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Radius scaled by the larger lossy scale axis
    pub fn world_radius(&self, transform: &TransformView<'_>) -> f32 {
        let scale = transform.lossy_scale();
        self.radius * scale.x.abs().max(scale.y.abs())
    }
}

impl Default for CircleCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for CircleCollider {
    fn as_collider(&self) -> Option<&(dyn Collider + 'static)> {
        Some(self)
    }
}

impl Collider for CircleCollider {
    fn base(&self) -> &ColliderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ColliderBase {
        &mut self.base
    }

    fn shape(&self) -> CollisionShape {
        CollisionShape::circle(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::{DebugDrawSystem, DebugShape};
    use crate::ecs::World;
    use approx::assert_relative_eq;

    fn place(world: &mut World, name: &str, position: Vec2) -> crate::ecs::EntityId {
        let id = world.create_entity(name);
        world.transform_mut(id).unwrap().set_position(position);
        id
    }

    #[test]
    fn test_defaults() {
        let boxed = BoxCollider::new();
        assert_eq!(boxed.size(), Vec2::new(1.0, 1.0));
        assert!(boxed.is_enabled());
        assert!(!boxed.is_trigger());

        let circle = CircleCollider::new().with_radius(-2.0);
        assert_eq!(circle.radius(), 0.0);
        assert_eq!(CircleCollider::default().radius(), 0.5);
    }

    #[test]
    fn test_world_extents_follow_scale_and_offset() {
        let mut world = World::new();
        let id = place(&mut world, "e", Vec2::new(10.0, 10.0));
        world.transform_mut(id).unwrap().set_local_scale(Vec2::new(2.0, 3.0));

        let boxed = BoxCollider::new().with_offset(Vec2::new(1.0, 0.0));
        let circle = CircleCollider::new();
        let view = world.transform(id).unwrap();

        assert_eq!(boxed.world_center(&view), Vec2::new(11.0, 10.0));
        assert_relative_eq!(boxed.world_size(&view), Vec2::new(2.0, 3.0));
        assert_relative_eq!(circle.world_radius(&view), 1.5);
    }

    #[test]
    fn test_disabled_collider_never_collides() {
        let mut world = World::new();
        let a = place(&mut world, "a", Vec2::zeros());
        let b = place(&mut world, "b", Vec2::new(0.5, 0.0));

        let first = BoxCollider::new();
        let mut second = BoxCollider::new();
        let (ta, tb) = (world.transform(a).unwrap(), world.transform(b).unwrap());
        assert!(first.check_collision(&ta, &second, &tb).is_colliding);

        second.set_enabled(false);
        assert!(!first.check_collision(&ta, &second, &tb).is_colliding);
        assert!(!second.check_collision(&tb, &first, &ta).is_colliding);
    }

    #[test]
    fn test_capability_query_finds_both_collider_types() {
        let mut world = World::new();
        let id = world.create_entity("e");
        world.add_behavior(id, BoxCollider::new());
        world.add_behavior(id, CircleCollider::new());

        let entity = world.entity(id).unwrap();
        assert_eq!(entity.get_behaviors::<dyn Collider>().len(), 2);
        assert_eq!(entity.get_behaviors::<CircleCollider>().len(), 1);
    }

    #[test]
    fn test_draw_debug_outlines_world_shape() {
        let mut world = World::new();
        let id = place(&mut world, "e", Vec2::new(4.0, 4.0));
        let view = world.transform(id).unwrap();
        let mut surface = DebugDrawSystem::new();
        let color = Vec4::new(0.0, 1.0, 0.0, 1.0);

        BoxCollider::new().with_size(Vec2::new(2.0, 2.0)).draw_debug(&view, &mut surface, color);

        assert_eq!(
            surface.get_shapes(),
            vec![&DebugShape::Rect {
                top_left: Vec2::new(3.0, 3.0),
                size: Vec2::new(2.0, 2.0),
                color,
                duration: 0.0,
            }]
        );
    }
}
