//! Behavior trait and lifecycle dispatch context
//!
//! Behaviors are the attachable logic units of an entity. Each concrete type
//! implements [`Behavior`] and overrides the lifecycle hooks it cares about.
//!
//! ## Lifecycle
//!
//! 1. `on_awake` once, when attached
//! 2. `on_enable` / `on_disable` on every real flip of the effective state
//! 3. `on_start` once, before the first update while active
//! 4. `on_update`, `on_late_update`, `on_fixed_update` every frame
//! 5. `on_destroy` once, at teardown
//!
//! While a hook runs, the behavior is detached from its slot so it can be
//! handed a [`BehaviorContext`] with mutable access to the whole world. A
//! lookup of the running behavior's own type on its own entity therefore
//! returns `None` for the duration of the hook.

use std::any::Any;

use crate::ecs::components::Collider;
use crate::ecs::entity::EntityId;
use crate::ecs::hierarchy::{TransformMut, TransformView};
use crate::ecs::world::World;
use crate::foundation::identity::Identity;

/// Downcasting support for behavior trait objects
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Attachable entity logic with a typed lifecycle
///
/// All hooks default to no-ops.
pub trait Behavior: AsAny {
    /// Called once when the behavior is attached
    fn on_awake(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Called when the behavior becomes active
    fn on_enable(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Called when the behavior stops being active
    fn on_disable(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Called once before the first update while active
    fn on_start(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Per-frame update
    fn on_update(&mut self, _ctx: &mut BehaviorContext<'_>, _delta_time: f32) {}

    /// Per-frame update, after every entity's `on_update`
    fn on_late_update(&mut self, _ctx: &mut BehaviorContext<'_>, _delta_time: f32) {}

    /// Fixed-rate update
    fn on_fixed_update(&mut self, _ctx: &mut BehaviorContext<'_>, _fixed_delta_time: f32) {}

    /// Called once at teardown
    fn on_destroy(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Collider view of this behavior, if it is one
    fn as_collider(&self) -> Option<&(dyn Collider + 'static)> {
        None
    }
}

/// Types that can be extracted from a behavior trait object
///
/// Implemented for every concrete [`Behavior`] (exact-type match) and for
/// `dyn Collider` (capability match), so [`Entity::get_behaviors`] handles
/// both kinds of query.
///
/// [`Entity::get_behaviors`]: crate::ecs::Entity::get_behaviors
pub trait Capability: 'static {
    /// Borrow `behavior` as `Self` if it matches
    fn from_behavior(behavior: &dyn Behavior) -> Option<&Self>;
}

impl<T: Behavior> Capability for T {
    fn from_behavior(behavior: &dyn Behavior) -> Option<&Self> {
        behavior.as_any().downcast_ref::<T>()
    }
}

impl Capability for dyn Collider {
    fn from_behavior(behavior: &dyn Behavior) -> Option<&Self> {
        behavior.as_collider()
    }
}

/// Mutable access to the world handed to behavior hooks
pub struct BehaviorContext<'w> {
    world: &'w mut World,
    entity: EntityId,
}

impl<'w> BehaviorContext<'w> {
    pub(crate) fn new(world: &'w mut World, entity: EntityId) -> Self {
        Self { world, entity }
    }

    /// The entity that owns the running behavior
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Shared access to the world
    pub fn world(&self) -> &World {
        self.world
    }

    /// Mutable access to the world
    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }

    /// The owner's transform (`None` once the owner is destroyed)
    pub fn transform(&self) -> Option<TransformView<'_>> {
        self.world.transform(self.entity)
    }

    /// The owner's transform for mutation
    pub fn transform_mut(&mut self) -> Option<TransformMut<'_>> {
        self.world.transform_mut(self.entity)
    }

    /// Queue the owner for destruction at the start of the next update
    pub fn destroy_owner(&mut self) {
        self.world.destroy_entity(self.entity);
    }
}

/// Storage slot for one attached behavior
pub(crate) struct BehaviorSlot {
    pub(crate) identity: Identity,
    pub(crate) enabled: bool,
    pub(crate) started: bool,
    /// Empty while one of the behavior's hooks is running
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl BehaviorSlot {
    pub(crate) fn new(name: &str, behavior: Box<dyn Behavior>) -> Self {
        Self {
            identity: Identity::new(name),
            enabled: true,
            started: false,
            behavior: Some(behavior),
        }
    }

    /// `enabled && identity.active`, without hierarchy recursion
    pub(crate) fn is_active(&self) -> bool {
        self.enabled && self.identity.is_active()
    }
}

/// Short type name used as the default behavior name
pub(crate) fn type_name_of<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Behavior for Marker {}

    struct Other;
    impl Behavior for Other {}

    #[test]
    fn test_exact_type_capability() {
        let boxed: Box<dyn Behavior> = Box::new(Marker);
        let behavior = boxed.as_ref();

        assert!(Marker::from_behavior(behavior).is_some());
        assert!(Other::from_behavior(behavior).is_none());
        assert!(<dyn Collider>::from_behavior(behavior).is_none());
    }

    #[test]
    fn test_slot_active_predicate() {
        let mut slot = BehaviorSlot::new("Marker", Box::new(Marker));
        assert!(slot.is_active());

        slot.identity.set_active(false);
        assert!(!slot.is_active());

        slot.identity.set_active(true);
        slot.enabled = false;
        assert!(!slot.is_active());
    }

    #[test]
    fn test_type_name_is_short() {
        assert_eq!(type_name_of::<Marker>(), "Marker");
    }
}
