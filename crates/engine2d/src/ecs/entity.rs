//! Entity: identity, transform and an ordered set of behaviors
//!
//! Read access and plain data mutation live here. Anything that fires
//! lifecycle hooks (attach, remove, enable, activate, destroy) needs the
//! whole world and goes through [`World`](crate::ecs::World).

use std::any::TypeId;
use std::collections::HashMap;

use slotmap::SlotMap;

use crate::ecs::behavior::{Behavior, BehaviorSlot, Capability};
use crate::ecs::components::Transform;
use crate::foundation::identity::Identity;

slotmap::new_key_type! {
    /// Generational handle to an entity in a [`World`](crate::ecs::World)
    pub struct EntityId;

    /// Handle to a behavior slot within one entity
    pub struct BehaviorKey;
}

/// Tag assigned to entities that never set one
pub const UNTAGGED: &str = "Untagged";

/// A scene object
pub struct Entity {
    identity: Identity,
    layer: i32,
    tag: String,
    pub(crate) transform: Transform,
    pub(crate) behaviors: SlotMap<BehaviorKey, BehaviorSlot>,
    pub(crate) behavior_order: Vec<BehaviorKey>,
    pub(crate) type_index: HashMap<TypeId, BehaviorKey>,
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(name),
            layer: 0,
            tag: UNTAGGED.to_string(),
            transform: Transform::new(),
            behaviors: SlotMap::with_key(),
            behavior_order: Vec::new(),
            type_index: HashMap::new(),
        }
    }

    /// Identity (instance id, name, active flag)
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub(crate) fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.identity.set_name(name);
    }

    /// Local active flag (ancestors are not consulted)
    pub fn is_active(&self) -> bool {
        self.identity.is_active()
    }

    /// Layer index
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Set the layer index
    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Tag string
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set the tag string
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Whether the tag matches exactly
    pub fn compare_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Local transform data and hierarchy links
    ///
    /// World-space queries go through [`World::transform`](crate::ecs::World::transform).
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The behavior registered under `T`, if any
    pub fn get_behavior<T: Behavior>(&self) -> Option<&T> {
        let key = self.type_index.get(&TypeId::of::<T>())?;
        let behavior = self.behaviors.get(*key)?.behavior.as_deref()?;
        behavior.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the behavior registered under `T`
    ///
    /// Plain data access; no lifecycle hooks fire.
    pub fn get_behavior_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        let key = self.type_index.get(&TypeId::of::<T>())?;
        let behavior = self.behaviors.get_mut(*key)?.behavior.as_deref_mut()?;
        behavior.as_any_mut().downcast_mut::<T>()
    }

    /// Every behavior matching `C`, in attach order
    ///
    /// `C` is either a concrete behavior type or a capability such as
    /// `dyn Collider`.
    pub fn get_behaviors<C: ?Sized + Capability>(&self) -> Vec<&C> {
        self.behavior_order
            .iter()
            .filter_map(|key| self.behaviors.get(*key))
            .filter_map(|slot| slot.behavior.as_deref())
            .filter_map(|behavior| C::from_behavior(behavior))
            .collect()
    }

    /// Whether a behavior is registered under `T`
    pub fn has_behavior<T: Behavior>(&self) -> bool {
        self.type_index.contains_key(&TypeId::of::<T>())
    }

    /// Number of attached behaviors
    pub fn behavior_count(&self) -> usize {
        self.behavior_order.len()
    }

    /// Identity of the behavior registered under `T`
    pub fn behavior_identity<T: Behavior>(&self) -> Option<&Identity> {
        self.slot_of::<T>().map(|slot| &slot.identity)
    }

    /// Mutable identity of the behavior registered under `T`
    ///
    /// Changing the identity's active flag does not fire hooks.
    pub fn behavior_identity_mut<T: Behavior>(&mut self) -> Option<&mut Identity> {
        let key = *self.type_index.get(&TypeId::of::<T>())?;
        self.behaviors.get_mut(key).map(|slot| &mut slot.identity)
    }

    /// Enabled flag of the behavior registered under `T`
    pub fn is_behavior_enabled<T: Behavior>(&self) -> Option<bool> {
        self.slot_of::<T>().map(|slot| slot.enabled)
    }

    /// `enabled && identity.active` of the behavior registered under `T`
    pub fn is_behavior_active<T: Behavior>(&self) -> Option<bool> {
        self.slot_of::<T>().map(BehaviorSlot::is_active)
    }

    fn slot_of<T: Behavior>(&self) -> Option<&BehaviorSlot> {
        let key = self.type_index.get(&TypeId::of::<T>())?;
        self.behaviors.get(*key)
    }

    /// Detach a slot from storage, order and index
    pub(crate) fn detach_slot(&mut self, key: BehaviorKey) -> Option<BehaviorSlot> {
        self.behavior_order.retain(|k| *k != key);
        self.type_index.retain(|_, k| *k != key);
        self.behaviors.remove(key)
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("identity", &self.identity)
            .field("layer", &self.layer)
            .field("tag", &self.tag)
            .field("transform", &self.transform)
            .field("behaviors", &self.behavior_order.len())
            .finish()
    }
}
