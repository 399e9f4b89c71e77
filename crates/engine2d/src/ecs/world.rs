//! ECS World: entity storage and behavior dispatch
//!
//! The world owns every [`Entity`] of one scene in a generational
//! [`SlotMap`], remembers creation order for deterministic iteration, and
//! runs all lifecycle hooks.
//!
//! Hooks receive a [`BehaviorContext`] with `&mut World`. To make that
//! possible the running behavior is taken out of its slot for the duration
//! of the call and put back afterwards. If its slot vanished in the meantime
//! (the behavior was removed or replaced, or its entity destroyed), it gets
//! `on_destroy` instead of going back.

use std::any::TypeId;

use slotmap::SlotMap;

use crate::core::config::DebugConfig;
use crate::debug::DrawSurface;
use crate::ecs::behavior::{type_name_of, Behavior, BehaviorContext, BehaviorSlot};
use crate::ecs::components::Collider;
use crate::ecs::entity::{BehaviorKey, Entity, EntityId};
use crate::ecs::hierarchy::{TransformMut, TransformView};
use crate::foundation::math::Vec2;
use crate::physics::{CollisionInfo, CollisionLayers};

/// Per-frame dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Update,
    LateUpdate,
    FixedUpdate,
}

/// ECS World containing all entities and their behaviors
#[derive(Debug)]
pub struct World {
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    pending_destroy: Vec<EntityId>,
    destroying: Vec<EntityId>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            pending_destroy: Vec::new(),
            destroying: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Create a new root entity with an identity transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let entity = Entity::new(name);
        log::debug!("Created entity '{}' ({})", entity.name(), entity.identity().instance_id());
        let id = self.entities.insert(entity);
        self.order.push(id);
        id
    }

    /// Whether `id` refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Get an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a mutable entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Live entity ids in creation order
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Get an iterator over all entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(*id).map(|entity| (*id, entity)))
    }

    /// First entity with the given name
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.entities().find(|(_, e)| e.name() == name).map(|(id, _)| id)
    }

    /// First entity with the given tag
    pub fn find_entity_with_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities().find(|(_, e)| e.compare_tag(tag)).map(|(id, _)| id)
    }

    /// Every entity with the given tag
    pub fn find_entities_with_tag(&self, tag: &str) -> Vec<EntityId> {
        self.entities()
            .filter(|(_, e)| e.compare_tag(tag))
            .map(|(id, _)| id)
            .collect()
    }

    /// Set the entity's active flag, firing `on_enable` / `on_disable`
    ///
    /// Deactivating disables every behavior; activating re-enables the
    /// behaviors that are themselves active. Returns `false` if the entity
    /// does not exist.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        if entity.is_active() == active {
            return true;
        }
        entity.identity_mut().set_active(active);
        log::trace!("Entity '{}' active = {}", entity.name(), active);

        let keys = entity.behavior_order.clone();
        for key in keys {
            if active {
                if self.slot_is_active(id, key) {
                    self.invoke(id, key, |b, ctx| b.on_enable(ctx));
                }
            } else {
                self.invoke(id, key, |b, ctx| b.on_disable(ctx));
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// World-space view of an entity's transform
    pub fn transform(&self, id: EntityId) -> Option<TransformView<'_>> {
        TransformView::new(self, id)
    }

    /// Mutable view of an entity's transform
    pub fn transform_mut(&mut self, id: EntityId) -> Option<TransformMut<'_>> {
        TransformMut::new(self, id)
    }

    /// Re-parent `child`, preserving its world position and rotation
    ///
    /// Returns `false` for missing entities and for parents that would
    /// create a cycle.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> bool {
        self.transform_mut(child).is_some_and(|mut t| t.set_parent(parent))
    }

    /// Parent of an entity
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entity(id)?.transform.parent()
    }

    /// Children of an entity in attach order
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entity(id).map(|e| e.transform.children()).unwrap_or_default()
    }

    /// Child at `index`
    pub fn child(&self, id: EntityId, index: usize) -> Option<EntityId> {
        self.children(id).get(index).copied()
    }

    /// Number of children
    pub fn child_count(&self, id: EntityId) -> usize {
        self.children(id).len()
    }

    // ------------------------------------------------------------------
    // Behaviors
    // ------------------------------------------------------------------

    /// Attach a behavior, replacing any existing behavior of the same type
    ///
    /// A replaced behavior receives `on_destroy` before the new one is
    /// attached at the end of the attach order. The new behavior receives
    /// `on_awake` and, if the entity is active, `on_enable`.
    pub fn add_behavior<T: Behavior>(&mut self, id: EntityId, behavior: T) -> Option<&mut T> {
        let type_id = TypeId::of::<T>();
        let entity = self.entities.get_mut(id)?;

        if let Some(old_key) = entity.type_index.get(&type_id).copied() {
            log::debug!("Replacing {} on entity '{}'", type_name_of::<T>(), entity.name());
            if let Some(slot) = entity.detach_slot(old_key) {
                self.teardown_slot(id, slot);
            }
        }

        let entity = self.entities.get_mut(id)?;
        let key = entity
            .behaviors
            .insert(BehaviorSlot::new(type_name_of::<T>(), Box::new(behavior)));
        entity.behavior_order.push(key);
        entity.type_index.insert(type_id, key);

        self.invoke(id, key, |b, ctx| b.on_awake(ctx));
        if self.entity_is_active(id) && self.slot_is_active(id, key) {
            self.invoke(id, key, |b, ctx| b.on_enable(ctx));
        }

        let behavior = self.entities.get_mut(id)?.behaviors.get_mut(key)?.behavior.as_deref_mut()?;
        behavior.as_any_mut().downcast_mut::<T>()
    }

    /// Get a behavior by type
    pub fn get_behavior<T: Behavior>(&self, id: EntityId) -> Option<&T> {
        self.entity(id)?.get_behavior::<T>()
    }

    /// Get a mutable behavior by type (plain data access, no hooks)
    pub fn get_behavior_mut<T: Behavior>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entity_mut(id)?.get_behavior_mut::<T>()
    }

    /// Remove the behavior registered under `T`, firing `on_destroy`
    ///
    /// Returns `false` if there was nothing to remove.
    pub fn remove_behavior<T: Behavior>(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let Some(key) = entity.type_index.get(&TypeId::of::<T>()).copied() else {
            return false;
        };
        match entity.detach_slot(key) {
            Some(slot) => {
                self.teardown_slot(id, slot);
                true
            }
            None => false,
        }
    }

    /// Enable or disable the behavior registered under `T`
    ///
    /// Fires `on_enable` / `on_disable` only when the flag actually flips.
    /// Returns `false` if there is no such behavior.
    pub fn set_behavior_enabled<T: Behavior>(&mut self, id: EntityId, enabled: bool) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let Some(key) = entity.type_index.get(&TypeId::of::<T>()).copied() else {
            return false;
        };
        let Some(slot) = entity.behaviors.get_mut(key) else {
            return false;
        };
        if slot.enabled == enabled {
            return true;
        }
        slot.enabled = enabled;

        if enabled {
            self.invoke(id, key, |b, ctx| b.on_enable(ctx));
        } else {
            self.invoke(id, key, |b, ctx| b.on_disable(ctx));
        }
        true
    }

    /// Run `f` on the behavior registered under `T` with a full context
    ///
    /// Use this for behavior methods that need to touch the world, such as
    /// [`RigidBody::move_position`](crate::ecs::components::RigidBody::move_position).
    pub fn with_behavior_mut<T, R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut T, &mut BehaviorContext<'_>) -> R,
    ) -> Option<R>
    where
        T: Behavior,
    {
        let key = self.entity(id)?.type_index.get(&TypeId::of::<T>()).copied()?;
        let mut behavior = self.entities.get_mut(id)?.behaviors.get_mut(key)?.behavior.take()?;

        let target: &mut dyn Behavior = &mut *behavior;
        let result = target.as_any_mut().downcast_mut::<T>().map(|typed| {
            let mut ctx = BehaviorContext::new(self, id);
            f(typed, &mut ctx)
        });

        self.restore(id, key, behavior);
        result
    }

    // ------------------------------------------------------------------
    // Destruction
    // ------------------------------------------------------------------

    /// Queue an entity for destruction at the start of the next update
    ///
    /// Idempotent; the entity stays fully live until then.
    pub fn destroy_entity(&mut self, id: EntityId) {
        if self.contains(id) && !self.pending_destroy.contains(&id) {
            self.pending_destroy.push(id);
        }
    }

    /// Whether an entity is queued for destruction
    pub fn is_pending_destroy(&self, id: EntityId) -> bool {
        self.pending_destroy.contains(&id)
    }

    /// Destroy an entity now
    ///
    /// Every behavior receives `on_destroy`, children are re-rooted keeping
    /// their world pose, and the entity is detached from its parent. Returns
    /// `false` if the entity does not exist.
    pub fn destroy_entity_immediate(&mut self, id: EntityId) -> bool {
        if !self.contains(id) || self.destroying.contains(&id) {
            return false;
        }
        self.destroying.push(id);
        self.pending_destroy.retain(|pending| *pending != id);

        while let Some(key) = self.entity(id).and_then(|e| e.behavior_order.first().copied()) {
            if let Some(slot) = self.entities.get_mut(id).and_then(|e| e.detach_slot(key)) {
                self.teardown_slot(id, slot);
            }
        }

        let children = self.children(id).to_vec();
        for child in children {
            self.set_parent(child, None);
        }
        if let Some(parent) = self.parent(id) {
            if let Some(parent) = self.entities.get_mut(parent) {
                parent.transform.remove_child(id);
            }
        }

        if let Some(entity) = self.entities.remove(id) {
            log::debug!("Destroyed entity '{}' ({})", entity.name(), entity.identity().instance_id());
        }
        self.order.retain(|e| *e != id);
        self.destroying.retain(|e| *e != id);
        true
    }

    /// Destroy every queued entity
    pub fn flush_destroyed(&mut self) {
        let pending = std::mem::take(&mut self.pending_destroy);
        for id in pending {
            self.destroy_entity_immediate(id);
        }
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        let ids = self.order.clone();
        for id in ids {
            self.destroy_entity_immediate(id);
        }
        self.pending_destroy.clear();
    }

    // ------------------------------------------------------------------
    // Frame dispatch
    // ------------------------------------------------------------------

    /// Fire `on_start` on every active behavior that has not started yet
    pub fn start(&mut self) {
        for id in self.order.clone() {
            if !self.entity_is_active(id) {
                continue;
            }
            let keys = self.entity(id).map(|e| e.behavior_order.clone()).unwrap_or_default();
            for key in keys {
                if self.entity_is_active(id) {
                    self.start_if_needed(id, key);
                }
            }
        }
    }

    /// Drain the destroy queue, then run `on_update`
    pub fn update(&mut self, delta_time: f32) {
        self.flush_destroyed();
        self.dispatch(Phase::Update, delta_time);
    }

    /// Run `on_late_update` (the destroy queue is not drained)
    pub fn late_update(&mut self, delta_time: f32) {
        self.dispatch(Phase::LateUpdate, delta_time);
    }

    /// Run `on_fixed_update` (the destroy queue is not drained)
    pub fn fixed_update(&mut self, fixed_delta_time: f32) {
        self.dispatch(Phase::FixedUpdate, fixed_delta_time);
    }

    fn dispatch(&mut self, phase: Phase, delta_time: f32) {
        for id in self.order.clone() {
            let keys = match self.entity(id) {
                Some(entity) if entity.is_active() => entity.behavior_order.clone(),
                _ => continue,
            };
            for key in keys {
                if !self.entity_is_active(id) {
                    break;
                }
                if !self.slot_is_active(id, key) {
                    continue;
                }
                self.start_if_needed(id, key);
                if !self.entity_is_active(id) || !self.slot_is_active(id, key) {
                    continue;
                }
                self.invoke(id, key, |b, ctx| match phase {
                    Phase::Update => b.on_update(ctx, delta_time),
                    Phase::LateUpdate => b.on_late_update(ctx, delta_time),
                    Phase::FixedUpdate => b.on_fixed_update(ctx, delta_time),
                });
            }
        }
    }

    fn start_if_needed(&mut self, id: EntityId, key: BehaviorKey) {
        let Some(slot) = self.entities.get_mut(id).and_then(|e| e.behaviors.get_mut(key)) else {
            return;
        };
        if slot.started || !slot.is_active() {
            return;
        }
        slot.started = true;
        self.invoke(id, key, |b, ctx| b.on_start(ctx));
    }

    fn entity_is_active(&self, id: EntityId) -> bool {
        self.entity(id).is_some_and(Entity::is_active)
    }

    fn slot_is_active(&self, id: EntityId, key: BehaviorKey) -> bool {
        self.entity(id)
            .and_then(|e| e.behaviors.get(key))
            .is_some_and(|slot| slot.is_active() && slot.behavior.is_some())
    }

    /// Run one hook with the behavior detached from its slot
    fn invoke(
        &mut self,
        id: EntityId,
        key: BehaviorKey,
        hook: impl FnOnce(&mut dyn Behavior, &mut BehaviorContext<'_>),
    ) {
        let Some(mut behavior) = self
            .entities
            .get_mut(id)
            .and_then(|e| e.behaviors.get_mut(key))
            .and_then(|slot| slot.behavior.take())
        else {
            return;
        };

        {
            let mut ctx = BehaviorContext::new(self, id);
            hook(&mut *behavior, &mut ctx);
        }

        self.restore(id, key, behavior);
    }

    fn restore(&mut self, id: EntityId, key: BehaviorKey, mut behavior: Box<dyn Behavior>) {
        match self.entities.get_mut(id).and_then(|e| e.behaviors.get_mut(key)) {
            Some(slot) => slot.behavior = Some(behavior),
            None => {
                // Slot vanished while the hook ran
                let mut ctx = BehaviorContext::new(self, id);
                behavior.on_destroy(&mut ctx);
            }
        }
    }

    fn teardown_slot(&mut self, id: EntityId, slot: BehaviorSlot) {
        if let Some(mut behavior) = slot.behavior {
            let mut ctx = BehaviorContext::new(self, id);
            behavior.on_destroy(&mut ctx);
        }
    }

    // ------------------------------------------------------------------
    // Collision queries
    // ------------------------------------------------------------------

    /// Colliders attached to an entity, in attach order
    pub fn colliders(&self, id: EntityId) -> Vec<&dyn Collider> {
        self.entity(id)
            .map(|e| e.get_behaviors::<dyn Collider>())
            .unwrap_or_default()
    }

    /// First colliding pair between the colliders of `a` and `b`
    ///
    /// The normal points from `a` toward `b`.
    pub fn check_collision(&self, a: EntityId, b: EntityId) -> CollisionInfo {
        let (Some(transform_a), Some(transform_b)) = (self.transform(a), self.transform(b)) else {
            return CollisionInfo::none();
        };

        for collider_a in self.colliders(a) {
            for collider_b in self.colliders(b) {
                let info = collider_a.check_collision(&transform_a, collider_b, &transform_b);
                if info.is_colliding {
                    return info;
                }
            }
        }
        CollisionInfo::none()
    }

    /// [`check_collision`](Self::check_collision) filtered by layer masks
    ///
    /// Each entity's `layer` is turned into a mask bit and checked against
    /// the other side's mask first.
    pub fn check_collision_masked(&self, a: EntityId, mask_a: u32, b: EntityId, mask_b: u32) -> CollisionInfo {
        let (Some(entity_a), Some(entity_b)) = (self.entity(a), self.entity(b)) else {
            return CollisionInfo::none();
        };
        let layer_a = CollisionLayers::bit(entity_a.layer());
        let layer_b = CollisionLayers::bit(entity_b.layer());
        if !CollisionLayers::should_collide(layer_a, mask_a, layer_b, mask_b) {
            return CollisionInfo::none();
        }
        self.check_collision(a, b)
    }

    /// Every colliding pair of active entities, in creation order
    ///
    /// Brute force over all pairs.
    pub fn collisions(&self) -> Vec<(EntityId, EntityId, CollisionInfo)> {
        let candidates: Vec<EntityId> = self
            .entities()
            .filter(|(_, e)| e.is_active() && !e.get_behaviors::<dyn Collider>().is_empty())
            .map(|(id, _)| id)
            .collect();

        let mut pairs = Vec::new();
        for (i, &a) in candidates.iter().enumerate() {
            for &b in &candidates[i + 1..] {
                let info = self.check_collision(a, b);
                if info.is_colliding {
                    pairs.push((a, b, info));
                }
            }
        }
        pairs
    }

    /// Active entities with an enabled collider containing `point`
    pub fn overlap_point(&self, point: Vec2) -> Vec<EntityId> {
        self.entities()
            .filter(|(_, e)| e.is_active())
            .filter(|(id, _)| {
                self.transform(*id).is_some_and(|t| {
                    self.colliders(*id)
                        .iter()
                        .any(|c| c.is_enabled() && c.contains_point(&t, &point))
                })
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Draw every enabled collider of every active entity
    pub fn draw_collider_gizmos(&self, surface: &mut dyn DrawSurface, config: &DebugConfig) {
        for (id, entity) in self.entities() {
            if !entity.is_active() {
                continue;
            }
            let Some(transform) = self.transform(id) else {
                continue;
            };
            for collider in entity.get_behaviors::<dyn Collider>() {
                if !collider.is_enabled() {
                    continue;
                }
                let color = if collider.is_trigger() {
                    config.trigger_color()
                } else {
                    config.collider_color()
                };
                collider.draw_debug(&transform, surface, color);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
