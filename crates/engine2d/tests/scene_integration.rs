//! End-to-end scene behavior through the public API
//!
//! Hierarchy, collision, rigid-body and lifecycle guarantees exercised the
//! way a game would use them.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use engine2d::ecs::components::{BoxCollider, CircleCollider, RigidBody};
use engine2d::ecs::{Behavior, BehaviorContext, Scene, World};
use engine2d::foundation::math::Vec2;
use engine2d::physics::collision::primitives::{box_box, box_circle, circle_circle};
use engine2d::physics::{CollisionLayers, WorldBox, WorldCircle};

fn place(world: &mut World, name: &str, position: Vec2) -> engine2d::ecs::EntityId {
    let id = world.create_entity(name);
    if let Some(mut transform) = world.transform_mut(id) {
        transform.set_position(position);
    }
    id
}

#[test]
fn test_reparenting_preserves_world_pose() {
    let mut world = World::new();
    let parent = place(&mut world, "parent", Vec2::new(50.0, -20.0));
    let child = place(&mut world, "child", Vec2::new(10.0, 10.0));
    if let Some(mut transform) = world.transform_mut(parent) {
        transform.set_rotation(45.0);
        transform.set_local_scale(Vec2::new(2.0, 2.0));
    }
    if let Some(mut transform) = world.transform_mut(child) {
        transform.set_rotation(30.0);
    }

    assert!(world.set_parent(child, Some(parent)));
    let view = world.transform(child).unwrap();
    assert_relative_eq!(view.position(), Vec2::new(10.0, 10.0), epsilon = 1e-3);
    assert_relative_eq!(view.rotation(), 30.0, epsilon = 1e-3);
    assert_relative_eq!(view.lossy_scale(), Vec2::new(1.0, 1.0), epsilon = 1e-5);

    assert!(world.set_parent(child, None));
    let view = world.transform(child).unwrap();
    assert_relative_eq!(view.position(), Vec2::new(10.0, 10.0), epsilon = 1e-3);
    assert_relative_eq!(view.rotation(), 30.0, epsilon = 1e-3);
    assert_relative_eq!(view.lossy_scale(), Vec2::new(1.0, 1.0), epsilon = 1e-5);
}

#[test]
fn test_matrix_cache_and_descendant_invalidation() {
    let mut world = World::new();
    let root = world.create_entity("root");
    let middle = world.create_entity("middle");
    let leaf = world.create_entity("leaf");
    world.set_parent(middle, Some(root));
    world.set_parent(leaf, Some(middle));

    let first = world.transform(leaf).unwrap().local_to_world_matrix();
    let second = world.transform(leaf).unwrap().local_to_world_matrix();
    assert_eq!(first, second);
    assert!(!world.transform(leaf).unwrap().is_dirty());

    if let Some(mut transform) = world.transform_mut(root) {
        transform.translate(Vec2::new(5.0, 0.0));
    }
    assert!(world.transform(middle).unwrap().is_dirty());
    assert!(world.transform(leaf).unwrap().is_dirty());
    assert_relative_eq!(world.transform(leaf).unwrap().position(), Vec2::new(5.0, 0.0));
}

#[test]
fn test_primitive_collision_cases() {
    let boxes = box_box(
        &WorldBox::new(Vec2::zeros(), Vec2::new(2.0, 2.0)),
        &WorldBox::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 2.0)),
    );
    assert!(boxes.is_colliding);
    assert_relative_eq!(boxes.penetration_depth, 1.0);
    assert_relative_eq!(boxes.normal.x.abs(), 1.0);
    assert_relative_eq!(boxes.normal.y, 0.0);

    let circles = circle_circle(
        &WorldCircle::new(Vec2::zeros(), 1.0),
        &WorldCircle::new(Vec2::new(1.5, 0.0), 1.0),
    );
    assert!(circles.is_colliding);
    assert_relative_eq!(circles.penetration_depth, 0.5);
    assert_relative_eq!(circles.normal, Vec2::new(1.0, 0.0));

    let apart = box_circle(
        &WorldBox::new(Vec2::zeros(), Vec2::new(2.0, 2.0)),
        &WorldCircle::new(Vec2::new(3.0, 0.0), 0.5),
    );
    assert!(!apart.is_colliding);
}

#[test]
fn test_entity_collision_queries() {
    let mut world = World::new();
    let wall = place(&mut world, "wall", Vec2::zeros());
    let ball = place(&mut world, "ball", Vec2::new(1.5, 0.0));
    let far = place(&mut world, "far", Vec2::new(100.0, 0.0));
    world.add_behavior(wall, BoxCollider::new().with_size(Vec2::new(2.0, 2.0)));
    world.add_behavior(ball, CircleCollider::new().with_radius(1.0));
    world.add_behavior(far, CircleCollider::new());

    let info = world.check_collision(wall, ball);
    assert!(info.is_colliding);
    assert_relative_eq!(info.normal, Vec2::new(1.0, 0.0));
    assert_relative_eq!(info.penetration_depth, 0.5);

    let pairs = world.collisions();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].0, pairs[0].1), (wall, ball));

    assert_eq!(world.overlap_point(Vec2::new(0.5, 0.5)), vec![wall]);

    world.entity_mut(ball).unwrap().set_layer(5);
    let blocked = world.check_collision_masked(wall, CollisionLayers::ALL, ball, CollisionLayers::NONE);
    assert!(!blocked.is_colliding);
    let allowed = world.check_collision_masked(wall, CollisionLayers::ALL, ball, CollisionLayers::ALL);
    assert!(allowed.is_colliding);
}

#[test]
fn test_dynamic_body_falls_under_gravity() {
    let mut scene = Scene::new("gravity");
    let ball = scene.create_entity("ball");
    scene.world_mut().add_behavior(ball, RigidBody::new());

    scene.fixed_update(1.0);

    let body = scene.world().get_behavior::<RigidBody>(ball).unwrap();
    assert_relative_eq!(body.velocity().y, 490.5, epsilon = 1e-3);
    assert_relative_eq!(body.velocity().x, 0.0);
}

#[test]
fn test_add_get_remove_behavior() {
    let mut world = World::new();
    let id = world.create_entity("e");

    world.add_behavior(id, BoxCollider::new().with_size(Vec2::new(3.0, 4.0)));
    assert_eq!(world.get_behavior::<BoxCollider>(id).map(BoxCollider::size), Some(Vec2::new(3.0, 4.0)));

    assert!(world.remove_behavior::<BoxCollider>(id));
    assert!(world.get_behavior::<BoxCollider>(id).is_none());
    assert!(!world.remove_behavior::<BoxCollider>(id));
}

struct Probe {
    log: Rc<RefCell<Vec<String>>>,
}

impl Behavior for Probe {
    fn on_update(&mut self, _ctx: &mut BehaviorContext<'_>, _delta_time: f32) {
        self.log.borrow_mut().push("update".into());
    }

    fn on_destroy(&mut self, _ctx: &mut BehaviorContext<'_>) {
        self.log.borrow_mut().push("destroy".into());
    }
}

#[test]
fn test_deferred_destroy_keeps_entity_until_update() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new("s");
    let id = scene.create_entity("doomed");
    scene.world_mut().add_behavior(id, Probe { log: Rc::clone(&log) });

    scene.destroy_entity(id);
    assert!(scene.world().contains(id));
    assert!(scene.find_entity("doomed").is_some());

    scene.fixed_update(0.02);
    scene.late_update(0.02);
    assert!(scene.world().contains(id));
    assert!(log.borrow().is_empty());

    scene.update(0.02);
    assert!(!scene.world().contains(id));
    assert_eq!(*log.borrow(), vec!["destroy".to_string()]);
}

#[test]
fn test_destroy_reroots_children() {
    let mut scene = Scene::new("s");
    let parent = scene.create_entity("parent");
    if let Some(mut transform) = scene.world_mut().transform_mut(parent) {
        transform.set_position(Vec2::new(20.0, 0.0));
    }
    let child = scene.instantiate_child(parent, "child");
    if let Some(mut transform) = scene.world_mut().transform_mut(child) {
        transform.set_local_position(Vec2::new(1.0, 1.0));
    }

    assert!(scene.destroy_entity_immediate(parent));
    let world = scene.world();
    assert!(world.parent(child).is_none());
    assert_relative_eq!(world.transform(child).unwrap().position(), Vec2::new(21.0, 1.0));
}
