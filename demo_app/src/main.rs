//! Falling bodies demo application
//!
//! Drops a handful of balls and crates onto a static floor, bounces them off
//! it from a behavior, and logs every new contact. Runs headless for a few
//! simulated seconds. Pass a `.ron` or `.toml` path to save the final scene.

use std::collections::HashSet;

use engine2d::prelude::*;

/// Config file read from the working directory when present
const CONFIG_PATH: &str = "falling_bodies.toml";

/// Simulated seconds before the demo exits
const DURATION: f32 = 4.0;

/// Reflects its owner's rigid body off one floor entity
struct FloorBounce {
    floor: EntityId,
    restitution: f32,
}

impl Behavior for FloorBounce {
    fn on_fixed_update(&mut self, ctx: &mut BehaviorContext<'_>, _fixed_delta_time: f32) {
        let owner = ctx.entity();
        let info = ctx.world().check_collision(owner, self.floor);
        if !info.is_colliding {
            return;
        }

        if let Some(mut transform) = ctx.transform_mut() {
            transform.translate(-info.normal * info.penetration_depth);
        }
        if let Some(body) = ctx.world_mut().get_behavior_mut::<RigidBody>(owner) {
            let velocity = body.velocity();
            let approach = velocity.dot(&info.normal);
            if approach > 0.0 {
                body.set_velocity(velocity - info.normal * approach * (1.0 + self.restitution));
            }
        }
    }
}

struct FallingBodies {
    contacts: HashSet<(EntityId, EntityId)>,
    contact_events: usize,
    save_path: Option<String>,
}

impl FallingBodies {
    fn new(save_path: Option<String>) -> Self {
        Self {
            contacts: HashSet::new(),
            contact_events: 0,
            save_path,
        }
    }

    fn build_scene(scene: &mut Scene) {
        let floor = scene.create_entity("floor");
        if let Some(entity) = scene.world_mut().entity_mut(floor) {
            entity.set_tag("Ground");
            entity.set_layer(2);
        }
        let world = scene.world_mut();
        if let Some(mut transform) = world.transform_mut(floor) {
            transform.set_position(Vec2::new(200.0, 400.0));
        }
        world.add_behavior(floor, BoxCollider::new().with_size(Vec2::new(400.0, 20.0)));
        world.add_behavior(floor, RigidBody::new().with_body_type(BodyType::Static));

        for i in 0..5u8 {
            let x = 40.0 + f32::from(i) * 80.0;
            let y = 50.0 + f32::from(i) * 30.0;
            let name = format!("body_{i}");
            let id = scene.create_entity(name);
            let world = scene.world_mut();
            if let Some(mut transform) = world.transform_mut(id) {
                transform.set_position(Vec2::new(x, y));
            }
            if i % 2 == 0 {
                world.add_behavior(id, CircleCollider::new().with_radius(12.0));
            } else {
                world.add_behavior(id, BoxCollider::new().with_size(Vec2::new(24.0, 24.0)));
            }
            world.add_behavior(id, RigidBody::new().with_mass(1.0 + f32::from(i)).with_drag(0.1));
            world.add_behavior(id, FloorBounce { floor, restitution: 0.5 });
        }

        // A sensor hanging under the first ball
        let first = scene.find_entity("body_0");
        if let Some(first) = first {
            let sensor = scene.instantiate_child(first, "sensor");
            let world = scene.world_mut();
            if let Some(mut transform) = world.transform_mut(sensor) {
                transform.set_local_position(Vec2::new(0.0, 20.0));
            }
            world.add_behavior(sensor, CircleCollider::new().with_radius(4.0).with_trigger(true));
        }
    }

    fn report_contacts(&mut self, world: &World) {
        let current: HashSet<(EntityId, EntityId)> =
            world.collisions().into_iter().map(|(a, b, _)| (a, b)).collect();

        for &(a, b) in current.difference(&self.contacts) {
            let name = |id| world.entity(id).map_or("?", Entity::name);
            log::info!("Contact began: {} <-> {}", name(a), name(b));
            self.contact_events += 1;
        }
        self.contacts = current;
    }
}

impl Application for FallingBodies {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building falling bodies scene...");
        let id = engine.scene_manager.create_scene("falling_bodies");
        let scene = engine
            .scene_manager
            .scene_mut(id)
            .ok_or_else(|| AppError::Custom("scene vanished after creation".to_string()))?;
        Self::build_scene(scene);
        log::info!("Scene ready with {} entities", scene.world().entity_count());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        if let Some(scene) = engine.active_scene() {
            self.report_contacts(scene.world());
        }
        if engine.clock().total_time() >= DURATION {
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!("{} contacts began during the run", self.contact_events);

        let Some(scene) = engine.active_scene_mut() else {
            return;
        };
        for (_, entity) in scene.world().entities() {
            if let Some(body) = entity.get_behavior::<RigidBody>() {
                log::info!(
                    "{}: velocity=({:.1}, {:.1}) kinetic_energy={:.1}",
                    entity.name(),
                    body.velocity().x,
                    body.velocity().y,
                    body.kinetic_energy()
                );
            }
        }

        if let Some(path) = self.save_path.take() {
            match scene.save(&path) {
                Ok(()) => log::info!("Saved final scene to {}", path),
                Err(e) => log::error!("Failed to save scene to {}: {}", path, e),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default(CONFIG_PATH)?;
    engine2d::foundation::logging::init_with_level(&config.log_level);

    log::info!("Starting falling bodies demo");
    let mut app = FallingBodies::new(std::env::args().nth(1));
    Engine::run(config, &mut app)?;
    Ok(())
}
