//! Rigid body behavior
//!
//! A minimal integrator: gravity, accumulated forces and drag feed the
//! velocity, and the velocity moves the owner's transform. Integration runs
//! in `on_fixed_update`. Bodies never respond to collisions.

use serde::{Deserialize, Serialize};

use crate::ecs::behavior::{Behavior, BehaviorContext};
use crate::foundation::math::{utils, Vec2};
use crate::physics::GRAVITY;

/// Minimum mass a body can have
pub const MIN_MASS: f32 = 0.1;

/// How a body participates in simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Affected by gravity and forces
    #[default]
    Dynamic,
    /// Moves with its velocity but ignores gravity and forces
    Kinematic,
    /// Never moves
    Static,
}

/// Velocity and force integrator coupled to the owner's transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody {
    velocity: Vec2,
    acceleration: Vec2,
    force: Vec2,
    mass: f32,
    drag: f32,
    angular_drag: f32,
    angular_velocity: f32,
    body_type: BodyType,
    use_gravity: bool,
    is_kinematic: bool,
    freeze_rotation: bool,
    gravity_scale: Vec2,
    constrain_x: bool,
    constrain_y: bool,
    constrain_rotation: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Dynamic body of mass 1 with gravity
    pub fn new() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            force: Vec2::zeros(),
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            angular_velocity: 0.0,
            body_type: BodyType::Dynamic,
            use_gravity: true,
            is_kinematic: false,
            freeze_rotation: false,
            gravity_scale: Vec2::new(1.0, 1.0),
            constrain_x: false,
            constrain_y: false,
            constrain_rotation: false,
        }
    }

    /// Builder pattern: set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Builder pattern: set the linear drag
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.set_drag(drag);
        self
    }

    /// Builder pattern: set the body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.set_body_type(body_type);
        self
    }

    /// Builder pattern: enable or disable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Builder pattern: set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Re-apply value clamps (used after deserialization)
    pub fn clamped(mut self) -> Self {
        self.mass = self.mass.max(MIN_MASS);
        self.drag = self.drag.max(0.0);
        self.angular_drag = self.angular_drag.max(0.0);
        self
    }

    // Velocity

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Add to the linear velocity
    pub fn add_velocity(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }

    /// Acceleration from the last force integration
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Force accumulated since the last step
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Angular velocity in degrees per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set the angular velocity in degrees per second
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.angular_velocity = angular_velocity;
    }

    // Mass and drag

    /// Mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass (clamped to at least [`MIN_MASS`])
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(MIN_MASS);
    }

    /// Linear drag
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set the linear drag (clamped to be non-negative)
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = drag.max(0.0);
    }

    /// Angular drag
    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    /// Set the angular drag (clamped to be non-negative)
    pub fn set_angular_drag(&mut self, angular_drag: f32) {
        self.angular_drag = angular_drag.max(0.0);
    }

    // Body type

    /// Body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Change the body type
    ///
    /// Static zeroes all motion state. Kinematic and Dynamic set the
    /// kinematic flag accordingly.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        match body_type {
            BodyType::Static => {
                self.velocity = Vec2::zeros();
                self.angular_velocity = 0.0;
                self.force = Vec2::zeros();
                self.acceleration = Vec2::zeros();
            }
            BodyType::Kinematic => self.is_kinematic = true,
            BodyType::Dynamic => self.is_kinematic = false,
        }
    }

    /// Kinematic flag
    pub fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    /// Set the kinematic flag; turning it on clears force and acceleration
    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.is_kinematic = kinematic;
        if kinematic {
            self.force = Vec2::zeros();
            self.acceleration = Vec2::zeros();
        }
    }

    // Gravity

    /// Whether gravity applies
    pub fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    /// Enable or disable gravity
    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    /// Per-axis gravity multiplier
    pub fn gravity_scale(&self) -> Vec2 {
        self.gravity_scale
    }

    /// Set the per-axis gravity multiplier
    pub fn set_gravity_scale(&mut self, scale: Vec2) {
        self.gravity_scale = scale;
    }

    // Constraints

    /// Whether rotation is frozen
    pub fn freeze_rotation(&self) -> bool {
        self.freeze_rotation
    }

    /// Freeze rotation (also sets the rotation constraint)
    pub fn set_freeze_rotation(&mut self, freeze: bool) {
        self.freeze_rotation = freeze;
        self.constrain_rotation = freeze;
    }

    /// Whether x motion is blocked
    pub fn constrain_x(&self) -> bool {
        self.constrain_x
    }

    /// Block or allow x motion
    pub fn set_constrain_x(&mut self, constrain: bool) {
        self.constrain_x = constrain;
    }

    /// Whether y motion is blocked
    pub fn constrain_y(&self) -> bool {
        self.constrain_y
    }

    /// Block or allow y motion
    pub fn set_constrain_y(&mut self, constrain: bool) {
        self.constrain_y = constrain;
    }

    /// Whether rotation is constrained
    pub fn constrain_rotation(&self) -> bool {
        self.constrain_rotation
    }

    /// Constrain or allow rotation
    pub fn set_constrain_rotation(&mut self, constrain: bool) {
        self.constrain_rotation = constrain;
    }

    fn is_simulated(&self) -> bool {
        self.body_type == BodyType::Dynamic && !self.is_kinematic
    }

    fn rotation_locked(&self) -> bool {
        self.freeze_rotation || self.constrain_rotation
    }

    // Forces

    /// Accumulate a force for the next step (simulated bodies only)
    pub fn add_force(&mut self, force: Vec2) {
        if self.is_simulated() {
            self.force += force;
        }
    }

    /// Accumulate a force applied at a world point, adding torque
    pub fn add_force_at_position(&mut self, ctx: &BehaviorContext<'_>, force: Vec2, position: Vec2) {
        self.add_force(force);
        if self.rotation_locked() {
            return;
        }
        if let Some(transform) = ctx.transform() {
            let arm = position - transform.position();
            self.add_torque(utils::cross(&arm, &force));
        }
    }

    /// Instantly change velocity by `impulse / mass` (simulated bodies only)
    pub fn add_impulse(&mut self, impulse: Vec2) {
        if self.is_simulated() {
            self.velocity += impulse / self.mass;
        }
    }

    /// Change angular velocity by `torque / mass`
    pub fn add_torque(&mut self, torque: f32) {
        if self.is_simulated() && !self.rotation_locked() {
            self.angular_velocity += torque / self.mass;
        }
    }

    // Kinematic movement

    /// Teleport the owner to a world position (non-static bodies only)
    pub fn move_position(&self, ctx: &mut BehaviorContext<'_>, position: Vec2) {
        if self.body_type == BodyType::Static {
            return;
        }
        if let Some(mut transform) = ctx.transform_mut() {
            transform.set_position(position);
        }
    }

    /// Set the owner's world rotation (non-static, unlocked bodies only)
    pub fn move_rotation(&self, ctx: &mut BehaviorContext<'_>, degrees: f32) {
        if self.body_type == BodyType::Static || self.rotation_locked() {
            return;
        }
        if let Some(mut transform) = ctx.transform_mut() {
            transform.set_rotation(degrees);
        }
    }

    // Queries

    /// `0.5 * m * |v|^2`
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    /// `v * m`
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    // Integration

    /// Advance the body by `delta_time` and move the owner
    pub fn step(&mut self, ctx: &mut BehaviorContext<'_>, delta_time: f32) {
        if self.body_type == BodyType::Static {
            return;
        }

        if self.is_simulated() {
            self.apply_gravity(delta_time);
            self.integrate_forces(delta_time);
            self.apply_drag(delta_time);
        }

        self.integrate_velocity(ctx, delta_time);
    }

    fn apply_gravity(&mut self, delta_time: f32) {
        if self.use_gravity {
            self.velocity += GRAVITY.component_mul(&self.gravity_scale) * delta_time;
        }
    }

    fn integrate_forces(&mut self, delta_time: f32) {
        self.acceleration = self.force / self.mass;
        self.velocity += self.acceleration * delta_time;
        self.force = Vec2::zeros();
    }

    fn apply_drag(&mut self, delta_time: f32) {
        if self.drag > 0.0 {
            self.velocity *= 1.0 / (1.0 + self.drag * delta_time);
        }
        if self.angular_drag > 0.0 && !self.rotation_locked() {
            self.angular_velocity *= 1.0 / (1.0 + self.angular_drag * delta_time);
        }
    }

    fn integrate_velocity(&self, ctx: &mut BehaviorContext<'_>, delta_time: f32) {
        let mut applied = self.velocity;
        if self.constrain_x {
            applied.x = 0.0;
        }
        if self.constrain_y {
            applied.y = 0.0;
        }
        let rotate = !self.rotation_locked();

        let Some(mut transform) = ctx.transform_mut() else {
            return;
        };
        let Some((position, rotation)) = transform.view().map(|view| (view.position(), view.rotation())) else {
            return;
        };

        transform.set_position(position + applied * delta_time);
        if rotate {
            transform.set_rotation(rotation + self.angular_velocity * delta_time);
        }
    }
}

impl Behavior for RigidBody {
    fn on_fixed_update(&mut self, ctx: &mut BehaviorContext<'_>, fixed_delta_time: f32) {
        self.step(ctx, fixed_delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use approx::assert_relative_eq;

    fn world_with_body(body: RigidBody) -> (World, crate::ecs::EntityId) {
        let mut world = World::new();
        let id = world.create_entity("body");
        world.add_behavior(id, body);
        (world, id)
    }

    #[test]
    fn test_defaults_and_clamps() {
        let mut body = RigidBody::new();
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.drag(), 0.0);
        assert_relative_eq!(body.angular_drag(), 0.05);
        assert!(body.use_gravity());
        assert_eq!(body.gravity_scale(), Vec2::new(1.0, 1.0));
        assert_eq!(body.body_type(), BodyType::Dynamic);

        body.set_mass(0.0);
        body.set_drag(-1.0);
        assert_relative_eq!(body.mass(), MIN_MASS);
        assert_eq!(body.drag(), 0.0);
    }

    #[test]
    fn test_gravity_step() {
        let (mut world, id) = world_with_body(RigidBody::new());
        world.fixed_update(1.0);

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert_relative_eq!(body.velocity().y, 490.5, epsilon = 1e-3);
        assert_relative_eq!(world.transform(id).unwrap().position().y, 490.5, epsilon = 1e-3);
    }

    #[test]
    fn test_force_is_consumed_by_step() {
        let (mut world, id) = world_with_body(RigidBody::new().with_gravity(false).with_mass(2.0));
        world.get_behavior_mut::<RigidBody>(id).unwrap().add_force(Vec2::new(4.0, 0.0));
        world.fixed_update(0.5);

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert_relative_eq!(body.acceleration(), Vec2::new(2.0, 0.0));
        assert_relative_eq!(body.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(body.force(), Vec2::zeros());
    }

    #[test]
    fn test_drag_damps_velocity() {
        let (mut world, id) = world_with_body(
            RigidBody::new().with_gravity(false).with_drag(1.0).with_velocity(Vec2::new(10.0, 0.0)),
        );
        world.fixed_update(1.0);

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert_relative_eq!(body.velocity(), Vec2::new(5.0, 0.0));
        assert_relative_eq!(world.transform(id).unwrap().position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_static_body_never_moves() {
        let (mut world, id) = world_with_body(
            RigidBody::new().with_velocity(Vec2::new(3.0, 3.0)).with_body_type(BodyType::Static),
        );
        world.fixed_update(1.0);

        assert_eq!(world.get_behavior::<RigidBody>(id).unwrap().velocity(), Vec2::zeros());
        assert_eq!(world.transform(id).unwrap().position(), Vec2::zeros());

        let body = world.get_behavior_mut::<RigidBody>(id).unwrap();
        body.add_impulse(Vec2::new(1.0, 0.0));
        assert_eq!(body.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_kinematic_body_moves_without_gravity() {
        let (mut world, id) = world_with_body(
            RigidBody::new().with_body_type(BodyType::Kinematic).with_velocity(Vec2::new(2.0, 0.0)),
        );
        world.get_behavior_mut::<RigidBody>(id).unwrap().add_force(Vec2::new(100.0, 100.0));
        world.fixed_update(1.0);

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert!(body.is_kinematic());
        assert_eq!(body.velocity(), Vec2::new(2.0, 0.0));
        assert_relative_eq!(world.transform(id).unwrap().position(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_axis_constraint_only_affects_applied_delta() {
        let (mut world, id) = world_with_body(RigidBody::new());
        world.get_behavior_mut::<RigidBody>(id).unwrap().set_constrain_y(true);
        world.fixed_update(1.0);

        assert_relative_eq!(world.get_behavior::<RigidBody>(id).unwrap().velocity().y, 490.5, epsilon = 1e-3);
        assert_eq!(world.transform(id).unwrap().position(), Vec2::zeros());
    }

    #[test]
    fn test_constrain_x_blocks_horizontal_motion() {
        let (mut world, id) = world_with_body(
            RigidBody::new().with_gravity(false).with_velocity(Vec2::new(3.0, 4.0)),
        );
        world.get_behavior_mut::<RigidBody>(id).unwrap().set_constrain_x(true);
        world.fixed_update(1.0);

        assert_eq!(world.get_behavior::<RigidBody>(id).unwrap().velocity(), Vec2::new(3.0, 4.0));
        assert_relative_eq!(world.transform(id).unwrap().position(), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_gravity_scale_per_axis() {
        let (mut world, id) = world_with_body(RigidBody::new());
        world.get_behavior_mut::<RigidBody>(id).unwrap().set_gravity_scale(Vec2::new(1.0, 0.5));
        world.fixed_update(1.0);

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert_relative_eq!(body.velocity(), Vec2::new(0.0, 245.25), epsilon = 1e-3);
        assert_relative_eq!(world.transform(id).unwrap().position(), Vec2::new(0.0, 245.25), epsilon = 1e-3);
    }

    #[test]
    fn test_angular_velocity_rotates_with_angular_drag() {
        let (mut world, id) = world_with_body(RigidBody::new().with_gravity(false));
        {
            let body = world.get_behavior_mut::<RigidBody>(id).unwrap();
            body.set_angular_velocity(10.0);
            body.set_angular_drag(1.0);
        }
        world.fixed_update(1.0);

        assert_relative_eq!(world.get_behavior::<RigidBody>(id).unwrap().angular_velocity(), 5.0);
        assert_relative_eq!(world.transform(id).unwrap().rotation(), 5.0);

        world.fixed_update(1.0);
        assert_relative_eq!(world.get_behavior::<RigidBody>(id).unwrap().angular_velocity(), 2.5);
        assert_relative_eq!(world.transform(id).unwrap().rotation(), 7.5);
    }

    #[test]
    fn test_locked_rotation_is_not_integrated() {
        for freeze in [false, true] {
            let (mut world, id) = world_with_body(RigidBody::new().with_gravity(false));
            {
                let body = world.get_behavior_mut::<RigidBody>(id).unwrap();
                body.set_angular_velocity(10.0);
                if freeze {
                    body.set_freeze_rotation(true);
                } else {
                    body.set_constrain_rotation(true);
                }
            }
            world.fixed_update(1.0);

            assert_relative_eq!(world.get_behavior::<RigidBody>(id).unwrap().angular_velocity(), 10.0);
            assert_eq!(world.transform(id).unwrap().rotation(), 0.0);
        }
    }

    #[test]
    fn test_impulse_and_energy() {
        let mut body = RigidBody::new().with_mass(2.0);
        body.add_impulse(Vec2::new(4.0, 0.0));

        assert_eq!(body.velocity(), Vec2::new(2.0, 0.0));
        assert_relative_eq!(body.kinetic_energy(), 4.0);
        assert_eq!(body.momentum(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_torque_respects_freeze() {
        let mut body = RigidBody::new();
        body.add_torque(2.0);
        assert_relative_eq!(body.angular_velocity(), 2.0);

        body.set_freeze_rotation(true);
        assert!(body.constrain_rotation());
        body.add_torque(2.0);
        assert_relative_eq!(body.angular_velocity(), 2.0);
    }

    #[test]
    fn test_set_kinematic_clears_force() {
        let mut body = RigidBody::new();
        body.add_force(Vec2::new(1.0, 1.0));
        body.set_kinematic(true);
        assert_eq!(body.force(), Vec2::zeros());

        body.set_body_type(BodyType::Dynamic);
        assert!(!body.is_kinematic());
    }

    #[test]
    fn test_move_position_and_rotation() {
        let (mut world, id) = world_with_body(RigidBody::new());

        world.with_behavior_mut::<RigidBody, _>(id, |body, ctx| {
            body.move_position(ctx, Vec2::new(7.0, 8.0));
            body.move_rotation(ctx, 30.0);
        });
        let view = world.transform(id).unwrap();
        assert_eq!(view.position(), Vec2::new(7.0, 8.0));
        assert_relative_eq!(view.rotation(), 30.0);

        world.with_behavior_mut::<RigidBody, _>(id, |body, ctx| {
            body.set_freeze_rotation(true);
            body.move_rotation(ctx, 90.0);
        });
        assert_relative_eq!(world.transform(id).unwrap().rotation(), 30.0);
    }

    #[test]
    fn test_force_at_position_adds_torque() {
        let (mut world, id) = world_with_body(RigidBody::new().with_gravity(false));
        world.with_behavior_mut::<RigidBody, _>(id, |body, ctx| {
            body.add_force_at_position(ctx, Vec2::new(0.0, 1.0), Vec2::new(2.0, 0.0));
        });

        let body = world.get_behavior::<RigidBody>(id).unwrap();
        assert_eq!(body.force(), Vec2::new(0.0, 1.0));
        assert_relative_eq!(body.angular_velocity(), 2.0);
    }
}
