//! Reference rigid body.
//!
//! Point mass with gravity, a force accumulator and a flat floor at `y = 0`.
//! Good enough to watch a jetpack fly; not a physics engine.

use jetpack_core::{
    math::{Quat, Vec3},
    physics::{BodySetup, CapsuleCollider, PhysicsBody, PhysicsConfig, RotationConstraints},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct SimBody {
    mass: f32,
    gravity: Vec3,
    position: Vec3,
    velocity: Vec3,
    orientation: Quat,
    force: Vec3,
    constraints: RotationConstraints,
    collider: Option<CapsuleCollider>,
    grounded: bool,
}

/// Kinematic state of a [`SimBody`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl SimBody {
    pub fn new(mass: f32, physics: PhysicsConfig) -> Self {
        Self {
            mass,
            gravity: physics.gravity,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            force: Vec3::ZERO,
            constraints: RotationConstraints::empty(),
            collider: None,
            grounded: false,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn constraints(&self) -> RotationConstraints {
        self.constraints
    }

    pub fn collider(&self) -> Option<CapsuleCollider> {
        self.collider
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Force accumulated since the last integration.
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    pub fn state(&self) -> BodyState {
        BodyState {
            position: self.position,
            velocity: self.velocity,
            grounded: self.grounded,
        }
    }

    /// Height of the body origin above its lowest point.
    fn floor_clearance(&self) -> f32 {
        self.collider.map(|c| c.height * 0.5).unwrap_or(0.0)
    }

    /// Advances one step with semi-implicit Euler and clears accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        let accel = self.force * (1.0 / self.mass) + self.gravity;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
        self.force = Vec3::ZERO;

        let floor = self.floor_clearance();
        self.grounded = self.position.y <= floor;
        if self.grounded {
            self.position.y = floor;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }
}

impl PhysicsBody for SimBody {
    fn configure(&mut self, setup: &BodySetup) {
        self.position = setup.position;
        self.constraints = setup.constraints;
        self.collider = Some(setup.collider);
        self.orientation = self.constraints.apply(setup.orientation.normalized());
    }

    fn apply_force(&mut self, direction: Vec3, magnitude: f32) {
        self.force += direction * magnitude;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = self.constraints.apply(orientation.normalized());
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }
}
