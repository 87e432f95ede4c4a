//! Physics abstraction.
//!
//! The control loop never integrates motion itself. It talks to whatever rigid
//! body the host provides through [`PhysicsBody`].

use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};

/// Physics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

bitflags::bitflags! {
    /// Rotation axes a body is not allowed to turn around.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RotationConstraints: u8 {
        const FREEZE_ROTATION_X = 1 << 0;
        const FREEZE_ROTATION_Y = 1 << 1;
        const FREEZE_ROTATION_Z = 1 << 2;
        const FREEZE_ROTATION = Self::FREEZE_ROTATION_X.bits()
            | Self::FREEZE_ROTATION_Y.bits()
            | Self::FREEZE_ROTATION_Z.bits();
    }
}

impl Default for RotationConstraints {
    fn default() -> Self {
        Self::empty()
    }
}

impl RotationConstraints {
    /// Upright body: free to yaw, never pitches or rolls.
    pub fn upright() -> Self {
        Self::FREEZE_ROTATION_X | Self::FREEZE_ROTATION_Z
    }

    /// Drops the rotation components around frozen axes.
    pub fn apply(self, orientation: Quat) -> Quat {
        if self.is_empty() {
            return orientation;
        }
        let (mut pitch, mut yaw, mut roll) = orientation.to_euler_degrees();
        if self.contains(Self::FREEZE_ROTATION_X) {
            pitch = 0.0;
        }
        if self.contains(Self::FREEZE_ROTATION_Y) {
            yaw = 0.0;
        }
        if self.contains(Self::FREEZE_ROTATION_Z) {
            roll = 0.0;
        }
        Quat::from_euler_degrees(pitch, yaw, roll)
    }
}

/// Capsule collider description, aligned with the body's up axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleCollider {
    pub radius: f32,
    pub height: f32,
}

/// Everything a body is told once when a vehicle is created around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySetup {
    pub position: Vec3,
    pub orientation: Quat,
    pub constraints: RotationConstraints,
    pub collider: CapsuleCollider,
}

/// Force to apply during one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustCommand {
    /// Unit direction in world space.
    pub direction: Vec3,
    /// Force magnitude. A unit-mass body hovers when this equals `|g|`.
    pub magnitude: f32,
}

impl ThrustCommand {
    pub fn force(&self) -> Vec3 {
        self.direction * self.magnitude
    }
}

/// Rigid body capability consumed by the jetpack.
pub trait PhysicsBody {
    /// Places and shapes the body. Called once at vehicle creation.
    fn configure(&mut self, setup: &BodySetup);

    /// Adds a force along `direction` for the current physics step.
    fn apply_force(&mut self, direction: Vec3, magnitude: f32);

    fn position(&self) -> Vec3;

    fn orientation(&self) -> Quat;

    fn set_orientation(&mut self, orientation: Quat);

    /// Gravitational acceleration of the world the body lives in.
    fn gravity(&self) -> Vec3;
}

/// Body that ignores forces. Useful for headless tests.
#[derive(Debug, Default)]
pub struct NullBody {
    position: Vec3,
    orientation: Quat,
    physics: PhysicsConfig,
}

impl PhysicsBody for NullBody {
    fn configure(&mut self, setup: &BodySetup) {
        self.position = setup.position;
        self.orientation = setup.orientation;
    }

    fn apply_force(&mut self, _direction: Vec3, _magnitude: f32) {}

    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn gravity(&self) -> Vec3 {
        self.physics.gravity
    }
}
