//! Shared fixtures for the integration tests.

use jetpack_core::{
    math::{Quat, Vec3},
    physics::{BodySetup, PhysicsBody, PhysicsConfig},
};

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Body that records every force it is given and never moves.
#[derive(Debug, Default)]
pub struct RecordingBody {
    pub setup: Option<BodySetup>,
    pub orientation: Quat,
    pub forces: Vec<(Vec3, f32)>,
}

impl RecordingBody {
    pub fn take_forces(&mut self) -> Vec<(Vec3, f32)> {
        std::mem::take(&mut self.forces)
    }
}

impl PhysicsBody for RecordingBody {
    fn configure(&mut self, setup: &BodySetup) {
        self.setup = Some(*setup);
        self.orientation = setup.orientation;
    }

    fn apply_force(&mut self, direction: Vec3, magnitude: f32) {
        self.forces.push((direction, magnitude));
    }

    fn position(&self) -> Vec3 {
        self.setup.map(|s| s.position).unwrap_or_default()
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn gravity(&self) -> Vec3 {
        PhysicsConfig::default().gravity
    }
}
