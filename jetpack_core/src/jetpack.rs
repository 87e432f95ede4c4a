//! The jetpack vehicle.
//!
//! A [`Jetpack`] owns a physics body and a pivot (the gimbal the camera would
//! hang from). The host drives it through two entry points:
//!
//! - [`Jetpack::frame_tick`] once per rendered frame: gather input, filter it,
//!   handle the engine toggle, then point the pivot.
//! - [`Jetpack::physics_tick`] once per fixed physics step: push the body along
//!   the pivot's up axis while the engine runs.
//!
//! A physics step always uses whatever the most recent frame tick left behind,
//! so hosts must not interleave the two from different threads.

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::{
    config::{FilterTuning, InputBindings, JetpackConfig},
    control::{integrate_heading, thrust_magnitude, Attitude},
    engine::{EngineState, EngineSwitch},
    filter::{FilteredInput, InputFilter},
    input::{InputSource, RawInput},
    math::{Quat, Vec3},
    physics::{BodySetup, CapsuleCollider, PhysicsBody, RotationConstraints, ThrustCommand},
};

/// Pivot position relative to the body origin.
pub const PIVOT_OFFSET: Vec3 = Vec3::new(0.0, 1.5, 0.0);

/// Collision shape given to the body.
pub const BODY_COLLIDER: CapsuleCollider = CapsuleCollider {
    radius: 0.5,
    height: 2.0,
};

/// Position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default)]
    pub orientation: Quat,
}

/// Gimbal carried by the body.
///
/// Its rotation is a world rotation written every frame, independent of how
/// the body itself is turned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub local_offset: Vec3,
    pub rotation: Quat,
}

impl Pivot {
    pub fn up(&self) -> Vec3 {
        self.rotation.up()
    }

    pub fn world_position(&self, body: &impl PhysicsBody) -> Vec3 {
        body.position() + body.orientation().rotate(self.local_offset)
    }
}

/// Read-only view of the control state, suitable for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub raw: RawInput,
    pub filtered: FilteredInput,
    pub engine: EngineState,
    pub heading: f32,
    pub attitude: Attitude,
}

/// Player-controlled hover vehicle.
pub struct Jetpack<B: PhysicsBody, I: InputSource> {
    config: JetpackConfig,
    bindings: InputBindings,
    body: B,
    input: I,
    pivot: Pivot,
    raw: RawInput,
    filter: InputFilter,
    engine: EngineSwitch,
    heading: f32,
    attitude: Attitude,
}

impl<B: PhysicsBody, I: InputSource> Jetpack<B, I> {
    /// Builds a jetpack at `spawn` around `body`, reading controls from `input`.
    ///
    /// The body keeps upright: it may yaw but never pitches or rolls. Tilting
    /// happens on the pivot only. The heading starts at the spawn yaw.
    pub fn create(spawn: Pose, config: JetpackConfig, mut body: B, input: I) -> Self {
        // Poses loaded from data need not be unit length.
        let orientation = spawn.orientation.normalized();
        body.configure(&BodySetup {
            position: spawn.position,
            orientation,
            constraints: RotationConstraints::upright(),
            collider: BODY_COLLIDER,
        });

        let heading = orientation.yaw_degrees();
        info!(
            position = ?spawn.position,
            heading,
            min_thrust = config.minimum_thrust,
            max_thrust = config.maximum_thrust,
            "jetpack created"
        );

        Self {
            config,
            bindings: InputBindings::default(),
            body,
            input,
            pivot: Pivot {
                local_offset: PIVOT_OFFSET,
                rotation: Quat::IDENTITY,
            },
            raw: RawInput::default(),
            filter: InputFilter::new(FilterTuning::default()),
            engine: EngineSwitch::default(),
            heading,
            attitude: Attitude {
                yaw: heading,
                ..Default::default()
            },
        }
    }

    /// Replaces the filter constants. Resets filtered values.
    pub fn with_filter_tuning(mut self, tuning: FilterTuning) -> Self {
        self.filter = InputFilter::new(tuning);
        self
    }

    pub fn with_bindings(mut self, bindings: InputBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Per-frame update. Never applies force.
    pub fn frame_tick(&mut self, dt: f32) {
        self.raw = RawInput::gather(&self.input, &self.bindings);

        let filtered = self.filter.update(&self.raw, dt);

        if self.engine.update(self.raw.engine_toggle) {
            info!(engine = ?self.engine.state(), heading = self.heading, "engine toggled");
        }

        self.heading = integrate_heading(self.heading, filtered.collective_yaw.x, &self.config, dt);
        self.attitude = Attitude::from_input(&filtered, self.heading, &self.config);
        self.pivot.rotation = self.attitude.to_quat();

        trace!(
            dt,
            pitch = self.attitude.pitch,
            yaw = self.attitude.yaw,
            roll = self.attitude.roll,
            "frame"
        );
    }

    /// Per-physics-step update. Applies thrust while the engine is on.
    pub fn physics_tick(&mut self, fixed_dt: f32) {
        if let Some(cmd) = self.thrust_command() {
            self.body.apply_force(cmd.direction, cmd.magnitude);
            trace!(fixed_dt, magnitude = cmd.magnitude, "thrust");
        }
    }

    /// Force the next physics step would apply, if the engine is on.
    pub fn thrust_command(&self) -> Option<ThrustCommand> {
        if !self.engine.state().is_on() {
            return None;
        }
        let gravity = self.body.gravity().len();
        Some(ThrustCommand {
            direction: self.pivot.up(),
            magnitude: thrust_magnitude(
                self.filter.value().collective_yaw.y,
                &self.config,
                gravity,
            ),
        })
    }

    pub fn config(&self) -> &JetpackConfig {
        &self.config
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn pivot(&self) -> &Pivot {
        &self.pivot
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn engine_enabled(&self) -> bool {
        self.engine.state().is_on()
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    pub fn filtered(&self) -> FilteredInput {
        self.filter.value()
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            raw: self.raw,
            filtered: self.filter.value(),
            engine: self.engine.state(),
            heading: self.heading,
            attitude: self.attitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{Axis, Key, NullInput, ScriptedInput},
        physics::{NullBody, PhysicsConfig},
    };

    #[derive(Default)]
    struct RecordingBody {
        setup: Option<BodySetup>,
        forces: Vec<(Vec3, f32)>,
    }

    impl PhysicsBody for RecordingBody {
        fn configure(&mut self, setup: &BodySetup) {
            self.setup = Some(*setup);
        }

        fn apply_force(&mut self, direction: Vec3, magnitude: f32) {
            self.forces.push((direction, magnitude));
        }

        fn position(&self) -> Vec3 {
            self.setup.map(|s| s.position).unwrap_or_default()
        }

        fn orientation(&self) -> Quat {
            self.setup.map(|s| s.orientation).unwrap_or_default()
        }

        fn set_orientation(&mut self, _orientation: Quat) {}

        fn gravity(&self) -> Vec3 {
            PhysicsConfig::default().gravity
        }
    }

    fn jetpack() -> Jetpack<RecordingBody, ScriptedInput> {
        Jetpack::create(
            Pose::default(),
            JetpackConfig::default(),
            RecordingBody::default(),
            ScriptedInput::new(),
        )
    }

    fn press_toggle(jp: &mut Jetpack<RecordingBody, ScriptedInput>) {
        jp.input_mut().set_key(Key::Space, true);
        jp.frame_tick(0.02);
        jp.input_mut().set_key(Key::Space, false);
        jp.frame_tick(0.02);
    }

    #[test]
    fn create_configures_upright_body() {
        let spawn = Pose {
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Quat::from_euler_degrees(0.0, 45.0, 0.0),
        };
        let jp = Jetpack::create(
            spawn,
            JetpackConfig::default(),
            RecordingBody::default(),
            NullInput,
        );

        let setup = jp.body().setup.expect("configured");
        assert_eq!(setup.position, spawn.position);
        assert_eq!(setup.constraints, RotationConstraints::upright());
        assert_eq!(setup.collider, BODY_COLLIDER);
        assert!((jp.heading() - 45.0).abs() < 1e-3);
        assert_eq!(jp.engine_state(), EngineState::Off);
        assert_eq!(jp.pivot().rotation, Quat::IDENTITY);

        let pivot_pos = jp.pivot().world_position(jp.body());
        assert!((pivot_pos - Vec3::new(1.0, 3.5, 3.0)).len() < 1e-5);
    }

    #[test]
    fn unnormalized_spawn_keeps_its_yaw() {
        let spawn = Pose {
            position: Vec3::ZERO,
            orientation: Quat {
                x: 0.0,
                y: 1.0,
                z: 0.0,
                w: 1.0,
            },
        };
        let jp = Jetpack::create(
            spawn,
            JetpackConfig::default(),
            RecordingBody::default(),
            NullInput,
        );

        assert!((jp.heading() - 90.0).abs() < 1e-3, "{}", jp.heading());
        let setup = jp.body().setup.expect("configured");
        assert!((setup.orientation.yaw_degrees() - 90.0).abs() < 1e-3);
        assert!((setup.orientation.forward() - Vec3::RIGHT).len() < 1e-5);
    }

    #[test]
    fn default_spawn_starts_zeroed() {
        let jp = jetpack();
        let snap = jp.snapshot();
        assert_eq!(snap.heading, 0.0);
        assert_eq!(snap.filtered, FilteredInput::default());
        assert_eq!(snap.raw, RawInput::default());
        assert_eq!(snap.engine, EngineState::Off);
    }

    #[test]
    fn no_thrust_while_engine_off() {
        let mut jp = jetpack();
        jp.input_mut().set_key(Key::I, true);
        for _ in 0..10 {
            jp.frame_tick(0.02);
            jp.physics_tick(0.02);
        }
        assert!(jp.body().forces.is_empty());
        assert!(jp.thrust_command().is_none());
    }

    #[test]
    fn thrust_only_in_physics_tick() {
        let mut jp = jetpack();
        press_toggle(&mut jp);
        assert!(jp.engine_enabled());

        for _ in 0..5 {
            jp.frame_tick(0.02);
        }
        assert!(jp.body().forces.is_empty());

        jp.physics_tick(0.02);
        assert_eq!(jp.body().forces.len(), 1);
    }

    #[test]
    fn neutral_collective_hovers() {
        let mut jp = jetpack();
        press_toggle(&mut jp);
        jp.physics_tick(0.02);

        let (direction, magnitude) = jp.body().forces[0];
        assert!((direction - Vec3::UP).len() < 1e-6);
        assert!((magnitude - 9.81).abs() < 1e-4);
    }

    #[test]
    fn toggle_twice_turns_engine_off() {
        let mut jp = jetpack();
        press_toggle(&mut jp);
        press_toggle(&mut jp);
        assert!(!jp.engine_enabled());
        jp.physics_tick(0.02);
        assert!(jp.body().forces.is_empty());
    }

    #[test]
    fn held_yaw_accumulates_heading() {
        let mut jp = jetpack();
        jp.input_mut().set_key(Key::L, true);
        for frame in 1..=4 {
            // 5/s snappiness over a 1 s frame saturates, so filtered yaw is 1.
            jp.frame_tick(1.0);
            assert_eq!(jp.heading(), 90.0 * frame as f32);
        }
        assert_eq!(jp.heading(), 360.0);
        assert_eq!(jp.attitude().yaw, 360.0);
    }

    #[test]
    fn yaw_integrates_with_engine_off() {
        let mut jp = jetpack();
        jp.input_mut().set_key(Key::J, true);
        jp.frame_tick(1.0);
        assert!(!jp.engine_enabled());
        assert_eq!(jp.heading(), -90.0);
    }

    #[test]
    fn thrust_follows_leaning_pivot() {
        let mut jp = jetpack();
        press_toggle(&mut jp);
        jp.input_mut().set_axis(Axis::Vertical, 1.0);
        jp.frame_tick(1.0);
        assert_eq!(jp.attitude().pitch, 30.0);

        jp.physics_tick(0.02);
        let (direction, _) = *jp.body().forces.last().expect("thrust");
        let expected = Vec3::new(0.0, 30f32.to_radians().cos(), 30f32.to_radians().sin());
        assert!((direction - expected).len() < 1e-5, "{direction:?}");
    }

    #[test]
    fn raw_input_resets_each_frame() {
        let mut jp = Jetpack::create(
            Pose::default(),
            JetpackConfig::default(),
            NullBody::default(),
            ScriptedInput::new(),
        );
        jp.input_mut().set_axis(Axis::Horizontal, 1.0);
        jp.frame_tick(0.02);
        assert_eq!(jp.snapshot().raw.cyclic.x, 1.0);

        jp.input_mut().clear();
        jp.frame_tick(0.02);
        assert_eq!(jp.snapshot().raw, RawInput::default());
        assert!(jp.filtered().cyclic.x > 0.0);
    }
}
