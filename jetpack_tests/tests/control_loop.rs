//! Control loop behavior through the public jetpack API.

use jetpack_core::{
    config::JetpackConfig,
    control::{collective_to_unit, thrust_fraction},
    engine::EngineState,
    input::{Axis, Key, ScriptedInput},
    jetpack::{Jetpack, Pose},
    math::Vec2,
};
use jetpack_tests::{init_tracing, RecordingBody};

fn jetpack() -> Jetpack<RecordingBody, ScriptedInput> {
    init_tracing();
    Jetpack::create(
        Pose::default(),
        JetpackConfig::default(),
        RecordingBody::default(),
        ScriptedInput::new(),
    )
}

#[test]
fn trigger_toggle_follows_rising_edges() {
    let mut jp = jetpack();
    let inputs = [false, true, true, false, true, true, false, false, true];

    let mut previous = false;
    let mut expected = EngineState::Off;
    for (frame, &pressed) in inputs.iter().enumerate() {
        if pressed && !previous {
            expected = expected.toggled();
        }
        previous = pressed;

        jp.input_mut().set_axis(Axis::Fire1, if pressed { 1.0 } else { 0.0 });
        jp.frame_tick(1.0 / 60.0);
        assert_eq!(jp.engine_state(), expected, "frame {frame}");
    }
    // Rising edges at frames 1, 4 and 8.
    assert_eq!(jp.engine_state(), EngineState::On);
}

#[test]
fn collective_mapping_points() {
    assert_eq!(collective_to_unit(-1.0), 0.0);
    assert_eq!(collective_to_unit(0.0), 0.5);
    assert_eq!(collective_to_unit(1.0), 1.0);

    let cfg = JetpackConfig {
        minimum_thrust: 0.0,
        maximum_thrust: 2.0,
        ..Default::default()
    };
    assert_eq!(thrust_fraction(0.5, &cfg), 1.0);
}

#[test]
fn heading_reaches_360_without_wrapping() {
    let mut jp = jetpack();
    jp.input_mut().set_key(Key::L, true);
    let mut headings = Vec::new();
    for _ in 0..4 {
        jp.frame_tick(1.0);
        headings.push(jp.heading());
    }
    assert_eq!(headings, vec![90.0, 180.0, 270.0, 360.0]);
}

#[test]
fn neutral_input_settles_without_thrust() {
    let mut jp = jetpack();
    jp.input_mut().set_axis(Axis::Horizontal, 1.0);
    jp.input_mut().set_axis(Axis::Vertical, -1.0);
    jp.input_mut().set_key(Key::I, true);
    jp.frame_tick(0.5);
    jp.input_mut().clear();

    let mut last = jp.filtered().cyclic.len();
    for _ in 0..600 {
        jp.frame_tick(1.0 / 60.0);
        jp.physics_tick(0.02);
        let now = jp.filtered().cyclic.len();
        assert!(now <= last);
        last = now;
    }
    assert!(last < 1e-6, "{last}");
    assert!(jp.filtered().collective_yaw.y.abs() < 1e-6);
    assert!(jp.body().forces.is_empty());
}

#[test]
fn frame_tick_never_applies_thrust() {
    let mut jp = jetpack();
    jp.input_mut().set_key(Key::Space, true);
    jp.frame_tick(1.0 / 60.0);
    jp.input_mut().set_key(Key::Space, false);
    assert!(jp.engine_enabled());

    jp.input_mut().set_key(Key::I, true);
    for step in 0..120 {
        jp.frame_tick(1.0 / 60.0);
        assert!(jp.body_mut().take_forces().is_empty(), "frame {step}");

        jp.physics_tick(0.02);
        let forces = jp.body_mut().take_forces();
        assert_eq!(forces.len(), 1, "step {step}");
    }
}

#[test]
fn physics_tick_uses_latest_attitude() {
    let mut jp = jetpack();
    jp.input_mut().set_key(Key::Space, true);
    jp.frame_tick(0.02);
    jp.input_mut().clear();

    jp.input_mut().set_axis(Axis::Horizontal, 1.0);
    jp.frame_tick(1.0);
    assert_eq!(jp.filtered().cyclic, Vec2::new(1.0, 0.0));
    assert_eq!(jp.attitude().roll, -30.0);

    jp.physics_tick(0.02);
    let (direction, _) = jp.body().forces[0];
    // Leaning right: up tilts towards +X.
    assert!(direction.x > 0.49 && direction.x < 0.51, "{direction:?}");
    assert_eq!(direction, jp.pivot().up());
}

#[test]
fn full_collective_doubles_gravity() {
    let mut jp = jetpack();
    jp.input_mut().set_key(Key::Space, true);
    jp.frame_tick(0.02);
    jp.input_mut().clear();
    jp.input_mut().set_key(Key::I, true);
    jp.frame_tick(1.0);

    jp.physics_tick(0.02);
    let (_, magnitude) = jp.body().forces[0];
    assert!((magnitude - 2.0 * 9.81).abs() < 1e-3, "{magnitude}");
}
