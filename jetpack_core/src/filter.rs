//! Low-pass filtering of control inputs.
//!
//! Each axis chases its raw value with a lerp whose factor is
//! `snappiness * dt`. The factor saturates at 1, so at low frame rates (or very
//! snappy tuning) the filtered value lands exactly on the raw value.

use serde::{Deserialize, Serialize};

use crate::{
    config::FilterTuning,
    input::RawInput,
    math::{lerp, Vec2},
};

/// One filter step from `current` towards `target`.
pub fn low_pass(current: f32, target: f32, snappiness: f32, dt: f32) -> f32 {
    lerp(current, target, snappiness * dt)
}

/// Filtered control values, persisted across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilteredInput {
    pub cyclic: Vec2,
    /// `x`: yaw, `y`: collective.
    pub collective_yaw: Vec2,
}

/// Exponential smoother for cyclic, yaw and collective.
#[derive(Debug, Clone, Default)]
pub struct InputFilter {
    tuning: FilterTuning,
    value: FilteredInput,
}

impl InputFilter {
    pub fn new(tuning: FilterTuning) -> Self {
        Self {
            tuning,
            value: FilteredInput::default(),
        }
    }

    pub fn tuning(&self) -> &FilterTuning {
        &self.tuning
    }

    pub fn value(&self) -> FilteredInput {
        self.value
    }

    /// Advances every axis one frame towards `raw`.
    pub fn update(&mut self, raw: &RawInput, dt: f32) -> FilteredInput {
        let t = &self.tuning;
        let v = &mut self.value;

        v.cyclic = v.cyclic.lerp(raw.cyclic, t.cyclic * dt);
        v.collective_yaw.x = low_pass(v.collective_yaw.x, raw.collective_yaw.x, t.yaw, dt);
        v.collective_yaw.y = low_pass(v.collective_yaw.y, raw.collective_yaw.y, t.collective, dt);

        *v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between(x: f32, a: f32, b: f32) -> bool {
        x >= a.min(b) - 1e-6 && x <= a.max(b) + 1e-6
    }

    #[test]
    fn step_lands_between_previous_and_target() {
        let cases = [
            (0.0, 1.0, 5.0, 0.016),
            (0.8, -1.0, 10.0, 0.05),
            (-0.3, 0.4, 0.0, 1.0),
            (0.5, 0.5, 3.0, 0.1),
            (1.0, 0.0, 7.0, 0.0),
        ];
        for (prev, target, snappiness, dt) in cases {
            let next = low_pass(prev, target, snappiness, dt);
            assert!(between(next, prev, target), "{prev} -> {target}: {next}");
        }
    }

    #[test]
    fn saturated_factor_snaps_to_target() {
        assert_eq!(low_pass(0.2, -0.9, 10.0, 0.1), -0.9);
        assert_eq!(low_pass(0.2, -0.9, 10.0, 0.5), -0.9);
        assert_eq!(low_pass(0.0, 1.0, 5.0, 0.25), 1.0);
    }

    #[test]
    fn axes_use_their_own_snappiness() {
        let mut filter = InputFilter::new(FilterTuning::default());
        let raw = RawInput {
            cyclic: Vec2::new(1.0, 1.0),
            collective_yaw: Vec2::new(1.0, 1.0),
            engine_toggle: false,
        };
        let v = filter.update(&raw, 0.05);
        // cyclic and yaw: 5 * 0.05 = 0.25; collective: 10 * 0.05 = 0.5
        assert!((v.cyclic.x - 0.25).abs() < 1e-6);
        assert!((v.cyclic.y - 0.25).abs() < 1e-6);
        assert!((v.collective_yaw.x - 0.25).abs() < 1e-6);
        assert!((v.collective_yaw.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn neutral_input_decays_towards_zero() {
        let mut filter = InputFilter::new(FilterTuning::default());
        let push = RawInput {
            cyclic: Vec2::new(1.0, -1.0),
            collective_yaw: Vec2::new(1.0, 1.0),
            engine_toggle: false,
        };
        filter.update(&push, 1.0);
        assert_eq!(filter.value().cyclic, Vec2::new(1.0, -1.0));

        let mut last = filter.value().cyclic.len();
        for _ in 0..60 {
            let v = filter.update(&RawInput::default(), 1.0 / 60.0);
            assert!(v.cyclic.len() < last);
            last = v.cyclic.len();
        }
        assert!(last < 0.01);
    }
}
