//! Mapping of filtered inputs to attitude and thrust.

use serde::{Deserialize, Serialize};

use crate::{
    config::JetpackConfig,
    filter::FilteredInput,
    math::{lerp, Quat},
};

/// Orientation command for the gimbal, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Attitude {
    /// Lean from the cyclic stick around an externally integrated heading.
    pub fn from_input(filtered: &FilteredInput, heading: f32, config: &JetpackConfig) -> Self {
        Self {
            pitch: filtered.cyclic.y * config.maximum_lean_angle,
            yaw: heading,
            roll: -filtered.cyclic.x * config.maximum_lean_angle,
        }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler_degrees(self.pitch, self.yaw, self.roll)
    }
}

/// Heading after one frame of yaw input. Never wrapped.
pub fn integrate_heading(heading: f32, yaw_input: f32, config: &JetpackConfig, dt: f32) -> f32 {
    heading + yaw_input * config.maximum_yaw_rate * dt
}

/// Maps a `[-1, 1]` collective stick to `[0, 1]`, clamping out-of-range input.
pub fn collective_to_unit(x: f32) -> f32 {
    (x.clamp(-1.0, 1.0) + 1.0) / 2.0
}

/// Fraction of gravity for a `[0, 1]` collective.
pub fn thrust_fraction(unit: f32, config: &JetpackConfig) -> f32 {
    lerp(config.minimum_thrust, config.maximum_thrust, unit)
}

/// Thrust force magnitude for a filtered collective value.
pub fn thrust_magnitude(collective: f32, config: &JetpackConfig, gravity: f32) -> f32 {
    thrust_fraction(collective_to_unit(collective), config) * gravity
}
