//! Configuration system.
//!
//! Loads jetpack tuning from JSON strings/files. Every field has a default, so
//! an empty object yields the stock tuning.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable flight envelope of one jetpack. Read-only once the vehicle exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JetpackConfig {
    /// Minimum thrust expressed as fraction of gravity.
    #[serde(default = "default_minimum_thrust")]
    pub minimum_thrust: f32,
    /// Maximum thrust expressed as fraction of gravity.
    #[serde(default = "default_maximum_thrust")]
    pub maximum_thrust: f32,
    /// X- and Z-axis maximum lean, in degrees.
    #[serde(default = "default_maximum_lean_angle")]
    pub maximum_lean_angle: f32,
    /// Y-axis maximum yaw rate, in degrees per second.
    #[serde(default = "default_maximum_yaw_rate")]
    pub maximum_yaw_rate: f32,
}

fn default_minimum_thrust() -> f32 {
    0.0
}

fn default_maximum_thrust() -> f32 {
    2.0
}

fn default_maximum_lean_angle() -> f32 {
    30.0
}

fn default_maximum_yaw_rate() -> f32 {
    90.0
}

impl Default for JetpackConfig {
    fn default() -> Self {
        Self {
            minimum_thrust: default_minimum_thrust(),
            maximum_thrust: default_maximum_thrust(),
            maximum_lean_angle: default_maximum_lean_angle(),
            maximum_yaw_rate: default_maximum_yaw_rate(),
        }
    }
}

impl JetpackConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read jetpack config {}", path.display()))?;
        let cfg = Self::from_json_str(&text)
            .with_context(|| format!("parse jetpack config {}", path.display()))?;
        debug!(path = %path.display(), ?cfg, "loaded jetpack config");
        Ok(cfg)
    }

    /// Rejects values the control loop cannot fly with.
    ///
    /// The control loop itself never calls this; it trusts what it is given.
    pub fn validate(&self) -> anyhow::Result<()> {
        let fields = [
            ("minimum_thrust", self.minimum_thrust),
            ("maximum_thrust", self.maximum_thrust),
            ("maximum_lean_angle", self.maximum_lean_angle),
            ("maximum_yaw_rate", self.maximum_yaw_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("{name} must be finite, got {value}");
            }
        }
        if self.maximum_thrust < self.minimum_thrust {
            bail!(
                "maximum_thrust ({}) is below minimum_thrust ({})",
                self.maximum_thrust,
                self.minimum_thrust
            );
        }
        if self.maximum_lean_angle < 0.0 {
            bail!("maximum_lean_angle must not be negative, got {}", self.maximum_lean_angle);
        }
        if self.maximum_yaw_rate < 0.0 {
            bail!("maximum_yaw_rate must not be negative, got {}", self.maximum_yaw_rate);
        }
        Ok(())
    }
}

/// Responsiveness of the input low-pass filters, per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterTuning {
    #[serde(default = "default_cyclic_snappiness")]
    pub cyclic: f32,
    #[serde(default = "default_collective_snappiness")]
    pub collective: f32,
    #[serde(default = "default_yaw_snappiness")]
    pub yaw: f32,
}

fn default_cyclic_snappiness() -> f32 {
    5.0
}

fn default_collective_snappiness() -> f32 {
    10.0
}

fn default_yaw_snappiness() -> f32 {
    5.0
}

impl Default for FilterTuning {
    fn default() -> Self {
        Self {
            cyclic: default_cyclic_snappiness(),
            collective: default_collective_snappiness(),
            yaw: default_yaw_snappiness(),
        }
    }
}

impl FilterTuning {
    /// A negative snappiness clamps the blend factor to zero and freezes its axis.
    pub fn validate(&self) -> anyhow::Result<()> {
        let fields = [
            ("cyclic", self.cyclic),
            ("collective", self.collective),
            ("yaw", self.yaw),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} snappiness must be a non-negative number, got {value}");
            }
        }
        Ok(())
    }
}

/// How host inputs are read into raw control values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputBindings {
    /// `|Fire1|` above this counts as pressing the engine toggle.
    #[serde(default = "default_toggle_threshold")]
    pub toggle_threshold: f32,
    /// Read `Horizontal2`/`Vertical2` as a second stick for yaw and collective.
    #[serde(default)]
    pub secondary_stick: bool,
}

fn default_toggle_threshold() -> f32 {
    0.5
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            toggle_threshold: default_toggle_threshold(),
            secondary_stick: false,
        }
    }
}

impl InputBindings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.toggle_threshold.is_finite() || self.toggle_threshold < 0.0 {
            bail!(
                "toggle_threshold must be a non-negative number, got {}",
                self.toggle_threshold
            );
        }
        Ok(())
    }
}
