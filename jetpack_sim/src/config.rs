//! Host configuration.

use std::path::Path;

use anyhow::{bail, Context};
use jetpack_core::{
    config::{FilterTuning, InputBindings, JetpackConfig},
    jetpack::Pose,
    math::Vec3,
    physics::PhysicsConfig,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the headless host needs to fly one jetpack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Variable-rate frame loop frequency.
    #[serde(default = "default_frame_hz")]
    pub frame_hz: u32,
    /// Fixed physics step frequency.
    #[serde(default = "default_physics_hz")]
    pub physics_hz: u32,
    /// Length of a headless run.
    #[serde(default = "default_seconds")]
    pub seconds: f32,
    /// Record a telemetry sample every N frames.
    #[serde(default = "default_telemetry_every")]
    pub telemetry_every: u32,
    /// Most samples kept in memory; the oldest are dropped beyond this.
    #[serde(default = "default_telemetry_limit")]
    pub telemetry_limit: usize,
    #[serde(default = "default_body_mass")]
    pub body_mass: f32,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default = "default_spawn")]
    pub spawn: Pose,
    #[serde(default)]
    pub jetpack: JetpackConfig,
    #[serde(default)]
    pub filter: FilterTuning,
    #[serde(default)]
    pub bindings: InputBindings,
}

fn default_frame_hz() -> u32 {
    60
}

fn default_physics_hz() -> u32 {
    50
}

fn default_seconds() -> f32 {
    10.0
}

fn default_telemetry_every() -> u32 {
    1
}

fn default_telemetry_limit() -> usize {
    36_000
}

fn default_body_mass() -> f32 {
    1.0
}

fn default_spawn() -> Pose {
    Pose {
        position: Vec3::new(0.0, 1.0, 0.0),
        ..Default::default()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_hz: default_frame_hz(),
            physics_hz: default_physics_hz(),
            seconds: default_seconds(),
            telemetry_every: default_telemetry_every(),
            telemetry_limit: default_telemetry_limit(),
            body_mass: default_body_mass(),
            physics: PhysicsConfig::default(),
            spawn: default_spawn(),
            jetpack: JetpackConfig::default(),
            filter: FilterTuning::default(),
            bindings: InputBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read sim config {}", path.display()))?;
        let cfg = Self::from_json_str(&text)
            .with_context(|| format!("parse sim config {}", path.display()))?;
        debug!(
            path = %path.display(),
            frame_hz = cfg.frame_hz,
            physics_hz = cfg.physics_hz,
            "loaded sim config"
        );
        Ok(cfg)
    }

    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_hz as f32
    }

    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.physics_hz as f32
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.frame_hz == 0 {
            bail!("frame_hz must be positive");
        }
        if self.physics_hz == 0 {
            bail!("physics_hz must be positive");
        }
        if self.telemetry_every == 0 {
            bail!("telemetry_every must be positive");
        }
        if self.telemetry_limit == 0 {
            bail!("telemetry_limit must be positive");
        }
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            bail!("seconds must be a non-negative number, got {}", self.seconds);
        }
        if !self.body_mass.is_finite() || self.body_mass <= 0.0 {
            bail!("body_mass must be positive, got {}", self.body_mass);
        }
        if !self.physics.gravity.is_finite() {
            bail!("gravity must be finite");
        }
        if !self.spawn.position.is_finite() {
            bail!("spawn position must be finite");
        }
        let q = self.spawn.orientation;
        if ![q.x, q.y, q.z, q.w].iter().all(|c| c.is_finite()) {
            bail!("spawn orientation must be finite");
        }
        self.jetpack.validate().context("jetpack config")?;
        self.filter.validate().context("filter tuning")?;
        self.bindings.validate().context("input bindings")?;
        Ok(())
    }
}
