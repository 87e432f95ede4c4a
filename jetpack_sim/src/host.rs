//! Host loop.
//!
//! Drives one jetpack the way a game engine would: a variable-rate frame loop
//! with a fixed-rate physics step folded into it.
//!
//! Within each frame:
//! 1. Apply the flight script to the input devices.
//! 2. Run every physics step the accumulated time allows. Each step applies
//!    thrust from the previous frame's attitude, then integrates the body.
//! 3. Run the jetpack frame tick.
//!
//! Determinism notes:
//! - Physics runs at a fixed timestep regardless of frame rate.
//! - Headless runs use synthetic time; only `run_realtime` looks at the clock.

use std::collections::VecDeque;
use std::time::Duration;

use jetpack_core::{
    input::ScriptedInput,
    jetpack::{ControlSnapshot, Jetpack},
    physics::{PhysicsBody, ThrustCommand},
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    body::{BodyState, SimBody},
    config::SimConfig,
    script::FlightScript,
};

/// One telemetry sample, taken after a frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub frame: u64,
    pub time: f64,
    pub body: BodyState,
    pub control: ControlSnapshot,
    /// Thrust the next physics step will apply.
    pub thrust: Option<ThrustCommand>,
}

/// Headless host for a single jetpack.
pub struct Host {
    cfg: SimConfig,
    jetpack: Jetpack<SimBody, ScriptedInput>,
    script: FlightScript,
    segment: Option<usize>,

    time: f64,
    accumulator: f64,
    frame: u64,
    physics_steps: u64,

    /// Most recent samples, at most `telemetry_limit` of them.
    telemetry: VecDeque<TelemetrySample>,
    telemetry_dropped: u64,
}

impl Host {
    /// Creates a host with the given config and flight script.
    pub fn new(cfg: SimConfig, script: FlightScript) -> anyhow::Result<Self> {
        cfg.validate()?;
        script.validate()?;

        let body = SimBody::new(cfg.body_mass, cfg.physics);
        let jetpack = Jetpack::create(cfg.spawn, cfg.jetpack, body, ScriptedInput::new())
            .with_filter_tuning(cfg.filter)
            .with_bindings(cfg.bindings);

        info!(
            frame_hz = cfg.frame_hz,
            physics_hz = cfg.physics_hz,
            segments = script.segments.len(),
            "host ready"
        );

        Ok(Self {
            cfg,
            jetpack,
            script,
            segment: None,
            time: 0.0,
            accumulator: 0.0,
            frame: 0,
            physics_steps: 0,
            telemetry: VecDeque::new(),
            telemetry_dropped: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn jetpack(&self) -> &Jetpack<SimBody, ScriptedInput> {
        &self.jetpack
    }

    pub fn jetpack_mut(&mut self) -> &mut Jetpack<SimBody, ScriptedInput> {
        &mut self.jetpack
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn physics_steps(&self) -> u64 {
        self.physics_steps
    }

    pub fn telemetry(&self) -> &VecDeque<TelemetrySample> {
        &self.telemetry
    }

    /// Samples evicted to stay within `telemetry_limit`.
    pub fn telemetry_dropped(&self) -> u64 {
        self.telemetry_dropped
    }

    /// Runs one frame of `frame_dt` seconds, including any physics steps due.
    pub fn advance(&mut self, frame_dt: f32) {
        self.apply_script();

        let fixed_dt = self.cfg.fixed_dt();
        self.accumulator += f64::from(frame_dt);
        // Tolerate accumulated rounding so that N frames of 1/N s give whole steps.
        while self.accumulator + 1e-9 >= f64::from(fixed_dt) {
            self.jetpack.physics_tick(fixed_dt);
            self.jetpack.body_mut().integrate(fixed_dt);
            self.accumulator -= f64::from(fixed_dt);
            self.physics_steps += 1;
        }

        self.time += f64::from(frame_dt);
        self.jetpack.frame_tick(frame_dt);
        self.frame += 1;

        if self.frame % u64::from(self.cfg.telemetry_every) == 0 {
            self.record();
        }
        if self.frame % u64::from(self.cfg.frame_hz) == 0 {
            let body = self.jetpack.body();
            info!(
                t = self.time,
                altitude = body.position().y,
                speed = body.velocity().len(),
                heading = self.jetpack.heading(),
                engine = ?self.jetpack.engine_state(),
                "flight"
            );
        }
    }

    /// Runs headless for `seconds` of simulated time at the configured frame rate.
    pub fn run_for(&mut self, seconds: f32) {
        let frame_dt = self.cfg.frame_dt();
        let frames = (seconds * self.cfg.frame_hz as f32).round() as u64;
        for _ in 0..frames {
            self.advance(frame_dt);
        }
    }

    /// Runs for `seconds`, pacing frames against the wall clock.
    pub async fn run_realtime(&mut self, seconds: f32) {
        let frame_dt = self.cfg.frame_dt();
        let interval = Duration::from_secs_f32(frame_dt);
        let frames = (seconds * self.cfg.frame_hz as f32).round() as u64;
        let mut next = Instant::now();

        for _ in 0..frames {
            next += interval;
            self.advance(frame_dt);
            tokio::time::sleep_until(next).await;
        }
    }

    fn apply_script(&mut self) {
        let index = self.script.index_at(self.time as f32);
        let segment = &self.script.segments[index];
        if self.segment != Some(index) {
            debug!(t = self.time, segment = index, label = segment.name(), "script segment");
            self.segment = Some(index);
        }
        segment.apply(self.jetpack.input_mut());
    }

    fn record(&mut self) {
        if self.telemetry.len() >= self.cfg.telemetry_limit {
            if self.telemetry_dropped == 0 {
                warn!(
                    limit = self.cfg.telemetry_limit,
                    "telemetry buffer full, dropping oldest samples"
                );
            }
            self.telemetry.pop_front();
            self.telemetry_dropped += 1;
        }
        self.telemetry.push_back(TelemetrySample {
            frame: self.frame,
            time: self.time,
            body: self.jetpack.body().state(),
            control: self.jetpack.snapshot(),
            thrust: self.jetpack.thrust_command(),
        });
    }
}
