//! `jetpack_sim`
//!
//! Headless host for the jetpack control loop:
//! - Fixed timestep physics folded into a variable-rate frame loop
//! - Reference rigid body with gravity and a floor
//! - Scripted flights driving the input devices
//! - Telemetry capture
//!
//! Timing model:
//! - Physics steps run before the frame tick of the same frame
//! - Each physics step sees the attitude of the previous frame tick

pub mod body;
pub mod config;
pub mod host;
pub mod script;

pub use host::Host;
