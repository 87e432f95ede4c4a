//! `jetpack_core`
//!
//! Control loop for a player-flown jetpack.
//!
//! Design goals:
//! - Deterministic: every update is a pure function of state, input and `dt`.
//! - Host-agnostic: physics bodies and input devices are injected through traits.
//! - Two entry points with a fixed order: frame tick, then physics ticks.
//! - No `unsafe`.

pub mod config;
pub mod control;
pub mod engine;
pub mod filter;
pub mod input;
pub mod jetpack;
pub mod math;
pub mod physics;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::engine::EngineState;
    pub use crate::input::*;
    pub use crate::jetpack::*;
    pub use crate::math::*;
    pub use crate::physics::*;
}
