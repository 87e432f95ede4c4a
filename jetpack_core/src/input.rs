//! Input handling.
//!
//! A host exposes its devices through [`InputSource`]: named analog axes and a
//! handful of keys. Each frame the jetpack samples them into a fresh
//! [`RawInput`]; nothing sampled here survives into the next frame.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{config::InputBindings, math::Vec2};

/// Analog axes the jetpack reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left/right on the primary stick.
    Horizontal,
    /// Fore/aft on the primary stick.
    Vertical,
    /// Secondary stick, yaw.
    Horizontal2,
    /// Secondary stick, collective.
    Vertical2,
    /// Trigger-style engine toggle.
    Fire1,
}

/// Discrete keys the jetpack reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Collective up.
    I,
    /// Yaw left.
    J,
    /// Collective down.
    K,
    /// Yaw right.
    L,
    /// Engine toggle.
    Space,
}

/// Host input devices. Anything not wired up reads as neutral.
pub trait InputSource {
    fn axis(&self, _axis: Axis) -> f32 {
        0.0
    }

    fn key(&self, _key: Key) -> bool {
        false
    }
}

/// One frame of unfiltered control input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawInput {
    /// `x`: left/right, `y`: fore/aft.
    pub cyclic: Vec2,
    /// `x`: yaw, `y`: collective.
    pub collective_yaw: Vec2,
    pub engine_toggle: bool,
}

impl RawInput {
    /// Samples `source` into a fresh frame of raw input.
    pub fn gather(source: &impl InputSource, bindings: &InputBindings) -> Self {
        let mut raw = Self::default();

        raw.cyclic += Vec2::new(source.axis(Axis::Horizontal), source.axis(Axis::Vertical));

        if bindings.secondary_stick {
            raw.collective_yaw += Vec2::new(
                source.axis(Axis::Horizontal2),
                source.axis(Axis::Vertical2),
            );
        }

        // Keys override the stick; the later key wins when opposites are held.
        if source.key(Key::I) {
            raw.collective_yaw.y = 1.0;
        }
        if source.key(Key::K) {
            raw.collective_yaw.y = -1.0;
        }
        if source.key(Key::J) {
            raw.collective_yaw.x = -1.0;
        }
        if source.key(Key::L) {
            raw.collective_yaw.x = 1.0;
        }

        raw.engine_toggle = source.axis(Axis::Fire1).abs() > bindings.toggle_threshold;
        if source.key(Key::Space) {
            raw.engine_toggle = true;
        }

        raw
    }
}

/// Input source with nothing attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputSource for NullInput {}

/// Input source driven programmatically, e.g. by a flight script or a test.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    axes: HashMap<Axis, f32>,
    keys: HashSet<Key>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.axes.insert(axis, value);
    }

    pub fn set_key(&mut self, key: Key, held: bool) {
        if held {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Releases every key and centers every axis.
    pub fn clear(&mut self) {
        self.axes.clear();
        self.keys.clear();
    }
}

impl InputSource for ScriptedInput {
    fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn key(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}
