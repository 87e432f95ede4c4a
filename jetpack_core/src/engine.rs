//! Engine on/off state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Off,
    On,
}

impl EngineState {
    pub fn is_on(self) -> bool {
        self == EngineState::On
    }

    pub fn toggled(self) -> Self {
        match self {
            EngineState::Off => EngineState::On,
            EngineState::On => EngineState::Off,
        }
    }
}

/// Flips the engine on each rising edge of the toggle input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineSwitch {
    state: EngineState,
    previous_input: bool,
}

impl EngineSwitch {
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Feeds this frame's toggle input. Returns `true` when the state flipped.
    pub fn update(&mut self, input: bool) -> bool {
        let rising = input && !self.previous_input;
        self.previous_input = input;
        if rising {
            self.state = self.state.toggled();
        }
        rising
    }
}
