//! Scripted flights.
//!
//! A flight script is a timeline of segments. Each segment holds a set of axis
//! values and keys until its `until` time; the last segment keeps holding after
//! its end.

use std::path::Path;

use anyhow::{bail, Context};
use jetpack_core::input::{Axis, Key, ScriptedInput};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    /// End of the segment, in seconds since the start of the flight.
    pub until: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub horizontal: f32,
    #[serde(default)]
    pub vertical: f32,
    #[serde(default)]
    pub horizontal2: f32,
    #[serde(default)]
    pub vertical2: f32,
    #[serde(default)]
    pub fire1: f32,
    #[serde(default)]
    pub keys: Vec<Key>,
}

impl Segment {
    /// Overwrites `input` with what this segment holds.
    pub fn apply(&self, input: &mut ScriptedInput) {
        input.clear();
        input.set_axis(Axis::Horizontal, self.horizontal);
        input.set_axis(Axis::Vertical, self.vertical);
        input.set_axis(Axis::Horizontal2, self.horizontal2);
        input.set_axis(Axis::Vertical2, self.vertical2);
        input.set_axis(Axis::Fire1, self.fire1);
        for &key in &self.keys {
            input.set_key(key, true);
        }
    }

    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightScript {
    pub segments: Vec<Segment>,
}

impl FlightScript {
    /// Parses and validates a script from JSON.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let script: Self = serde_json::from_str(s).context("parse flight script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read flight script {}", path.display()))?;
        let script = Self::from_json_str(&text)
            .with_context(|| format!("load flight script {}", path.display()))?;
        debug!(
            path = %path.display(),
            segments = script.segments.len(),
            duration = script.duration(),
            "loaded flight script"
        );
        Ok(script)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.segments.is_empty() {
            bail!("flight script has no segments");
        }
        let mut previous = 0.0f32;
        for (i, seg) in self.segments.iter().enumerate() {
            if !seg.until.is_finite() || seg.until <= previous {
                bail!(
                    "segment {i} ({}) ends at {} which is not after {previous}",
                    seg.name(),
                    seg.until
                );
            }
            previous = seg.until;
        }
        Ok(())
    }

    /// Index of the segment active at `time`.
    pub fn index_at(&self, time: f32) -> usize {
        self.segments
            .iter()
            .position(|seg| time < seg.until)
            .unwrap_or_else(|| self.segments.len().saturating_sub(1))
    }

    pub fn segment_at(&self, time: f32) -> Option<&Segment> {
        self.segments.get(self.index_at(time))
    }

    pub fn duration(&self) -> f32 {
        self.segments.last().map(|seg| seg.until).unwrap_or(0.0)
    }

    /// Built-in demo: start the engine, climb, lean forward, turn, cut the engine.
    pub fn demo() -> Self {
        let seg = |until: f32, label: &str| Segment {
            until,
            label: Some(label.to_string()),
            ..Default::default()
        };
        Self {
            segments: vec![
                Segment {
                    keys: vec![Key::Space],
                    ..seg(0.5, "ignition")
                },
                Segment {
                    keys: vec![Key::I],
                    ..seg(3.0, "climb")
                },
                Segment {
                    vertical: 1.0,
                    ..seg(5.0, "forward")
                },
                Segment {
                    keys: vec![Key::L],
                    ..seg(7.0, "turn right")
                },
                Segment {
                    keys: vec![Key::Space],
                    ..seg(7.5, "cut engine")
                },
                seg(10.0, "fall"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::input::InputSource;

    #[test]
    fn demo_is_valid() {
        let demo = FlightScript::demo();
        demo.validate().unwrap();
        assert_eq!(demo.duration(), 10.0);
    }

    #[test]
    fn segments_selected_by_time() {
        let script = FlightScript::demo();
        assert_eq!(script.index_at(0.0), 0);
        assert_eq!(script.index_at(0.49), 0);
        assert_eq!(script.index_at(0.5), 1);
        assert_eq!(script.segment_at(4.0).unwrap().name(), "forward");
        // Last segment holds past the end.
        assert_eq!(script.index_at(60.0), 5);
    }

    #[test]
    fn parses_json_with_defaults() {
        let script = FlightScript::from_json_str(
            r#"{ "segments": [
                { "until": 1.0, "keys": ["Space"] },
                { "until": 2.5, "vertical": 0.5, "label": "lean" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.segments.len(), 2);
        assert_eq!(script.segments[0].keys, vec![Key::Space]);
        assert_eq!(script.segments[1].vertical, 0.5);
        assert_eq!(script.segments[1].horizontal, 0.0);
    }

    #[test]
    fn rejects_unordered_segments() {
        let err = FlightScript::from_json_str(
            r#"{ "segments": [ { "until": 2.0 }, { "until": 1.0 } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("segment 1"), "{err}");
        assert!(FlightScript::from_json_str(r#"{ "segments": [] }"#).is_err());
    }

    #[test]
    fn apply_replaces_previous_input() {
        let mut input = ScriptedInput::new();
        input.set_key(Key::K, true);
        let seg = Segment {
            until: 1.0,
            horizontal: -0.25,
            keys: vec![Key::I],
            ..Default::default()
        };
        seg.apply(&mut input);
        assert!(!input.key(Key::K));
        assert!(input.key(Key::I));
        assert_eq!(input.axis(Axis::Horizontal), -0.25);
    }
}
