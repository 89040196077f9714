//! Named visual/audio parameter definitions and their per-hand current values.
//!
//! The registry is a fixed table defined at process start; the store holds one
//! value per hand per parameter and is the only place values are mutated. The
//! stored value is inside its definition's range after every update.

use fnv::FnvHashMap;

use crate::constants::{ACCUMULATED_GAIN, DEFAULT_TIMESTAMP_MAX};
use crate::hand::Hand;

/// How a pointer delta is folded into a parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Delta is a percentage-of-range step, clamped into the range.
    Absolute,
    /// Delta is summed with a fixed gain; wraps or clamps at the range edges.
    Accumulated,
}

#[derive(Clone, Copy, Debug)]
pub struct ParamDef {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub mode: UpdateMode,
    pub wraps: bool,
    pub unit: &'static str,
}

pub const PARAMETERS: [ParamDef; 12] = [
    ParamDef { name: "volume", min: 0.0, max: 100.0, default: 100.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
    ParamDef { name: "speed", min: 0.25, max: 2.0, default: 1.0, mode: UpdateMode::Absolute, wraps: false, unit: "x" },
    ParamDef { name: "hue", min: 0.0, max: 360.0, default: 0.0, mode: UpdateMode::Accumulated, wraps: true, unit: "deg" },
    ParamDef { name: "saturation", min: 0.0, max: 200.0, default: 100.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
    ParamDef { name: "brightness", min: 0.0, max: 200.0, default: 100.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
    ParamDef { name: "contrast", min: 0.0, max: 200.0, default: 100.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
    ParamDef { name: "blur", min: 0.0, max: 10.0, default: 0.0, mode: UpdateMode::Absolute, wraps: false, unit: "px" },
    ParamDef { name: "timestamp", min: 0.0, max: 100.0, default: 0.0, mode: UpdateMode::Absolute, wraps: false, unit: "s" },
    ParamDef { name: "scale", min: 0.5, max: 2.0, default: 1.0, mode: UpdateMode::Absolute, wraps: false, unit: "x" },
    ParamDef { name: "opacity", min: 0.0, max: 1.0, default: 1.0, mode: UpdateMode::Absolute, wraps: false, unit: "" },
    ParamDef { name: "grayscale", min: 0.0, max: 100.0, default: 0.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
    ParamDef { name: "sepia", min: 0.0, max: 100.0, default: 0.0, mode: UpdateMode::Absolute, wraps: false, unit: "%" },
];

/// Look up a definition by name. Unknown names are how stale mode bindings
/// surface, so callers treat `None` as a no-op rather than an error.
#[inline]
pub fn param_def(name: &str) -> Option<&'static ParamDef> {
    PARAMETERS.iter().find(|d| d.name == name)
}

/// Per-hand current parameter values plus the per-hand timestamp range,
/// which tracks the loaded clip's start/end offsets.
#[derive(Clone, Debug)]
pub struct ParamStore {
    values: [FnvHashMap<&'static str, f32>; 2],
    timestamp_range: [(f32, f32); 2],
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore {
    pub fn new() -> Self {
        let defaults = || {
            PARAMETERS
                .iter()
                .map(|d| (d.name, d.default))
                .collect::<FnvHashMap<_, _>>()
        };
        Self {
            values: [defaults(), defaults()],
            timestamp_range: [(0.0, DEFAULT_TIMESTAMP_MAX); 2],
        }
    }

    #[inline]
    pub fn get(&self, hand: Hand, name: &str) -> Option<f32> {
        self.values[hand.index()].get(name).copied()
    }

    /// Effective range of a parameter for one hand. Only the timestamp range
    /// is per-hand; everything else comes straight from the registry.
    #[inline]
    pub fn range(&self, hand: Hand, def: &ParamDef) -> (f32, f32) {
        if def.name == "timestamp" {
            self.timestamp_range[hand.index()]
        } else {
            (def.min, def.max)
        }
    }

    /// Pin the timestamp range to a clip's offsets so scrubbing stays inside
    /// the clip. The current value is pulled into the new range. A start
    /// offset past the fallback maximum degenerates to a single-point range.
    pub fn set_timestamp_range(&mut self, hand: Hand, start: f32, end: Option<f32>) {
        let max = end.unwrap_or(DEFAULT_TIMESTAMP_MAX).max(start);
        self.timestamp_range[hand.index()] = (start, max);
        if let Some(v) = self.values[hand.index()].get_mut("timestamp") {
            *v = v.clamp(start, max);
        }
    }

    /// Reset one hand's parameters to their defaults, clamped into the
    /// effective ranges. Runs when the hand's media is (re)loaded.
    pub fn reset(&mut self, hand: Hand) {
        for def in &PARAMETERS {
            let (min, max) = self.range(hand, def);
            self.values[hand.index()].insert(def.name, def.default.clamp(min, max));
        }
    }

    /// Apply a delta to a named parameter. Unknown names are a no-op.
    /// Returns the new value when one was stored.
    pub fn update(&mut self, hand: Hand, name: &str, delta: f32) -> Option<f32> {
        let def = param_def(name)?;
        let (min, max) = self.range(hand, def);
        let cur = self.get(hand, def.name).unwrap_or(def.default);
        let new = match def.mode {
            UpdateMode::Accumulated => {
                let mut v = cur + delta * ACCUMULATED_GAIN;
                if def.wraps {
                    // Renormalize into [min, max); a single modulo step is not
                    // enough for large negative overshoot.
                    let range = max - min;
                    while v < min {
                        v += range;
                    }
                    while v >= max {
                        v -= range;
                    }
                    v
                } else {
                    v.clamp(min, max)
                }
            }
            UpdateMode::Absolute => {
                // The incoming delta is a percentage-of-range unit, so router
                // gain stays decoupled from each parameter's numeric scale.
                (cur + (delta / 100.0) * (max - min)).clamp(min, max)
            }
        };
        self.values[hand.index()].insert(def.name, new);
        Some(new)
    }

    /// Parameters currently away from their default, for the dimmed readout rows.
    pub fn off_default(&self, hand: Hand) -> Vec<(&'static str, f32)> {
        PARAMETERS
            .iter()
            .filter_map(|def| {
                let v = self.get(hand, def.name)?;
                ((v - def.default).abs() > 0.01).then_some((def.name, v))
            })
            .collect()
    }
}
