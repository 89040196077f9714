//! Status and readout strings shared by the control surface.

use crate::hand::Hand;
use crate::livecode::{Binding, ModeDefinition, Program};
use crate::params::{param_def, ParamDef, ParamStore};

pub const NO_MODES: &str = "No modes defined";

/// Status line after a program load.
pub fn program_status(program: &Program) -> String {
    let videos = program.videos.len();
    let modes = program.modes.len();
    if videos > 0 {
        format!("{videos} video(s) loaded, {modes} mode(s) configured")
    } else if modes > 0 {
        format!("Loaded {modes} foot control mode(s)")
    } else {
        "No videos or modes defined".to_string()
    }
}

pub fn mode_heading(mode: &ModeDefinition) -> String {
    format!("MODE {}: {}", mode.index, mode.name)
}

/// One-line summary of a mode's axis bindings.
pub fn binding_summary(binding: &Binding) -> String {
    let pair = |axes: &crate::livecode::AxisBinding| {
        format!(
            "X={} Y={}",
            axes.x.as_deref().unwrap_or("-"),
            axes.y.as_deref().unwrap_or("-")
        )
    };
    match binding {
        Binding::Simple { target, axes } => format!("{}: {}", target.label(), pair(axes)),
        Binding::PerHand { right, left } => {
            let mut parts = Vec::new();
            if let Some(axes) = right {
                parts.push(format!("Right: {}", pair(axes)));
            }
            if let Some(axes) = left {
                parts.push(format!("Left: {}", pair(axes)));
            }
            parts.join(" | ")
        }
    }
}

pub fn switched_status(mode: &ModeDefinition) -> String {
    format!("Switched to mode: {}", mode.name)
}

pub fn loading_status(hand: Hand) -> String {
    format!("Loading {} hand video...", hand.as_str())
}

pub fn loaded_status(hand: Hand) -> String {
    format!("{} hand video loaded", hand.as_str())
}

pub fn error_status(message: &str) -> String {
    format!("Error: {message}")
}

/// Unit-aware value rendering: unitless values keep 2 decimals, seconds one,
/// everything else rounds to an integer.
pub fn format_value(def: &ParamDef, value: f32) -> String {
    match def.unit {
        "" => format!("{value:.2}"),
        "s" => format!("{value:.1}{}", def.unit),
        _ => format!("{}{}", value.round() as i64, def.unit),
    }
}

/// One line of the per-hand parameter readout.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadoutRow {
    pub name: &'static str,
    pub value: String,
    /// Bound by the active mode (rendered prominent) vs. merely off-default
    /// (rendered dimmed).
    pub active: bool,
}

/// Rows for one hand's readout: the active mode's bound parameters first,
/// then every other parameter currently away from its default.
pub fn readout_rows(
    store: &ParamStore,
    hand: Hand,
    active_mode: Option<&ModeDefinition>,
) -> Vec<ReadoutRow> {
    let mut rows = Vec::new();
    let mut bound: Vec<&'static str> = Vec::new();
    if let Some(axes) = active_mode.and_then(|m| m.binding.axes_for(hand)) {
        for name in [axes.x.as_deref(), axes.y.as_deref()].into_iter().flatten() {
            if let Some(def) = param_def(name) {
                if let Some(value) = store.get(hand, def.name) {
                    bound.push(def.name);
                    rows.push(ReadoutRow {
                        name: def.name,
                        value: format_value(def, value),
                        active: true,
                    });
                }
            }
        }
    }
    for (name, value) in store.off_default(hand) {
        if bound.contains(&name) {
            continue;
        }
        if let Some(def) = param_def(name) {
            rows.push(ReadoutRow {
                name,
                value: format_value(def, value),
                active: false,
            });
        }
    }
    rows
}
