//! Routes raw pointer deltas onto parameter bindings via the active mode.

use smallvec::SmallVec;

use crate::constants::{DELTA_NOISE_THRESHOLD, POINTER_SENSITIVITY};
use crate::hand::Hand;
use crate::livecode::ModeDefinition;
use crate::params::ParamStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Prev,
}

/// Compacted mode list plus the single global cursor over it.
#[derive(Clone, Debug, Default)]
pub struct ModeBank {
    modes: Vec<ModeDefinition>,
    current: usize,
}

impl ModeBank {
    /// Swap in a freshly parsed mode list; the cursor returns to the front.
    pub fn replace(&mut self, modes: Vec<ModeDefinition>) {
        self.modes = modes;
        self.current = 0;
    }

    #[inline]
    pub fn modes(&self) -> &[ModeDefinition] {
        &self.modes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    #[inline]
    pub fn active(&self) -> Option<&ModeDefinition> {
        self.modes.get(self.current)
    }

    /// Advance or retreat the cursor circularly. No-op on an empty bank.
    pub fn cycle(&mut self, direction: CycleDirection) -> Option<&ModeDefinition> {
        let len = self.modes.len();
        if len == 0 {
            return None;
        }
        self.current = match direction {
            CycleDirection::Next => (self.current + 1) % len,
            CycleDirection::Prev => (self.current + len - 1) % len,
        };
        self.active()
    }
}

/// Apply one pointer movement through the active mode's bindings. Movement
/// below the noise threshold on an axis leaves that axis untouched. Returns
/// the hands whose parameters changed so callers can re-emit styles.
pub fn apply_movement(
    bank: &ModeBank,
    store: &mut ParamStore,
    delta_x: f32,
    delta_y: f32,
) -> SmallVec<[Hand; 2]> {
    let mut touched = SmallVec::new();
    let Some(mode) = bank.active() else {
        return touched;
    };
    for hand in Hand::ALL {
        let Some(axes) = mode.binding.axes_for(hand) else {
            continue;
        };
        let mut changed = false;
        if let Some(x_param) = axes.x.as_deref() {
            if delta_x.abs() > DELTA_NOISE_THRESHOLD {
                changed |= store
                    .update(hand, x_param, delta_x * POINTER_SENSITIVITY)
                    .is_some();
            }
        }
        if let Some(y_param) = axes.y.as_deref() {
            if delta_y.abs() > DELTA_NOISE_THRESHOLD {
                // Screen-down decreases the value: push up to increase.
                changed |= store
                    .update(hand, y_param, -delta_y * POINTER_SENSITIVITY)
                    .is_some();
            }
        }
        if changed {
            touched.push(hand);
        }
    }
    touched
}
