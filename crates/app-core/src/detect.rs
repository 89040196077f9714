//! Wire format of the hand-tracking event stream.
//!
//! One pushed record carries both hands' detection state. Positions are
//! normalized to [0,1]x[0,1] with (0,0) at the top-left of the camera feed.

use glam::Vec2;
use serde::Deserialize;

use crate::hand::Hand;

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct WirePoint {
    pub x: f32,
    pub y: f32,
}

/// Raw record as pushed by the detection backend.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WireFrame {
    pub right_hand_detected: bool,
    #[serde(default)]
    pub right_hand_position: WirePoint,
    pub left_hand_detected: bool,
    #[serde(default)]
    pub left_hand_position: WirePoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandUpdate {
    pub detected: bool,
    /// Normalized position; only meaningful while `detected` is set.
    pub position: Vec2,
}

/// One decoded update for both hands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionFrame {
    pub right: HandUpdate,
    pub left: HandUpdate,
}

impl DetectionFrame {
    pub fn from_wire(wire: &WireFrame) -> Self {
        Self {
            right: HandUpdate {
                detected: wire.right_hand_detected,
                position: Vec2::new(wire.right_hand_position.x, wire.right_hand_position.y),
            },
            left: HandUpdate {
                detected: wire.left_hand_detected,
                position: Vec2::new(wire.left_hand_position.x, wire.left_hand_position.y),
            },
        }
    }

    #[inline]
    pub fn hand(&self, hand: Hand) -> &HandUpdate {
        match hand {
            Hand::Right => &self.right,
            Hand::Left => &self.left,
        }
    }
}
