//! Interactive clip-region polygon editor.
//!
//! Vertices accumulate over a fixed-size editing canvas and convert to a
//! percentage-based polygon descriptor for the sink's clip geometry channel.

use glam::Vec2;
use thiserror::Error;

use crate::constants::{EDIT_CANVAS_HEIGHT, EDIT_CANVAS_WIDTH, VERTEX_GRAB_RADIUS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditButton {
    Primary,
    Secondary,
}

/// What a press did; callers redraw and re-emit the descriptor on anything
/// but `Ignored`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Added,
    DragStarted,
    Deleted,
    Ignored,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("a clip region needs at least 3 vertices, have {have}")]
    InsufficientPoints { have: usize },
}

#[derive(Clone, Debug, Default)]
pub struct ClipRegionEditor {
    vertices: Vec<Vec2>,
    dragging: Option<usize>,
}

impl ClipRegionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.vertices
            .iter()
            .position(|v| v.distance(point) < VERTEX_GRAB_RADIUS)
    }

    /// Button press at canvas coordinates. Primary adds a vertex on empty
    /// space or starts dragging an existing one; secondary deletes.
    pub fn press(&mut self, x: f32, y: f32, button: EditButton) -> EditAction {
        if x < 0.0 || x > EDIT_CANVAS_WIDTH || y < 0.0 || y > EDIT_CANVAS_HEIGHT {
            return EditAction::Ignored;
        }
        let point = Vec2::new(x, y);
        if let Some(i) = self.hit_test(point) {
            return match button {
                EditButton::Secondary => {
                    self.vertices.remove(i);
                    EditAction::Deleted
                }
                EditButton::Primary => {
                    self.dragging = Some(i);
                    EditAction::DragStarted
                }
            };
        }
        match button {
            EditButton::Primary => {
                self.vertices.push(point);
                EditAction::Added
            }
            EditButton::Secondary => EditAction::Ignored,
        }
    }

    /// Move the dragged vertex, clamped to the canvas. Returns whether a
    /// vertex actually moved.
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        let Some(i) = self.dragging else {
            return false;
        };
        self.vertices[i] = Vec2::new(
            x.clamp(0.0, EDIT_CANVAS_WIDTH),
            y.clamp(0.0, EDIT_CANVAS_HEIGHT),
        );
        true
    }

    pub fn release(&mut self) {
        self.dragging = None;
    }

    /// Percentage-based polygon descriptor, only once the region is closed.
    pub fn clip_path(&self) -> Result<String, RegionError> {
        if self.vertices.len() < 3 {
            return Err(RegionError::InsufficientPoints {
                have: self.vertices.len(),
            });
        }
        let points = self
            .vertices
            .iter()
            .map(|v| {
                format!(
                    "{:.2}% {:.2}%",
                    v.x / EDIT_CANVAS_WIDTH * 100.0,
                    v.y / EDIT_CANVAS_HEIGHT * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("polygon({points})"))
    }
}
