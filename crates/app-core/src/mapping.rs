use glam::{Vec2, Vec3};

use crate::constants::{OVERLAY_Z, PLANE_HEIGHT, PLANE_WIDTH};

// Detection coordinates: (0,0) top-left, (1,1) bottom-right.
// World coordinates: origin at the plane center, x+ right, y+ up.

/// Map a normalized detection coordinate onto the camera plane. Linear and
/// unclamped; inputs outside [0,1] extrapolate off the plane edge.
#[inline]
pub fn camera_to_world(normalized_x: f32, normalized_y: f32) -> Vec2 {
    Vec2::new(
        (normalized_x - 0.5) * PLANE_WIDTH,
        -(normalized_y - 0.5) * PLANE_HEIGHT,
    )
}

/// Full overlay placement for a detection coordinate, with the fixed depth.
#[inline]
pub fn overlay_position(normalized_x: f32, normalized_y: f32) -> Vec3 {
    let w = camera_to_world(normalized_x, normalized_y);
    Vec3::new(w.x, w.y, OVERLAY_Z)
}
