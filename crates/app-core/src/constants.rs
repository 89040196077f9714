// Shared layout/tuning constants used by the core pipeline and the web frontend.

// Camera feed dimensions as served by the detection backend (pre-resized).
pub const CAMERA_WIDTH: f32 = 640.0;
pub const CAMERA_HEIGHT: f32 = 480.0;

// Background plane sized to the camera aspect ratio so overlays line up 1:1
// with the visible feed.
pub const PLANE_WIDTH: f32 = 16.0;
pub const PLANE_HEIGHT: f32 = PLANE_WIDTH / (CAMERA_WIDTH / CAMERA_HEIGHT); // 12

// Overlays sit slightly in front of the plane; detection carries no usable depth.
pub const OVERLAY_Z: f32 = 0.1;

// Base uniform scale of an overlay object; the scale parameter multiplies it.
pub const BASE_OVERLAY_SCALE: f32 = 0.003;

// Clip-region editing canvas
pub const EDIT_CANVAS_WIDTH: f32 = 320.0;
pub const EDIT_CANVAS_HEIGHT: f32 = 180.0;
pub const VERTEX_GRAB_RADIUS: f32 = 10.0;

// Pointer routing
pub const POINTER_SENSITIVITY: f32 = 0.5;
pub const DELTA_NOISE_THRESHOLD: f32 = 0.1;

// Accumulated parameters advance faster than the raw scaled delta
pub const ACCUMULATED_GAIN: f32 = 5.0;

// Timestamp maximum when a video declaration has no end offset
pub const DEFAULT_TIMESTAMP_MAX: f32 = 100.0;
