/// Gravity in meters per second squared. Negative: it points down (-Y).
pub const DEFAULT_GRAVITY: f32 = -70.0;

/// Horizontal walking speed in meters per second.
pub const DEFAULT_VISITOR_SPEED: f32 = 2.0;

/// Number of sub-steps each frame is split into for collision stability.
pub const DEFAULT_PHYSICS_STEPS: u32 = 3;

/// Camera target offset above the visitor origin (meters).
pub const DEFAULT_HEIGHT_OFFSET: [f32; 3] = [0.0, 0.93, 0.0];

/// Upper bound on a frame delta (seconds).
///
/// A paused tab reports one huge delta when it resumes; integrating that in one go
/// tunnels the capsule through floors.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Below this height the visitor has fallen out of the world and is reset.
pub const FALL_RESET_HEIGHT: f32 = -10.0;

/// Reset puts the visitor this far above the entry point (meters).
pub const RESET_LIFT: f32 = 2.0;

/// Entry point used until a model provides a `VisitorEnter` marker.
pub const DEFAULT_ENTRY_POINT: [f32; 3] = [5.0, 5.0, 5.0];

/// Capsule radius (meters).
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.2;

/// Capsule segment end relative to the visitor origin. The start is the origin itself.
pub const DEFAULT_CAPSULE_SEGMENT_END: [f32; 3] = [0.2, 0.1, 0.2];

/// Reserved region name meaning "back to the main container".
pub const EXIT_REGION: &str = "FloorOut";

/// Name of the main container; also the initial floor name.
pub const MAIN_CONTAINER: &str = "mainScene";

/// Mesh name of the entry point marker inside a model.
pub const ENTRY_MARKER: &str = "VisitorEnter";

/// Exit floors inside exhibits are lowered by this much (meters) so they sit just below
/// the exhibit floor.
pub const EXIT_FLOOR_DROP: f32 = 0.1;

/// Background used by exhibits whose region does not name one.
pub const DEFAULT_BACKGROUND: &str = "textures/bg_color.ktx2";

pub const DEFAULT_BACKGROUND_INTENSITY: f32 = 1.0;

pub const DEFAULT_BACKGROUND_BLUR: f32 = 0.0;

/// Orbit rotation applied to the camera on every visitor reset (degrees).
pub const RESET_ORBIT_DEGREES: f32 = 180.0;

/// Status text shown when an exhibit fails to load.
pub const LOAD_ERROR_TEXT: &str = "Error loading scene";

/// Camera position at start-up, world space.
pub const DEFAULT_CAMERA_POSITION: [f32; 3] = [10.0, 6.0, -10.0];
