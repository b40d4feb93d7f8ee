/*!
Collision resolver settings and tolerances.

These constants centralize the thresholds used by the capsule resolver and
the ground classification. Keeping them together makes tuning easier.

Notes
- Distances are in meters, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Amount removed from every applied correction (meters).
/// Keeps a resting capsule from jittering at near-zero penetration.
pub const CORRECTION_EPS: f32 = 1.0e-5;

/// The vertical push-out must exceed this fraction of the gravity-only displacement
/// of the step for the visitor to count as grounded.
pub const GROUND_PUSH_RATIO: f32 = 0.25;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Minimum squared length of a usable push-out direction.
pub const MIN_DIRECTION_SQ: f32 = 1.0e-12;

/// Half-width of the vertical column used to collect candidates for downward rays (meters).
pub const RAY_COLUMN_HALF_WIDTH: f32 = 1.0e-3;
