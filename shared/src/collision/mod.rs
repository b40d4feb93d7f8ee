/*!
Collision root module.

This module re-exports submodules that implement the visitor's capsule collider
against static triangle geometry, using parry3d (through rapier3d) for the BVH and
narrow-phase queries. The code is split for clarity:

- types:        shared data types (Capsule, Segment3, Resolution, math aliases)
- settings:     resolver tolerances
- broad:        triangle BVH (candidate queries, downward rays)
- narrow_phase: thin wrappers over parry3d queries (segment contact, triangle rays)
- collider:     a container's collider (transform + triangle index)
- resolver:     capsule push-out and ground classification
*/

pub mod broad;
pub mod collider;
pub mod narrow_phase;
pub mod resolver;
pub mod settings;
pub mod types;

// Re-export commonly used types and functions.
pub use broad::TriangleIndex;
pub use collider::Collider;
pub use resolver::{apply_resolution, resolve_capsule};
pub use types::{Capsule, Iso, Point3, Quat, RayHit, Resolution, Segment3, Vec3, iso_from_parts};
