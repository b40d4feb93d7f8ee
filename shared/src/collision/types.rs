/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- broad (triangle BVH and candidate queries)
- narrow_phase (parry3d segment-vs-triangle contacts and ray hits)
- resolver (capsule push-out and ground classification)
- the movement integrator and floor locator built on top of them
*/

use nalgebra as na;

use crate::error::ConfigError;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Build an isometry from a translation and rotation.
#[inline]
pub fn iso_from_parts(translation: Vec3, rotation: Quat) -> Iso {
    Iso::from_parts(
        na::Translation3::new(translation.x, translation.y, translation.z),
        rotation,
    )
}

/// Capsule collider attached to the visitor.
///
/// The segment is expressed relative to the visitor origin. `segment_start` is the point
/// that follows the visitor origin: after resolution the corrected start *is* the new
/// visitor position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    radius: f32,
    segment_start: Vec3,
    segment_end: Vec3,
}

impl Capsule {
    /// Create a capsule, failing on a non-positive radius or a non-finite segment.
    pub fn new(radius: f32, segment_start: Vec3, segment_end: Vec3) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(radius));
        }
        if !segment_start.iter().chain(segment_end.iter()).all(|c| c.is_finite()) {
            return Err(ConfigError::DegenerateSegment);
        }
        Ok(Self {
            radius,
            segment_start,
            segment_end,
        })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn segment_start(&self) -> Vec3 {
        self.segment_start
    }

    #[inline]
    pub fn segment_end(&self) -> Vec3 {
        self.segment_end
    }

    /// The capsule segment placed at `origin`, in the same space as `origin`.
    #[inline]
    pub fn segment_at(&self, origin: Point3) -> Segment3 {
        Segment3 {
            start: origin + self.segment_start,
            end: origin + self.segment_end,
        }
    }
}

/// A line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment3 {
    pub start: Point3,
    pub end: Point3,
}

impl Segment3 {
    /// Apply an isometry to both endpoints.
    #[inline]
    pub fn transformed(&self, iso: &Iso) -> Self {
        Self {
            start: iso * self.start,
            end: iso * self.end,
        }
    }

    /// Translate both endpoints by `offset`.
    #[inline]
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }
}

/// Outcome of one capsule resolution against a collider.
#[derive(Clone, Copy, Debug)]
pub struct Resolution {
    /// Corrected visitor origin, in the caller's (container) space.
    pub corrected: Point3,
    /// `corrected - original`, before the anti-jitter clamp.
    pub delta: Vec3,
    /// Number of triangles that pushed the capsule this pass.
    pub contacts: usize,
}

/// A ray hit against indexed triangles.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Distance along the (unit) ray direction.
    pub distance: f32,
    /// Index of the triangle that was hit.
    pub triangle: usize,
}
