use nalgebra as na;
use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
    shape as pshape,
};

use crate::collision::{
    narrow_phase,
    settings::RAY_COLUMN_HALF_WIDTH,
    types::{Point3, RayHit, Segment3},
};
use crate::error::ConfigError;

/// Acceleration structure over an immutable triangle soup.
///
/// Notes:
/// - Every triangle is stored as one AABB leaf; leaf `i` is triangle `i`.
/// - The structure never changes after construction. A new geometry means a new index.
pub struct TriangleIndex {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    /// BVH over per-triangle AABBs.
    bvh: Bvh,
    /// Union of every triangle AABB.
    bounds: Aabb,
}

impl TriangleIndex {
    /// Build the index, validating indices and vertex values.
    ///
    /// An empty triangle list is a configuration error: a collider without geometry
    /// would make the resolver silently do nothing.
    pub fn build(vertices: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Result<Self, ConfigError> {
        if triangles.is_empty() {
            return Err(ConfigError::EmptyMesh);
        }
        if vertices.iter().any(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(ConfigError::NonFiniteVertex);
        }

        let mut aabbs: Vec<Aabb> = Vec::with_capacity(triangles.len());
        for (i, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&v| v as usize >= vertices.len()) {
                return Err(ConfigError::InvalidIndex {
                    triangle: i,
                    index: bad,
                });
            }
            let [a, b, c] = tri.map(|v| vertices[v as usize]);
            aabbs.push(Aabb::new(a.inf(&b).inf(&c), a.sup(&b).sup(&c)));
        }

        let bounds = aabbs
            .iter()
            .skip(1)
            .fold(aabbs[0], |acc, aabb| aabb_union(&acc, aabb));

        Ok(Self {
            vertices,
            triangles,
            bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
            bounds,
        })
    }

    /// Number of indexed triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Always false for a successfully built index; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The parry triangle for index `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> pshape::Triangle {
        let [a, b, c] = self.triangles[i].map(|v| self.vertices[v as usize]);
        pshape::Triangle::new(a, b, c)
    }

    /// Query triangle indices whose AABB intersects `query`.
    pub fn query_candidates(&self, query: &Aabb) -> Vec<usize> {
        self.bvh
            .intersect_aabb(query)
            .map(|leaf_idx| leaf_idx as usize)
            .collect()
    }

    /// Cast a ray from `origin` straight down (-Y) and return the nearest hit.
    ///
    /// Candidates are gathered with a thin vertical column below the origin, so only
    /// triangles under the origin are tested by the narrow phase.
    pub fn cast_ray_down(&self, origin: Point3) -> Option<RayHit> {
        if origin.y < self.bounds.mins.y {
            return None;
        }

        let w = RAY_COLUMN_HALF_WIDTH;
        let column = Aabb::new(
            na::Point3::new(origin.x - w, self.bounds.mins.y - 1.0, origin.z - w),
            na::Point3::new(origin.x + w, origin.y, origin.z + w),
        );

        let down = na::Vector3::new(0.0, -1.0, 0.0);
        let mut best: Option<RayHit> = None;
        for idx in self.query_candidates(&column) {
            let tri = self.triangle(idx);
            if let Some(distance) = narrow_phase::cast_ray_against_triangle(origin, down, &tri) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(RayHit {
                        distance,
                        triangle: idx,
                    });
                }
            }
        }
        best
    }
}

/// AABB enclosing both segment endpoints, expanded by `radius` in every direction.
pub fn segment_aabb(segment: &Segment3, radius: f32) -> Aabb {
    let r = na::Vector3::new(radius, radius, radius);
    Aabb::new(
        segment.start.inf(&segment.end) - r,
        segment.start.sup(&segment.end) + r,
    )
}

/// Compute the union of two AABBs.
fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb::new(a.mins.inf(&b.mins), a.maxs.sup(&b.maxs))
}
