use super::{
    broad::TriangleIndex,
    types::{Iso, Point3},
};
use crate::error::ConfigError;

/// Static walkable/blocking geometry of one container.
///
/// The triangles live in collider-local space; `transform` places them in the owning
/// container's space. Immutable after construction.
pub struct Collider {
    transform: Iso,
    index: TriangleIndex,
}

impl Collider {
    #[inline]
    pub fn new(transform: Iso, index: TriangleIndex) -> Self {
        Self { transform, index }
    }

    /// Build the BVH over `triangles` and wrap it with `transform`.
    pub fn from_triangles(
        transform: Iso,
        vertices: Vec<Point3>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(transform, TriangleIndex::build(vertices, triangles)?))
    }

    #[inline]
    pub fn transform(&self) -> &Iso {
        &self.transform
    }

    #[inline]
    pub fn index(&self) -> &TriangleIndex {
        &self.index
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index.len()
    }
}
