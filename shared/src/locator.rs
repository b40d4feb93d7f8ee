//! Floor locator.
//!
//! Regions are the named, typed meshes of a container. They are indexed in one BVH with a
//! triangle → region table so a single downward ray tells which region is under a point.

use crate::{
    collision::{Point3, TriangleIndex},
    error::ConfigError,
    model::{RegionKind, RegionMeta},
};

/// A named area of a container's geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: String,
    pub kind: RegionKind,
    pub meta: RegionMeta,
    /// Mean vertex position in container space. Teleport target for map labels.
    pub centroid: Point3,
}

pub struct RegionIndex {
    regions: Vec<Region>,
    /// `owners[t]` is the region of triangle `t`.
    owners: Vec<usize>,
    triangles: TriangleIndex,
}

impl RegionIndex {
    /// Index region geometry.
    ///
    /// `owners` must have one entry per triangle, each a valid index into `regions`.
    /// Region names must be unique.
    pub fn build(
        regions: Vec<Region>,
        vertices: Vec<Point3>,
        triangles: Vec<[u32; 3]>,
        owners: Vec<usize>,
    ) -> Result<Self, ConfigError> {
        for (i, region) in regions.iter().enumerate() {
            if regions[..i].iter().any(|r| r.name == region.name) {
                return Err(ConfigError::DuplicateRegion(region.name.clone()));
            }
        }
        if owners.len() != triangles.len() {
            return Err(ConfigError::RegionOwnerCount {
                owners: owners.len(),
                triangles: triangles.len(),
            });
        }
        let dangling = owners.iter().enumerate().find(|(_, o)| **o >= regions.len());
        if let Some((triangle, &owner)) = dangling {
            return Err(ConfigError::InvalidRegionOwner { triangle, owner });
        }

        Ok(Self {
            regions,
            owners,
            triangles: TriangleIndex::build(vertices, triangles)?,
        })
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// The region whose geometry is hit first by a ray cast straight down from `origin`,
    /// with the hit distance.
    pub fn first_hit_below(&self, origin: Point3) -> Option<(&Region, f32)> {
        let hit = self.triangles.cast_ray_down(origin)?;
        let region = &self.regions[self.owners[hit.triangle]];
        Some((region, hit.distance))
    }
}

/// Which floor region the visitor stands over, if any.
///
/// Only the first hit counts: a non-floor region (wall, image, video...) directly below
/// yields `None`, as does a miss over a gap.
pub fn locate(position: Point3, regions: &RegionIndex) -> Option<&Region> {
    let (region, _) = regions.first_hit_below(position)?;
    region.kind.is_navigable().then_some(region)
}
