//! Containers: the main building and exhibit interiors.
//!
//! A container owns exactly one collider and one region index, both built from the same
//! model. Nothing in here changes after construction; a new model means a new container.

use crate::{
    collision::{Collider, Iso, Point3, Vec3},
    config::SimParams,
    constants::ENTRY_MARKER,
    error::ConfigError,
    locator::{Region, RegionIndex},
    model::{ContainerModel, Environment},
    visitor::Owner,
};

pub struct Container {
    name: String,
    owner: Owner,
    /// Container space → world space.
    transform: Iso,
    collider: Collider,
    regions: RegionIndex,
    entry_point: Option<Point3>,
    environment: Environment,
}

impl Container {
    /// Build collider and region index from a parsed model.
    ///
    /// - `VisitorEnter` meshes only provide the entry point; they are not geometry.
    /// - In exhibits, exit floors are lowered by `exit_floor_drop`.
    /// - Everything else is merged into one collider and indexed as a region.
    pub fn build(
        model: &ContainerModel,
        owner: Owner,
        transform: Iso,
        params: &SimParams,
    ) -> Result<Self, ConfigError> {
        let mut vertices: Vec<Point3> = Vec::new();
        let mut triangles: Vec<[u32; 3]> = Vec::new();
        let mut owners: Vec<usize> = Vec::new();
        let mut regions: Vec<Region> = Vec::new();
        let mut entry_point = None;

        for mesh in &model.meshes {
            if mesh.name == ENTRY_MARKER {
                entry_point = Some(mesh.centroid());
                continue;
            }

            let drop = if !owner.is_main() && params.is_exit(&mesh.name) {
                Vec3::new(0.0, -params.exit_floor_drop, 0.0)
            } else {
                Vec3::zeros()
            };

            let base = vertices.len() as u32;
            let count = mesh.vertices.len() as u32;
            for (i, tri) in mesh.indices.iter().enumerate() {
                if let Some(&bad) = tri.iter().find(|&&v| v >= count) {
                    return Err(ConfigError::InvalidIndex {
                        triangle: triangles.len() + i,
                        index: bad,
                    });
                }
            }

            vertices.extend(mesh.placed_vertices().map(|p| p + drop));
            triangles.extend(mesh.indices.iter().map(|tri| tri.map(|v| v + base)));
            owners.extend(std::iter::repeat_n(regions.len(), mesh.indices.len()));
            regions.push(Region {
                name: mesh.name.clone(),
                kind: mesh.kind,
                meta: mesh.meta.clone(),
                centroid: mesh.centroid() + drop,
            });
        }

        let collider = Collider::from_triangles(Iso::identity(), vertices.clone(), triangles.clone())?;
        let regions = RegionIndex::build(regions, vertices, triangles, owners)?;

        log::info!(
            "built container `{}`: {} triangles, {} regions",
            model.name,
            collider.triangle_count(),
            regions.regions().len()
        );

        let environment = model
            .environment
            .clone()
            .unwrap_or_else(|| Environment::fallback(params));

        Ok(Self {
            name: model.name.clone(),
            owner,
            transform,
            collider,
            regions,
            entry_point,
            environment,
        })
    }

    /// Replace the environment (exhibits take theirs from the triggering region).
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    #[inline]
    pub fn transform(&self) -> &Iso {
        &self.transform
    }

    #[inline]
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    #[inline]
    pub fn regions(&self) -> &RegionIndex {
        &self.regions
    }

    #[inline]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Entry point from the model's marker, in container space.
    #[inline]
    pub fn entry_point(&self) -> Option<Point3> {
        self.entry_point
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    #[inline]
    pub fn to_world(&self, local: Point3) -> Point3 {
        self.transform * local
    }

    #[inline]
    pub fn from_world(&self, world: Point3) -> Point3 {
        self.transform.inverse_transform_point(&world)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::{ModelMesh, RegionKind, RegionMeta};

    fn mesh(name: &str, kind: RegionKind, translation: [f32; 3]) -> ModelMesh {
        ModelMesh {
            name: name.to_owned(),
            kind,
            translation,
            rotation: [0.0; 3],
            vertices: vec![
                [-1.0, 0.0, -1.0],
                [1.0, 0.0, -1.0],
                [1.0, 0.0, 1.0],
                [-1.0, 0.0, 1.0],
            ],
            indices: vec![[0, 2, 1], [0, 3, 2]],
            meta: RegionMeta::default(),
        }
    }

    fn model() -> ContainerModel {
        ContainerModel {
            name: "exhibit".to_owned(),
            meshes: vec![
                mesh("Hall", RegionKind::Room, [0.0, 0.0, 0.0]),
                mesh("FloorOut", RegionKind::VisitorLocation, [4.0, 0.0, 0.0]),
                mesh(ENTRY_MARKER, RegionKind::Other, [0.0, 1.0, 0.0]),
            ],
            environment: None,
        }
    }

    #[test]
    fn entry_marker_is_not_geometry() {
        let params = SimParams::default();
        let container = Container::build(&model(), Owner::Main, Iso::identity(), &params)
            .expect("valid model");
        assert_eq!(container.collider().triangle_count(), 4);
        assert_eq!(container.regions().regions().len(), 2);
        assert!(container.region(ENTRY_MARKER).is_none());
        let entry = container.entry_point().expect("marker present");
        assert_relative_eq!(entry.y, 1.0);
    }

    #[test]
    fn exit_floor_is_lowered_in_exhibits_only() {
        let params = SimParams::default();
        let exhibit = Container::build(
            &model(),
            Owner::Exhibit {
                region: "Hall".to_owned(),
            },
            Iso::identity(),
            &params,
        )
        .expect("valid model");
        let out = exhibit.region("FloorOut").expect("exit region");
        assert_relative_eq!(out.centroid.y, -params.exit_floor_drop);

        let main = Container::build(&model(), Owner::Main, Iso::identity(), &params)
            .expect("valid model");
        assert_relative_eq!(main.region("FloorOut").expect("exit region").centroid.y, 0.0);
    }

    #[test]
    fn model_without_geometry_is_rejected() {
        let params = SimParams::default();
        let empty = ContainerModel {
            name: "empty".to_owned(),
            meshes: vec![mesh(ENTRY_MARKER, RegionKind::Other, [0.0; 3])],
            environment: None,
        };
        let err = Container::build(&empty, Owner::Main, Iso::identity(), &params).err();
        assert!(matches!(err, Some(ConfigError::EmptyMesh)));
    }

    #[test]
    fn world_round_trip_uses_transform() {
        let params = SimParams::default();
        let container = Container::build(
            &model(),
            Owner::Main,
            Iso::translation(3.0, 0.0, 0.0),
            &params,
        )
        .expect("valid model");
        let world = container.to_world(Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(world.x, 4.0);
        let local = container.from_world(world);
        assert_relative_eq!(local.x, 1.0);
    }
}
