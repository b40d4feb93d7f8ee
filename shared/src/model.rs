//! Parsed form of a building or exhibit model.
//!
//! A model is a flat list of named, typed meshes. The host decodes these from RON files;
//! tests build them in code. Geometry stays in plain arrays here and is converted to
//! nalgebra types when a [`crate::container::Container`] is built.

use serde::{Deserialize, Serialize};

use crate::{
    collision::{Iso, Point3, Quat, Vec3, iso_from_parts},
    config::SimParams,
    constants::{DEFAULT_BACKGROUND_BLUR, DEFAULT_BACKGROUND_INTENSITY},
};

/// Type discriminant carried by every mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Walkable floor that names the visitor's location.
    #[serde(rename = "visitorLocation")]
    VisitorLocation,
    Room,
    Wall,
    Image,
    Video,
    Audio,
    #[default]
    Other,
}

impl RegionKind {
    /// Only these kinds identify a floor under the visitor.
    #[inline]
    pub fn is_navigable(self) -> bool {
        matches!(self, Self::VisitorLocation | Self::Room)
    }
}

/// Optional per-mesh metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMeta {
    /// Exhibit model loaded when the visitor steps onto this region.
    pub exhibit_model: Option<String>,
    /// Extra interactive objects merged into the exhibit.
    pub exhibit_objects: Option<String>,
    pub background: Option<String>,
    pub background_intensity: Option<f32>,
    pub background_blur: Option<f32>,
    /// Mini-map label. Clicking it teleports the visitor here.
    pub label: Option<String>,
}

/// Background and lighting parameters of a container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub background: String,
    pub intensity: f32,
    pub blur: f32,
}

impl Environment {
    /// Defaults for a container that does not describe its own environment.
    pub fn fallback(params: &SimParams) -> Self {
        Self {
            background: params.default_background.clone(),
            intensity: DEFAULT_BACKGROUND_INTENSITY,
            blur: DEFAULT_BACKGROUND_BLUR,
        }
    }

    /// Environment of an exhibit entered through a region with `meta`.
    pub fn from_region(meta: &RegionMeta, params: &SimParams) -> Self {
        let fallback = Self::fallback(params);
        Self {
            background: meta.background.clone().unwrap_or(fallback.background),
            intensity: meta.background_intensity.unwrap_or(fallback.intensity),
            blur: meta.background_blur.unwrap_or(fallback.blur),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMesh {
    pub name: String,
    #[serde(default)]
    pub kind: RegionKind,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler angles (roll, pitch, yaw) in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 3]>,
    #[serde(default)]
    pub meta: RegionMeta,
}

impl ModelMesh {
    /// Mesh pose inside its container.
    pub fn pose(&self) -> Iso {
        let [roll, pitch, yaw] = self.rotation;
        iso_from_parts(
            Vec3::from(self.translation),
            Quat::from_euler_angles(roll, pitch, yaw),
        )
    }

    /// Vertices placed in container space.
    pub fn placed_vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        let pose = self.pose();
        self.vertices.iter().map(move |v| pose * Point3::from(*v))
    }

    /// Mean of the placed vertices, or the mesh origin when it has none.
    pub fn centroid(&self) -> Point3 {
        if self.vertices.is_empty() {
            return Point3::from(self.translation);
        }
        let sum = self
            .placed_vertices()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertices.len() as f32)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerModel {
    pub name: String,
    #[serde(default)]
    pub meshes: Vec<ModelMesh>,
    /// Environment of the container itself (used for the main building).
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl ContainerModel {
    /// Append another model's meshes (exhibit objects merged into an exhibit).
    pub fn merge(&mut self, other: ContainerModel) {
        self.meshes.extend(other.meshes);
    }

    pub fn mesh(&self, name: &str) -> Option<&ModelMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn model_parses_from_ron() {
        let text = r#"(
            name: "main",
            meshes: [
                (
                    name: "Room A",
                    kind: Room,
                    translation: (0.0, 1.0, 0.0),
                    vertices: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 1.0)],
                    indices: [(0, 1, 2)],
                    meta: (exhibit_model: Some("room_a.ron"), label: Some("A")),
                ),
                (
                    name: "Lobby",
                    kind: visitorLocation,
                    vertices: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 1.0)],
                    indices: [(0, 1, 2)],
                ),
            ],
        )"#;
        let model: ContainerModel = ron::from_str(text).expect("valid model");
        assert_eq!(model.meshes.len(), 2);
        let room = model.mesh("Room A").expect("room mesh");
        assert_eq!(room.kind, RegionKind::Room);
        assert_eq!(room.meta.exhibit_model.as_deref(), Some("room_a.ron"));
        assert_eq!(model.meshes[1].kind, RegionKind::VisitorLocation);
        assert_eq!(model.meshes[1].meta, RegionMeta::default());
    }

    #[test]
    fn centroid_uses_placed_vertices() {
        let mesh = ModelMesh {
            name: "Tile".to_owned(),
            kind: RegionKind::Room,
            translation: [10.0, 0.0, 0.0],
            rotation: [0.0; 3],
            vertices: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 0.0, 2.0], [0.0, 0.0, 2.0]],
            indices: vec![[0, 1, 2], [0, 2, 3]],
            meta: RegionMeta::default(),
        };
        let c = mesh.centroid();
        assert_relative_eq!(c.x, 11.0);
        assert_relative_eq!(c.z, 1.0);
    }

    #[test]
    fn region_environment_falls_back_to_defaults() {
        let params = SimParams::default();
        let meta = RegionMeta {
            background_blur: Some(0.5),
            ..RegionMeta::default()
        };
        let env = Environment::from_region(&meta, &params);
        assert_eq!(env.background, params.default_background);
        assert_relative_eq!(env.intensity, 1.0);
        assert_relative_eq!(env.blur, 0.5);
    }

    #[test]
    fn only_floor_kinds_are_navigable() {
        assert!(RegionKind::VisitorLocation.is_navigable());
        assert!(RegionKind::Room.is_navigable());
        assert!(!RegionKind::Wall.is_navigable());
        assert!(!RegionKind::Image.is_navigable());
        assert!(!RegionKind::Video.is_navigable());
    }
}
