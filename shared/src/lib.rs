pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod container;
pub mod error;
pub mod loader;
pub mod locator;
pub mod model;
pub mod movement;
pub mod session;
pub mod transition;
pub mod visitor;

pub use camera::CameraRig;
pub use collision::{Capsule, Collider, Iso, Point3, Quat, Resolution, Vec3};
pub use config::{CapsuleParams, SimParams};
pub use container::Container;
pub use error::{ConfigError, LoadError};
pub use loader::{LoadProgress, LoadRequest, MemorySceneLoader, ProgressSink, SceneLoader};
pub use locator::{Region, RegionIndex, locate};
pub use model::{ContainerModel, Environment, ModelMesh, RegionKind, RegionMeta};
pub use movement::{StepOutcome, horizontal_direction, step};
pub use session::{FrameOutput, LoadStatus, Session};
pub use transition::{
    Transition, TransitionDetector, TransitionEvent, TransitionPlan, TransitionState,
};
pub use visitor::{MoveInput, Owner, Visitor};
