use thiserror::Error;

/// Invalid setup detected at construction time. These are fatal: nothing runs on top of
/// a misconfigured capsule, collider or parameter set.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("capsule radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("capsule segment has non-finite endpoints")]
    DegenerateSegment,

    #[error("collider geometry has no triangles")]
    EmptyMesh,

    #[error("collider geometry has a non-finite vertex")]
    NonFiniteVertex,

    #[error("triangle {triangle} references missing vertex {index}")]
    InvalidIndex { triangle: usize, index: u32 },

    #[error("{owners} region owners given for {triangles} triangles")]
    RegionOwnerCount { owners: usize, triangles: usize },

    #[error("triangle {triangle} is owned by missing region {owner}")]
    InvalidRegionOwner { triangle: usize, owner: usize },

    #[error("region name `{0}` is used more than once in one container")]
    DuplicateRegion(String),

    #[error("gravity must be negative, got {0}")]
    NonNegativeGravity(f32),

    #[error("visitor speed must be positive, got {0}")]
    NonPositiveSpeed(f32),

    #[error("physics steps must be at least 1")]
    ZeroPhysicsSteps,

    #[error("max frame delta must be positive, got {0}")]
    NonPositiveFrameDelta(f32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure while fetching or building an exhibit container.
///
/// Caught at the transition boundary; never propagated into the frame loop.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error while loading `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`: {message}")]
    Parse { path: String, message: String },

    #[error("region `{0}` has no exhibit model")]
    NoExhibitModel(String),

    #[error("invalid container geometry: {0}")]
    Geometry(#[from] ConfigError),
}
