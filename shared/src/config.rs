//! Simulation parameters.
//!
//! Every field has a default (see `constants`), so a config file only needs to name what it
//! overrides. Files are RON:
//!
//! ```text
//! (
//!     gravity: -9.8,
//!     physics_steps: 5,
//!     exit_regions: ["FloorOut", "Exit"],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    collision::{Capsule, Point3, Vec3},
    constants::{
        DEFAULT_BACKGROUND, DEFAULT_CAPSULE_RADIUS, DEFAULT_CAPSULE_SEGMENT_END,
        DEFAULT_ENTRY_POINT, DEFAULT_GRAVITY, DEFAULT_HEIGHT_OFFSET, DEFAULT_PHYSICS_STEPS,
        DEFAULT_VISITOR_SPEED, EXIT_FLOOR_DROP, EXIT_REGION, FALL_RESET_HEIGHT, MAX_FRAME_DELTA,
        RESET_LIFT,
    },
    error::ConfigError,
};

/// Capsule shape as written in config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleParams {
    pub radius: f32,
    pub segment_start: [f32; 3],
    pub segment_end: [f32; 3],
}

impl Default for CapsuleParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_CAPSULE_RADIUS,
            segment_start: [0.0; 3],
            segment_end: DEFAULT_CAPSULE_SEGMENT_END,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// m/s², negative.
    pub gravity: f32,
    /// m/s.
    pub visitor_speed: f32,
    /// Sub-steps per frame, at least 1.
    pub physics_steps: u32,
    /// Camera target offset above the visitor.
    pub height_offset: [f32; 3],
    /// Frame deltas are clamped to this (seconds).
    pub max_frame_delta: f32,
    /// Falling below this height resets the visitor.
    pub fall_reset_height: f32,
    /// Reset lifts the visitor this far above the entry point.
    pub reset_lift: f32,
    /// Used until a model provides an entry marker.
    pub entry_point: [f32; 3],
    /// Normalise the summed direction when several movement keys are held.
    pub normalize_diagonal: bool,
    /// Region names that lead back to the main container.
    pub exit_regions: Vec<String>,
    pub capsule: CapsuleParams,
    /// Exit floors inside exhibits are lowered by this much.
    pub exit_floor_drop: f32,
    /// Background for exhibits whose region metadata does not name one.
    pub default_background: String,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            visitor_speed: DEFAULT_VISITOR_SPEED,
            physics_steps: DEFAULT_PHYSICS_STEPS,
            height_offset: DEFAULT_HEIGHT_OFFSET,
            max_frame_delta: MAX_FRAME_DELTA,
            fall_reset_height: FALL_RESET_HEIGHT,
            reset_lift: RESET_LIFT,
            entry_point: DEFAULT_ENTRY_POINT,
            normalize_diagonal: false,
            exit_regions: vec![EXIT_REGION.to_owned()],
            capsule: CapsuleParams::default(),
            exit_floor_drop: EXIT_FLOOR_DROP,
            default_background: DEFAULT_BACKGROUND.to_owned(),
        }
    }
}

impl SimParams {
    /// Parse RON text. Missing fields keep their defaults. The result is validated.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let params: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Read and parse a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(ConfigError::NonNegativeGravity(self.gravity));
        }
        if !(self.visitor_speed.is_finite() && self.visitor_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.visitor_speed));
        }
        if self.physics_steps == 0 {
            return Err(ConfigError::ZeroPhysicsSteps);
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(ConfigError::NonPositiveFrameDelta(self.max_frame_delta));
        }
        self.capsule().map(|_| ())
    }

    /// The visitor capsule described by `capsule`.
    pub fn capsule(&self) -> Result<Capsule, ConfigError> {
        Capsule::new(
            self.capsule.radius,
            Vec3::from(self.capsule.segment_start),
            Vec3::from(self.capsule.segment_end),
        )
    }

    #[inline]
    pub fn height_offset(&self) -> Vec3 {
        Vec3::from(self.height_offset)
    }

    #[inline]
    pub fn entry_point(&self) -> Point3 {
        Point3::from(self.entry_point)
    }

    /// Does entering `region` mean going back to the main container?
    pub fn is_exit(&self, region: &str) -> bool {
        self.exit_regions.iter().any(|name| name == region)
    }

    /// Clamp a raw frame delta into `[0, max_frame_delta]`.
    #[inline]
    pub fn clamp_delta(&self, raw: f32) -> f32 {
        if raw.is_finite() {
            raw.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        }
    }

    /// Per-sub-step delta for a clamped frame delta.
    #[inline]
    pub fn sub_step_delta(&self, frame_delta: f32) -> f32 {
        frame_delta / self.physics_steps as f32
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SimParams::default();
        assert!(params.validate().is_ok());
        assert!(params.is_exit("FloorOut"));
        assert!(!params.is_exit("Room A"));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let params = SimParams::from_ron_str("(gravity: -9.8, physics_steps: 5)").expect("valid");
        assert_relative_eq!(params.gravity, -9.8);
        assert_eq!(params.physics_steps, 5);
        assert_relative_eq!(params.visitor_speed, DEFAULT_VISITOR_SPEED);
        assert_eq!(params.exit_regions, vec![EXIT_REGION.to_owned()]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_steps = SimParams {
            physics_steps: 0,
            ..SimParams::default()
        };
        assert!(matches!(zero_steps.validate(), Err(ConfigError::ZeroPhysicsSteps)));

        let upward_gravity = SimParams {
            gravity: 9.8,
            ..SimParams::default()
        };
        assert!(matches!(
            upward_gravity.validate(),
            Err(ConfigError::NonNegativeGravity(_))
        ));

        let mut flat_capsule = SimParams::default();
        flat_capsule.capsule.radius = 0.0;
        assert!(matches!(
            flat_capsule.validate(),
            Err(ConfigError::NonPositiveRadius(_))
        ));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(
            SimParams::from_ron_str("(gravity: )"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn frame_delta_is_clamped() {
        let params = SimParams::default();
        assert_relative_eq!(params.clamp_delta(2.5), MAX_FRAME_DELTA);
        assert_relative_eq!(params.clamp_delta(-1.0), 0.0);
        assert_relative_eq!(params.clamp_delta(f32::NAN), 0.0);
        assert_relative_eq!(params.clamp_delta(0.016), 0.016);
        assert_relative_eq!(params.sub_step_delta(0.09), 0.03);
    }
}
