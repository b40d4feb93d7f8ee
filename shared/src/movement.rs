use crate::{
    collision::{
        Collider, Point3, Quat, Resolution, Vec3, apply_resolution, resolve_capsule,
        settings::DIST_EPS,
    },
    config::SimParams,
    visitor::{MoveInput, Visitor},
};

/// Output of a single `step()` sub-step.
#[derive(Clone, Copy, Debug)]
pub enum StepOutcome {
    /// Normal step; carries the resolver output that was applied.
    Moved(Resolution),
    /// The visitor fell below the reset height and was put back at the entry point.
    Reset,
}

/// Horizontal displacement direction for the held movement keys.
///
/// Each flag contributes a cardinal axis rotated about +Y by the camera azimuth:
/// forward is -Z, back +Z, left -X, right +X. Contributions add up, so holding two keys
/// moves faster than one unless `normalize` is set.
pub fn horizontal_direction(input: &MoveInput, azimuth: f32, normalize: bool) -> Vec3 {
    let rotation = Quat::from_axis_angle(&Vec3::y_axis(), azimuth);

    let mut dir = Vec3::zeros();
    if input.forward {
        dir += rotation * Vec3::new(0.0, 0.0, -1.0);
    }
    if input.back {
        dir += rotation * Vec3::new(0.0, 0.0, 1.0);
    }
    if input.left {
        dir += rotation * Vec3::new(-1.0, 0.0, 0.0);
    }
    if input.right {
        dir += rotation * Vec3::new(1.0, 0.0, 0.0);
    }

    if normalize {
        dir.try_normalize(DIST_EPS).unwrap_or(dir)
    } else {
        dir
    }
}

/// Advance the visitor by one sub-step of `dt` seconds against `collider`.
///
/// Behavior
/// - Vertical velocity restarts from `dt * gravity` while grounded and accumulates while
///   airborne.
/// - Held keys move the visitor horizontally at `visitor_speed`, relative to `azimuth`.
/// - Velocity is integrated into the position, then the capsule is resolved against the
///   collider, which sets the grounded flag and projects the velocity.
/// - Falling below `fall_reset_height` teleports the visitor to `entry` lifted by
///   `reset_lift` with zero velocity; the step ends there.
pub fn step(
    visitor: &mut Visitor,
    azimuth: f32,
    dt: f32,
    collider: &Collider,
    params: &SimParams,
    entry: Point3,
) -> StepOutcome {
    if visitor.on_ground {
        visitor.velocity.y = dt * params.gravity;
    } else {
        visitor.velocity.y += dt * params.gravity;
    }

    let dir = horizontal_direction(&visitor.input, azimuth, params.normalize_diagonal);
    visitor.position += dir * (params.visitor_speed * dt);
    visitor.position += visitor.velocity * dt;

    let resolution = resolve_capsule(collider, &visitor.capsule, visitor.position);
    visitor.on_ground = apply_resolution(
        &mut visitor.position,
        &mut visitor.velocity,
        &resolution,
        dt,
    );

    if visitor.position.y < params.fall_reset_height {
        log::warn!(
            "visitor fell through the world at {:?}; resetting to entry point",
            visitor.position
        );
        visitor.teleport(entry + Vec3::new(0.0, params.reset_lift, 0.0));
        return StepOutcome::Reset;
    }

    StepOutcome::Moved(resolution)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::collision::{Capsule, Iso};

    fn floor(y: f32, half: f32) -> Collider {
        Collider::from_triangles(
            Iso::identity(),
            vec![
                Point3::new(-half, y, -half),
                Point3::new(half, y, -half),
                Point3::new(half, y, half),
                Point3::new(-half, y, half),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
        )
        .expect("valid floor")
    }

    fn visitor_at(position: Point3) -> Visitor {
        let capsule = Capsule::new(0.2, Vec3::zeros(), Vec3::new(0.0, 0.5, 0.0)).expect("capsule");
        Visitor::new(capsule, position)
    }

    #[test]
    fn forward_follows_azimuth() {
        let input = MoveInput {
            forward: true,
            ..MoveInput::default()
        };
        let straight = horizontal_direction(&input, 0.0, false);
        assert_relative_eq!(straight, Vec3::new(0.0, 0.0, -1.0), epsilon = 1.0e-6);

        // A quarter turn about +Y takes -Z to -X.
        let turned = horizontal_direction(&input, FRAC_PI_2, false);
        assert_relative_eq!(turned, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn diagonal_is_only_normalized_on_request() {
        let input = MoveInput {
            forward: true,
            right: true,
            ..MoveInput::default()
        };
        assert_relative_eq!(
            horizontal_direction(&input, 0.0, false).norm(),
            2.0_f32.sqrt(),
            epsilon = 1.0e-6
        );
        assert_relative_eq!(
            horizontal_direction(&input, 0.0, true).norm(),
            1.0,
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = MoveInput {
            forward: true,
            back: true,
            ..MoveInput::default()
        };
        assert_relative_eq!(horizontal_direction(&input, 0.3, true).norm(), 0.0);
    }

    #[test]
    fn airborne_velocity_accumulates() {
        let params = SimParams {
            gravity: -10.0,
            ..SimParams::default()
        };
        let collider = floor(-100.0, 1.0);
        let mut v = visitor_at(Point3::new(0.0, 50.0, 0.0));
        v.on_ground = false;
        step(&mut v, 0.0, 0.1, &collider, &params, Point3::origin());
        step(&mut v, 0.0, 0.1, &collider, &params, Point3::origin());
        assert_relative_eq!(v.velocity.y, -2.0, epsilon = 1.0e-5);
        assert!(!v.on_ground);
    }

    #[test]
    fn resting_visitor_stays_grounded() {
        let params = SimParams::default();
        let collider = floor(0.0, 5.0);
        let mut v = visitor_at(Point3::new(1.0, 0.2, -2.0));
        v.on_ground = true;
        let outcome = step(&mut v, 0.0, 1.0 / 60.0, &collider, &params, Point3::origin());
        assert!(matches!(outcome, StepOutcome::Moved(_)));
        assert!(v.on_ground);
        assert_eq!(v.velocity, Vec3::zeros());
        assert_relative_eq!(v.position.y, 0.2, epsilon = 1.0e-3);
    }

    #[test]
    fn walking_moves_at_visitor_speed() {
        let params = SimParams {
            visitor_speed: 3.0,
            ..SimParams::default()
        };
        let collider = floor(0.0, 50.0);
        let mut v = visitor_at(Point3::new(0.0, 0.2, 0.0));
        v.input.press("d");
        for _ in 0..60 {
            step(&mut v, 0.0, 1.0 / 60.0, &collider, &params, Point3::origin());
        }
        assert_relative_eq!(v.position.x, 3.0, epsilon = 1.0e-2);
        assert_relative_eq!(v.position.z, 0.0, epsilon = 1.0e-3);
        assert!(v.on_ground);
    }
}
