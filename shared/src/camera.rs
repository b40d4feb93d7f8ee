//! Orbit camera rig and mini-map heading.
//!
//! The rig is a target point (the orbit centre, kept above the visitor) and a camera
//! position. Following the visitor moves both by the same delta so the orbit offset, and
//! with it the user's chosen view angle, is preserved.

use std::f32::consts::PI;

use crate::collision::{Point3, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub target: Point3,
    pub position: Point3,
}

impl CameraRig {
    pub fn new(target: Point3, position: Point3) -> Self {
        Self { target, position }
    }

    /// Keep the target at `visitor + height_offset` (world space).
    pub fn follow(&mut self, visitor: Point3, height_offset: Vec3) {
        let target = visitor + height_offset;
        self.position += target - self.target;
        self.target = target;
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.position - self.target
    }

    /// Orbit azimuth about +Y. Zero when the camera sits on +Z of the target, so "forward"
    /// (-Z rotated by the azimuth) always points away from the camera.
    pub fn azimuth(&self) -> f32 {
        let offset = self.offset();
        offset.x.atan2(offset.z)
    }

    /// Place the camera at `azimuth` around the target, keeping its height and horizontal
    /// distance.
    pub fn set_azimuth(&mut self, azimuth: f32) {
        let offset = self.offset();
        let distance = offset.xz().norm();
        self.position = self.target
            + Vec3::new(distance * azimuth.sin(), offset.y, distance * azimuth.cos());
    }

    /// Swing the camera around the target about +Y.
    pub fn rotate_orbit(&mut self, degrees: f32) {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), degrees.to_radians());
        self.position = self.target + rotation * self.offset();
    }

    /// Mini-map rotation for the current view direction.
    pub fn map_heading(&self) -> f32 {
        let dir = self.target - self.position;
        -dir.x.atan2(dir.z) + PI
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn follow_preserves_orbit_offset() {
        let mut rig = CameraRig::new(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 2.0, 3.0));
        rig.follow(Point3::new(4.0, 0.0, -1.0), Vec3::new(0.0, 0.93, 0.0));
        assert_relative_eq!(rig.target, Point3::new(4.0, 0.93, -1.0));
        assert_relative_eq!(rig.offset(), Vec3::new(0.0, 1.0, 3.0), epsilon = 1.0e-6);
    }

    #[test]
    fn azimuth_tracks_camera_side() {
        let behind = CameraRig::new(Point3::origin(), Point3::new(0.0, 1.0, 5.0));
        assert_relative_eq!(behind.azimuth(), 0.0);

        let side = CameraRig::new(Point3::origin(), Point3::new(5.0, 1.0, 0.0));
        assert_relative_eq!(side.azimuth(), FRAC_PI_2);
    }

    #[test]
    fn set_azimuth_keeps_distance_and_height() {
        let mut rig = CameraRig::new(Point3::origin(), Point3::new(0.0, 2.0, 4.0));
        rig.set_azimuth(-FRAC_PI_2);
        assert_relative_eq!(rig.position, Point3::new(-4.0, 2.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(rig.azimuth(), -FRAC_PI_2, epsilon = 1.0e-5);
    }

    #[test]
    fn half_turn_flips_the_offset() {
        let mut rig = CameraRig::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        rig.rotate_orbit(180.0);
        assert_relative_eq!(rig.position, Point3::new(-1.0, 2.0, -3.0), epsilon = 1.0e-5);
    }

    #[test]
    fn map_heading_for_view_along_minus_z() {
        // Camera on +Z looking towards -Z: atan2(0, -1) = PI, so the map is not rotated.
        let rig = CameraRig::new(Point3::origin(), Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(rig.map_heading(), 0.0, epsilon = 1.0e-6);
    }
}
