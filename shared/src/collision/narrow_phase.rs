use nalgebra as na;
use rapier3d::parry::{
    query::{self, Ray, RayCast},
    shape as pshape,
};

use super::types::{Iso, Point3, Segment3, Vec3};

/// Closest-feature relation between a triangle and a segment.
#[derive(Clone, Copy, Debug)]
pub struct SegmentContact {
    /// Distance between the two shapes. Negative when the segment crosses the triangle.
    pub distance: f32,
    /// Unit direction from the triangle toward the segment (the push-out direction).
    pub normal: Vec3,
}

/// Closest points between a static triangle and a segment, if they are within `max_distance`.
///
/// - Both shapes are given in the same space; identity poses are used for the parry query.
/// - The normal is the outward normal on the triangle, which is the direction the segment has
///   to travel to move away from it.
/// - When the segment crosses the triangle, the normal is the face normal turned toward the
///   side holding most of the segment, and `distance` is the (negative) signed distance of
///   the endpoint left behind the face.
pub fn segment_triangle_contact(
    segment: &Segment3,
    triangle: &pshape::Triangle,
    max_distance: f32,
) -> Option<SegmentContact> {
    let seg = pshape::Segment::new(segment.start, segment.end);
    let identity = Iso::identity();

    match query::contact(&identity, triangle, &identity, &seg, max_distance) {
        Ok(Some(contact)) => {
            if contact.dist <= 0.0 {
                if let Some(crossing) = crossing_contact(segment, triangle) {
                    return Some(crossing);
                }
            }
            let normal = contact.normal1.into_inner();
            if !normal.iter().all(|c| c.is_finite()) {
                return None;
            }
            Some(SegmentContact {
                distance: contact.dist,
                normal,
            })
        }
        Ok(None) => None,
        Err(err) => {
            log::error!("segment/triangle contact query unsupported: {err:?}");
            None
        }
    }
}

/// Push-out along the face normal for a segment passing through a triangle.
///
/// `None` for a degenerate triangle; the caller falls back to the contact normal.
fn crossing_contact(segment: &Segment3, triangle: &pshape::Triangle) -> Option<SegmentContact> {
    let mut normal = triangle.normal()?.into_inner();
    let mut to_start = normal.dot(&(segment.start - triangle.a));
    let mut to_end = normal.dot(&(segment.end - triangle.a));
    if to_start + to_end < 0.0 {
        normal = -normal;
        to_start = -to_start;
        to_end = -to_end;
    }
    Some(SegmentContact {
        distance: to_start.min(to_end).min(0.0),
        normal,
    })
}

/// Cast a ray against a single triangle (both faces) and return the hit distance.
///
/// `dir` is expected to be a unit vector so the result is a distance in meters.
pub fn cast_ray_against_triangle(origin: Point3, dir: Vec3, triangle: &pshape::Triangle) -> Option<f32> {
    let ray = Ray::new(origin, dir);
    triangle.cast_local_ray(&ray, f32::MAX, true)
}

/// Minimum distance between a segment and a triangle. `None` when farther than `max_distance`.
pub fn segment_triangle_distance(
    segment: &Segment3,
    triangle: &pshape::Triangle,
    max_distance: f32,
) -> Option<f32> {
    segment_triangle_contact(segment, triangle, max_distance).map(|c| c.distance.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle() -> pshape::Triangle {
        pshape::Triangle::new(
            na::Point3::new(-5.0, 0.0, -5.0),
            na::Point3::new(5.0, 0.0, -5.0),
            na::Point3::new(0.0, 0.0, 5.0),
        )
    }

    #[test]
    fn contact_normal_points_from_triangle_to_segment() {
        let segment = Segment3 {
            start: na::Point3::new(0.0, 0.1, 0.0),
            end: na::Point3::new(0.0, 0.6, 0.0),
        };
        let contact = segment_triangle_contact(&segment, &floor_triangle(), 0.2)
            .expect("segment is within range of the floor");
        assert!((contact.distance - 0.1).abs() < 1.0e-4);
        assert!(contact.normal.y > 0.99);
    }

    #[test]
    fn far_segment_has_no_contact() {
        let segment = Segment3 {
            start: na::Point3::new(0.0, 1.0, 0.0),
            end: na::Point3::new(0.0, 2.0, 0.0),
        };
        assert!(segment_triangle_contact(&segment, &floor_triangle(), 0.2).is_none());
    }

    #[test]
    fn ray_hits_triangle_from_either_side() {
        let tri = floor_triangle();
        let down = na::Vector3::new(0.0, -1.0, 0.0);
        let up = na::Vector3::new(0.0, 1.0, 0.0);
        let above = cast_ray_against_triangle(na::Point3::new(0.0, 2.0, 0.0), down, &tri);
        let below = cast_ray_against_triangle(na::Point3::new(0.0, -3.0, 0.0), up, &tri);
        assert!((above.expect("hit from above") - 2.0).abs() < 1.0e-4);
        assert!((below.expect("hit from below") - 3.0).abs() < 1.0e-4);
    }

    #[test]
    fn crossing_segment_is_pushed_along_the_face() {
        let segment = Segment3 {
            start: na::Point3::new(0.0, -0.02, 0.0),
            end: na::Point3::new(0.0, 0.48, 0.0),
        };
        let contact = segment_triangle_contact(&segment, &floor_triangle(), 0.2)
            .expect("segment crosses the floor");
        assert!((contact.distance + 0.02).abs() < 1.0e-4);
        assert!((contact.normal - na::Vector3::y()).norm() < 1.0e-5);
    }

    #[test]
    fn crossing_from_below_pushes_down() {
        let segment = Segment3 {
            start: na::Point3::new(0.0, 0.05, 0.0),
            end: na::Point3::new(0.0, -0.45, 0.0),
        };
        let contact = segment_triangle_contact(&segment, &floor_triangle(), 0.2)
            .expect("segment crosses the floor");
        assert!((contact.distance + 0.05).abs() < 1.0e-4);
        assert!((contact.normal + na::Vector3::y()).norm() < 1.0e-5);
    }
}
