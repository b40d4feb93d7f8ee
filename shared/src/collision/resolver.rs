use super::{
    broad,
    collider::Collider,
    narrow_phase,
    settings::{CORRECTION_EPS, GROUND_PUSH_RATIO, MIN_DIRECTION_SQ},
    types::{Capsule, Point3, Resolution, Vec3},
};

/// Push a capsule out of every triangle it overlaps.
///
/// Algorithm:
/// - Move the capsule segment (placed at `origin`) into collider-local space.
/// - Collect candidate triangles whose AABB overlaps the segment AABB grown by the radius.
/// - For each candidate closer than the radius, translate both endpoints by
///   `normal * (radius - distance)`. Corrections accumulate in a single pass; the candidate
///   set is not recomputed while the segment moves.
/// - Bring the corrected start back to container space; that is the corrected origin.
pub fn resolve_capsule(collider: &Collider, capsule: &Capsule, origin: Point3) -> Resolution {
    let to_local = collider.transform().inverse();
    let mut segment = capsule.segment_at(origin).transformed(&to_local);
    let radius = capsule.radius();

    let query = broad::segment_aabb(&segment, radius);
    let mut contacts = 0;

    for idx in collider.index().query_candidates(&query) {
        let triangle = collider.index().triangle(idx);
        let Some(contact) = narrow_phase::segment_triangle_contact(&segment, &triangle, radius)
        else {
            continue;
        };

        if contact.distance < radius {
            let depth = radius - contact.distance;
            segment.translate(contact.normal * depth);
            contacts += 1;
        }
    }

    let corrected = collider.transform() * segment.start - capsule.segment_start();
    Resolution {
        corrected,
        delta: corrected - origin,
        contacts,
    }
}

/// Apply a resolution to a moving body and classify it as grounded or airborne.
///
/// - Grounded when the vertical push-out beats a quarter of the distance gravity alone
///   covered this step (`delta.y > |dt * velocity.y * 0.25|`).
/// - The applied correction is shortened by `CORRECTION_EPS`; classification and velocity
///   projection use the unclamped delta.
/// - Grounded bodies stop. Airborne bodies lose the velocity component along the push-out
///   direction so they slide along what they hit.
///
/// Returns the new grounded flag.
pub fn apply_resolution(
    position: &mut Point3,
    velocity: &mut Vec3,
    resolution: &Resolution,
    dt: f32,
) -> bool {
    let delta = resolution.delta;
    let on_ground = delta.y > (dt * velocity.y * GROUND_PUSH_RATIO).abs();

    let len_sq = delta.norm_squared();
    let direction = if len_sq > MIN_DIRECTION_SQ {
        delta / len_sq.sqrt()
    } else {
        Vec3::zeros()
    };

    let offset = (len_sq.sqrt() - CORRECTION_EPS).max(0.0);
    *position += direction * offset;

    if on_ground {
        *velocity = Vec3::zeros();
    } else {
        *velocity -= direction * direction.dot(velocity);
    }

    on_ground
}
