use glam::Vec2;

/// Displacements shorter than this are treated as zero-length.
pub const DISTANCE_EPSILON: f32 = 1e-5;

/// Unit vector pointing from `from` towards `to`, or `None` when the two
/// points are too close to define a direction.
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    let v = to - from;
    let len = v.length();
    if len > DISTANCE_EPSILON {
        Some(v / len)
    } else {
        None
    }
}

/// Pull `point` towards `origin` along the line between them so that it sits
/// no farther than `max_distance` away.
pub fn clamp_distance(point: Vec2, origin: Vec2, max_distance: f32) -> Vec2 {
    let v = point - origin;
    let len = v.length();
    if len > max_distance {
        origin + v * (max_distance / len)
    } else {
        point
    }
}
