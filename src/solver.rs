use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::direction_between;
use crate::history::HeadTracker;

/// Direction used when a segment, its target and its anchor all coincide.
const FALLBACK_DIRECTION: Vec2 = Vec2::X;

/// One link in the trailing chain. Owned by the host and kept in a fixed
/// ordered sequence, index 0 nearest the head; `position` and `target` are
/// mutated in place by [`solve`] each frame.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BodySegment {
    /// Seconds of lag behind the head this segment tracks.
    pub delay: f32,
    /// Desired separation from the anchor ahead of it.
    pub distance: f32,
    pub position: Vec2,
    pub target: Vec2,
}

impl BodySegment {
    pub fn new(delay: f32, distance: f32, position: Vec2) -> Self {
        BodySegment {
            delay,
            distance,
            position,
            target: position,
        }
    }
}

/// Advance every segment one frame towards where the head was `delay` seconds
/// ago, under speed and spacing constraints.
///
/// Segments are resolved in index order, so each segment sees its
/// predecessor's final position for this frame. Per segment:
///
/// 1. the raw target is sampled from the head's history at the segment's
///    `delay`, pulled `distance` back along the recorded path;
/// 2. the target is kept at least `distance` away from the anchor (the head
///    for index 0, otherwise the previous segment), projecting outward when
///    necessary;
/// 3. the position advances towards the target, at most `max_move` per frame,
///    not at all when the move would be shorter than `min_move`;
/// 4. the position is kept at least `radius` away from the anchor.
///
/// The `min_move`/`max_move` bounds are applied to the frame's total
/// displacement last, so `max_move` is a hard per-frame speed cap even when
/// the radius constraint fires.
pub fn solve(
    tracker: &HeadTracker,
    segments: &mut [BodySegment],
    max_move: f32,
    min_move: f32,
    radius: f32,
) {
    debug_assert!(
        min_move >= 0.0 && max_move >= min_move,
        "min_move must be within [0, max_move]"
    );
    debug_assert!(radius >= 0.0, "radius must not be negative");

    let mut anchor = tracker.head_position();
    let mut anchor_heading = tracker.heading();
    for segment in segments.iter_mut() {
        let raw_target = tracker.sample_behind(segment.delay, segment.distance);

        // direction from the anchor out towards this segment; when target and
        // anchor coincide, trail behind the anchor, opposite its travel
        let outward = direction_between(anchor, raw_target)
            .or_else(|| anchor_heading.map(|h| -h))
            .or_else(|| direction_between(anchor, segment.position))
            .unwrap_or(FALLBACK_DIRECTION);

        segment.target = if anchor.distance(raw_target) < segment.distance {
            anchor + outward * segment.distance
        } else {
            raw_target
        };

        let origin = segment.position;
        let to_target = segment.target - origin;
        let target_distance = to_target.length();
        if target_distance > 0.0 {
            segment.position = if target_distance > max_move {
                origin + to_target * (max_move / target_distance)
            } else {
                segment.target
            };
        }

        if segment.position.distance(anchor) < radius {
            segment.position = anchor + outward * radius;
        }

        // speed cap and settle hysteresis over the frame's total displacement
        let moved = segment.position - origin;
        let step = moved.length();
        if step < min_move {
            segment.position = origin;
        } else if step > max_move {
            segment.position = origin + moved * (max_move / step);
        }

        anchor = segment.position;
        anchor_heading = direction_between(segment.position, segment.target);
    }
}
