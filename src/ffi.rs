//! C ABI for hosts embedding the solver from other languages. The tracker is
//! handed out as an opaque owned pointer; every function other than
//! [`snake_trail_new`] requires a handle that has not been dropped.

use glam::Vec2;

use crate::history::HeadTracker;
use crate::solver;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[repr(C)]
pub struct BodySegment {
    pub delay: f32,
    pub distance: f32,
    pub position: Vector2,
    pub target: Vector2,
}

#[unsafe(no_mangle)]
pub extern "C" fn snake_trail_new(max_delay: f32, max_distance: f32) -> *mut HeadTracker {
    Box::into_raw(Box::new(HeadTracker::new(max_delay, max_distance)))
}

#[unsafe(no_mangle)]
pub extern "C" fn snake_trail_drop(head: *mut HeadTracker) {
    drop(unsafe { Box::from_raw(head) });
}

#[unsafe(no_mangle)]
pub extern "C" fn snake_trail_reset(head: &mut HeadTracker, position: Vector2) {
    head.reset(position.into());
}

#[unsafe(no_mangle)]
pub extern "C" fn snake_trail_advance(head: &mut HeadTracker, position: Vector2, dt: f64) {
    head.advance(position.into(), dt);
}

#[unsafe(no_mangle)]
pub extern "C" fn snake_trail_solve(
    head: &HeadTracker,
    segments: *mut BodySegment,
    num_segments: usize,
    max_move: f32,
    min_move: f32,
    radius: f32,
) {
    if num_segments == 0 {
        return;
    }
    let raw = unsafe { std::slice::from_raw_parts_mut(segments, num_segments) };
    let mut chain: Vec<solver::BodySegment> = raw
        .iter()
        .map(|s| solver::BodySegment {
            delay: s.delay,
            distance: s.distance,
            position: s.position.into(),
            target: s.target.into(),
        })
        .collect();
    solver::solve(head, &mut chain, max_move, min_move, radius);
    for (out, resolved) in raw.iter_mut().zip(chain.iter()) {
        out.position = resolved.position.into();
        out.target = resolved.target.into();
    }
}
