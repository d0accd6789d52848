use std::collections::VecDeque;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_distance, direction_between};

/// Nominal frame rate, used only to pre-size the history buffer.
const SAMPLES_PER_SECOND: f32 = 60.0;

/// Samples closer in time than this are treated as simultaneous.
const TIME_EPSILON: f64 = 1e-4;

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct Sample {
    time: f64,
    position: Vec2,
}

/// Time-indexed history of where the head has been, answering "where was the
/// head `delay` seconds ago" queries for the body solver.
///
/// Samples are kept oldest-first and span at most `max_delay` seconds; one
/// sample at or before the eviction boundary is always retained so queries at
/// the boundary can still interpolate.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HeadTracker {
    samples: VecDeque<Sample>,
    time: f64,
    position: Vec2,
    max_delay: f32,
    max_distance: f32,
}

impl HeadTracker {
    pub fn new(max_delay: f32, max_distance: f32) -> Self {
        if max_delay <= 0. {
            panic!("max_delay must be above 0");
        }
        if max_distance < 0. {
            panic!("max_distance must not be negative");
        }
        let capacity = (max_delay * SAMPLES_PER_SECOND).ceil() as usize + 2;
        HeadTracker {
            samples: VecDeque::with_capacity(capacity),
            time: 0.0,
            position: Vec2::ZERO,
            max_delay,
            max_distance,
        }
    }

    /// Clear all history and seed it with `position`, so that any query
    /// immediately afterwards returns `position` regardless of delay. Use on
    /// spawn/respawn to avoid trailing segments snapping from stale history.
    pub fn reset(&mut self, position: Vec2) {
        debug!("Reset head history to {:?}", position);
        self.time = 0.0;
        self.position = position;
        self.samples.clear();
        self.samples.push_back(Sample {
            time: 0.0,
            position,
        });
    }

    /// Record the head's position for this frame and advance time by `dt`.
    /// Samples that have fallen out of the `max_delay` window are evicted,
    /// except the one needed to interpolate at the window boundary.
    pub fn advance(&mut self, position: Vec2, dt: f64) {
        debug_assert!(dt >= 0.0, "dt must not be negative");
        if self.samples.is_empty() {
            self.reset(position);
            return;
        }
        self.time += dt;
        self.position = position;

        if let Some(newest) = self.samples.back_mut() {
            if self.time - newest.time < TIME_EPSILON {
                // same timestamp; overwrite rather than grow the history
                newest.position = position;
                return;
            }
        }
        self.samples.push_back(Sample {
            time: self.time,
            position,
        });

        let boundary = self.time - self.max_delay as f64;
        while self.samples.len() >= 2 && self.samples[1].time <= boundary {
            self.samples.pop_front();
        }
    }

    pub fn head_position(&self) -> Vec2 {
        self.position
    }

    /// The recorded polyline, oldest sample first.
    pub fn path(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.samples.iter().map(|s| s.position)
    }

    /// Unit direction of the head's most recent movement, if it has moved.
    pub(crate) fn heading(&self) -> Option<Vec2> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        direction_between(self.samples[n - 2].position, self.samples[n - 1].position)
    }

    /// Where the head was `delay` seconds ago. Clamps to the oldest sample
    /// when the delay exceeds the recorded span, and never returns a point
    /// farther than `max_distance` from the current head position.
    pub(crate) fn sample(&self, delay: f32) -> Vec2 {
        let Some(newest) = self.samples.back() else {
            return self.position;
        };
        if delay <= 0.0 {
            return newest.position;
        }
        let point = self.interpolate(self.time - delay as f64);
        clamp_distance(point, self.position, self.max_distance)
    }

    /// Like [`sample`](Self::sample), but with the result pulled a further
    /// `distance` units of arc length back along the recorded polyline,
    /// clamping at the oldest sample. This is what puts a segment `distance`
    /// behind the point the head occupied `delay` seconds ago.
    pub(crate) fn sample_behind(&self, delay: f32, distance: f32) -> Vec2 {
        if self.samples.is_empty() {
            return self.position;
        }
        let query_time = self.time - delay.max(0.0) as f64;
        let (mut point, mut index) = self.locate(query_time);

        let mut remaining = distance.max(0.0);
        while remaining > 0.0 {
            let previous = self.samples[index].position;
            let leg = point.distance(previous);
            if leg >= remaining {
                if let Some(direction) = direction_between(point, previous) {
                    point += direction * remaining;
                }
                break;
            }
            remaining -= leg;
            point = previous;
            if index == 0 {
                // ran out of history; stay clamped at the oldest sample
                break;
            }
            index -= 1;
        }
        clamp_distance(point, self.position, self.max_distance)
    }

    fn interpolate(&self, query_time: f64) -> Vec2 {
        self.locate(query_time).0
    }

    /// Point on the recorded polyline at `query_time`, along with the index
    /// of the sample at or before that point.
    fn locate(&self, query_time: f64) -> (Vec2, usize) {
        let p = self.samples.partition_point(|s| s.time < query_time);
        if p == 0 {
            return (self.samples[0].position, 0);
        }
        if p >= self.samples.len() {
            return (self.samples[self.samples.len() - 1].position, self.samples.len() - 1);
        }
        let a = &self.samples[p - 1];
        let b = &self.samples[p];
        if b.time - a.time < TIME_EPSILON {
            return (b.position, p - 1);
        }
        let k = ((query_time - a.time) / (b.time - a.time)) as f32;
        (a.position.lerp(b.position, k), p - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_answers_every_delay_with_seed_position() {
        let mut tracker = HeadTracker::new(2.0, 100.0);
        let seed = Vec2::new(3.0, -4.0);
        tracker.reset(seed);
        for delay in [0.0, 0.5, 1.0, 2.0] {
            assert_eq!(tracker.sample(delay), seed);
        }
    }

    #[test]
    fn query_interpolates_between_samples() {
        let mut tracker = HeadTracker::new(2.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(10.0, 0.0), 0.5);
        tracker.advance(Vec2::new(10.0, 10.0), 0.5);
        assert_eq!(tracker.sample(0.75), Vec2::new(5.0, 0.0));
        assert_eq!(tracker.sample(0.25), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn query_clamps_to_oldest_sample() {
        let mut tracker = HeadTracker::new(2.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(10.0, 0.0), 0.5);
        assert_eq!(tracker.sample(2.0), Vec2::ZERO);
    }

    #[test]
    fn zero_delay_returns_current_head_position() {
        let mut tracker = HeadTracker::new(2.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(7.0, 1.0), 0.25);
        assert_eq!(tracker.sample(0.0), Vec2::new(7.0, 1.0));
    }

    #[test]
    fn history_is_bounded_by_max_delay() {
        let mut tracker = HeadTracker::new(1.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        for i in 1..=12 {
            tracker.advance(Vec2::new(i as f32, 0.0), 0.25);
        }
        // time is now 3.0; only the window [2.0, 3.0] remains, plus the
        // single boundary sample at 2.0 itself
        let boundary = tracker.time - tracker.max_delay as f64;
        assert_eq!(tracker.samples.len(), 5);
        assert!(tracker.samples[0].time <= boundary);
        assert!(tracker.samples[1].time > boundary);
    }

    #[test]
    fn advance_with_zero_dt_does_not_grow_history() {
        let mut tracker = HeadTracker::new(1.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(1.0, 0.0), 0.0);
        tracker.advance(Vec2::new(2.0, 0.0), 0.0);
        assert_eq!(tracker.samples.len(), 1);
        assert_eq!(tracker.sample(0.0), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn query_moves_monotonically_back_along_path() {
        let mut tracker = HeadTracker::new(2.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        for i in 1..=10 {
            tracker.advance(Vec2::new(i as f32 * 3.0, 0.0), 0.125);
        }
        let mut previous_x = f32::MAX;
        for i in 0..=20 {
            let x = tracker.sample(i as f32 * 0.1).x;
            assert!(x <= previous_x);
            previous_x = x;
        }
    }

    #[test]
    fn query_is_clamped_within_max_distance_of_head() {
        let mut tracker = HeadTracker::new(10.0, 5.0);
        tracker.reset(Vec2::ZERO);
        // a teleport-sized jump in a single frame
        tracker.advance(Vec2::new(100.0, 0.0), 0.1);
        let sampled = tracker.sample(0.05);
        assert!(sampled.distance(Vec2::new(95.0, 0.0)) < 1e-3);
    }

    #[test]
    fn sample_behind_walks_back_along_recorded_path() {
        let mut tracker = HeadTracker::new(1.0, 100.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(10.0, 0.0), 0.5);
        tracker.advance(Vec2::new(20.0, 0.0), 0.5);
        assert_eq!(tracker.sample_behind(0.5, 5.0), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn sample_behind_spans_multiple_legs() {
        let mut tracker = HeadTracker::new(2.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        tracker.advance(Vec2::new(10.0, 0.0), 0.5);
        tracker.advance(Vec2::new(10.0, 10.0), 0.5);
        // 15 units back from the newest sample crosses the corner
        assert!(
            tracker
                .sample_behind(0.0, 15.0)
                .distance(Vec2::new(5.0, 0.0))
                < 1e-4
        );
        // farther back than the whole path clamps at the oldest sample
        assert_eq!(tracker.sample_behind(0.0, 100.0), Vec2::ZERO);
    }

    #[test]
    fn heading_follows_most_recent_movement() {
        let mut tracker = HeadTracker::new(1.0, 1000.0);
        tracker.reset(Vec2::ZERO);
        assert_eq!(tracker.heading(), None);
        tracker.advance(Vec2::new(5.0, 0.0), 0.25);
        tracker.advance(Vec2::new(5.0, 3.0), 0.25);
        assert_eq!(tracker.heading(), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn advance_on_empty_history_seeds_like_reset() {
        let mut tracker = HeadTracker::new(1.0, 1000.0);
        tracker.advance(Vec2::new(4.0, 4.0), 0.5);
        assert_eq!(tracker.sample(1.0), Vec2::new(4.0, 4.0));
    }

    #[test]
    #[should_panic]
    fn zero_max_delay_is_rejected() {
        HeadTracker::new(0.0, 10.0);
    }
}
