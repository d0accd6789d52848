pub mod ffi;
pub mod geometry;
pub mod history;
pub mod solver;

pub use glam::Vec2;
pub use history::HeadTracker;
pub use solver::{BodySegment, solve};
