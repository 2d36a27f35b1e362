//! Time-range math and segment planning.
//!
//! Splits a video duration into fixed-length segments; the last one may be
//! shorter so the plan ends exactly at the video's true duration.

mod plan;

pub use plan::{partition, plan_segments, Segment, SegmentStatus, MAX_SEGMENTS};
