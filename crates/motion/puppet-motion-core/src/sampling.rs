//! Curve sampling over a [`MotionData`].
//!
//! Model:
//! - A curve's segments are time-ordered; the active segment is the first one
//!   whose trailing point lies strictly after the sample time.
//! - Past the last key the curve pins to the last value, unless a loop
//!   correction window is supplied: then the gap between the last key and the
//!   loop period is bridged back to the first key.
//!
//! API:
//! - evaluate_curve(&MotionData, curve_index, time, wrap_end)

use crate::data::MotionData;
use crate::interp::{evaluate_segment, evaluate_wrap};

/// Sample curve `curve_index` at `time` (seconds since the motion start).
///
/// `wrap_end` is the loop period when end→start correction is active; a time
/// past the last key but before `wrap_end` then interpolates from the last key
/// towards the first key placed at `wrap_end`.
pub fn evaluate_curve(data: &MotionData, curve_index: usize, time: f32, wrap_end: Option<f32>) -> f32 {
    let curve = &data.curves[curve_index];
    let segments = &data.segments[curve.segment_range()];

    let mut last_point = 0;
    for segment in segments {
        last_point = segment.last_point_index();
        if data.points[last_point].time > time {
            return evaluate_segment(
                segment.kind,
                data.bezier,
                data.segment_points(segment),
                time,
            );
        }
    }

    if let (Some(end), Some(first), Some(last)) = (wrap_end, segments.first(), segments.last()) {
        if time < end {
            let from = data.points[last_point];
            let mut to = data.points[first.base_point_index];
            to.time = end;
            return evaluate_wrap(last.kind, from, to, time);
        }
    }

    data.points[last_point].value
}
