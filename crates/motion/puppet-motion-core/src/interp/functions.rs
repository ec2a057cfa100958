//! Segment kernels:
//! - linear_evaluate (clamped lerp on the time axis)
//! - stepped_evaluate / inverse_stepped_evaluate (hold left / jump right)
//! - bezier_* (restricted, bisection and Cardano inversions of the time axis)
//!
//! Every kernel takes the points owned by one segment: 2 for Linear and the
//! stepped kinds, 4 (p0, p1, p2, p3) for Bezier.

use crate::data::MotionPoint;
use crate::interp::roots::cardano_for_bezier;

/// Time tolerance of the bisection solver, in seconds.
pub const BISECTION_TOLERANCE: f32 = 0.01;

/// Iteration cap of the bisection solver.
pub const BISECTION_MAX_ITERATIONS: usize = 20;

/// Component-wise interpolation of two points.
#[inline]
pub fn lerp_points(a: MotionPoint, b: MotionPoint, t: f32) -> MotionPoint {
    MotionPoint {
        time: a.time + (b.time - a.time) * t,
        value: a.value + (b.value - a.value) * t,
    }
}

/// Linear interpolation with the normalized time clamped at the start.
#[inline]
pub fn linear_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    let (p0, p1) = (points[0], points[1]);
    let span = p1.time - p0.time;
    let t = if span > 0.0 {
        ((time - p0.time) / span).max(0.0)
    } else {
        // Zero-length segment: the trailing key is already reached.
        1.0
    };
    p0.value + (p1.value - p0.value) * t
}

/// Hold the leading key until the next one.
#[inline]
pub fn stepped_evaluate(points: &[MotionPoint], _time: f32) -> f32 {
    points[0].value
}

/// Jump to the trailing key as soon as the segment starts.
#[inline]
pub fn inverse_stepped_evaluate(points: &[MotionPoint], _time: f32) -> f32 {
    points[1].value
}

/// Point on the cubic Bezier at parameter `t` (de Casteljau).
#[inline]
pub fn bezier_point(points: &[MotionPoint], t: f32) -> MotionPoint {
    let p01 = lerp_points(points[0], points[1], t);
    let p12 = lerp_points(points[1], points[2], t);
    let p23 = lerp_points(points[2], points[3], t);

    let p012 = lerp_points(p01, p12, t);
    let p123 = lerp_points(p12, p23, t);

    lerp_points(p012, p123, t)
}

/// Restricted Bezier: the parameter is taken to be linear in time.
/// Matches motions authored for runtimes that constrained control handles.
pub fn bezier_restricted_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    let span = points[3].time - points[0].time;
    let t = if span > 0.0 {
        ((time - points[0].time) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    bezier_point(points, t).value
}

/// Find the Bezier parameter whose time coordinate is within
/// [`BISECTION_TOLERANCE`] of `time`, by repeated subdivision of the time
/// polygon.
pub fn bezier_bisection_param(points: &[MotionPoint], time: f32) -> f32 {
    let x = time;
    let mut x1 = points[0].time;
    let mut x2 = points[3].time;
    let mut cx1 = points[1].time;
    let mut cx2 = points[2].time;

    let mut ta = 0.0f32;
    let mut tb = 1.0f32;
    let mut found = None;

    for _ in 0..BISECTION_MAX_ITERATIONS {
        if x < x1 + BISECTION_TOLERANCE {
            found = Some(ta);
            break;
        }
        if x2 - BISECTION_TOLERANCE < x {
            found = Some(tb);
            break;
        }

        let mut center = (cx1 + cx2) * 0.5;
        cx1 = (x1 + cx1) * 0.5;
        cx2 = (x2 + cx2) * 0.5;
        let ctrl12 = (cx1 + center) * 0.5;
        let ctrl21 = (cx2 + center) * 0.5;
        center = (ctrl12 + ctrl21) * 0.5;

        if x < center {
            tb = (ta + tb) * 0.5;
            if center - BISECTION_TOLERANCE < x {
                found = Some(tb);
                break;
            }
            x2 = center;
            cx2 = ctrl12;
        } else {
            ta = (ta + tb) * 0.5;
            if x < center + BISECTION_TOLERANCE {
                found = Some(ta);
                break;
            }
            x1 = center;
            cx1 = ctrl21;
        }
    }

    found.unwrap_or((ta + tb) * 0.5).clamp(0.0, 1.0)
}

pub fn bezier_bisection_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    bezier_point(points, bezier_bisection_param(points, time)).value
}

/// Exact Bezier parameter for `time`, solving the cubic time polynomial in
/// closed form.
pub fn bezier_cardano_param(points: &[MotionPoint], time: f32) -> f32 {
    let x1 = f64::from(points[0].time);
    let cx1 = f64::from(points[1].time);
    let cx2 = f64::from(points[2].time);
    let x2 = f64::from(points[3].time);

    let a = x2 - 3.0 * cx2 + 3.0 * cx1 - x1;
    let b = 3.0 * cx2 - 6.0 * cx1 + 3.0 * x1;
    let c = 3.0 * cx1 - 3.0 * x1;
    let d = x1 - f64::from(time);

    cardano_for_bezier(a, b, c, d) as f32
}

pub fn bezier_cardano_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    bezier_point(points, bezier_cardano_param(points, time)).value
}
