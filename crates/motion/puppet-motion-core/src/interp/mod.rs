//! Interpolation dispatch.
//!
//! Segments carry a [`SegmentKind`] tag; evaluation goes through a single
//! match instead of per-segment function pointers, so the dataset stays plain
//! data and evaluation never allocates.

pub mod functions;
pub mod roots;

use serde::{Deserialize, Serialize};

use crate::data::{MotionPoint, SegmentKind};
use functions::{
    bezier_bisection_evaluate, bezier_cardano_evaluate, bezier_restricted_evaluate,
    inverse_stepped_evaluate, linear_evaluate, stepped_evaluate,
};

/// How Bezier segments map playback time onto the curve parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BezierEvaluation {
    /// Closed-form cubic root (Cardano / trigonometric).
    #[default]
    Cardano,
    /// Subdivision search, at most 20 steps, 0.01 s tolerance.
    Bisection,
    /// Parameter linear in time; for assets flagged as having restricted handles.
    Restricted,
}

/// Evaluate one segment's points at `time`.
#[inline]
pub fn evaluate_segment(
    kind: SegmentKind,
    bezier: BezierEvaluation,
    points: &[MotionPoint],
    time: f32,
) -> f32 {
    match kind {
        SegmentKind::Linear => linear_evaluate(points, time),
        SegmentKind::Stepped => stepped_evaluate(points, time),
        SegmentKind::InverseStepped => inverse_stepped_evaluate(points, time),
        SegmentKind::Bezier => match bezier {
            BezierEvaluation::Cardano => bezier_cardano_evaluate(points, time),
            BezierEvaluation::Bisection => bezier_bisection_evaluate(points, time),
            BezierEvaluation::Restricted => bezier_restricted_evaluate(points, time),
        },
    }
}

/// Evaluate the synthetic two-point segment that closes a loop (last key back
/// to the first key). Bezier segments are bridged linearly.
#[inline]
pub fn evaluate_wrap(kind: SegmentKind, from: MotionPoint, to: MotionPoint, time: f32) -> f32 {
    let bridge = [from, to];
    match kind {
        SegmentKind::Linear | SegmentKind::Bezier => linear_evaluate(&bridge, time),
        SegmentKind::Stepped => stepped_evaluate(&bridge, time),
        SegmentKind::InverseStepped => inverse_stepped_evaluate(&bridge, time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_bridges_bezier_linearly() {
        let from = MotionPoint::new(2.0, 10.0);
        let to = MotionPoint::new(2.5, 0.0);
        let v = evaluate_wrap(SegmentKind::Bezier, from, to, 2.25);
        assert!((v - 5.0).abs() < 1e-5);
        assert_eq!(evaluate_wrap(SegmentKind::Stepped, from, to, 2.25), 10.0);
        assert_eq!(evaluate_wrap(SegmentKind::InverseStepped, from, to, 2.25), 0.0);
    }

    #[test]
    fn dispatch_selects_bezier_solver() {
        let pts = [
            MotionPoint::new(0.0, 0.0),
            MotionPoint::new(0.1, 1.0),
            MotionPoint::new(0.2, 1.0),
            MotionPoint::new(1.0, 1.0),
        ];
        let cardano = evaluate_segment(SegmentKind::Bezier, BezierEvaluation::Cardano, &pts, 0.5);
        let bisect = evaluate_segment(SegmentKind::Bezier, BezierEvaluation::Bisection, &pts, 0.5);
        let restricted =
            evaluate_segment(SegmentKind::Bezier, BezierEvaluation::Restricted, &pts, 0.5);
        assert!((cardano - bisect).abs() < 0.05, "{cardano} vs {bisect}");
        // Linear-in-time parameterization lags the true curve here.
        assert!(restricted < cardano);
    }
}
