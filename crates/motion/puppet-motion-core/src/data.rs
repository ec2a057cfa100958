//! Canonical motion data model: points, segments, curves and events.
//!
//! A [`MotionData`] is immutable once built. Curves reference a contiguous run
//! of segments, and segments reference a contiguous run of points where the
//! trailing point of one segment is the leading point of the next.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::interp::BezierEvaluation;

/// One control point of a curve (seconds, parameter value).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionPoint {
    pub time: f32,
    pub value: f32,
}

impl MotionPoint {
    #[inline]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Interpolation used between the points owned by a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Linear,
    Bezier,
    Stepped,
    InverseStepped,
}

impl SegmentKind {
    /// Offset from the segment's base point to its trailing point.
    #[inline]
    pub fn point_span(self) -> usize {
        match self {
            SegmentKind::Bezier => 3,
            SegmentKind::Linear | SegmentKind::Stepped | SegmentKind::InverseStepped => 1,
        }
    }

    /// Decode the numeric segment code used by flattened segment streams.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SegmentKind::Linear),
            1 => Some(SegmentKind::Bezier),
            2 => Some(SegmentKind::Stepped),
            3 => Some(SegmentKind::InverseStepped),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> i32 {
        match self {
            SegmentKind::Linear => 0,
            SegmentKind::Bezier => 1,
            SegmentKind::Stepped => 2,
            SegmentKind::InverseStepped => 3,
        }
    }
}

/// A segment: interpolation kind plus the index of its first point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub base_point_index: usize,
}

impl Segment {
    #[inline]
    pub fn last_point_index(&self) -> usize {
        self.base_point_index + self.kind.point_span()
    }

    /// The 2 (or 4 for Bezier) points owned by this segment.
    #[inline]
    pub fn points<'a>(&self, points: &'a [MotionPoint]) -> &'a [MotionPoint] {
        &points[self.base_point_index..=self.last_point_index()]
    }
}

/// What a curve drives. Declaration order is the evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurveTarget {
    Model,
    Parameter,
    PartOpacity,
}

impl CurveTarget {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Model" => Some(CurveTarget::Model),
            "Parameter" => Some(CurveTarget::Parameter),
            "PartOpacity" => Some(CurveTarget::PartOpacity),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveTarget::Model => "Model",
            CurveTarget::Parameter => "Parameter",
            CurveTarget::PartOpacity => "PartOpacity",
        }
    }
}

/// A single value-over-time function bound to one identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub target: CurveTarget,
    pub id: String,
    pub base_segment_index: usize,
    pub segment_count: usize,
    /// Per-curve fade-in seconds; negative means "use the motion fade".
    pub fade_in_time: f32,
    /// Per-curve fade-out seconds; negative means "use the motion fade".
    pub fade_out_time: f32,
}

impl Curve {
    /// True when either per-curve fade time is set.
    #[inline]
    pub fn has_own_fade(&self) -> bool {
        self.fade_in_time >= 0.0 || self.fade_out_time >= 0.0
    }

    #[inline]
    pub fn segment_range(&self) -> std::ops::Range<usize> {
        self.base_segment_index..self.base_segment_index + self.segment_count
    }
}

/// A user-data event fired when playback crosses `fire_time`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionEvent {
    pub fire_time: f32,
    pub value: String,
}

/// Fully decoded motion: all curves, segments, points and events of one asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionData {
    pub curves: Vec<Curve>,
    pub segments: Vec<Segment>,
    pub points: Vec<MotionPoint>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
    /// Source length in seconds; `<= 0` means the motion has no natural end.
    pub duration: f32,
    /// Source sample rate; only used to extend the loop period by one frame.
    pub fps: f32,
    /// Authoring hint only; runtime looping is controlled per motion.
    #[serde(rename = "loop", default)]
    pub loop_hint: bool,
    /// Kernel used for Bezier segments of this motion.
    #[serde(default)]
    pub bezier: BezierEvaluation,
}

impl MotionData {
    pub fn builder(duration: f32, fps: f32) -> MotionDataBuilder {
        MotionDataBuilder::new(duration, fps)
    }

    /// Points owned by `segment`.
    #[inline]
    pub fn segment_points(&self, segment: &Segment) -> &[MotionPoint] {
        segment.points(&self.points)
    }

    /// Index of the first curve whose id matches.
    pub fn find_curve(&self, id: &str) -> Option<usize> {
        self.curves.iter().position(|c| c.id == id)
    }

    /// Exclusive end indices of the Model and Parameter groups.
    ///
    /// Curves are grouped by target, so each boundary is the first curve whose
    /// target differs from the group being scanned.
    pub fn group_bounds(&self) -> (usize, usize) {
        let model_end = self
            .curves
            .iter()
            .take_while(|c| c.target == CurveTarget::Model)
            .count();
        let parameter_end = model_end
            + self.curves[model_end..]
                .iter()
                .take_while(|c| c.target == CurveTarget::Parameter)
                .count();
        (model_end, parameter_end)
    }

    /// Validate structural invariants the evaluator relies on.
    pub fn validate_basic(&self) -> Result<(), MotionError> {
        if !self.duration.is_finite() {
            return Err(MotionError::InvalidData("duration must be finite".into()));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(MotionError::InvalidData(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if let Some(p) = self
            .points
            .iter()
            .find(|p| !p.time.is_finite() || !p.value.is_finite())
        {
            return Err(MotionError::InvalidData(format!(
                "non-finite point ({}, {})",
                p.time, p.value
            )));
        }

        let mut last_target = CurveTarget::Model;
        for curve in &self.curves {
            if curve.target < last_target {
                return Err(MotionError::InvalidData(format!(
                    "curve '{}' ({}) is out of Model/Parameter/PartOpacity order",
                    curve.id,
                    curve.target.name()
                )));
            }
            last_target = curve.target;

            if curve.segment_count == 0 {
                return Err(MotionError::InvalidSegment {
                    curve: curve.id.clone(),
                    reason: "curve has no segments".into(),
                });
            }
            if curve.base_segment_index + curve.segment_count > self.segments.len() {
                return Err(MotionError::InvalidSegment {
                    curve: curve.id.clone(),
                    reason: "segment range exceeds segment table".into(),
                });
            }

            let mut expected_base: Option<usize> = None;
            for segment in &self.segments[curve.segment_range()] {
                if segment.last_point_index() >= self.points.len() {
                    return Err(MotionError::InvalidSegment {
                        curve: curve.id.clone(),
                        reason: "segment points exceed point table".into(),
                    });
                }
                if let Some(base) = expected_base {
                    if segment.base_point_index != base {
                        return Err(MotionError::InvalidSegment {
                            curve: curve.id.clone(),
                            reason: "segments do not share boundary points".into(),
                        });
                    }
                }
                expected_base = Some(segment.last_point_index());
            }
        }
        Ok(())
    }
}

/// Incremental builder that follows the flattened segment stream layout:
/// a curve starts with one point, then each segment appends its remaining
/// points.
#[derive(Debug)]
pub struct MotionDataBuilder {
    duration: f32,
    fps: f32,
    loop_hint: bool,
    bezier: BezierEvaluation,
    curves: Vec<Curve>,
    segments: Vec<Segment>,
    points: Vec<MotionPoint>,
    events: Vec<MotionEvent>,
    started: bool,
    error: Option<MotionError>,
}

impl MotionDataBuilder {
    pub fn new(duration: f32, fps: f32) -> Self {
        Self {
            duration,
            fps,
            loop_hint: false,
            bezier: BezierEvaluation::default(),
            curves: Vec::new(),
            segments: Vec::new(),
            points: Vec::new(),
            events: Vec::new(),
            started: false,
            error: None,
        }
    }

    pub fn loop_hint(mut self, loop_hint: bool) -> Self {
        self.loop_hint = loop_hint;
        self
    }

    pub fn bezier_evaluation(mut self, bezier: BezierEvaluation) -> Self {
        self.bezier = bezier;
        self
    }

    /// Open a new curve; following point/segment calls append to it.
    pub fn curve(mut self, target: CurveTarget, id: impl Into<String>) -> Self {
        self.curves.push(Curve {
            target,
            id: id.into(),
            base_segment_index: self.segments.len(),
            segment_count: 0,
            fade_in_time: -1.0,
            fade_out_time: -1.0,
        });
        self.started = false;
        self
    }

    pub fn model_curve(self, id: impl Into<String>) -> Self {
        self.curve(CurveTarget::Model, id)
    }

    pub fn parameter_curve(self, id: impl Into<String>) -> Self {
        self.curve(CurveTarget::Parameter, id)
    }

    pub fn part_opacity_curve(self, id: impl Into<String>) -> Self {
        self.curve(CurveTarget::PartOpacity, id)
    }

    pub fn fade_in(mut self, seconds: f32) -> Self {
        match self.curves.last_mut() {
            Some(curve) => curve.fade_in_time = seconds,
            None => self.fail_global("fade_in before any curve"),
        }
        self
    }

    pub fn fade_out(mut self, seconds: f32) -> Self {
        match self.curves.last_mut() {
            Some(curve) => curve.fade_out_time = seconds,
            None => self.fail_global("fade_out before any curve"),
        }
        self
    }

    /// First point of the open curve.
    pub fn start(mut self, time: f32, value: f32) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.curves.is_empty() {
            self.fail_global("start point before any curve");
        } else if self.started {
            self.fail_curve("start point given twice");
        } else {
            self.points.push(MotionPoint::new(time, value));
            self.started = true;
        }
        self
    }

    pub fn linear(self, time: f32, value: f32) -> Self {
        self.push_segment(SegmentKind::Linear, &[MotionPoint::new(time, value)])
    }

    pub fn stepped(self, time: f32, value: f32) -> Self {
        self.push_segment(SegmentKind::Stepped, &[MotionPoint::new(time, value)])
    }

    pub fn inverse_stepped(self, time: f32, value: f32) -> Self {
        self.push_segment(
            SegmentKind::InverseStepped,
            &[MotionPoint::new(time, value)],
        )
    }

    /// Cubic Bezier segment: two control points then the end point, each `(time, value)`.
    pub fn bezier(self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) -> Self {
        self.push_segment(
            SegmentKind::Bezier,
            &[
                MotionPoint::new(c1.0, c1.1),
                MotionPoint::new(c2.0, c2.1),
                MotionPoint::new(end.0, end.1),
            ],
        )
    }

    pub fn event(mut self, fire_time: f32, value: impl Into<String>) -> Self {
        self.events.push(MotionEvent {
            fire_time,
            value: value.into(),
        });
        self
    }

    /// Finish building: group curves Model → Parameter → PartOpacity and validate.
    pub fn build(self) -> Result<MotionData, MotionError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut curves = self.curves;
        // Stable: authoring order is kept within each target group.
        curves.sort_by_key(|c| c.target);

        let data = MotionData {
            curves,
            segments: self.segments,
            points: self.points,
            events: self.events,
            duration: self.duration,
            fps: self.fps,
            loop_hint: self.loop_hint,
            bezier: self.bezier,
        };
        data.validate_basic()?;
        Ok(data)
    }

    fn push_segment(mut self, kind: SegmentKind, tail: &[MotionPoint]) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.curves.is_empty() {
            self.fail_global("segment before any curve");
            return self;
        }
        if !self.started {
            self.fail_curve("segment without a start point");
            return self;
        }
        debug_assert_eq!(tail.len(), kind.point_span());
        self.segments.push(Segment {
            kind,
            base_point_index: self.points.len() - 1,
        });
        self.points.extend_from_slice(tail);
        if let Some(curve) = self.curves.last_mut() {
            curve.segment_count += 1;
        }
        self
    }

    fn fail_curve(&mut self, reason: &str) {
        if self.error.is_none() {
            let curve = self
                .curves
                .last()
                .map(|c| c.id.clone())
                .unwrap_or_default();
            self.error = Some(MotionError::InvalidSegment {
                curve,
                reason: reason.to_string(),
            });
        }
    }

    fn fail_global(&mut self, reason: &str) {
        if self.error.is_none() {
            self.error = Some(MotionError::InvalidData(reason.to_string()));
        }
    }
}
