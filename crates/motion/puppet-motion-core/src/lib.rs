//! Puppet Motion Core (engine-agnostic)
//!
//! Evaluates keyframed motion curves and blends them onto a posable model
//! once per frame. Hosts own the playback queue and the clock; this crate
//! supplies the datasets, the per-frame driver and the curve evaluator.

pub mod config;
pub mod curve_motion;
pub mod data;
pub mod entry;
pub mod error;
pub mod fade;
pub mod ids;
pub mod interp;
pub mod looping;
pub mod model;
pub mod motion;
pub mod motion_json;
pub mod sampling;

// Re-exports for hosts
pub use config::Config;
pub use curve_motion::CurveMotion;
pub use data::{
    Curve, CurveTarget, MotionData, MotionDataBuilder, MotionEvent, MotionPoint, Segment,
    SegmentKind,
};
pub use entry::PlaybackEntry;
pub use error::{MotionError, FADE_WEIGHT_UNAVAILABLE};
pub use ids::{EYE_BLINK_ID, LIP_SYNC_ID, MAX_EFFECT_TARGETS, OPACITY_ID};
pub use interp::BezierEvaluation;
pub use looping::MotionBehavior;
pub use model::{ParameterModel, ParameterTable};
pub use motion::{Motion, MotionCallback, MotionLifecycle, MotionNotice, MotionPhase, NoticeKind};
pub use motion_json::{parse_motion_json, MotionAsset};
pub use sampling::evaluate_curve;
