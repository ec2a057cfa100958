//! Core configuration for puppet-motion-core.

use serde::{Deserialize, Serialize};

use crate::interp::BezierEvaluation;
use crate::looping::MotionBehavior;

/// Loader and evaluator defaults.
/// Keep this minimal; assets override most of it through their meta block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loop restart strategy for motions created from this config.
    pub behavior: MotionBehavior,

    /// Fade-in applied when the asset omits one or gives a negative value.
    pub default_fade_in_seconds: f32,
    /// Fade-out applied when the asset omits one or gives a negative value.
    pub default_fade_out_seconds: f32,

    /// Source frame rate used when the asset reports a non-positive fps.
    pub default_fps: f32,

    /// Evaluate every Bezier segment with the restricted (linear time) kernel,
    /// reproducing motions authored for early runtimes.
    pub force_restricted_beziers: bool,

    /// Solver used for unrestricted Bezier segments.
    pub bezier_evaluation: BezierEvaluation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            behavior: MotionBehavior::V2,
            default_fade_in_seconds: 1.0,
            default_fade_out_seconds: 1.0,
            default_fps: 30.0,
            force_restricted_beziers: false,
            bezier_evaluation: BezierEvaluation::Cardano,
        }
    }
}
