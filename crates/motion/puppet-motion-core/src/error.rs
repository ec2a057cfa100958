//! Error types for loading motion data and computing fade weights.

use thiserror::Error;

/// Numeric stand-in for "do not apply this frame" when a fade weight cannot be
/// computed. Hosts that keep a plain `f32` per entry can store this value.
pub const FADE_WEIGHT_UNAVAILABLE: f32 = -1.0;

/// Errors produced by the loader, dataset validation and fade-weight queries.
///
/// Evaluation itself never fails: out-of-range inputs are clamped and unknown
/// parameters are skipped.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MotionError {
    /// The playback entry cannot produce a fade weight (not started, or its
    /// timestamps are not finite).
    #[error("invalid playback entry: {reason}")]
    InvalidEntry { reason: String },

    /// Motion JSON could not be decoded.
    #[error("motion json parse error: {0}")]
    Parse(String),

    /// A curve's segment stream is malformed.
    #[error("invalid segment stream in curve '{curve}': {reason}")]
    InvalidSegment { curve: String, reason: String },

    /// Dataset-level invariants do not hold.
    #[error("invalid motion data: {0}")]
    InvalidData(String),
}

impl MotionError {
    /// Sentinel weight to report alongside this error, if the caller needs one.
    #[inline]
    pub fn fade_weight_sentinel(&self) -> f32 {
        FADE_WEIGHT_UNAVAILABLE
    }
}
