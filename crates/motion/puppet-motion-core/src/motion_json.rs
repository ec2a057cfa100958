//! Motion JSON loader.
//!
//! Reads the `Meta` / `Curves` / `UserData` layout produced by the authoring
//! tools and builds a validated [`MotionData`] through [`MotionDataBuilder`].
//! Each curve's `Segments` array is a flat number stream: the first key as
//! `time, value`, then per segment a type code followed by its remaining
//! points (`0` linear, `1` bezier with two control points, `2` stepped,
//! `3` inverse stepped).

use serde::Deserialize;

use crate::config::Config;
use crate::data::{CurveTarget, MotionData, MotionDataBuilder, SegmentKind};
use crate::error::MotionError;
use crate::interp::BezierEvaluation;

/// A loaded motion: shared curve data plus the motion-level fade times.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionAsset {
    pub data: MotionData,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MotionJson {
    meta: MetaJson,
    #[serde(default)]
    curves: Vec<CurveJson>,
    #[serde(default)]
    user_data: Vec<UserDataJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MetaJson {
    duration: f32,
    #[serde(default)]
    fps: f32,
    #[serde(default)]
    r#loop: bool,
    #[serde(default)]
    are_beziers_restricted: bool,
    #[serde(default)]
    curve_count: Option<usize>,
    #[serde(default)]
    user_data_count: Option<usize>,
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurveJson {
    target: String,
    id: String,
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
    segments: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserDataJson {
    time: f32,
    value: String,
}

/// Parse motion JSON into a [`MotionAsset`].
///
/// Missing or negative motion fade times fall back to the config defaults,
/// and a non-positive fps to `config.default_fps`. Curves with an unknown
/// target are skipped with a warning.
pub fn parse_motion_json(s: &str, config: &Config) -> Result<MotionAsset, MotionError> {
    let json: MotionJson =
        serde_json::from_str(s).map_err(|e| MotionError::Parse(e.to_string()))?;
    let meta = &json.meta;

    if let Some(count) = meta.curve_count {
        if count != json.curves.len() {
            log::warn!(
                "motion json declares {count} curves but contains {}",
                json.curves.len()
            );
        }
    }
    if let Some(count) = meta.user_data_count {
        if count != json.user_data.len() {
            log::warn!(
                "motion json declares {count} user data entries but contains {}",
                json.user_data.len()
            );
        }
    }

    let fps = if meta.fps > 0.0 { meta.fps } else { config.default_fps };
    let bezier = if meta.are_beziers_restricted || config.force_restricted_beziers {
        BezierEvaluation::Restricted
    } else {
        config.bezier_evaluation
    };

    let mut builder = MotionData::builder(meta.duration, fps)
        .loop_hint(meta.r#loop)
        .bezier_evaluation(bezier);

    for curve in &json.curves {
        let Some(target) = CurveTarget::from_name(&curve.target) else {
            log::warn!(
                "skipping curve '{}' with unknown target '{}'",
                curve.id,
                curve.target
            );
            continue;
        };
        builder = builder.curve(target, curve.id.as_str());
        if let Some(t) = curve.fade_in_time {
            builder = builder.fade_in(t);
        }
        if let Some(t) = curve.fade_out_time {
            builder = builder.fade_out(t);
        }
        builder = push_segments(builder, &curve.id, &curve.segments)?;
    }

    for event in &json.user_data {
        builder = builder.event(event.time, event.value.as_str());
    }

    Ok(MotionAsset {
        data: builder.build()?,
        fade_in_seconds: fade_or_default(meta.fade_in_time, config.default_fade_in_seconds),
        fade_out_seconds: fade_or_default(meta.fade_out_time, config.default_fade_out_seconds),
    })
}

fn fade_or_default(value: Option<f32>, default: f32) -> f32 {
    match value {
        Some(v) if v >= 0.0 => v,
        _ => default,
    }
}

/// Decode one curve's flat segment stream into builder calls.
fn push_segments(
    mut builder: MotionDataBuilder,
    curve: &str,
    stream: &[f32],
) -> Result<MotionDataBuilder, MotionError> {
    let malformed = |reason: String| MotionError::InvalidSegment {
        curve: curve.to_string(),
        reason,
    };

    let [t0, v0, rest @ ..] = stream else {
        return Err(malformed("segment stream has no start point".into()));
    };
    builder = builder.start(*t0, *v0);

    let mut rest = rest;
    while let Some((&code, tail)) = rest.split_first() {
        let kind = SegmentKind::from_code(code as i32)
            .ok_or_else(|| malformed(format!("unknown segment type {code}")))?;
        let needed = kind.point_span() * 2;
        if tail.len() < needed {
            return Err(malformed(format!(
                "{kind:?} segment needs {needed} values, {} left",
                tail.len()
            )));
        }
        let p = &tail[..needed];
        builder = match kind {
            SegmentKind::Linear => builder.linear(p[0], p[1]),
            SegmentKind::Stepped => builder.stepped(p[0], p[1]),
            SegmentKind::InverseStepped => builder.inverse_stepped(p[0], p[1]),
            SegmentKind::Bezier => builder.bezier((p[0], p[1]), (p[2], p[3]), (p[4], p[5])),
        };
        rest = &tail[needed..];
    }
    Ok(builder)
}
