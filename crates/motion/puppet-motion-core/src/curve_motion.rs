//! Curve-driven motion: samples every curve of a [`MotionData`] and blends the
//! results into a [`ParameterModel`].
//!
//! Per frame the curves are walked in their stored group order:
//! - Model curves capture the eye-blink and lip-sync signals and drive the
//!   model opacity.
//! - Parameter curves blend into the model, combined with the effect signals
//!   for ids listed as effect targets.
//! - Effect targets not driven by a curve then blend toward the raw signal.
//! - PartOpacity curves are written as-is.

use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::config::Config;
use crate::data::{CurveTarget, MotionData};
use crate::entry::PlaybackEntry;
use crate::error::MotionError;
use crate::fade::{fade_in_factor, fade_out_factor};
use crate::ids::{OverrideMask, EYE_BLINK_ID, LIP_SYNC_ID, MAX_EFFECT_TARGETS, OPACITY_ID};
use crate::looping::MotionBehavior;
use crate::model::ParameterModel;
use crate::motion::{clamp_weight, Motion, MotionLifecycle};
use crate::motion_json::parse_motion_json;
use crate::sampling::evaluate_curve;

/// Reserved curve positions and group boundaries, resolved on first use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct CurveLayout {
    model_end: usize,
    parameter_end: usize,
    eye_blink: Option<usize>,
    lip_sync: Option<usize>,
    opacity: Option<usize>,
}

impl CurveLayout {
    fn resolve(data: &MotionData) -> Self {
        let (model_end, parameter_end) = data.group_bounds();
        let find = |id: &str| data.curves[..model_end].iter().position(|c| c.id == id);
        Self {
            model_end,
            parameter_end,
            eye_blink: find(EYE_BLINK_ID),
            lip_sync: find(LIP_SYNC_ID),
            opacity: find(OPACITY_ID),
        }
    }
}

/// The primary motion evaluator.
#[derive(Debug)]
pub struct CurveMotion {
    data: Arc<MotionData>,
    lifecycle: MotionLifecycle,
    behavior: MotionBehavior,
    last_weight: f32,
    model_opacity: f32,
    eye_blink_ids: Vec<String>,
    lip_sync_ids: Vec<String>,
    layout: OnceCell<CurveLayout>,
}

impl CurveMotion {
    /// Wrap a shared dataset. Fades start unset and looping is off.
    pub fn new(data: Arc<MotionData>) -> Self {
        Self {
            data,
            lifecycle: MotionLifecycle::new(),
            behavior: MotionBehavior::default(),
            last_weight: 0.0,
            model_opacity: 1.0,
            eye_blink_ids: Vec::new(),
            lip_sync_ids: Vec::new(),
            layout: OnceCell::new(),
        }
    }

    /// Load motion JSON and apply its fade times and `config.behavior`.
    pub fn from_json(json: &str, config: &Config) -> Result<Self, MotionError> {
        let asset = parse_motion_json(json, config)?;
        let mut motion = Self::new(Arc::new(asset.data));
        motion.lifecycle.set_fade_in_seconds(asset.fade_in_seconds);
        motion.lifecycle.set_fade_out_seconds(asset.fade_out_seconds);
        motion.behavior = config.behavior;
        Ok(motion)
    }

    #[inline]
    pub fn data(&self) -> &Arc<MotionData> {
        &self.data
    }

    #[inline]
    pub fn behavior(&self) -> MotionBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: MotionBehavior) {
        self.behavior = behavior;
    }

    /// Fade weight applied by the most recent frame.
    #[inline]
    pub fn last_weight(&self) -> f32 {
        self.last_weight
    }

    pub fn eye_blink_ids(&self) -> &[String] {
        &self.eye_blink_ids
    }

    pub fn lip_sync_ids(&self) -> &[String] {
        &self.lip_sync_ids
    }

    /// Replace the parameters driven by the eye-blink and lip-sync signals.
    ///
    /// Only the first [`MAX_EFFECT_TARGETS`] ids of each list can be
    /// suppressed by a parameter curve; the rest always follow the signal.
    pub fn set_effect_ids<I, J, S, T>(&mut self, eye_blink: I, lip_sync: J)
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.eye_blink_ids = eye_blink.into_iter().map(Into::into).collect();
        self.lip_sync_ids = lip_sync.into_iter().map(Into::into).collect();
        if self.eye_blink_ids.len() > MAX_EFFECT_TARGETS {
            log::debug!("too many eye blink targets: {}", self.eye_blink_ids.len());
        }
        if self.lip_sync_ids.len() > MAX_EFFECT_TARGETS {
            log::debug!("too many lip sync targets: {}", self.lip_sync_ids.len());
        }
    }

    /// Per-curve fade-in seconds, or -1 when no curve has `id`.
    pub fn parameter_fade_in_time(&self, id: &str) -> f32 {
        self.data
            .find_curve(id)
            .map_or(-1.0, |i| self.data.curves[i].fade_in_time)
    }

    /// Per-curve fade-out seconds, or -1 when no curve has `id`.
    pub fn parameter_fade_out_time(&self, id: &str) -> f32 {
        self.data
            .find_curve(id)
            .map_or(-1.0, |i| self.data.curves[i].fade_out_time)
    }

    /// Override the fade-in of curve `id`; a negative value restores the
    /// motion-level fade. Returns false when no curve has `id`.
    ///
    /// The dataset is cloned first if another motion shares it.
    pub fn set_parameter_fade_in_time(&mut self, id: &str, seconds: f32) -> bool {
        match self.data.find_curve(id) {
            Some(i) => {
                Arc::make_mut(&mut self.data).curves[i].fade_in_time = seconds;
                true
            }
            None => false,
        }
    }

    /// See [`CurveMotion::set_parameter_fade_in_time`].
    pub fn set_parameter_fade_out_time(&mut self, id: &str, seconds: f32) -> bool {
        match self.data.find_curve(id) {
            Some(i) => {
                Arc::make_mut(&mut self.data).curves[i].fade_out_time = seconds;
                true
            }
            None => false,
        }
    }

    /// Collect events crossed since the entry's last check and advance it.
    pub fn fired_events_for_entry(&self, entry: &mut PlaybackEntry, now: f32) -> Vec<&str> {
        let start = entry.start_time();
        let fired = self.fired_events(entry.last_event_check_time() - start, now - start);
        entry.set_last_event_check_time(now);
        fired
    }

    #[inline]
    fn layout(&self) -> CurveLayout {
        *self.layout.get_or_init(|| CurveLayout::resolve(&self.data))
    }
}

impl Motion for CurveMotion {
    fn lifecycle(&self) -> &MotionLifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut MotionLifecycle {
        &mut self.lifecycle
    }

    /// Open ended (-1) while looping.
    fn duration(&self) -> f32 {
        if self.lifecycle.is_loop() {
            -1.0
        } else {
            self.data.duration
        }
    }

    fn loop_duration(&self) -> f32 {
        self.data.duration
    }

    fn exists_model_opacity(&self) -> bool {
        self.layout().opacity.is_some()
    }

    fn model_opacity_index(&self) -> Option<usize> {
        self.layout().opacity
    }

    fn model_opacity_id(&self, index: usize) -> Option<&str> {
        self.data
            .curves
            .get(index)
            .filter(|c| c.target == CurveTarget::Model && c.id == OPACITY_ID)
            .map(|c| c.id.as_str())
    }

    fn model_opacity_value(&self) -> f32 {
        self.model_opacity
    }

    fn fired_events(&self, before: f32, now: f32) -> Vec<&str> {
        self.data
            .events
            .iter()
            .filter(|e| e.fire_time > before && e.fire_time <= now)
            .map(|e| e.value.as_str())
            .collect()
    }

    fn evaluate(
        &mut self,
        model: &mut dyn ParameterModel,
        current_time: f32,
        fade_weight: f32,
        entry: &mut PlaybackEntry,
    ) {
        if self.lifecycle.take_loop_change() {
            self.adjust_end_time(entry);
        }

        let layout = self.layout();
        let data = &*self.data;
        let lifecycle = &self.lifecycle;
        let is_loop = lifecycle.is_loop();

        let timing = self.behavior.timing(
            data.duration,
            data.fps,
            is_loop,
            current_time - entry.start_time(),
        );
        let time = timing.time;
        let wrap = timing.wrap_end;

        // Model group.
        let eye_blink = layout.eye_blink.map(|c| evaluate_curve(data, c, time, wrap));
        let lip_sync = layout.lip_sync.map(|c| evaluate_curve(data, c, time, wrap));
        if let Some(c) = layout.opacity {
            self.model_opacity = evaluate_curve(data, c, time, wrap);
            model.set_model_opacity(self.model_opacity);
        }

        // Parameter group.
        let fade_in_elapsed = current_time - entry.fade_in_start_time();
        let mut blink_overridden = OverrideMask::new();
        let mut lip_overridden = OverrideMask::new();
        for c in layout.model_end..layout.parameter_end {
            let curve = &data.curves[c];
            let Some(index) = model.parameter_index(&curve.id) else {
                continue;
            };
            let source = model.parameter_value(index);
            let mut value = evaluate_curve(data, c, time, wrap);

            if let Some(blink) = eye_blink {
                if let Some(i) = tracked_position(&self.eye_blink_ids, &curve.id) {
                    value *= blink;
                    blink_overridden.mark(i);
                }
            }
            if let Some(lip) = lip_sync {
                if let Some(i) = tracked_position(&self.lip_sync_ids, &curve.id) {
                    value += lip;
                    lip_overridden.mark(i);
                }
            }

            let weight = if curve.has_own_fade() {
                let fade_in_seconds = if curve.fade_in_time < 0.0 {
                    lifecycle.fade_in_seconds()
                } else {
                    curve.fade_in_time
                };
                let fade_out_seconds = if curve.fade_out_time < 0.0 {
                    lifecycle.fade_out_seconds()
                } else {
                    curve.fade_out_time
                };
                clamp_weight(
                    lifecycle.weight()
                        * fade_in_factor(fade_in_seconds, fade_in_elapsed)
                        * fade_out_factor(fade_out_seconds, entry.end_time(), current_time),
                )
            } else {
                fade_weight
            };

            model.set_parameter_value(index, source + (value - source) * weight);
        }

        // Effect targets left to the signals.
        if let Some(blink) = eye_blink {
            apply_effect(model, &self.eye_blink_ids, blink_overridden, blink, fade_weight);
        }
        if let Some(lip) = lip_sync {
            apply_effect(model, &self.lip_sync_ids, lip_overridden, lip, fade_weight);
        }

        // PartOpacity group.
        for c in layout.parameter_end..data.curves.len() {
            let Some(index) = model.parameter_index(&data.curves[c].id) else {
                continue;
            };
            model.set_parameter_value(index, evaluate_curve(data, c, time, wrap));
        }

        if timing.is_complete() {
            if is_loop {
                let notify =
                    self.behavior
                        .restart(entry, current_time, time, lifecycle.is_loop_fade_in());
                log::debug!(
                    "motion loop restart at {current_time} (start_time {})",
                    entry.start_time()
                );
                if notify {
                    self.lifecycle.notify_finished(current_time);
                }
            } else {
                self.lifecycle.notify_finished(current_time);
                entry.set_finished(true);
            }
        }

        self.last_weight = fade_weight;
    }
}

/// Position of `id` among the suppressible (first 64) effect targets.
#[inline]
fn tracked_position(ids: &[String], id: &str) -> Option<usize> {
    ids.iter().take(MAX_EFFECT_TARGETS).position(|t| t == id)
}

/// Blend every effect target not overridden this frame toward `signal`.
fn apply_effect(
    model: &mut dyn ParameterModel,
    ids: &[String],
    overridden: OverrideMask,
    signal: f32,
    fade_weight: f32,
) {
    for (i, id) in ids.iter().enumerate() {
        if overridden.is_marked(i) {
            continue;
        }
        let Some(index) = model.parameter_index(id) else {
            continue;
        };
        let source = model.parameter_value(index);
        model.set_parameter_value(index, source + (signal - source) * fade_weight);
    }
}
