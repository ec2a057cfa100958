//! Generic per-frame motion driver.
//!
//! [`Motion`] is the capability interface every evaluator implements. The
//! provided [`Motion::update_parameters`] runs the shared part of a frame:
//! entry setup, the motion-level fade weight and end-of-playback detection.
//! Concrete evaluators only supply [`Motion::evaluate`].

use std::fmt;

use crate::entry::PlaybackEntry;
use crate::error::MotionError;
use crate::fade::{fade_in_factor, fade_out_factor};
use crate::model::ParameterModel;

/// Which lifecycle hook fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Began,
    Finished,
}

/// Payload handed to lifecycle callbacks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionNotice {
    pub kind: NoticeKind,
    /// Host time of the driver call that raised the notice.
    pub time: f32,
}

/// Lifecycle hook. Any user data is captured by the closure.
pub type MotionCallback = Box<dyn FnMut(&MotionNotice)>;

/// Where a playback is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionPhase {
    /// Entry not yet picked up by a driver call.
    Pending,
    ActiveNonLooping,
    ActiveLooping,
    Finished,
}

/// Playback settings and hooks shared by every motion kind.
pub struct MotionLifecycle {
    fade_in_seconds: f32,
    fade_out_seconds: f32,
    weight: f32,
    offset_seconds: f32,
    is_loop: bool,
    is_loop_fade_in: bool,
    previous_loop_state: bool,
    began: Option<MotionCallback>,
    finished: Option<MotionCallback>,
}

impl Default for MotionLifecycle {
    fn default() -> Self {
        Self {
            fade_in_seconds: -1.0,
            fade_out_seconds: -1.0,
            weight: 1.0,
            offset_seconds: 0.0,
            is_loop: false,
            is_loop_fade_in: true,
            previous_loop_state: false,
            began: None,
            finished: None,
        }
    }
}

impl fmt::Debug for MotionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionLifecycle")
            .field("fade_in_seconds", &self.fade_in_seconds)
            .field("fade_out_seconds", &self.fade_out_seconds)
            .field("weight", &self.weight)
            .field("offset_seconds", &self.offset_seconds)
            .field("is_loop", &self.is_loop)
            .field("is_loop_fade_in", &self.is_loop_fade_in)
            .field("previous_loop_state", &self.previous_loop_state)
            .field("began", &self.began.is_some())
            .field("finished", &self.finished.is_some())
            .finish()
    }
}

impl MotionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn fade_in_seconds(&self) -> f32 {
        self.fade_in_seconds
    }

    /// Negative or zero disables the fade-in.
    #[inline]
    pub fn set_fade_in_seconds(&mut self, seconds: f32) {
        self.fade_in_seconds = seconds;
    }

    #[inline]
    pub fn fade_out_seconds(&self) -> f32 {
        self.fade_out_seconds
    }

    #[inline]
    pub fn set_fade_out_seconds(&mut self, seconds: f32) {
        self.fade_out_seconds = seconds;
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Stored as given; the fade weight derived from it is clamped.
    #[inline]
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    #[inline]
    pub fn offset_seconds(&self) -> f32 {
        self.offset_seconds
    }

    /// Start playback this many seconds into the motion.
    #[inline]
    pub fn set_offset_seconds(&mut self, seconds: f32) {
        self.offset_seconds = seconds;
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    #[inline]
    pub fn set_loop(&mut self, is_loop: bool) {
        self.is_loop = is_loop;
    }

    #[inline]
    pub fn is_loop_fade_in(&self) -> bool {
        self.is_loop_fade_in
    }

    #[inline]
    pub fn set_loop_fade_in(&mut self, enabled: bool) {
        self.is_loop_fade_in = enabled;
    }

    pub fn set_began_callback(&mut self, callback: impl FnMut(&MotionNotice) + 'static) {
        self.began = Some(Box::new(callback));
    }

    pub fn set_finished_callback(&mut self, callback: impl FnMut(&MotionNotice) + 'static) {
        self.finished = Some(Box::new(callback));
    }

    pub fn clear_callbacks(&mut self) {
        self.began = None;
        self.finished = None;
    }

    pub fn notify_began(&mut self, time: f32) {
        if let Some(cb) = self.began.as_mut() {
            cb(&MotionNotice {
                kind: NoticeKind::Began,
                time,
            });
        }
    }

    pub fn notify_finished(&mut self, time: f32) {
        if let Some(cb) = self.finished.as_mut() {
            cb(&MotionNotice {
                kind: NoticeKind::Finished,
                time,
            });
        }
    }

    /// True once per change of the loop flag since the last call.
    pub fn take_loop_change(&mut self) -> bool {
        if self.is_loop == self.previous_loop_state {
            return false;
        }
        self.previous_loop_state = self.is_loop;
        true
    }
}

/// A motion that can be driven against a [`ParameterModel`].
pub trait Motion {
    fn lifecycle(&self) -> &MotionLifecycle;

    fn lifecycle_mut(&mut self) -> &mut MotionLifecycle;

    /// Write this frame's values into `model`, blending with `fade_weight`.
    fn evaluate(
        &mut self,
        model: &mut dyn ParameterModel,
        current_time: f32,
        fade_weight: f32,
        entry: &mut PlaybackEntry,
    );

    /// Playback length used for the entry's end time; `<= 0` is open ended.
    fn duration(&self) -> f32 {
        -1.0
    }

    /// Length of one loop iteration.
    fn loop_duration(&self) -> f32 {
        -1.0
    }

    fn exists_model_opacity(&self) -> bool {
        false
    }

    fn model_opacity_index(&self) -> Option<usize> {
        None
    }

    fn model_opacity_id(&self, _index: usize) -> Option<&str> {
        None
    }

    fn model_opacity_value(&self) -> f32 {
        1.0
    }

    /// Event payloads with `before < fire_time <= now`, times relative to the
    /// motion start.
    fn fired_events(&self, _before: f32, _now: f32) -> Vec<&str> {
        Vec::new()
    }

    /// Run one frame for `entry` at host time `current_time`.
    fn update_parameters(
        &mut self,
        model: &mut dyn ParameterModel,
        entry: &mut PlaybackEntry,
        current_time: f32,
    ) {
        if !entry.is_available() || entry.is_finished() {
            return;
        }

        self.setup_entry(entry, current_time);

        let fade_weight = match self.update_fade_weight(entry, current_time) {
            Ok(weight) => weight,
            Err(err) => {
                log::warn!("skipping motion frame at {current_time}: {err}");
                return;
            }
        };

        self.evaluate(model, current_time, fade_weight, entry);

        if entry.end_time() > 0.0 && entry.end_time() < current_time {
            entry.set_finished(true);
        }
    }

    /// Start `entry` on its first driver call and fire the began hook.
    fn setup_entry(&mut self, entry: &mut PlaybackEntry, current_time: f32) {
        if !entry.is_available() || entry.is_started() {
            return;
        }
        entry.set_started(true);
        entry.set_start_time(current_time - self.lifecycle().offset_seconds());
        entry.set_fade_in_start_time(current_time);
        if entry.end_time() < 0.0 {
            self.adjust_end_time(entry);
        }
        self.lifecycle_mut().notify_began(current_time);
    }

    /// Motion-level fade weight, clamped to `[0, 1]` and cached on the entry.
    fn update_fade_weight(
        &self,
        entry: &mut PlaybackEntry,
        current_time: f32,
    ) -> Result<f32, MotionError> {
        if !entry.is_started() {
            return Err(MotionError::InvalidEntry {
                reason: "entry has not been started".into(),
            });
        }
        if !(current_time.is_finite()
            && entry.start_time().is_finite()
            && entry.fade_in_start_time().is_finite()
            && entry.end_time().is_finite())
        {
            return Err(MotionError::InvalidEntry {
                reason: "non-finite playback timestamps".into(),
            });
        }

        let lifecycle = self.lifecycle();
        let fade_in = fade_in_factor(
            lifecycle.fade_in_seconds(),
            current_time - entry.fade_in_start_time(),
        );
        let fade_out = fade_out_factor(lifecycle.fade_out_seconds(), entry.end_time(), current_time);
        let weight = clamp_weight(lifecycle.weight() * fade_in * fade_out);
        entry.set_state(current_time, weight);
        Ok(weight)
    }

    /// Derive the entry's end time from [`Motion::duration`].
    fn adjust_end_time(&self, entry: &mut PlaybackEntry) {
        let duration = self.duration();
        let end_time = if duration <= 0.0 {
            -1.0
        } else {
            entry.start_time() + duration
        };
        entry.set_end_time(end_time);
    }

    fn phase(&self, entry: &PlaybackEntry) -> MotionPhase {
        if entry.is_finished() {
            MotionPhase::Finished
        } else if !entry.is_started() {
            MotionPhase::Pending
        } else if self.lifecycle().is_loop() {
            MotionPhase::ActiveLooping
        } else {
            MotionPhase::ActiveNonLooping
        }
    }
}

/// Clamp a blend weight into `[0, 1]`; NaN maps to 0.
#[inline]
pub(crate) fn clamp_weight(weight: f32) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}
