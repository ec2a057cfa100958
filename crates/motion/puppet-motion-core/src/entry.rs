//! Per-playback bookkeeping owned by the host's playback queue.
//!
//! The engine reads and writes these fields during a driver call; it never
//! stores a reference to an entry between frames. One motion can drive any
//! number of entries.

use serde::{Deserialize, Serialize};

/// Lifecycle flags and timestamps of one playback of a motion.
///
/// Timestamps live in the host's clock domain (seconds). `end_time < 0` means
/// the playback is open ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackEntry {
    available: bool,
    started: bool,
    finished: bool,
    triggered_fade_out: bool,
    start_time: f32,
    fade_in_start_time: f32,
    end_time: f32,
    state_time: f32,
    state_weight: f32,
    last_event_check_time: f32,
}

impl Default for PlaybackEntry {
    fn default() -> Self {
        Self {
            available: true,
            started: false,
            finished: false,
            triggered_fade_out: false,
            start_time: -1.0,
            fade_in_start_time: 0.0,
            end_time: -1.0,
            state_time: 0.0,
            state_weight: 0.0,
            last_event_check_time: 0.0,
        }
    }
}

impl PlaybackEntry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Clearing availability stops the playback; the driver ignores the entry.
    #[inline]
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn set_started(&mut self, started: bool) {
        self.started = started;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    #[inline]
    pub fn is_triggered_fade_out(&self) -> bool {
        self.triggered_fade_out
    }

    #[inline]
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    #[inline]
    pub fn set_start_time(&mut self, time: f32) {
        self.start_time = time;
    }

    #[inline]
    pub fn fade_in_start_time(&self) -> f32 {
        self.fade_in_start_time
    }

    #[inline]
    pub fn set_fade_in_start_time(&mut self, time: f32) {
        self.fade_in_start_time = time;
    }

    #[inline]
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    #[inline]
    pub fn set_end_time(&mut self, time: f32) {
        self.end_time = time;
    }

    /// Record the time and fade weight applied by the last driver call.
    #[inline]
    pub fn set_state(&mut self, time: f32, weight: f32) {
        self.state_time = time;
        self.state_weight = weight;
    }

    #[inline]
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    #[inline]
    pub fn state_weight(&self) -> f32 {
        self.state_weight
    }

    #[inline]
    pub fn last_event_check_time(&self) -> f32 {
        self.last_event_check_time
    }

    #[inline]
    pub fn set_last_event_check_time(&mut self, time: f32) {
        self.last_event_check_time = time;
    }

    /// Begin fading out: the playback now ends `fade_out_seconds` after `now`,
    /// unless it was already due to end earlier.
    pub fn start_fade_out(&mut self, fade_out_seconds: f32, now: f32) {
        let new_end = now + fade_out_seconds.max(0.0);
        self.triggered_fade_out = true;
        if self.end_time < 0.0 || new_end < self.end_time {
            self.end_time = new_end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_available_and_unstarted() {
        let e = PlaybackEntry::new();
        assert!(e.is_available());
        assert!(!e.is_started());
        assert!(!e.is_finished());
        assert_eq!(e.end_time(), -1.0);
        assert_eq!(e.start_time(), -1.0);
    }

    #[test]
    fn start_fade_out_only_shortens() {
        let mut e = PlaybackEntry::new();
        e.start_fade_out(0.5, 1.0);
        assert_eq!(e.end_time(), 1.5);
        assert!(e.is_triggered_fade_out());

        e.start_fade_out(2.0, 1.2);
        assert_eq!(e.end_time(), 1.5);

        e.start_fade_out(0.1, 1.2);
        assert!((e.end_time() - 1.3).abs() < 1e-6);
    }
}
