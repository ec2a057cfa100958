//! Loop timing and loop-restart strategies.
//!
//! Looping playback maps the elapsed time into one loop period. When the
//! period is exhausted the entry is restarted according to a
//! [`MotionBehavior`].

use serde::{Deserialize, Serialize};

use crate::entry::PlaybackEntry;

/// Loop restart strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionBehavior {
    /// Legacy restart. Kept for compatibility with content tuned against it;
    /// new motions should use [`MotionBehavior::V2`].
    ///
    /// The period is the raw duration, the start time resets to the current
    /// time (dropping the overshoot) and the finished callback fires on every
    /// loop boundary.
    V1,
    /// The period gains one source frame, the curve tail is bridged back to
    /// its first key, and restarts rebase the start time so the overshoot
    /// carries into the next iteration.
    #[default]
    V2,
}

/// Remapped playback time for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoopTiming {
    /// Seconds since the entry's start time, never negative.
    pub elapsed: f32,
    /// Time used to sample curves (elapsed folded into one period when looping).
    pub time: f32,
    /// Loop period, or the plain duration when not looping.
    pub period: f32,
    /// End of the end→start bridge window, when active.
    pub wrap_end: Option<f32>,
}

impl LoopTiming {
    /// True once the playback has run through its period. Open-ended motions
    /// (non-positive period) never complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.period > 0.0 && self.elapsed >= self.period
    }
}

impl MotionBehavior {
    /// Length of one loop iteration.
    pub fn loop_period(self, duration: f32, fps: f32, looping: bool) -> f32 {
        match self {
            MotionBehavior::V2 if looping && fps > 0.0 => duration + fps.recip(),
            _ => duration,
        }
    }

    /// Compute sampling time for `elapsed` seconds of playback.
    pub fn timing(self, duration: f32, fps: f32, looping: bool, elapsed: f32) -> LoopTiming {
        let elapsed = elapsed.max(0.0);
        let period = self.loop_period(duration, fps, looping);
        let mut time = elapsed;
        if looping && period > 0.0 && time > period {
            time %= period;
            // Exact multiples stay at the end of the period.
            if time == 0.0 {
                time = period;
            }
        }
        let wrap_end =
            (looping && self == MotionBehavior::V2 && period > 0.0).then_some(period);
        LoopTiming {
            elapsed,
            time,
            period,
            wrap_end,
        }
    }

    /// Restart `entry` for the next loop iteration at `now`, where `time` is
    /// the folded sampling time of this frame. Returns true when the finished
    /// callback must fire for this boundary.
    pub fn restart(self, entry: &mut PlaybackEntry, now: f32, time: f32, loop_fade_in: bool) -> bool {
        match self {
            MotionBehavior::V2 => {
                entry.set_start_time(now - time);
                if loop_fade_in {
                    entry.set_fade_in_start_time(now - time);
                }
                false
            }
            MotionBehavior::V1 => {
                entry.set_start_time(now);
                if loop_fade_in {
                    entry.set_fade_in_start_time(now);
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_extends_period_by_one_frame() {
        let period = MotionBehavior::V2.loop_period(2.0, 10.0, true);
        assert!((period - 2.1).abs() < 1e-6);
        assert_eq!(MotionBehavior::V2.loop_period(2.0, 10.0, false), 2.0);
        assert_eq!(MotionBehavior::V1.loop_period(2.0, 10.0, true), 2.0);
    }

    #[test]
    fn timing_folds_into_period() {
        let t = MotionBehavior::V2.timing(2.0, 10.0, true, 2.3);
        assert!((t.time - 0.2).abs() < 1e-5);
        assert!(t.is_complete());
        assert_eq!(t.wrap_end, Some(t.period));

        let t = MotionBehavior::V1.timing(2.0, 10.0, true, 4.0);
        assert_eq!(t.time, 2.0);
        assert_eq!(t.wrap_end, None);

        let t = MotionBehavior::V2.timing(2.0, 10.0, false, 5.0);
        assert_eq!(t.time, 5.0);
        assert!(t.is_complete());
    }

    #[test]
    fn open_ended_never_completes() {
        let t = MotionBehavior::V2.timing(-1.0, 30.0, true, 100.0);
        assert!(!t.is_complete());
        assert_eq!(t.time, 100.0);
        let t = MotionBehavior::V2.timing(0.0, 30.0, false, 100.0);
        assert!(!t.is_complete());
    }

    #[test]
    fn restart_strategies() {
        let mut e = PlaybackEntry::new();
        assert!(!MotionBehavior::V2.restart(&mut e, 5.0, 0.25, true));
        assert_eq!(e.start_time(), 4.75);
        assert_eq!(e.fade_in_start_time(), 4.75);

        let mut e = PlaybackEntry::new();
        e.set_fade_in_start_time(1.0);
        assert!(MotionBehavior::V1.restart(&mut e, 5.0, 0.25, false));
        assert_eq!(e.start_time(), 5.0);
        assert_eq!(e.fade_in_start_time(), 1.0);
    }
}
