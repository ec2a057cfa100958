//! Fade envelopes shared by the motion-level and per-parameter weights.

use std::f32::consts::FRAC_PI_2;

/// Sine ease-out over `[0, 1]`; inputs outside the range are clamped first so
/// the result always lies in `[0, 1]`.
#[inline]
pub fn easing_sine(x: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    (x.clamp(0.0, 1.0) * FRAC_PI_2).sin().clamp(0.0, 1.0)
}

/// Fade-in factor `elapsed` seconds after the fade started. A non-positive
/// fade duration means the motion is fully faded in immediately.
#[inline]
pub fn fade_in_factor(fade_seconds: f32, elapsed: f32) -> f32 {
    if fade_seconds <= 0.0 {
        1.0
    } else {
        easing_sine(elapsed / fade_seconds)
    }
}

/// Fade-out factor at `now` for a playback ending at `end_time`. An open end
/// (`end_time < 0`) or non-positive duration never fades out.
#[inline]
pub fn fade_out_factor(fade_seconds: f32, end_time: f32, now: f32) -> f32 {
    if fade_seconds <= 0.0 || end_time < 0.0 {
        1.0
    } else {
        easing_sine((end_time - now) / fade_seconds)
    }
}
