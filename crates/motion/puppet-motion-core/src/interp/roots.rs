//! Closed-form polynomial roots used to invert the time axis of a Bezier segment.
//!
//! Arithmetic runs in f64; callers widen the f32 segment times first.

use std::f64::consts::PI;

const EPSILON: f64 = 1e-5;

/// Newton steps applied to the closed-form root.
const POLISH_ITERATIONS: usize = 16;

/// Root of `a·t² + b·t + c = 0`, preferring one inside `[0, 1]`.
/// Degenerates to the linear (or constant) case when the leading
/// coefficients vanish.
pub fn quadratic_root(a: f64, b: f64, c: f64) -> f64 {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return -c;
        }
        return -c / b;
    }
    let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let r0 = -(b + disc) / (2.0 * a);
    let r1 = (disc - b) / (2.0 * a);
    if (0.0..=1.0).contains(&r0) || !(0.0..=1.0).contains(&r1) {
        r0
    } else {
        r1
    }
}

/// Solve `a·t³ + b·t² + c·t + d = 0` for the Bezier parameter `t`, returning
/// the real root closest to the unit interval, clamped to `[0, 1]`.
///
/// Uses the trigonometric form when three real roots exist and Cardano's
/// formula otherwise, then refines the pick with [`polish_unit_root`].
pub fn cardano_for_bezier(a: f64, b: f64, c: f64, d: f64) -> f64 {
    polish_unit_root(a, b, c, d, closed_form_root(a, b, c, d))
}

fn closed_form_root(a: f64, b: f64, c: f64, d: f64) -> f64 {
    if a.abs() < EPSILON {
        return clamp_unit(quadratic_root(b, c, d));
    }

    let ba = b / a;
    let ca = c / a;
    let da = d / a;

    let p = (3.0 * ca - ba * ba) / 3.0;
    let p3 = p / 3.0;
    let q = (2.0 * ba * ba * ba - 9.0 * ba * ca + 27.0 * da) / 27.0;
    let q2 = q / 2.0;
    let discriminant = q2 * q2 + p3 * p3 * p3;

    let center = 0.5f64;
    let threshold = center + 0.01;
    let shift = ba / 3.0;

    if discriminant < 0.0 {
        let mp3 = -p / 3.0;
        let r = (mp3 * mp3 * mp3).sqrt();
        let cos_phi = (-q / (2.0 * r)).clamp(-1.0, 1.0);
        let phi = cos_phi.acos();
        let t1 = 2.0 * r.cbrt();

        let root1 = t1 * (phi / 3.0).cos() - shift;
        if (root1 - center).abs() < threshold {
            return clamp_unit(root1);
        }
        let root2 = t1 * ((phi + 2.0 * PI) / 3.0).cos() - shift;
        if (root2 - center).abs() < threshold {
            return clamp_unit(root2);
        }
        let root3 = t1 * ((phi + 4.0 * PI) / 3.0).cos() - shift;
        return clamp_unit(root3);
    }

    if discriminant == 0.0 {
        let u1 = if q2 < 0.0 { (-q2).cbrt() } else { -q2.cbrt() };
        let root1 = 2.0 * u1 - shift;
        if (root1 - center).abs() < threshold {
            return clamp_unit(root1);
        }
        return clamp_unit(-u1 - shift);
    }

    let sd = discriminant.sqrt();
    let u1 = (sd - q2).cbrt();
    let v1 = (sd + q2).cbrt();
    clamp_unit(u1 - v1 - shift)
}

/// Newton iteration on `a·t³ + b·t² + c·t + d` starting at `t`, kept inside
/// the sign-change bracket on `[0, 1]`. Steps that leave the bracket or hit a
/// flat derivative fall back to halving it. Without a sign change on the unit
/// interval `t` is returned unchanged.
pub fn polish_unit_root(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let f = |t: f64| ((a * t + b) * t + c) * t + d;
    let (f0, f1) = (f(0.0), f(1.0));
    if f0 == 0.0 {
        return 0.0;
    }
    if f1 == 0.0 {
        return 1.0;
    }
    if f0.signum() == f1.signum() {
        return t;
    }
    let rising = f0 < 0.0;

    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    let mut t = clamp_unit(t);
    for _ in 0..POLISH_ITERATIONS {
        let ft = f(t);
        if ft == 0.0 {
            return t;
        }
        if (ft < 0.0) == rising {
            lo = t;
        } else {
            hi = t;
        }
        let slope = (3.0 * a * t + 2.0 * b) * t + c;
        let next = t - ft / slope;
        let next = if slope.abs() > f64::EPSILON && next > lo && next < hi {
            next
        } else {
            0.5 * (lo + hi)
        };
        if (next - t).abs() < 1e-12 {
            return next;
        }
        t = next;
    }
    t
}

#[inline]
fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
