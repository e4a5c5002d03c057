//! Integer shaping library
//!
//! Pure, stateless functions used by the mixer pipeline and the role sources:
//! - Rate/expo response curve
//! - Differential (asymmetric travel)
//! - Weight and offset
//! - Linear and monotone cubic Hermite interpolation over curve points
//! - Slew-rate limiting
//!
//! # Design
//!
//! No floating point. Intermediates are widened to `i64` where a product can
//! exceed `i32`, and results are saturated instead of wrapped. Degenerate
//! inputs (empty point sets, zero divisors, zero durations) produce a clamped
//! or non-moving result rather than a fault.
//!
//! ## References
//!
//! - https://en.wikipedia.org/wiki/Cubic_Hermite_spline
//! - https://en.wikipedia.org/wiki/Monotone_cubic_interpolation

use crate::limits::{FULL_SCALE, LOOP_TIME_MS, PERCENT_SCALE};

/// Fixed-point factor used by the Hermite spline
const HERMITE_SCALE: i64 = 1024;

/// Integer division rounding to the nearest integer
///
/// Halves round away from zero. Returns 0 when `d` is 0.
///
/// # Arguments
///
/// * `n` - Numerator
/// * `d` - Denominator
///
/// # Returns
///
/// `n / d` rounded to the closest integer
pub fn div_round_closest(n: i32, d: i32) -> i32 {
    if d == 0 {
        return 0;
    }
    let (n, d) = (n as i64, d as i64);
    let q = if (n < 0) ^ (d < 0) {
        (n - d / 2) / d
    } else {
        (n + d / 2) / d
    };
    clamp_i32(q)
}

/// Expo response curve
///
/// Cubic approximation `y = k*x^3 + (1-k)*x` scaled to the internal range.
/// Positive `expo` softens the center, negative `expo` sharpens it. The curve
/// passes through 0 and ±500 for every `expo`.
///
/// # Arguments
///
/// * `input` - Value in -500..=500
/// * `expo` - Expo percentage, -100..=100 (0 is linear)
pub fn expo(input: i16, expo: i8) -> i16 {
    if expo == 0 {
        return input;
    }

    let full = FULL_SCALE as i64;
    let k = (expo as i64).abs().min(100);
    let mut x = (input as i64).abs().min(full);
    if expo < 0 {
        x -= full;
    }

    let mut y = (k * x * x + full * full * (100 - k)) * x / (full * full * 100);

    if expo < 0 {
        y += full;
    }
    if input < 0 {
        y = -y;
    }
    y as i16
}

/// Rate followed by expo, as used for dual-rate role sources
///
/// # Arguments
///
/// * `input` - Value in -500..=500
/// * `rate` - Rate percentage, 0..=100
/// * `expo` - Expo percentage, -100..=100
pub fn rate_expo(input: i16, rate: i8, expo_pct: i8) -> i16 {
    clamp_i16(rate as i32 * expo(input, expo_pct) as i32 / 100)
}

/// Differential: scales down one half of the travel
///
/// Positive `diff` reduces negative travel, negative `diff` reduces positive
/// travel. `diff == 0` is the identity.
pub fn differential(input: i16, diff: i8) -> i16 {
    let diff = (diff as i32).clamp(-100, 100);
    let value = input as i32;
    let out = if diff > 0 && value < 0 {
        value * (100 - diff) / 100
    } else if diff < 0 && value > 0 {
        value * (100 + diff) / 100
    } else {
        value
    };
    clamp_i16(out)
}

/// `input * weight / 100 + offset`, with the offset given in percent
///
/// Saturates to the `i16` range. Monotonic in `input` for `weight > 0`,
/// antitonic for `weight < 0`, constant for `weight == 0`.
pub fn weight_and_offset(input: i16, weight: i8, offset: i8) -> i16 {
    let scaled = input as i32 * weight as i32 / 100;
    clamp_i16(scaled + offset as i32 * PERCENT_SCALE)
}

/// Piecewise-linear lookup
///
/// `xs` must be ascending. Outside `[xs[0], xs[n-1]]` the nearest endpoint `y`
/// is returned. A vertical segment (two equal `x`) resolves to its left value
/// when `x` lies in the left half of the overall span and to its right value
/// otherwise.
///
/// # Arguments
///
/// * `xs` - Ascending x coordinates
/// * `ys` - y coordinates (same length as `xs`; extra entries are ignored)
/// * `x` - Lookup position
///
/// # Returns
///
/// Interpolated y. With no points the input is returned unchanged.
pub fn linear_interpolate(xs: &[i16], ys: &[i16], x: i16) -> i16 {
    interpolate(xs, ys, x, |_, _, i, x| {
        let (x0, x1) = (xs[i] as i64, xs[i + 1] as i64);
        let (y0, y1) = (ys[i] as i64, ys[i + 1] as i64);
        let x = x as i64;
        ((x - x0) * (y1 - y0) + y0 * (x1 - x0)) / (x1 - x0)
    })
}

/// Monotone cubic Hermite spline lookup
///
/// Same range and vertical-segment rules as [`linear_interpolate`]. Interior
/// tangents are the mean of the adjacent secants, zeroed when the secants
/// disagree in sign (or either is flat) and otherwise clamped to three times
/// the adjacent secants, so a segment never overshoots its end points.
/// Endpoint tangents are the one-sided secants.
pub fn cubic_hermite_interpolate(xs: &[i16], ys: &[i16], x: i16) -> i16 {
    interpolate(xs, ys, x, |xs, ys, i, x| {
        let m = HERMITE_SCALE;
        let (x0, x1) = (xs[i] as i64, xs[i + 1] as i64);
        let (y0, y1) = (ys[i] as i64, ys[i + 1] as i64);
        let dx = x1 - x0;

        let t = m * (x as i64 - x0) / dx;
        let t2 = t * t / m;
        let t3 = t2 * t / m;

        let h00 = 2 * t3 - 3 * t2 + m;
        let h10 = t3 - 2 * t2 + t;
        let h01 = -2 * t3 + 3 * t2;
        let h11 = t3 - t2;

        let m0 = tangent(xs, ys, i);
        let m1 = tangent(xs, ys, i + 1);

        (h00 * y0 + (h10 * m0 / m) * dx + h01 * y1 + (h11 * m1 / m) * dx) / m
    })
}

/// Shared range handling and segment scan for both interpolators.
fn interpolate<F>(xs: &[i16], ys: &[i16], x: i16, segment: F) -> i16
where
    F: Fn(&[i16], &[i16], usize, i16) -> i64,
{
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    match n {
        0 => return x,
        1 => return ys[0],
        _ => {}
    }

    if x < xs[0] {
        return ys[0];
    }
    if x > xs[n - 1] {
        return ys[n - 1];
    }

    let x_mid = (xs[0] as i32 + xs[n - 1] as i32) / 2;
    let mut y = ys[0] as i64;
    for i in 0..n - 1 {
        if x < xs[i] || x > xs[i + 1] {
            continue;
        }
        y = if xs[i] == xs[i + 1] {
            if (x as i32) <= x_mid {
                ys[i] as i64
            } else {
                ys[i + 1] as i64
            }
        } else {
            segment(xs, ys, i, x)
        };
        // Points past the midpoint keep scanning so the right-hand segment wins
        if (x as i32) <= x_mid {
            break;
        }
    }
    clamp_i16(clamp_i32(y))
}

/// Secant slope between points `a` and `b`, in `HERMITE_SCALE` units.
fn secant(xs: &[i16], ys: &[i16], a: usize, b: usize) -> i64 {
    let dx = xs[b] as i64 - xs[a] as i64;
    let dy = ys[b] as i64 - ys[a] as i64;
    HERMITE_SCALE * dy / if dx != 0 { dx } else { 1 }
}

/// Tangent at point `i` with the monotonicity clamp applied.
fn tangent(xs: &[i16], ys: &[i16], i: usize) -> i64 {
    let n = xs.len();
    if i == 0 {
        return secant(xs, ys, 0, 1);
    }
    if i == n - 1 {
        return secant(xs, ys, n - 2, n - 1);
    }

    let d0 = secant(xs, ys, i - 1, i);
    let d1 = secant(xs, ys, i, i + 1);
    if d0 == 0 || d1 == 0 || (d0 > 0) != (d1 > 0) {
        return 0;
    }

    let mut m = (d0 + d1) / 2;
    let p = 3 * d0;
    let q = 3 * d1;
    if (p > 0 && m > p) || (p < 0 && m < p) {
        m = p;
    } else if (q > 0 && m > q) || (q < 0 && m < q) {
        m = q;
    }
    m
}

/// Slew-rate limiter for one control loop step
///
/// Moves `current` toward `target` by at most one loop's worth of travel,
/// where `rise_ms` / `fall_ms` is the time to traverse the full span
/// (1000 units times `multiplier`). A zero duration in the relevant
/// direction jumps straight to the target. Never overshoots.
///
/// # Arguments
///
/// * `current` - Current value (scaled by `multiplier`)
/// * `target` - Target value (scaled by `multiplier`)
/// * `multiplier` - Fixed-point factor applied to both values
/// * `rise_ms` - Full-span time when increasing
/// * `fall_ms` - Full-span time when decreasing
pub fn apply_slow(current: i32, target: i32, multiplier: i32, rise_ms: u32, fall_ms: u32) -> i32 {
    let span = multiplier as i64 * 2 * FULL_SCALE as i64 * LOOP_TIME_MS as i64;
    if current < target && rise_ms > 0 {
        let step = span / rise_ms as i64;
        clamp_i32(current as i64 + step).min(target)
    } else if current > target && fall_ms > 0 {
        let step = span / fall_ms as i64;
        clamp_i32(current as i64 - step).max(target)
    } else {
        target
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
