//! Human-friendly tick generation.
//!
//! Ticks are placed at multiples of 1, 2 or 5 times a power of ten, so axis
//! labels and histogram thresholds land on round numbers.
//!
//! # Examples
//!
//! ```
//! use samplingviz_stats::ticks::{nice, ticks};
//!
//! assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
//! assert_eq!(nice(0.3, 9.7, 10), (0.0, 10.0));
//! ```

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick indices `[i1, i2]` and the signed increment between them.
///
/// A negative increment `-k` means ticks are `i / k`; it keeps fractional
/// steps exact (0.1 is `1 / 10` rather than `1 * 0.1`).
#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSpec {
    i1: f64,
    i2: f64,
    inc: f64,
}

#[expect(clippy::cast_precision_loss)]
fn tick_spec(start: f64, stop: f64, count: usize) -> TickSpec {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = (start * k).round();
        i2 = (stop * k).round();
        if i1 / k < start {
            i1 += 1.0;
        }
        if i2 / k > stop {
            i2 -= 1.0;
        }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = (start / k).round();
        i2 = (stop / k).round();
        if i1 * k < start {
            i1 += 1.0;
        }
        if i2 * k > stop {
            i2 -= 1.0;
        }
        inc = k;
    }
    if i2 < i1 && count == 1 {
        return tick_spec(start, stop, 2);
    }
    TickSpec { i1, i2, inc }
}

/// Returns the signed tick increment for `count` ticks over `[start, stop]`.
///
/// Positive values are the step itself. Negative values `-k` mean a step of `1 / k`.
/// Returns `0.0` if no step can be derived (empty or degenerate input).
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !(stop - start).is_finite() || stop <= start {
        return 0.0;
    }
    tick_spec(start, stop, count).inc
}

/// Converts a signed increment from [`tick_increment`] into a plain step.
#[must_use]
pub fn step_from_increment(inc: f64) -> f64 {
    if inc < 0.0 { -1.0 / inc } else { inc }
}

/// Returns approximately `count` round tick values in `[start, stop]`.
///
/// Returns `[start]` when `start == stop` and an empty vector when `count` is zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let TickSpec { i1, i2, inc } = tick_spec(lo, hi, count);
    if i2 < i1 {
        return vec![];
    }

    let n = (i2 - i1) as usize + 1;
    let mut values = (0..n)
        .map(|i| {
            #[expect(clippy::cast_precision_loss)]
            let i = i1 + i as f64;
            if inc < 0.0 { i / -inc } else { i * inc }
        })
        .collect::<Vec<_>>();
    if reverse {
        values.reverse();
    }
    values
}

/// Extends `[start, stop]` outwards so both ends fall on round tick values.
///
/// Iterates until the increment stabilises, as a niced extent can suggest a
/// coarser step than the original one.
#[expect(clippy::float_cmp)]
#[must_use]
pub fn nice(mut start: f64, mut stop: f64, count: usize) -> (f64, f64) {
    let mut prestep = None;
    // Bounded to guard against oscillation on pathological input.
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        prestep = Some(step);
    }
    (start, stop)
}

/// Number of decimals needed to print ticks spaced `step` apart without noise.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10()).ceil().max(0.0) as usize
}
