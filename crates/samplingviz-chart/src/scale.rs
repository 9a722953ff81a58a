use samplingviz_stats::ticks;

/// An invertible linear mapping from a numeric domain to a pixel range.
///
/// Either interval may be reversed; the y axis maps `[0, max]` to
/// `[bottom, top]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Maps a domain value to a pixel coordinate.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        interpolate(self.domain, self.range, value)
    }

    /// Maps a pixel coordinate back to a domain value.
    ///
    /// A zero-width range maps everything to the middle of the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        interpolate(self.range, self.domain, pixel)
    }

    /// Extends the domain so both ends land on round tick values.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let [d0, d1] = self.domain;
        let domain = if d1 < d0 {
            let (lo, hi) = ticks::nice(d1, d0, count);
            [hi, lo]
        } else {
            let (lo, hi) = ticks::nice(d0, d1, count);
            [lo, hi]
        };
        Self { domain, ..self }
    }

    /// Approximately `count` round values inside the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks::ticks(self.domain[0], self.domain[1], count)
    }

    /// Decimal places needed to print [`Self::ticks`] for `count`.
    #[must_use]
    pub fn tick_precision(&self, count: usize) -> usize {
        let [d0, d1] = self.domain;
        let inc = ticks::tick_increment(d0.min(d1), d0.max(d1), count);
        ticks::precision_for_step(ticks::step_from_increment(inc))
    }
}

#[expect(clippy::float_cmp)]
fn interpolate(from: [f64; 2], to: [f64; 2], value: f64) -> f64 {
    let span = from[1] - from[0];
    if span == 0.0 || !span.is_finite() {
        return f64::midpoint(to[0], to[1]);
    }
    let t = (value - from[0]) / span;
    to[0] + t * (to[1] - to[0])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_scale_and_invert() {
        let x = LinearScale::new([39.0, 54.0], [60.0, 770.0]);
        assert_relative_eq!(x.scale(39.0), 60.0);
        assert_relative_eq!(x.scale(54.0), 770.0);
        assert_relative_eq!(x.invert(415.0), 46.5);
    }

    #[test]
    fn test_reversed_range() {
        let y = LinearScale::new([0.0, 200.0], [375.0, 25.0]);
        assert_relative_eq!(y.scale(0.0), 375.0);
        assert_relative_eq!(y.scale(200.0), 25.0);
        assert_relative_eq!(y.invert(200.0), 100.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let x = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
        assert_relative_eq!(x.scale(5.0), 50.0);
        assert_relative_eq!(x.scale(99.0), 50.0);
    }

    #[test]
    fn test_nice() {
        let y = LinearScale::new([0.0, 187.0], [375.0, 25.0]).nice(10);
        assert_eq!(y.domain(), [0.0, 200.0]);
        assert_eq!(y.range(), [375.0, 25.0]);
        assert_eq!(y.ticks(4), vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn test_tick_precision() {
        assert_eq!(LinearScale::new([0.0, 1.0], [0.0, 1.0]).tick_precision(10), 1);
        assert_eq!(LinearScale::new([0.0, 100.0], [0.0, 1.0]).tick_precision(10), 0);
    }

    proptest! {
        #[test]
        fn prop_invert_scale_round_trip(
            d0 in -1.0e3..1.0e3f64,
            width in 1.0e-2..1.0e3f64,
            t in 0.0..=1.0f64,
        ) {
            let scale = LinearScale::new([d0, d0 + width], [60.0, 770.0]);
            let v = d0 + t * width;
            prop_assert!((scale.invert(scale.scale(v)) - v).abs() < 1e-6);
            let p = 60.0 + t * 710.0;
            prop_assert!((scale.scale(scale.invert(p)) - p).abs() < 1e-6);
        }
    }
}
