use std::ops::Range;

use crate::ticks;

/// How a histogram's bin boundaries are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thresholds {
    /// Exactly `n` equal-width bins spanning `[min, max]`.
    Exact(usize),
    /// Approximately `n` equal-width bins whose boundaries are round numbers.
    ///
    /// The extent is widened to round values first, so the result may have a
    /// few more or fewer bins than requested.
    Nice(usize),
}

/// A frequency distribution of a dataset over contiguous intervals.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    /// Bins in ascending order. Adjacent bins share a boundary.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
    /// Whether `range.end` itself belongs to the bin. Only the last bin is closed.
    pub closed: bool,
}

impl HistogramBin {
    /// Lower edge of the bin.
    #[must_use]
    pub fn x0(&self) -> f64 {
        self.range.start
    }

    /// Upper edge of the bin.
    #[must_use]
    pub fn x1(&self) -> f64 {
        self.range.end
    }

    /// Returns whether `value` is counted by this bin.
    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.range.contains(&value) || (self.closed && value == self.range.end)
    }
}

impl Histogram {
    /// Creates a histogram using the given threshold strategy.
    ///
    /// Non-finite values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use samplingviz_stats::histogram::{Histogram, Thresholds};
    /// let values = [1.0, 2.0, 2.5, 3.0, 9.0];
    /// let histogram = Histogram::new(values, Thresholds::Exact(4));
    /// assert_eq!(histogram.bins.len(), 4);
    /// assert_eq!(histogram.total(), 5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, thresholds: Thresholds) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        match thresholds {
            Thresholds::Exact(n) => Self::equal_width(&values, n),
            Thresholds::Nice(n) => Self::nice(&values, n),
        }
    }

    /// Splits `[min, max]` into exactly `num_bins` equal-width bins.
    ///
    /// Values equal to the maximum are counted in the last bin. If all values
    /// are equal, a single closed bin `[v, v]` holds them all.
    ///
    /// # Examples
    ///
    /// ```
    /// # use samplingviz_stats::histogram::Histogram;
    /// let histogram = Histogram::equal_width(&[0.0, 1.0, 2.0, 3.0, 4.0], 2);
    /// assert_eq!(histogram.bins[0].range, 0.0..2.0);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[1].count, 3);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn equal_width(values: &[f64], num_bins: usize) -> Self {
        let Some((min, max)) = extent(values) else {
            return Self::default();
        };
        if num_bins == 0 {
            return Self::default();
        }
        if max - min < f64::EPSILON * max.abs().max(1.0) {
            return Self::single(min, max, values.len());
        }

        let span = max - min;
        let width = span / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|i| {
                // Recompute each edge from the span to avoid accumulation error
                let start = min + span * (i as f64) / num_bins as f64;
                let end = if i + 1 == num_bins {
                    max
                } else {
                    min + span * ((i + 1) as f64) / num_bins as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                    closed: i + 1 == num_bins,
                }
            })
            .collect::<Vec<_>>();

        for &value in values {
            let idx = (((value - min) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        tracing::debug!(num_bins, min, max, "built equal-width histogram");
        Self { bins }
    }

    /// Builds bins whose boundaries are round tick values.
    ///
    /// The extent is niced for about `count` ticks, and thresholds are placed at
    /// every tick inside it. When the maximum falls exactly on the last tick the
    /// upper bound is pushed out by one step, so every bin keeps the same width.
    ///
    /// # Examples
    ///
    /// ```
    /// # use samplingviz_stats::histogram::Histogram;
    /// let histogram = Histogram::nice(&[0.2, 3.7, 4.1, 9.6], 5);
    /// let edges = histogram.bins.iter().map(|b| b.range.start).collect::<Vec<_>>();
    /// assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    /// assert_eq!(histogram.bins.last().unwrap().range.end, 10.0);
    /// ```
    #[must_use]
    pub fn nice(values: &[f64], count: usize) -> Self {
        let Some((min, max)) = extent(values) else {
            return Self::default();
        };
        if count == 0 {
            return Self::default();
        }
        if max - min < f64::EPSILON * max.abs().max(1.0) {
            return Self::single(min, max, values.len());
        }

        let (x0, mut x1) = ticks::nice(min, max, count);
        let mut thresholds = ticks::ticks(x0, x1, count);
        if thresholds.last().is_some_and(|&last| last >= x1) {
            if max >= x1 {
                let inc = ticks::tick_increment(x0, x1, count);
                if inc > 0.0 {
                    x1 = ((x1 / inc).floor() + 1.0) * inc;
                } else if inc < 0.0 {
                    x1 = ((x1 * -inc).ceil() + 1.0) / -inc;
                }
            } else {
                thresholds.pop();
            }
        }
        thresholds.retain(|&t| t > x0 && t <= x1);

        let num_bins = thresholds.len() + 1;
        let mut bins = (0..num_bins)
            .map(|i| {
                let start = if i > 0 { thresholds[i - 1] } else { x0 };
                let end = thresholds.get(i).copied().unwrap_or(x1);
                HistogramBin {
                    range: start..end,
                    count: 0,
                    closed: i + 1 == num_bins,
                }
            })
            .collect::<Vec<_>>();

        for &value in values {
            let idx = thresholds
                .partition_point(|&t| t <= value)
                .min(num_bins - 1);
            bins[idx].count += 1;
        }

        tracing::debug!(num_bins, x0, x1, "built nice histogram");
        Self { bins }
    }

    fn single(min: f64, max: f64, len: usize) -> Self {
        Self {
            bins: vec![HistogramBin {
                range: min..max,
                count: len as u64,
                closed: true,
            }],
        }
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest bin count, or zero for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    /// Index of the bin counting `value`, if any.
    #[must_use]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        self.bins.iter().position(|bin| bin.contains(value))
    }
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied().filter(|v| v.is_finite());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Histogram::equal_width(&[], 5).bins.is_empty());
        assert!(Histogram::nice(&[], 5).bins.is_empty());
    }

    #[test]
    fn test_zero_bins() {
        assert!(Histogram::equal_width(&[1.0, 2.0], 0).bins.is_empty());
        assert!(Histogram::nice(&[1.0, 2.0], 0).bins.is_empty());
    }

    #[test]
    fn test_all_same_value() {
        let histogram = Histogram::equal_width(&[42.0; 7], 4);
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].count, 7);
        assert!(histogram.bins[0].contains(42.0));

        let histogram = Histogram::nice(&[42.0; 7], 4);
        assert_eq!(histogram.total(), 7);
    }

    #[test]
    fn test_equal_width_edges_and_max() {
        let histogram = Histogram::equal_width(&[0.0, 10.0, 5.0, 2.5], 4);
        assert_eq!(histogram.bins.len(), 4);
        assert_eq!(histogram.bins[3].range.end, 10.0);
        assert!(histogram.bins[3].closed);
        assert!(histogram.bins[3].contains(10.0));
        assert!(!histogram.bins[0].contains(2.5));
        assert_eq!(
            histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 1]
        );
    }

    #[test]
    fn test_zero_count_bins_are_kept() {
        let histogram = Histogram::equal_width(&[0.0, 10.0], 5);
        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.bins[2].count, 0);
    }

    #[test]
    fn test_nice_extends_upper_bound_when_max_on_threshold() {
        let histogram = Histogram::nice(&[40.0, 41.5, 46.0], 6);
        let last = histogram.bins.last().unwrap();
        assert!(last.contains(46.0));
        assert!(last.range.end > 46.0);
        let widths = histogram
            .bins
            .iter()
            .map(|b| b.range.end - b.range.start)
            .collect::<Vec<_>>();
        assert!(widths.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));
    }

    #[test]
    fn test_nice_boundaries_are_round() {
        let histogram = Histogram::nice(&[38.3, 40.2, 43.45, 47.9, 48.9], 20);
        for bin in &histogram.bins {
            let doubled = bin.range.start * 2.0;
            assert!((doubled - doubled.round()).abs() < 1e-9, "{:?}", bin.range);
        }
        assert_eq!(histogram.bins[0].range.start, 38.0);
    }

    #[test]
    fn test_bin_index() {
        let histogram = Histogram::equal_width(&[0.0, 4.0], 2);
        assert_eq!(histogram.bin_index(1.0), Some(0));
        assert_eq!(histogram.bin_index(2.0), Some(1));
        assert_eq!(histogram.bin_index(4.0), Some(1));
        assert_eq!(histogram.bin_index(4.5), None);
    }

    #[test]
    fn test_new_ignores_non_finite() {
        let histogram = Histogram::new([1.0, f64::NAN, 2.0, f64::INFINITY], Thresholds::Exact(2));
        assert_eq!(histogram.total(), 2);
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_len(
            values in prop::collection::vec(-1.0e4..1.0e4f64, 1..200),
            n in 1usize..40,
        ) {
            let exact = Histogram::equal_width(&values, n);
            prop_assert_eq!(exact.total(), values.len() as u64);
            let nice = Histogram::nice(&values, n);
            prop_assert_eq!(nice.total(), values.len() as u64);
        }

        #[test]
        fn prop_each_value_lands_in_its_bin(
            values in prop::collection::vec(0.0..100.0f64, 1..100),
            n in 1usize..30,
        ) {
            let histogram = Histogram::nice(&values, n);
            for v in values {
                prop_assert!(histogram.bin_index(v).is_some());
            }
        }
    }
}
