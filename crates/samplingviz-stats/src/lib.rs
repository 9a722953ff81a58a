//! Numeric building blocks for the sampling-distribution charts.
//!
//! - [`ticks`]: round tick values and extent niceing
//! - [`histogram`]: equal-width and round-threshold binning
//! - [`descriptive`]: summary statistics
//! - [`sample`]: random sub-samples without replacement
//!
//! # Examples
//!
//! ```
//! use samplingviz_stats::histogram::{Histogram, Thresholds};
//!
//! let values = [41.2, 43.0, 43.9, 44.1, 45.7];
//! let histogram = Histogram::new(values, Thresholds::Nice(5));
//! assert_eq!(histogram.total(), 5);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod sample;
pub mod ticks;
