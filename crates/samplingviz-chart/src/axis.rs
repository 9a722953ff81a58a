//! Axis descriptors for histogram charts.

use samplingviz_stats::histogram::Histogram;
use serde::{Deserialize, Serialize};

use crate::scale::LinearScale;

/// Extra domain before the first bin edge on the x axis.
const X_PAD_BEFORE: f64 = 1.0;
/// Extra domain after the last bin edge on the x axis.
const X_PAD_AFTER: f64 = 5.0;
/// Headroom added above the tallest bar before niceing the y axis.
const Y_HEADROOM: f64 = 10.0;
/// Pixels per requested tick.
const PIXELS_PER_TICK: f64 = 100.0;

pub const Y_LABEL: &str = "Frequency";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 25.0,
            right: 30.0,
            bottom: 25.0,
            left: 60.0,
        }
    }
}

/// Drawing surface geometry shared by every chart on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub width: f64,
    pub margin: Margin,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 800.0,
            margin: Margin::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Orientation {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel coordinate along the axis.
    pub position: f64,
    pub label: String,
}

/// A fully laid-out axis: scale, tick marks and title.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orientation: Orientation,
    pub scale: LinearScale,
    pub ticks: Vec<Tick>,
    pub label: String,
    /// Pixel offset of the axis line (y for a bottom axis, x for a left axis).
    pub offset: f64,
}

impl Axis {
    fn new(
        orientation: Orientation,
        scale: LinearScale,
        tick_count: usize,
        label: &str,
        offset: f64,
    ) -> Self {
        let precision = scale.tick_precision(tick_count);
        let ticks = scale
            .ticks(tick_count)
            .into_iter()
            .map(|value| Tick {
                value,
                position: scale.scale(value),
                label: format!("{value:.precision$}"),
            })
            .collect();
        Self {
            orientation,
            scale,
            ticks,
            label: label.to_owned(),
            offset,
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tick_count(pixels: f64) -> usize {
    (pixels / PIXELS_PER_TICK).floor().max(1.0) as usize
}

/// Builds the bottom axis: domain `[first.x0 - 1, last.x1 + 5]` over the
/// horizontal space between the margins.
#[must_use]
pub fn x_axis(histogram: &Histogram, label: &str, layout: &Layout, height: f64) -> Axis {
    let domain = match (histogram.bins.first(), histogram.bins.last()) {
        (Some(first), Some(last)) => [first.x0() - X_PAD_BEFORE, last.x1() + X_PAD_AFTER],
        _ => [0.0, 1.0],
    };
    let scale = LinearScale::new(
        domain,
        [layout.margin.left, layout.width - layout.margin.right],
    );
    Axis::new(
        Orientation::Bottom,
        scale,
        tick_count(layout.width),
        label,
        height - layout.margin.bottom,
    )
}

/// Builds the left axis: domain `[0, max count + 10]`, niced, from the bottom
/// margin up to the top margin.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn y_axis(histogram: &Histogram, layout: &Layout, height: f64) -> Axis {
    let top = histogram.max_count() as f64 + Y_HEADROOM;
    let scale = LinearScale::new(
        [0.0, top],
        [height - layout.margin.bottom, layout.margin.top],
    )
    .nice(10);
    Axis::new(
        Orientation::Left,
        scale,
        tick_count(height),
        Y_LABEL,
        layout.margin.left,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_x_axis_domain_padding() {
        let histogram = Histogram::nice(&[40.0, 41.5, 46.0], 6);
        let axis = x_axis(&histogram, "Average Fish Weight (dkg)", &Layout::default(), 500.0);
        assert_eq!(axis.scale.domain(), [39.0, 52.0]);
        assert_eq!(axis.scale.range(), [60.0, 770.0]);
        assert_relative_eq!(axis.offset, 475.0);
        assert_eq!(axis.label, "Average Fish Weight (dkg)");
        assert!(axis.orientation.is_bottom());
        assert!(!axis.ticks.is_empty());
        assert!(axis.ticks.iter().all(|t| t.position >= 60.0 && t.position <= 770.0));
    }

    #[test]
    fn test_y_axis_is_niced() {
        let histogram = Histogram::equal_width(&[1.0; 187], 1);
        let axis = y_axis(&histogram, &Layout::default(), 400.0);
        assert_eq!(axis.scale.domain(), [0.0, 200.0]);
        assert_eq!(axis.scale.range(), [375.0, 25.0]);
        assert_eq!(axis.label, Y_LABEL);
        assert_eq!(axis.ticks.first().unwrap().label, "0");
        assert_eq!(axis.ticks.last().unwrap().label, "200");
    }

    #[test]
    fn test_empty_histogram_axes() {
        let histogram = Histogram::default();
        let x = x_axis(&histogram, "x", &Layout::default(), 400.0);
        assert_eq!(x.scale.domain(), [0.0, 1.0]);
        let y = y_axis(&histogram, &Layout::default(), 400.0);
        assert_eq!(y.scale.domain(), [0.0, 10.0]);
    }
}
