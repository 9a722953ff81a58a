//! Per-chart interactive state.

use samplingviz_stats::histogram::{Histogram, HistogramBin};

use crate::{
    axis::{self, Axis, Layout},
    collapsible::{CollapsibleTable, ExpansionLevel},
    config::{ChartSpec, Controls},
    interaction::{BinBar, MeanToggle, PointerEvent, PointerHandler as _, Target},
    scale::LinearScale,
    table::{CellRef, DataTable},
    validate::{Exercise, ValidationResult},
};

/// Count units the frequency label floats above its bar.
const COUNT_LABEL_LIFT: f64 = 3.0;

/// Pixel rectangle of a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Frequency label shown above an active bar.
#[derive(Debug, Clone, PartialEq)]
pub struct CountLabel {
    /// Index of the bar that owns this label.
    pub bar: usize,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Pixel segment of the population mean line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanLine {
    pub x: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

/// One rendered chart: its data, bars, axes and everything the reader can
/// change by interacting with it.
///
/// Bars are rebuilt on every [`redraw`](Self::redraw); their interaction
/// state does not survive it.
#[derive(Debug, Clone)]
pub struct ChartSession {
    spec: ChartSpec,
    layout: Layout,
    values: Vec<f64>,
    bars: Vec<BinBar>,
    x_axis: Axis,
    y_axis: Axis,
    table: Option<DataTable>,
    collapsible: Option<CollapsibleTable>,
    mean_toggle: MeanToggle,
    statuses: Vec<ValidationResult>,
    visible: bool,
}

impl ChartSession {
    /// Builds a chart over `values`.
    ///
    /// `table` is the source table, used for cross-highlighting. Tables with
    /// collapsible row groups get an expand button.
    #[must_use]
    pub fn new(spec: ChartSpec, layout: Layout, values: Vec<f64>, table: Option<DataTable>) -> Self {
        let collapsible = table
            .as_ref()
            .filter(|t| t.num_groups() > 0)
            .map(CollapsibleTable::for_table);
        let histogram = Histogram::new(values.iter().copied(), spec.binning.into());
        let (bars, x_axis, y_axis) = build(&spec, &layout, &histogram);
        Self {
            spec,
            layout,
            values,
            bars,
            x_axis,
            y_axis,
            table,
            collapsible,
            mean_toggle: MeanToggle::default(),
            statuses: vec![],
            visible: true,
        }
    }

    /// Creates a chart that stays hidden until its first [`redraw`](Self::redraw).
    #[must_use]
    pub fn hidden(spec: ChartSpec, layout: Layout) -> Self {
        Self {
            visible: false,
            ..Self::new(spec, layout, vec![], None)
        }
    }

    /// Replaces the data and rebuilds bars and axes from scratch.
    pub fn redraw(&mut self, values: Vec<f64>) {
        let histogram = Histogram::new(values.iter().copied(), self.spec.binning.into());
        let (bars, x_axis, y_axis) = build(&self.spec, &self.layout, &histogram);
        self.values = values;
        self.bars = bars;
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self.mean_toggle.hide();
        self.statuses.clear();
        self.visible = true;
        tracing::debug!(chart = %self.spec.id, bins = self.bars.len(), "chart redrawn");
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn bars(&self) -> &[BinBar] {
        &self.bars
    }

    #[must_use]
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    #[must_use]
    pub fn x_scale(&self) -> &LinearScale {
        &self.x_axis.scale
    }

    #[must_use]
    pub fn y_scale(&self) -> &LinearScale {
        &self.y_axis.scale
    }

    #[must_use]
    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn collapsible(&self) -> Option<&CollapsibleTable> {
        self.collapsible.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn mean_toggle(&self) -> &MeanToggle {
        &self.mean_toggle
    }

    /// Button and subtitle placement, for charts with a population mean overlay.
    #[must_use]
    pub fn controls(&self) -> Option<(f64, &Controls)> {
        self.spec.population_mean.zip(self.spec.controls.as_ref())
    }

    /// Routes a pointer event to an element of this chart.
    ///
    /// Returns `false` if the chart has no such element or is not interactive.
    pub fn dispatch(&mut self, target: Target, event: PointerEvent) -> bool {
        if !self.spec.interactive {
            return false;
        }
        match target {
            Target::Bin(index) => match self.bars.get_mut(index) {
                Some(bar) => bar.handle(event),
                None => return false,
            },
            Target::MeanToggle => {
                if self.controls().is_none() {
                    return false;
                }
                self.mean_toggle.handle(event);
            }
            Target::Reset => {
                if event.is_click() {
                    self.reset();
                }
            }
        }
        true
    }

    /// Locks the given bars, as if each were clicked once.
    pub fn select(&mut self, indices: &[usize]) -> bool {
        indices.iter().fold(true, |ok, &index| {
            let bar_unlocked = self
                .bars
                .get(index)
                .is_some_and(|bar| !bar.state().is_locked());
            ok & (bar_unlocked && self.dispatch(Target::Bin(index), PointerEvent::Click))
        })
    }

    /// Unlocks every bar and clears all highlights.
    pub fn reset(&mut self) {
        for bar in &mut self.bars {
            bar.unlock();
        }
        for bar in &mut self.bars {
            bar.handle(PointerEvent::Leave);
        }
        tracing::debug!(chart = %self.spec.id, "chart reset");
    }

    /// Indices of bars in the hovered or locked state.
    #[must_use]
    pub fn selected_bins(&self) -> Vec<usize> {
        self.bars
            .iter()
            .filter(|bar| bar.is_selected())
            .map(|bar| bar.index)
            .collect()
    }

    #[must_use]
    pub fn bar_geometry(&self, index: usize) -> Option<BarGeometry> {
        let bar = self.bars.get(index)?;
        Some(geometry(&bar.bin, self.x_scale(), self.y_scale()))
    }

    /// Frequency labels of all active bars.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn count_labels(&self) -> Vec<CountLabel> {
        let x = self.x_scale();
        let y = self.y_scale();
        self.bars
            .iter()
            .filter(|bar| bar.style().show_count)
            .map(|bar| CountLabel {
                bar: bar.index,
                x: f64::midpoint(x.scale(bar.bin.x0()), x.scale(bar.bin.x1())),
                y: y.scale(bar.bin.count as f64 + COUNT_LABEL_LIFT),
                text: bar.bin.count.to_string(),
            })
            .collect()
    }

    /// Whether `value` falls in any active bar.
    #[must_use]
    pub fn is_value_highlighted(&self, value: f64) -> bool {
        self.bars
            .iter()
            .any(|bar| bar.is_selected() && bar.bin.contains(value))
    }

    /// Source table cells whose value lies in an active bar.
    #[must_use]
    pub fn highlighted_cells(&self) -> Vec<CellRef> {
        let Some(table) = &self.table else {
            return vec![];
        };
        table
            .numeric_cells()
            .filter(|&(_, value)| self.is_value_highlighted(value))
            .map(|(cell, _)| cell)
            .collect()
    }

    #[must_use]
    pub fn mean_line(&self) -> Option<MeanLine> {
        let (mean, controls) = self.controls()?;
        self.mean_toggle.is_shown().then(|| MeanLine {
            x: self.x_scale().scale(mean),
            y_bottom: self.y_scale().scale(0.0),
            y_top: self.y_scale().scale(controls.mean_line_top),
        })
    }

    /// Presses the source table's expand button, if it has one.
    pub fn press_table_button(&mut self) -> Option<ExpansionLevel> {
        self.collapsible.as_mut().map(CollapsibleTable::press)
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.spec.exercises
    }

    /// Validates the current selection against the named exercise and keeps
    /// the result as that exercise's status.
    pub fn check(&mut self, exercise_id: &str) -> Option<&ValidationResult> {
        let result = self.spec.exercise(exercise_id)?.check(&self.bars);
        let slot = match self.statuses.iter().position(|s| s.exercise == exercise_id) {
            Some(i) => {
                self.statuses[i] = result;
                i
            }
            None => {
                self.statuses.push(result);
                self.statuses.len() - 1
            }
        };
        self.statuses.get(slot)
    }

    /// Latest result of the named exercise.
    #[must_use]
    pub fn status(&self, exercise_id: &str) -> Option<&ValidationResult> {
        self.statuses.iter().find(|s| s.exercise == exercise_id)
    }
}

fn build(spec: &ChartSpec, layout: &Layout, histogram: &Histogram) -> (Vec<BinBar>, Axis, Axis) {
    let x_axis = axis::x_axis(histogram, &spec.x_label, layout, spec.height);
    let y_axis = axis::y_axis(histogram, layout, spec.height);
    let bars = histogram
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| BinBar::new(i, bin.clone()))
        .collect();
    (bars, x_axis, y_axis)
}

/// Bars leave a one pixel gap on their left edge.
#[expect(clippy::cast_precision_loss)]
fn geometry(bin: &HistogramBin, x: &LinearScale, y: &LinearScale) -> BarGeometry {
    let left = x.scale(bin.x0());
    let right = x.scale(bin.x1());
    let top = y.scale(bin.count as f64);
    BarGeometry {
        x: left + 1.0,
        y: top,
        width: (right - left - 1.0).max(0.0),
        height: y.scale(0.0) - top,
    }
}
