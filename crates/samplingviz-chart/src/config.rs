//! Page configuration: which charts exist, where their data comes from and
//! which exercises they carry.
//!
//! [`PageConfig::default`] describes the sampling-distribution page. A JSON
//! document with the same shape replaces it entirely.

use samplingviz_stats::histogram::Thresholds;
use serde::{Deserialize, Serialize};

use crate::{
    axis::Layout,
    validate::{Exercise, Required},
};

const DEFAULT_HEIGHT: f64 = 400.0;
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    Exact(usize),
    Nice(usize),
}

impl From<Binning> for Thresholds {
    fn from(binning: Binning) -> Self {
        match binning {
            Binning::Exact(n) => Thresholds::Exact(n),
            Binning::Nice(n) => Thresholds::Nice(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Numeric cells of an HTML table.
    Table {
        table: String,
        #[serde(default)]
        collapsible: bool,
    },
    /// A random sample drawn from another chart's data on request.
    SampleOf { chart: String, size: usize },
}

/// A point in data coordinates (x value, y count).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Placement of the mean overlay and the chart buttons, in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub subtitle: DataPoint,
    pub mean_button: DataPoint,
    pub reset_button: DataPoint,
    /// Count the mean line extends up to.
    pub mean_line_top: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            subtitle: DataPoint { x: 28.0, y: 195.0 },
            mean_button: DataPoint { x: 28.0, y: 190.0 },
            reset_button: DataPoint { x: 60.0, y: 190.0 },
            mean_line_top: 195.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub x_label: String,
    #[serde(default = "default_height")]
    pub height: f64,
    pub binning: Binning,
    pub source: DataSource,
    /// Whether bars react to pointer events.
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub population_mean: Option<f64>,
    #[serde(default)]
    pub controls: Option<Controls>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

impl ChartSpec {
    fn new(id: &str, x_label: &str, binning: Binning, source: DataSource) -> Self {
        Self {
            id: id.to_owned(),
            x_label: x_label.to_owned(),
            height: DEFAULT_HEIGHT,
            binning,
            source,
            interactive: false,
            population_mean: None,
            controls: None,
            exercises: vec![],
        }
    }

    #[must_use]
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub layout: Layout,
    pub charts: Vec<ChartSpec>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let grades = ChartSpec::new(
            "pop-dist-stat-100-grades",
            "Final Grades",
            Binning::Nice(6),
            DataSource::Table {
                table: "pop-grades".to_owned(),
                collapsible: false,
            },
        );
        let sample = ChartSpec::new(
            "sample-dist",
            "Final Grades",
            Binning::Nice(6),
            DataSource::SampleOf {
                chart: grades.id.clone(),
                size: DEFAULT_SAMPLE_SIZE,
            },
        );
        let fish = ChartSpec {
            height: 500.0,
            interactive: true,
            population_mean: Some(43.45),
            controls: Some(Controls::default()),
            exercises: vec![
                Exercise::new("item-1", 40.0, 46.0, Required::Inside),
                Exercise::new("item-2", 36.0, 50.0, Required::Outside),
            ],
            ..ChartSpec::new(
                "sampling-dist-fish",
                "Average Fish Weight (dkg)",
                Binning::Nice(20),
                DataSource::Table {
                    table: "all-samples-fish".to_owned(),
                    collapsible: true,
                },
            )
        };
        let income = ChartSpec::new(
            "pop-dist-activity",
            "Income",
            Binning::Nice(30),
            DataSource::Table {
                table: "table-resident-income".to_owned(),
                collapsible: true,
            },
        );

        Self {
            layout: Layout::default(),
            charts: vec![grades, sample, fish, income],
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.id == id)
    }
}
