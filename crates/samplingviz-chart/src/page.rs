//! A page of charts loaded from an HTML document.

use rand::Rng;
use samplingviz_stats::sample::{self, Sample};

use crate::{
    config::{ChartSpec, DataSource, PageConfig},
    session::ChartSession,
    table::{self, TableError},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PageError {
    #[display("unknown chart '{chart_id}'")]
    UnknownChart { chart_id: String },
    #[display("failed to read data for chart '{chart_id}'")]
    Table {
        chart_id: String,
        #[error(source)]
        source: TableError,
    },
    #[display("chart '{chart_id}' samples from '{source_id}', which is not a table chart")]
    UnknownSource { chart_id: String, source_id: String },
    #[display("chart '{chart_id}' is not a sample chart")]
    NotASample { chart_id: String },
}

/// All charts of a page, in configuration order.
#[derive(Debug, Clone)]
pub struct Page {
    charts: Vec<ChartSession>,
}

impl Page {
    /// Extracts every table-backed chart's data out of `html` and builds its
    /// session. Sample charts start hidden.
    pub fn load(html: &str, config: &PageConfig) -> Result<Self, PageError> {
        let charts = config
            .charts
            .iter()
            .map(|spec| load_chart(html, spec, config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { charts })
    }

    #[must_use]
    pub fn charts(&self) -> &[ChartSession] {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut [ChartSession] {
        &mut self.charts
    }

    #[must_use]
    pub fn chart(&self, id: &str) -> Option<&ChartSession> {
        self.charts.iter().find(|c| c.id() == id)
    }

    pub fn chart_mut(&mut self, id: &str) -> Option<&mut ChartSession> {
        self.charts.iter_mut().find(|c| c.id() == id)
    }

    /// Draws a fresh sample for the sample chart `chart_id` and redraws it.
    pub fn draw_sample<R>(&mut self, chart_id: &str, rng: &mut R) -> Result<Sample, PageError>
    where
        R: Rng + ?Sized,
    {
        let chart = self.chart(chart_id).ok_or_else(|| PageError::UnknownChart {
            chart_id: chart_id.to_owned(),
        })?;
        let DataSource::SampleOf { chart: source_id, size } = &chart.spec().source else {
            return Err(PageError::NotASample {
                chart_id: chart_id.to_owned(),
            });
        };
        let size = *size;
        let population = self
            .chart(source_id)
            .ok_or_else(|| PageError::UnknownSource {
                chart_id: chart_id.to_owned(),
                source_id: source_id.clone(),
            })?
            .values();
        let sample = sample::draw_sample(population, size, rng);

        if let Some(chart) = self.chart_mut(chart_id) {
            chart.redraw(sample.values.clone());
        }
        tracing::info!(chart = chart_id, size = sample.values.len(), "drew new sample");
        Ok(sample)
    }
}

fn load_chart(html: &str, spec: &ChartSpec, config: &PageConfig) -> Result<ChartSession, PageError> {
    match &spec.source {
        DataSource::Table { table, collapsible } => {
            let table = table::extract_table(html, table, *collapsible).map_err(|source| {
                PageError::Table {
                    chart_id: spec.id.clone(),
                    source,
                }
            })?;
            let values = table.values();
            tracing::info!("Loaded {} values from {}", values.len(), table.id);
            Ok(ChartSession::new(
                spec.clone(),
                config.layout,
                values,
                Some(table),
            ))
        }
        DataSource::SampleOf { chart, .. } => {
            let source_is_table = config
                .chart(chart)
                .is_some_and(|source| matches!(source.source, DataSource::Table { .. }));
            if !source_is_table {
                return Err(PageError::UnknownSource {
                    chart_id: spec.id.clone(),
                    source_id: chart.clone(),
                });
            }
            Ok(ChartSession::hidden(spec.clone(), config.layout))
        }
    }
}
