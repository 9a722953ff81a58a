use std::{io::Write, path::PathBuf};

use samplingviz_chart::session::ChartSession;
use samplingviz_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::util::{self, PageArg, Report};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum SummaryFormat {
    #[default]
    Json,
    Text,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    page: PageArg,
    /// Output format (json or text)
    #[clap(long, default_value = "json")]
    format: SummaryFormat,
    /// Draw sample charts with this seed so they are summarized too
    #[clap(long)]
    seed: Option<u64>,
    /// Write the summary to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct ChartSummary {
    chart: String,
    count: usize,
    bins: usize,
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
    std_dev: f64,
    /// Known population mean, for charts that display one.
    #[serde(skip_serializing_if = "Option::is_none")]
    population_mean: Option<f64>,
    /// Difference between the observed mean and the population mean.
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_error: Option<f64>,
}

impl ChartSummary {
    fn new(session: &ChartSession) -> Option<Self> {
        let stats = DescriptiveStats::new(session.values().iter().copied())?;
        let population_mean = session.spec().population_mean;
        Some(Self {
            chart: session.id().to_owned(),
            count: stats.count,
            bins: session.bars().len(),
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
            population_mean,
            mean_error: population_mean.map(|mu| stats.mean - mu),
        })
    }
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let SummaryArg {
        page,
        format,
        seed,
        output,
    } = arg;

    let mut page = page.load()?;
    if seed.is_some() {
        let mut rng = util::rng(*seed);
        let hidden = page
            .charts()
            .iter()
            .filter(|c| !c.is_visible())
            .map(|c| c.id().to_owned())
            .collect::<Vec<_>>();
        for id in &hidden {
            page.draw_sample(id, &mut rng)?;
        }
    }

    let summaries = page
        .charts()
        .iter()
        .filter_map(|session| {
            let summary = ChartSummary::new(session);
            if summary.is_none() {
                tracing::warn!(chart = session.id(), "no data to summarize");
            }
            summary
        })
        .collect::<Vec<_>>();

    match format {
        SummaryFormat::Json => Report::open(output.as_deref())?.json(&summaries),
        SummaryFormat::Text => Report::open(output.as_deref())?
            .text(|out| summaries.iter().try_for_each(|s| write_text(out, s))),
    }
}

fn write_text(out: &mut dyn Write, s: &ChartSummary) -> std::io::Result<()> {
    writeln!(out, "{} ({} values, {} bins)", s.chart, s.count, s.bins)?;
    writeln!(out, "  Min:    {:10.2}", s.min)?;
    writeln!(out, "  Max:    {:10.2}", s.max)?;
    writeln!(out, "  Mean:   {:10.2}", s.mean)?;
    writeln!(out, "  Median: {:10.2}", s.median)?;
    writeln!(out, "  StdDev: {:10.2}", s.std_dev)?;
    if let (Some(mu), Some(err)) = (s.population_mean, s.mean_error) {
        writeln!(out, "  Population mean: {mu:.2} (observed - population: {err:+.3})")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use samplingviz_chart::config::PageConfig;

    use super::*;

    #[test]
    fn test_chart_summary() {
        let config = PageConfig::default();
        let spec = config.chart("sampling-dist-fish").unwrap().clone();
        let session = ChartSession::new(spec, config.layout, vec![42.0, 43.0, 45.0, 44.0], None);
        let summary = ChartSummary::new(&session).unwrap();
        assert_eq!(summary.count, 4);
        assert_relative_eq!(summary.mean, 43.5);
        assert_relative_eq!(summary.median, 43.5);
        assert_relative_eq!(summary.mean_error.unwrap(), 0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_chart_has_no_summary() {
        let config = PageConfig::default();
        let spec = config.chart("sample-dist").unwrap().clone();
        assert!(ChartSummary::new(&ChartSession::hidden(spec, config.layout)).is_none());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<SummaryFormat>().unwrap(), SummaryFormat::Json);
        assert_eq!("Text".parse::<SummaryFormat>().unwrap(), SummaryFormat::Text);
    }
}
