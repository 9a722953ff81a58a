use std::{path::PathBuf, process::ExitCode};

use anyhow::{anyhow, bail};
use samplingviz_chart::validate::ValidationResult;
use serde::Serialize;

use crate::util::{PageArg, Report};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CheckArg {
    #[clap(flatten)]
    page: PageArg,
    /// Chart the exercise belongs to
    #[clap(long, default_value = "sampling-dist-fish")]
    chart: String,
    /// Exercise id, such as `item-1`
    #[clap(long)]
    exercise: String,
    /// Selected bin indices, comma separated
    #[clap(long, value_delimiter = ',')]
    select: Vec<usize>,
    /// Write the report to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    chart: &'a str,
    selected: Vec<usize>,
    #[serde(flatten)]
    result: ValidationResult,
}

pub(crate) fn run(arg: &CheckArg) -> anyhow::Result<ExitCode> {
    let CheckArg {
        page,
        chart,
        exercise,
        select,
        output,
    } = arg;

    let mut page = page.load()?;
    let session = page
        .chart_mut(chart)
        .ok_or_else(|| anyhow!("Unknown chart: {chart}"))?;

    let mut bins = select.clone();
    bins.sort_unstable();
    bins.dedup();
    if !session.select(&bins) {
        bail!("Invalid bin selection for {chart}: {bins:?}");
    }

    let result = session
        .check(exercise)
        .cloned()
        .ok_or_else(|| anyhow!("Unknown exercise {exercise} on chart {chart}"))?;
    let passed = result.verdict.is_pass();
    let report = ValidationReport {
        chart,
        selected: session.selected_bins(),
        result,
    };
    Report::open(output.as_deref())?.json(&report)?;

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
