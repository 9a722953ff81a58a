use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use samplingviz_chart::{
    config::DataSource,
    interaction::{PointerEvent, Target},
    svg,
};

use crate::util::{self, ChartSelection, PageArg};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RenderArg {
    #[clap(flatten)]
    page: PageArg,
    /// Directory to write the SVG files into
    #[clap(long, default_value = ".")]
    out_dir: PathBuf,
    /// Seed for drawing sample charts
    #[clap(long)]
    seed: Option<u64>,
    /// Bins to lock before rendering, as `<chart>:<i,j,..>` (repeatable)
    #[clap(long)]
    select: Vec<ChartSelection>,
    /// Show the population mean line on charts that have one
    #[clap(long, default_value_t = false)]
    show_mean: bool,
}

pub(crate) fn run(arg: &RenderArg) -> anyhow::Result<()> {
    let RenderArg {
        page,
        out_dir,
        seed,
        select,
        show_mean,
    } = arg;

    let mut page = page.load()?;
    let mut rng = util::rng(*seed);

    let sample_charts = page
        .charts()
        .iter()
        .filter(|c| matches!(c.spec().source, DataSource::SampleOf { .. }))
        .map(|c| c.id().to_owned())
        .collect::<Vec<_>>();
    for id in &sample_charts {
        page.draw_sample(id, &mut rng)?;
    }

    for (chart, bins) in util::merge_selections(select) {
        let Some(session) = page.chart_mut(chart) else {
            bail!("Unknown chart in --select: {chart}");
        };
        if !session.spec().interactive {
            bail!("Chart {chart} is not interactive");
        }
        if !session.select(&bins) {
            bail!("Invalid bin selection for {chart}: {bins:?}");
        }
    }

    if *show_mean {
        for session in page.charts_mut() {
            if session.controls().is_some() {
                session.dispatch(Target::MeanToggle, PointerEvent::Click);
            }
        }
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    for session in page.charts() {
        let path = out_dir.join(format!("{}.svg", session.id()));
        let document = svg::render(session)
            .with_context(|| format!("Failed to render chart {}", session.id()))?;
        fs::write(&path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}
