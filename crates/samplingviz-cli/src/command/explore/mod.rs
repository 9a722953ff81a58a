use crate::{
    tui,
    util::{self, PageArg},
};

use self::app::ExploreApp;

mod app;
mod widgets;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExploreArg {
    #[clap(flatten)]
    page: PageArg,
    /// Chart to open first
    #[clap(long, default_value = "sampling-dist-fish")]
    chart: String,
    /// Seed for drawing sample charts
    #[clap(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &ExploreArg) -> anyhow::Result<()> {
    let ExploreArg { page, chart, seed } = arg;

    let page = page.load()?;
    let mut app = ExploreApp::new(page, chart, util::rng(*seed))?;
    tui::run(&mut app)
}
