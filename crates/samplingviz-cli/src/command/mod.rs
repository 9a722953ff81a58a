use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{check::CheckArg, explore::ExploreArg, render::RenderArg, summary::SummaryArg};

mod check;
mod explore;
mod render;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages
    #[clap(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors
    #[clap(short, long, global = true)]
    quiet: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Render every chart of a page as SVG
    Render(#[clap(flatten)] RenderArg),
    /// Validate a bin selection against an exercise
    Check(#[clap(flatten)] CheckArg),
    /// Print descriptive statistics for each chart
    Summary(#[clap(flatten)] SummaryArg),
    /// Explore a chart interactively in the terminal
    Explore(#[clap(flatten)] ExploreArg),
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = CommandArgs::parse();
    // Log lines would corrupt the terminal UI
    let default_level = match args.mode {
        Mode::Explore(_) => "warn",
        _ => "info",
    };
    setup_logging(args.verbose, args.quiet, default_level);

    match &args.mode {
        Mode::Render(arg) => render::run(arg)?,
        Mode::Check(arg) => return check::run(arg),
        Mode::Summary(arg) => summary::run(arg)?,
        Mode::Explore(arg) => explore::run(arg)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the flags.
fn setup_logging(verbose: bool, quiet: bool, default_level: &str) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        default_level
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
