use std::process::ExitCode;

mod command;
mod tui;
mod util;

fn main() -> anyhow::Result<ExitCode> {
    command::run()
}
