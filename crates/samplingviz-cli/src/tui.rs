//! Minimal terminal application runner.

use crossterm::event::{self, Event};
use ratatui::Frame;

/// An application driven by [`run`].
pub trait App {
    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key input, resize, ...).
    fn handle_event(&mut self, event: &Event);

    fn draw(&self, frame: &mut Frame);
}

/// Runs `app` on the alternate screen, redrawing after every event, until it
/// asks to exit. The terminal is restored on return.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    ratatui::run(|terminal| {
        while !app.should_exit() {
            terminal.draw(|f| app.draw(f))?;
            let event = event::read()?;
            app.handle_event(&event);
        }
        Ok(())
    })
}
