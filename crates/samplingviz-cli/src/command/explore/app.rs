use anyhow::anyhow;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use rand_pcg::Pcg64Mcg;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use samplingviz_chart::{
    config::DataSource,
    interaction::{PointerEvent, Target},
    page::Page,
    session::ChartSession,
    validate::ValidationResult,
};

use crate::{
    command::explore::widgets::{HistogramView, StatusLine, TableView},
    tui::App,
};

/// Feedback shown in the status pane.
#[derive(Debug, Clone)]
pub enum Message {
    Validation(ValidationResult),
    Info(String),
}

#[derive(Debug)]
pub struct ExploreApp {
    page: Page,
    current: usize,
    /// Bar under the keyboard "pointer".
    cursor: Option<usize>,
    rng: Pcg64Mcg,
    message: Option<Message>,
    should_exit: bool,
}

impl ExploreApp {
    pub fn new(page: Page, chart_id: &str, rng: Pcg64Mcg) -> anyhow::Result<Self> {
        let current = page
            .charts()
            .iter()
            .position(|c| c.id() == chart_id)
            .ok_or_else(|| anyhow!("Unknown chart: {chart_id}"))?;
        Ok(Self {
            page,
            current,
            cursor: None,
            rng,
            message: None,
            should_exit: false,
        })
    }

    pub fn session(&self) -> &ChartSession {
        &self.page.charts()[self.current]
    }

    fn session_mut(&mut self) -> &mut ChartSession {
        &mut self.page.charts_mut()[self.current]
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn dispatch(&mut self, target: Target, event: PointerEvent) {
        if !self.session_mut().dispatch(target, event) && event.is_click() {
            self.message = Some(Message::Info(format!(
                "{} does not react to clicks",
                self.session().id()
            )));
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.session().bars().len();
        if len == 0 {
            return;
        }
        let next = match (self.cursor, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        if self.cursor == Some(next) {
            return;
        }
        if let Some(prev) = self.cursor {
            self.session_mut()
                .dispatch(Target::Bin(prev), PointerEvent::Leave);
        }
        self.session_mut()
            .dispatch(Target::Bin(next), PointerEvent::Enter);
        self.cursor = Some(next);
    }

    fn click(&mut self) {
        if let Some(i) = self.cursor {
            self.dispatch(Target::Bin(i), PointerEvent::Click);
        }
    }

    fn check(&mut self, nth: usize) {
        let Some(id) = self.session().exercises().get(nth).map(|e| e.id.clone()) else {
            self.message = Some(Message::Info(format!(
                "{} has no exercise #{}",
                self.session().id(),
                nth + 1
            )));
            return;
        };
        self.message = self
            .session_mut()
            .check(&id)
            .cloned()
            .map(Message::Validation);
    }

    /// Draws a new sample for the current chart, or for the page's first sample
    /// chart when the current one is not a sample.
    fn draw_sample(&mut self) {
        let target = if matches!(self.session().spec().source, DataSource::SampleOf { .. }) {
            Some(self.session().id().to_owned())
        } else {
            self.page
                .charts()
                .iter()
                .find(|c| matches!(c.spec().source, DataSource::SampleOf { .. }))
                .map(|c| c.id().to_owned())
        };
        let Some(target) = target else {
            self.message = Some(Message::Info("This page has no sample chart".to_owned()));
            return;
        };
        self.message = Some(match self.page.draw_sample(&target, &mut self.rng) {
            Ok(sample) => {
                if target == self.session().id() {
                    self.cursor = None;
                }
                Message::Info(format!(
                    "Drew {} values for {target}",
                    sample.values.len()
                ))
            }
            Err(e) => Message::Info(e.to_string()),
        });
    }

    fn press_table_button(&mut self) {
        if self.session_mut().press_table_button().is_none() {
            self.message = Some(Message::Info("This chart's table cannot expand".to_owned()));
        }
    }

    fn next_chart(&mut self) {
        if let Some(prev) = self.cursor.take() {
            self.session_mut()
                .dispatch(Target::Bin(prev), PointerEvent::Leave);
        }
        self.current = (self.current + 1) % self.page.charts().len();
        self.message = None;
    }
}

impl App for ExploreApp {
    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Left => self.move_cursor(false),
            KeyCode::Right => self.move_cursor(true),
            KeyCode::Char(' ') | KeyCode::Enter => self.click(),
            KeyCode::Char('r') => self.dispatch(Target::Reset, PointerEvent::Click),
            KeyCode::Char('m') => self.dispatch(Target::MeanToggle, PointerEvent::Click),
            KeyCode::Char('1') => self.check(0),
            KeyCode::Char('2') => self.check(1),
            KeyCode::Char('s') => self.draw_sample(),
            KeyCode::Char('t') => self.press_table_button(),
            KeyCode::Tab => self.next_chart(),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [chart_area, table_area] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(main_area);

        let session = self.session();
        frame.render_widget(
            HistogramView {
                session,
                cursor: self.cursor(),
            },
            chart_area,
        );
        frame.render_widget(TableView { session }, table_area);
        frame.render_widget(
            StatusLine {
                session,
                message: self.message(),
            },
            status_area,
        );

        let help_text = Text::from(
            "←/→: Hover | Space/Enter: Click | r: Reset | m: Mean | 1/2: Check | s: Sample | t: Table | Tab: Chart | q/Esc: Quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .centered();
        frame.render_widget(help_text, help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use rand::SeedableRng as _;
    use samplingviz_chart::{config::PageConfig, interaction::BinState};

    use super::*;

    const HTML: &str = r#"
        <table id="pop-grades"><tbody>
          <tr><td>55</td></tr><tr><td>61</td></tr><tr><td>72</td></tr><tr><td>90</td></tr>
        </tbody></table>
        <table id="all-samples-fish"><tbody>
          <tr><td>A, B</td><td>38.2</td></tr>
          <tr><td>A, C</td><td>41.6</td></tr>
          <tr><td>B, C</td><td>43.5</td></tr>
          <tr><td>B, D</td><td>47.9</td></tr>
        </tbody></table>
        <table id="table-resident-income"><tbody>
          <tr><td>R1</td><td>42000</td></tr>
        </tbody></table>
    "#;

    fn app() -> ExploreApp {
        let page = Page::load(HTML, &PageConfig::default()).unwrap();
        ExploreApp::new(page, "sampling-dist-fish", Pcg64Mcg::seed_from_u64(0)).unwrap()
    }

    fn press(app: &mut ExploreApp, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::from(code)));
    }

    #[test]
    fn test_unknown_chart() {
        let page = Page::load(HTML, &PageConfig::default()).unwrap();
        assert!(ExploreApp::new(page, "nope", Pcg64Mcg::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_arrows_move_hover() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor(), Some(1));
        assert_eq!(app.session().bars()[0].state(), BinState::Default);
        assert_eq!(app.session().bars()[1].state(), BinState::Hovered);

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor(), Some(0));
    }

    #[test]
    fn test_click_locks_through_leave() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session().bars()[0].state(), BinState::Locked);
        assert_eq!(app.session().selected_bins(), [0, 1]);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.session().selected_bins().is_empty());
    }

    #[test]
    fn test_check_reports_result() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        let Some(Message::Validation(result)) = app.message() else {
            panic!("expected a validation message");
        };
        assert_eq!(result.exercise, "item-1");
        assert!(result.verdict.is_fail());
    }

    #[test]
    fn test_mean_and_table_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.session().mean_toggle().is_shown());
        press(&mut app, KeyCode::Char('t'));
        assert!(matches!(app.message(), Some(Message::Info(_))));
    }

    #[test]
    fn test_sample_and_switch_chart() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.page.chart("sample-dist").unwrap().is_visible());

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().id(), "pop-dist-activity");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }
}
