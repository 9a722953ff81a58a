use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize as _},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, Block, List, ListItem, ListState, Paragraph, StatefulWidget, Widget,
    },
};
use samplingviz_chart::{interaction::BinBar, session::ChartSession};
use samplingviz_stats::ticks;

use crate::command::explore::app::Message;

const CELL_SEPARATOR: &str = " │ ";

/// Maps an SVG fill to the closest terminal color.
fn fill_color(fill: &str) -> Color {
    match fill {
        "steelblue" => Color::Rgb(70, 130, 180),
        other => other.parse().unwrap_or(Color::Reset),
    }
}

pub struct HistogramView<'a> {
    pub session: &'a ChartSession,
    pub cursor: Option<usize>,
}

impl HistogramView<'_> {
    fn bar(&self, bar: &BinBar) -> Bar<'static> {
        let bin = &bar.bin;
        let precision = ticks::precision_for_step(bin.x1() - bin.x0());
        let mut label_style = Style::default();
        if self.cursor == Some(bar.index) {
            label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        let style = bar.style();
        let mut chart_bar = Bar::with_label(
            Line::styled(format!("{:.precision$}", bin.x0()), label_style),
            bin.count,
        )
        .style(Style::default().fg(fill_color(style.fill)));
        chart_bar = if style.show_count {
            chart_bar.text_value(bin.count.to_string())
        } else {
            chart_bar.text_value(String::new())
        };
        chart_bar
    }

    fn bottom_line(&self) -> Option<Line<'static>> {
        let (mean, _) = self.session.controls()?;
        let toggle = self.session.mean_toggle();
        let mut spans = vec![
            Span::raw(format!(" Population Mean: {mean} ")),
            Span::styled(
                format!(" [m] {} ", toggle.label()),
                Style::default()
                    .fg(Color::White)
                    .bg(fill_color(toggle.fill())),
            ),
        ];
        if self.session.mean_line().is_some() {
            let bin = self
                .session
                .bars()
                .iter()
                .find(|bar| bar.bin.contains(mean))
                .map_or_else(|| "outside all bins".to_owned(), |bar| format!("in bin {}", bar.index));
            spans.push(Span::raw(format!(" mean line {bin} ")));
        }
        spans.push(Span::raw(" [r] Reset plot "));
        Some(Line::from(spans))
    }
}

impl Widget for HistogramView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let session = self.session;
        let mut block = Block::bordered().title(format!(
            " {} - {} ",
            session.id(),
            session.x_axis().label
        ));
        if let Some(line) = self.bottom_line() {
            block = block.title_bottom(line);
        }
        let inner = block.inner(area);
        Widget::render(block, area, buf);

        if !session.is_visible() {
            Paragraph::new("Press s to draw a sample")
                .centered()
                .dark_gray()
                .render(inner, buf);
            return;
        }

        let bars = session
            .bars()
            .iter()
            .map(|bar| self.bar(bar))
            .collect::<Vec<_>>();
        let num_bars = u16::try_from(bars.len()).unwrap_or(u16::MAX).max(1);
        let chart = BarChart::new(bars)
            .bar_width((inner.width / num_bars).max(1))
            .bar_gap(0);
        Widget::render(chart, inner, buf);
    }
}

pub struct TableView<'a> {
    pub session: &'a ChartSession,
}

impl Widget for TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let Some(table) = self.session.table() else {
            Paragraph::new("No source table")
                .block(Block::bordered().title(" Data "))
                .render(area, buf);
            return;
        };
        let highlighted = self
            .session
            .highlighted_cells()
            .into_iter()
            .collect::<HashSet<_>>();

        let rows = match self.session.collapsible() {
            Some(collapsible) => collapsible.visible_rows(table).collect::<Vec<_>>(),
            None => table
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| !row.is_structural())
                .collect(),
        };
        let first_highlight = rows.iter().position(|(row, _)| {
            highlighted.iter().any(|cell| cell.row == *row)
        });
        let items = rows
            .iter()
            .map(|&(row, table_row)| {
                let mut spans = vec![];
                for (col, cell) in table_row.cells.iter().enumerate() {
                    if col > 0 {
                        spans.push(Span::raw(CELL_SEPARATOR));
                    }
                    let style = if highlighted.iter().any(|c| c.row == row && c.col == col) {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    spans.push(Span::styled(cell.text.clone(), style));
                }
                ListItem::new(Line::from(spans))
            })
            .collect::<Vec<_>>();

        let mut block = Block::bordered().title(format!(" {} ({} rows) ", table.id, rows.len()));
        if let Some(collapsible) = self.session.collapsible() {
            block = block.title_bottom(format!(" [t] {} ", collapsible.button_label()));
        }
        let list = List::new(items).block(block);

        // Keep the first highlighted row in view
        let mut state = ListState::default();
        state.select(first_highlight);
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

pub struct StatusLine<'a> {
    pub session: &'a ChartSession,
    pub message: Option<&'a Message>,
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::bordered().title(" Status ");
        let paragraph = match self.message {
            Some(Message::Validation(result)) => {
                let text = result
                    .alert
                    .clone()
                    .unwrap_or_else(|| "You selected the right bins.".to_owned());
                Paragraph::new(format!("{}: {text}", result.exercise)).style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(fill_color(result.status_color)),
                )
            }
            Some(Message::Info(text)) => Paragraph::new(text.as_str()),
            None => {
                let exercises = self
                    .session
                    .exercises()
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("[{}] check {}", i + 1, e.id))
                    .collect::<Vec<_>>();
                if exercises.is_empty() {
                    Paragraph::new("No exercises on this chart").dark_gray()
                } else {
                    Paragraph::new(exercises.join("  ")).dark_gray()
                }
            }
        };
        paragraph.block(block).render(area, buf);
    }
}
