//! Static SVG rendering of a chart in its current visual state.

use std::fmt::{self, Write as _};

use crate::{
    axis::{Axis, Orientation},
    interaction::{RESET_BUTTON_FILL, RESET_LABEL},
    session::ChartSession,
};

const TICK_SIZE: f64 = 6.0;
const MEAN_BUTTON_SIZE: (f64, f64) = (140.0, 35.0);
const RESET_BUTTON_SIZE: (f64, f64) = (108.0, 35.0);
const BUTTON_TEXT_INSET: (f64, f64) = (8.0, 23.0);
const MEAN_LINE_WIDTH: f64 = 3.0;

/// Renders `session` as a standalone SVG document.
///
/// Hidden charts render as an empty canvas of the same size.
pub fn render(session: &ChartSession) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let width = session.layout().width;
    let height = session.spec().height;
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{id}\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        id = escape_xml(session.id()),
    )?;
    if session.is_visible() {
        write_bars(&mut out, session)?;
        write_axis(&mut out, session.x_axis(), session)?;
        write_axis(&mut out, session.y_axis(), session)?;
        write_controls(&mut out, session)?;
    }
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn write_bars(out: &mut String, session: &ChartSession) -> fmt::Result {
    writeln!(out, "<g class=\"bars\">")?;
    for bar in session.bars() {
        let Some(g) = session.bar_geometry(bar.index) else {
            continue;
        };
        let style = bar.style();
        writeln!(
            out,
            "<rect class=\"bin\" data-bin=\"{}\" data-state=\"{:?}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" cursor=\"{}\"/>",
            bar.index,
            bar.state(),
            g.x,
            g.y,
            g.width,
            g.height,
            style.fill,
            style.cursor.as_css(),
        )?;
    }
    for label in session.count_labels() {
        writeln!(
            out,
            "<text class=\"freq\" data-bin=\"{}\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
            label.bar, label.x, label.y, label.text,
        )?;
    }
    writeln!(out, "</g>")
}

fn write_axis(out: &mut String, axis: &Axis, session: &ChartSession) -> fmt::Result {
    let [r0, r1] = axis.scale.range();
    match axis.orientation {
        Orientation::Bottom => {
            let y = axis.offset;
            writeln!(out, "<g class=\"x-axis\">")?;
            writeln!(
                out,
                "<line x1=\"{r0:.2}\" y1=\"{y:.2}\" x2=\"{r1:.2}\" y2=\"{y:.2}\" stroke=\"black\"/>"
            )?;
            for tick in &axis.ticks {
                let x = tick.position;
                writeln!(
                    out,
                    "<line x1=\"{x:.2}\" y1=\"{y:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"black\"/>",
                    y + TICK_SIZE
                )?;
                writeln!(
                    out,
                    "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"10\">{}</text>",
                    y + TICK_SIZE * 3.0,
                    escape_xml(&tick.label)
                )?;
            }
            writeln!(
                out,
                "<text class=\"axis-label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
                f64::midpoint(r0, r1),
                session.spec().height - 2.0,
                escape_xml(&axis.label)
            )?;
        }
        Orientation::Left => {
            let x = axis.offset;
            writeln!(out, "<g class=\"y-axis\">")?;
            writeln!(
                out,
                "<line x1=\"{x:.2}\" y1=\"{r0:.2}\" x2=\"{x:.2}\" y2=\"{r1:.2}\" stroke=\"black\"/>"
            )?;
            for tick in &axis.ticks {
                let y = tick.position;
                writeln!(
                    out,
                    "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{x:.2}\" y2=\"{y:.2}\" stroke=\"black\"/>",
                    x - TICK_SIZE
                )?;
                writeln!(
                    out,
                    "<text x=\"{:.2}\" y=\"{y:.2}\" dy=\"0.32em\" text-anchor=\"end\" font-size=\"10\">{}</text>",
                    x - TICK_SIZE * 1.5,
                    escape_xml(&tick.label)
                )?;
            }
            let cy = f64::midpoint(r0, r1);
            writeln!(
                out,
                "<text class=\"axis-label\" x=\"12\" y=\"{cy:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 12 {cy:.2})\">{}</text>",
                escape_xml(&axis.label)
            )?;
        }
    }
    writeln!(out, "</g>")
}

fn write_controls(out: &mut String, session: &ChartSession) -> fmt::Result {
    let Some((mean, controls)) = session.controls() else {
        return Ok(());
    };
    let x = session.x_scale();
    let y = session.y_scale();

    writeln!(
        out,
        "<text class=\"plot-subtitle\" x=\"{:.2}\" y=\"{:.2}\" dy=\"6px\" text-anchor=\"start\">Population Mean: {mean}</text>",
        x.scale(controls.subtitle.x),
        y.scale(controls.subtitle.y),
    )?;

    let toggle = session.mean_toggle();
    let (bx, by) = (x.scale(controls.mean_button.x), y.scale(controls.mean_button.y));
    writeln!(
        out,
        "<g class=\"mean-toggle\" cursor=\"{}\">",
        toggle.cursor().as_css()
    )?;
    write_button(out, (bx, by), MEAN_BUTTON_SIZE, toggle.fill(), toggle.label())?;
    if let Some(line) = session.mean_line() {
        writeln!(
            out,
            "<line class=\"mean-line\" x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"black\" stroke-width=\"{MEAN_LINE_WIDTH}\"/>",
            line.y_bottom,
            line.y_top,
            x = line.x,
        )?;
    }
    writeln!(out, "</g>")?;

    let (rx, ry) = (x.scale(controls.reset_button.x), y.scale(controls.reset_button.y));
    writeln!(out, "<g class=\"reset\">")?;
    write_button(out, (rx, ry), RESET_BUTTON_SIZE, RESET_BUTTON_FILL, RESET_LABEL)?;
    writeln!(out, "</g>")
}

fn write_button(
    out: &mut String,
    (x, y): (f64, f64),
    (width, height): (f64, f64),
    fill: &str,
    label: &str,
) -> fmt::Result {
    writeln!(
        out,
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width}\" height=\"{height}\" fill=\"{fill}\"/>"
    )?;
    writeln!(
        out,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"15px\" fill=\"white\">{}</text>",
        x + BUTTON_TEXT_INSET.0,
        y + BUTTON_TEXT_INSET.1,
        escape_xml(label)
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PageConfig,
        interaction::{PointerEvent, Target},
    };

    fn fish() -> ChartSession {
        let config = PageConfig::default();
        let spec = config.chart("sampling-dist-fish").unwrap().clone();
        ChartSession::new(spec, config.layout, vec![40.2, 41.7, 43.1, 44.9, 45.3], None)
    }

    #[test]
    fn test_bars_are_tagged() {
        let session = fish();
        let svg = render(&session).unwrap();
        assert_eq!(svg.matches("class=\"bin\"").count(), session.bars().len());
        assert!(svg.contains("data-bin=\"0\""));
        assert!(!svg.contains("class=\"freq\""));
    }

    #[test]
    fn test_active_bins_show_counts() {
        let mut session = fish();
        session.dispatch(Target::Bin(1), PointerEvent::Click);
        let svg = render(&session).unwrap();
        assert_eq!(svg.matches("class=\"freq\"").count(), 1);
        assert!(svg.contains("fill=\"red\""));
    }

    #[test]
    fn test_mean_line_follows_toggle() {
        let mut session = fish();
        let svg = render(&session).unwrap();
        assert!(svg.contains("Show true mean"));
        assert!(svg.contains("Population Mean: 43.45"));
        assert!(!svg.contains("mean-line"));

        session.dispatch(Target::MeanToggle, PointerEvent::Click);
        let svg = render(&session).unwrap();
        assert!(svg.contains("Hide true mean"));
        assert!(svg.contains("class=\"mean-line\""));
    }

    #[test]
    fn test_pointer_cursor_on_hover() {
        let mut session = fish();
        let svg = render(&session).unwrap();
        assert!(!svg.contains("cursor=\"pointer\""));

        session.dispatch(Target::Bin(2), PointerEvent::Enter);
        session.dispatch(Target::MeanToggle, PointerEvent::Enter);
        let svg = render(&session).unwrap();
        assert!(svg.contains("fill=\"red\" cursor=\"pointer\""));
        assert!(svg.contains("<g class=\"mean-toggle\" cursor=\"pointer\">"));
        assert_eq!(svg.matches("cursor=\"pointer\"").count(), 2);
    }

    #[test]
    fn test_hidden_chart_is_empty() {
        let config = PageConfig::default();
        let spec = config.chart("sample-dist").unwrap().clone();
        let svg = render(&ChartSession::hidden(spec, config.layout)).unwrap();
        assert!(!svg.contains("<rect"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
