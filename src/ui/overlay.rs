//! Hover graph overlay rendering.
//!
//! Draws the larger history graph for the hovered tile at the position the
//! placement logic picked.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, OverlayGraph};
use crate::data::format_number;
use crate::source::Sample;

/// Render the overlay if one is open.
pub fn render_overlay(frame: &mut Frame, app: &App) {
    let (Some(placement), Some(graph)) = (app.overlay_placement(), app.overlay_graph.as_ref())
    else {
        return;
    };
    let area = placement.area;
    let metric = graph.metric();

    let tile = app.board.tile(metric);
    let color = app
        .theme
        .line_color(tile.and_then(|t| t.options.line_color));

    let block = Block::default()
        .title(format!(" {} ", metric))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(color));

    frame.render_widget(Clear, area);

    match graph {
        OverlayGraph::Loading { url, .. } => {
            let text = vec![
                Line::from(Span::styled(" Loading graph...", app.theme.header)),
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {}", url),
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ];
            let paragraph = Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        OverlayGraph::Failed { error, .. } => {
            let text = vec![
                Line::from(Span::styled(
                    " Graph unavailable",
                    Style::default().fg(app.theme.red),
                )),
                Line::from(""),
                Line::from(format!(" {}", error)),
            ];
            let paragraph = Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        OverlayGraph::Ready { series, .. } => {
            let period = app.graph_period_secs().unwrap_or_default();
            let x_labels = vec![
                Span::raw(format!("-{}", format_period(period))),
                Span::raw("now"),
            ];
            let x_bounds = series.time_bounds().map_or([0.0, 1.0], |(a, b)| [a, b]);
            render_chart(frame, area, block, &series.points, x_bounds, x_labels, color);
        }
        OverlayGraph::Local { .. } => {
            let samples = tile.map(|t| t.samples.as_slice()).unwrap_or_default();
            let points = local_points(samples);
            let x_labels = vec![
                Span::raw(format!("-{}", samples.len().saturating_sub(1))),
                Span::raw("now"),
            ];
            let x_max = points.last().map_or(1.0, |&(x, _)| x.max(1.0));
            render_chart(frame, area, block, &points, [0.0, x_max], x_labels, color);
        }
    }
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    points: &[(f64, f64)],
    x_bounds: [f64; 2],
    x_labels: Vec<Span>,
    color: ratatui::style::Color,
) {
    if points.is_empty() {
        let paragraph = Paragraph::new(" No datapoints in range")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let [y_min, y_max] = value_axis(points);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds(x_bounds).labels(x_labels))
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_number(y_min)),
                    Span::raw(format_number(y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Samples as `(index, value)` points; non-numeric samples are gaps.
pub fn local_points(samples: &[Sample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_f64().map(|v| (i as f64, v)))
        .collect()
}

/// Y axis bounds from zero (or the lowest value, if negative) to the highest.
fn value_axis(points: &[(f64, f64)]) -> [f64; 2] {
    let (lo, hi) = points
        .iter()
        .fold((0.0_f64, f64::MIN), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
    if hi <= lo {
        [lo, lo + 1.0]
    } else {
        [lo, hi]
    }
}

/// Short lookback label: `90s`, `15m`, `1h`, `2d`.
pub fn format_period(secs: u64) -> String {
    match secs {
        s if s >= 86_400 && s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s >= 3_600 && s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s >= 60 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_period() {
        assert_eq!(format_period(3600), "1h");
        assert_eq!(format_period(900), "15m");
        assert_eq!(format_period(90), "90s");
        assert_eq!(format_period(172_800), "2d");
    }

    #[test]
    fn test_local_points_skip_non_numeric() {
        let samples = vec![
            Sample::from(1.0),
            Sample::Other(serde_json::Value::Null),
            Sample::from(3.0),
        ];
        assert_eq!(local_points(&samples), vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_value_axis() {
        assert_eq!(value_axis(&[(0.0, 2.0), (1.0, 5.0)]), [0.0, 5.0]);
        assert_eq!(value_axis(&[(0.0, -1.0), (1.0, 5.0)]), [-1.0, 5.0]);
        assert_eq!(value_axis(&[(0.0, 0.0)]), [0.0, 1.0]);
    }
}
