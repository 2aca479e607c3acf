//! Common UI components.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::ColorBand;

/// Render the header bar with band counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.last_updated.is_none() {
        let line = Line::from(vec![
            Span::styled(" PULSE ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let (green, orange, red) = app.board.band_counts();

    let worst = if red > 0 {
        ColorBand::Red
    } else if orange > 0 {
        ColorBand::Orange
    } else {
        ColorBand::Green
    };

    let count = |n: usize, band: ColorBand| {
        if n > 0 {
            Span::styled(n.to_string(), app.theme.band_style(band))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.band_style(worst)),
        Span::styled("PULSE ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        count(green, ColorBand::Green),
        Span::raw(" ok "),
        count(orange, ColorBand::Orange),
        Span::raw(" warn "),
        count(red, ColorBand::Red),
        Span::raw(" crit │ "),
        Span::styled(
            app.board.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" metrics │ "),
        Span::raw(app.source_description().to_string()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows time since last update and the poll error, if any. Temporary
/// status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "hover:graph r:refresh e:export ?:help q:quit";

    let (status, style) = match (app.last_updated, &app.load_error) {
        (Some(updated), Some(err)) => (
            format!(
                " Error: {} | last data {:.1}s ago | {}",
                err,
                updated.elapsed().as_secs_f64(),
                controls
            ),
            Style::default().fg(app.theme.red),
        ),
        (Some(updated), None) => (
            format!(
                " Updated {:.1}s ago | #{} | {}",
                updated.elapsed().as_secs_f64(),
                app.last_request_id.unwrap_or_default(),
                controls
            ),
            Style::default().add_modifier(Modifier::DIM),
        ),
        (None, Some(err)) => (
            format!(" Error: {} | q:quit r:retry", err),
            Style::default().fg(app.theme.red),
        ),
        (None, None) => (
            " Loading... | q:quit".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the board.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Pulse", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Mouse",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  hover     Show history graph"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  Esc       Close graph"),
        Line::from("  ?         Toggle help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
