//! Terminal rendering.
//!
//! - [`board`]: metric tiles with sparklines
//! - [`overlay`]: hover graph
//! - [`common`]: header, status bar, help
//! - [`theme`]: light/dark themes

pub mod board;
pub mod common;
pub mod overlay;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use theme::Theme;

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        app.tile_areas.clear();
        app.viewport = Rect::default();
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
            .intersection(area);
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(3),    // Tiles
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    app.viewport = chunks[1];

    common::render_header(frame, app, chunks[0]);
    board::render(frame, app, chunks[1]);
    common::render_status_bar(frame, app, chunks[2]);

    overlay::render_overlay(frame, app);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
