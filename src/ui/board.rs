//! Tile grid rendering.
//!
//! Each metric gets a bordered tile with its latest value and a sparkline of
//! its history. Border and sparkline take the tile's band colors.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::render::{RenderOptions, Tile};
use crate::source::Sample;

/// Tile size in cells, borders included.
pub const TILE_WIDTH: u16 = 28;
pub const TILE_HEIGHT: u16 = 7;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the board and record where each tile landed.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    app.tile_areas.clear();

    if app.board.is_empty() {
        let text = if app.board.is_auto() {
            " Waiting for metrics..."
        } else {
            " No metrics configured"
        };
        let paragraph =
            Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let areas = tile_layout(area, app.board.len());
    for (tile, tile_area) in app.board.tiles().iter().zip(&areas) {
        render_tile(frame, app, tile, *tile_area);
    }

    app.tile_areas = app
        .board
        .tiles()
        .iter()
        .zip(areas)
        .map(|(tile, area)| (tile.name.clone(), area))
        .collect();
}

/// Lay `count` tiles out left to right, top to bottom.
///
/// Tiles that do not fit vertically are left out.
pub fn tile_layout(area: Rect, count: usize) -> Vec<Rect> {
    let columns = (area.width / TILE_WIDTH).max(1);
    let width = area.width / columns;
    let rows = area.height / TILE_HEIGHT;

    (0..count)
        .map_while(|i| {
            let row = u16::try_from(i / usize::from(columns)).ok()?;
            if row >= rows {
                return None;
            }
            let col = u16::try_from(i % usize::from(columns)).ok()?;
            Some(Rect::new(
                area.x + col * width,
                area.y + row * TILE_HEIGHT,
                width,
                TILE_HEIGHT,
            ))
        })
        .collect()
}

fn render_tile(frame: &mut Frame, app: &App, tile: &Tile, area: Rect) {
    let color = app.theme.line_color(tile.options.line_color);
    let hovered = app
        .hover
        .hovered()
        .is_some_and(|target| target.metric == tile.name);

    let mut border_style = Style::default().fg(color);
    if hovered {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let title = match tile.band {
        Some(band) => format!(" {} {} ", tile.name, band.symbol()),
        None => format!(" {} ", tile.name),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let scalar = if tile.has_data() {
        tile.scalar.clone().unwrap_or_default()
    } else {
        "-".to_string()
    };
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", scalar),
        app.theme.scalar.fg(color),
    ))];

    let chart_height = inner.height.saturating_sub(1);
    let levels = sparkline_levels(
        &tile.samples,
        &tile.options,
        usize::from(inner.width),
        chart_height,
    );
    lines.extend(
        sparkline_rows(&levels, chart_height)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, Style::default().fg(color)))),
    );

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Bar heights in eighths of a cell for the last `width` samples.
///
/// Values are scaled between the options' range min and max. Without a
/// configured max the largest sample is used. Non-numeric samples draw as
/// empty columns.
pub fn sparkline_levels(
    samples: &[Sample],
    options: &RenderOptions,
    width: usize,
    height: u16,
) -> Vec<u16> {
    let start = samples.len().saturating_sub(width);
    let visible = &samples[start..];

    let min = options.chart_range_min;
    let max = options.chart_range_max.unwrap_or_else(|| {
        visible
            .iter()
            .filter_map(Sample::as_f64)
            .fold(min, f64::max)
    });
    let span = max - min;
    let full = f64::from(height) * 8.0;

    visible
        .iter()
        .map(|sample| match sample.as_f64() {
            Some(v) if span > 0.0 => {
                let ratio = ((v - min) / span).clamp(0.0, 1.0);
                (ratio * full).round() as u16
            }
            _ => 0,
        })
        .collect()
}

/// Turn bar heights into `height` rows of block characters, top row first.
pub fn sparkline_rows(levels: &[u16], height: u16) -> Vec<String> {
    (0..height)
        .rev()
        .map(|row| {
            levels
                .iter()
                .map(|&level| {
                    let fill = level.saturating_sub(row * 8).min(8);
                    if fill == 0 {
                        ' '
                    } else {
                        SPARKLINE_CHARS[usize::from(fill - 1)]
                    }
                })
                .collect()
        })
        .collect()
}
