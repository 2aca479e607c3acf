//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::ColorBand;
use crate::render::HexColor;

/// Color and style theme for the TUI.
///
/// Band colors come from each tile's render options; the theme only covers
/// chrome and tiles that have no band.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for tiles without a threshold scale.
    pub neutral: Color,
    /// Header counts, by band.
    pub green: Color,
    pub orange: Color,
    pub red: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for headings inside overlays.
    pub header: Style,
    /// Style for the large scalar value in a tile.
    pub scalar: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            neutral: Color::Gray,
            green: Color::Green,
            orange: Color::Yellow,
            red: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            scalar: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            neutral: Color::DarkGray,
            green: Color::Green,
            orange: Color::Yellow,
            red: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            scalar: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a band in the header counts
    pub fn band_style(&self, band: ColorBand) -> Style {
        match band {
            ColorBand::Green => Style::default().fg(self.green),
            ColorBand::Orange => Style::default().fg(self.orange),
            ColorBand::Red => Style::default().fg(self.red).add_modifier(Modifier::BOLD),
        }
    }

    /// Line color for a tile, falling back to the neutral color.
    pub fn line_color(&self, color: Option<HexColor>) -> Color {
        color.map_or(self.neutral, rgb)
    }
}

/// Convert a configured hex color to a terminal color.
pub fn rgb(color: HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}
