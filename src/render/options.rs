//! Sparkline render options and band colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::ColorBand;

/// An RGB color written as six hex digits (`"61B867"`, a leading `#` is accepted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(format!("expected 6 hex digits, got '{}'", s));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::new)
            .map_err(|e| format!("invalid color '{}': {}", s, e))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

/// Line and fill colors used for one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandColors {
    pub line: HexColor,
    pub fill: HexColor,
}

/// Colors for every band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub green: BandColors,
    pub orange: BandColors,
    pub red: BandColors,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            green: BandColors {
                line: HexColor::new(0x61B867),
                fill: HexColor::new(0xD7FCD9),
            },
            orange: BandColors {
                line: HexColor::new(0xE3AA5B),
                fill: HexColor::new(0xFFE9C9),
            },
            red: BandColors {
                line: HexColor::new(0xCF4F48),
                fill: HexColor::new(0xFAC8C5),
            },
        }
    }
}

impl Palette {
    pub fn colors(&self, band: ColorBand) -> BandColors {
        match band {
            ColorBand::Green => self.green,
            ColorBand::Orange => self.orange,
            ColorBand::Red => self.red,
        }
    }
}

/// Options for drawing one sparkline.
///
/// The configured value acts as the base layout. Scaled metrics get a copy
/// with the band colors and axis maximum laid over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Bottom of the value axis.
    pub chart_range_min: f64,
    /// Top of the value axis; `None` scales to the data.
    pub chart_range_max: Option<f64>,
    /// Draw markers on the latest/min/max points.
    pub spot_markers: bool,
    pub line_width: u16,
    /// Nominal width in pixels, used when exporting the layout.
    pub width: u16,
    /// Nominal height in pixels, used when exporting the layout.
    pub height: u16,
    pub line_color: Option<HexColor>,
    pub fill_color: Option<HexColor>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chart_range_min: 0.0,
            chart_range_max: None,
            spot_markers: false,
            line_width: 2,
            width: 190,
            height: 70,
            line_color: None,
            fill_color: None,
        }
    }
}

impl RenderOptions {
    /// Copy of these options with the band colors and axis maximum applied.
    pub fn merged(&self, colors: BandColors, chart_range_max: f64) -> Self {
        Self {
            chart_range_max: Some(chart_range_max),
            line_color: Some(colors.line),
            fill_color: Some(colors.fill),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parse() {
        let c: HexColor = "61B867".parse().unwrap();
        assert_eq!(c.rgb(), (0x61, 0xB8, 0x67));
        assert_eq!("#cf4f48".parse::<HexColor>().unwrap(), HexColor::new(0xCF4F48));
        assert_eq!(c.to_string(), "61B867");

        assert!("61B8".parse::<HexColor>().is_err());
        assert!("GGGGGG".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_palette_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.colors(ColorBand::Red).line, HexColor::new(0xCF4F48));
        assert_eq!(palette.colors(ColorBand::Orange).fill, HexColor::new(0xFFE9C9));
        assert_eq!(palette.colors(ColorBand::Green).line, HexColor::new(0x61B867));
    }

    #[test]
    fn test_merged_keeps_layout() {
        let base = RenderOptions::default();
        let merged = base.merged(Palette::default().red, 100.0);

        assert_eq!(merged.chart_range_max, Some(100.0));
        assert_eq!(merged.line_color, Some(HexColor::new(0xCF4F48)));
        assert_eq!(merged.fill_color, Some(HexColor::new(0xFAC8C5)));
        assert_eq!(merged.chart_range_min, base.chart_range_min);
        assert_eq!(merged.width, 190);
        assert_eq!(merged.height, 70);
        assert_eq!(merged.line_width, 2);
        assert!(!merged.spot_markers);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let opts: RenderOptions = serde_json::from_str(r#"{"width": 120}"#).unwrap();
        assert_eq!(opts.width, 120);
        assert_eq!(opts.height, 70);
        assert!(opts.line_color.is_none());
    }
}
