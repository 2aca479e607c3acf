//! Board of metric tiles.
//!
//! The board is the [`Display`] the terminal draws from. Each tile holds a
//! metric's scalar text and its latest sparkline series.

use std::time::Instant;

use serde::Serialize;

use super::{Display, RenderOptions};
use crate::data::ColorBand;
use crate::source::Sample;

/// Display state for one metric.
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub name: String,
    /// Formatted latest value; `None` when it was not numeric.
    pub scalar: Option<String>,
    pub samples: Vec<Sample>,
    pub options: RenderOptions,
    pub band: Option<ColorBand>,
    #[serde(skip)]
    pub updated: Option<Instant>,
}

impl Tile {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scalar: None,
            samples: Vec::new(),
            options: RenderOptions::default(),
            band: None,
            updated: None,
        }
    }

    /// Whether any poll has written to this tile yet.
    pub fn has_data(&self) -> bool {
        self.updated.is_some()
    }
}

/// Ordered collection of tiles.
///
/// A fixed board only has tiles for the metrics it was created with, so
/// anything else in a snapshot has no target. An automatic board grows a tile
/// for every metric it is asked to display.
#[derive(Debug, Clone, Default)]
pub struct Board {
    tiles: Vec<Tile>,
    auto: bool,
}

impl Board {
    /// Board with a tile per listed metric, in the given order.
    pub fn fixed<I, S>(metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tiles: Vec<Tile> = Vec::new();
        for name in metrics {
            let name = name.as_ref();
            if !tiles.iter().any(|t| t.name == name) {
                tiles.push(Tile::new(name));
            }
        }
        Self { tiles, auto: false }
    }

    /// Board that creates tiles on demand.
    pub fn auto() -> Self {
        Self {
            tiles: Vec::new(),
            auto: true,
        }
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, metric: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.name == metric)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of tiles currently in each band (green, orange, red).
    pub fn band_counts(&self) -> (usize, usize, usize) {
        self.tiles.iter().fold((0, 0, 0), |(g, o, r), t| match t.band {
            Some(ColorBand::Green) => (g + 1, o, r),
            Some(ColorBand::Orange) => (g, o + 1, r),
            Some(ColorBand::Red) => (g, o, r + 1),
            None => (g, o, r),
        })
    }

    fn tile_mut(&mut self, metric: &str) -> Option<&mut Tile> {
        if let Some(idx) = self.tiles.iter().position(|t| t.name == metric) {
            return self.tiles.get_mut(idx);
        }
        if self.auto {
            self.tiles.push(Tile::new(metric));
            return self.tiles.last_mut();
        }
        None
    }
}

impl Display for Board {
    fn has_scalar(&self, metric: &str) -> bool {
        self.auto || self.tile(metric).is_some()
    }

    fn update_sparkline(&mut self, metric: &str, samples: &[Sample], options: &RenderOptions) {
        if let Some(tile) = self.tile_mut(metric) {
            tile.samples = samples.to_vec();
            tile.options = options.clone();
            tile.updated = Some(Instant::now());
        }
    }

    fn update_scalar(&mut self, metric: &str, text: Option<String>) {
        if let Some(tile) = self.tile_mut(metric) {
            tile.scalar = text;
            tile.updated = Some(Instant::now());
        }
    }

    fn update_band(&mut self, metric: &str, band: Option<ColorBand>) {
        if let Some(tile) = self.tile_mut(metric) {
            tile.band = band;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ThresholdScale;
    use crate::render::{Palette, Renderer};
    use crate::source::snapshot_from;

    fn renderer() -> Renderer {
        let mut thresholds = crate::data::Thresholds::new();
        thresholds.insert("cpu".to_string(), ThresholdScale::new(50.0, 90.0, 100.0));
        Renderer::new(thresholds, RenderOptions::default(), Palette::default())
    }

    #[test]
    fn test_fixed_board_ignores_unknown_metrics() {
        let mut board = Board::fixed(["cpu", "mem"]);
        let stats = snapshot_from([
            ("cpu", vec![10.0, 20.0, 95.0]),
            ("mem", vec![1.2, 1.8]),
            ("disk", vec![5.0]),
        ]);

        renderer().render(&stats, &mut board);

        assert_eq!(board.len(), 2);
        assert!(board.tile("disk").is_none());

        let cpu = board.tile("cpu").unwrap();
        assert_eq!(cpu.scalar.as_deref(), Some("95"));
        assert_eq!(cpu.band, Some(ColorBand::Red));
        assert_eq!(cpu.options.chart_range_max, Some(100.0));

        let mem = board.tile("mem").unwrap();
        assert_eq!(mem.scalar.as_deref(), Some("1.80"));
        assert_eq!(mem.band, None);
        assert_eq!(mem.options, RenderOptions::default());
        assert_eq!(mem.samples.len(), 2);
    }

    #[test]
    fn test_fixed_board_keeps_order_and_dedups() {
        let board = Board::fixed(["mem", "cpu", "mem"]);
        let names: Vec<&str> = board.tiles().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["mem", "cpu"]);
        assert!(!board.tile("mem").unwrap().has_data());
    }

    #[test]
    fn test_auto_board_grows() {
        let mut board = Board::auto();
        assert!(board.has_scalar("anything"));

        let stats = snapshot_from([("a", vec![1.0]), ("b", vec![3.0])]);
        renderer().render(&stats, &mut board);

        assert_eq!(board.len(), 2);
        assert_eq!(board.tile("b").unwrap().scalar.as_deref(), Some("3"));
    }

    #[test]
    fn test_band_counts() {
        let mut board = Board::fixed(["cpu", "mem"]);
        let stats = snapshot_from([("cpu", vec![60.0]), ("mem", vec![1.0])]);
        renderer().render(&stats, &mut board);

        assert_eq!(board.band_counts(), (0, 1, 0));
    }

    #[test]
    fn test_later_render_replaces_tile() {
        let mut board = Board::fixed(["cpu"]);
        let r = renderer();
        r.render(&snapshot_from([("cpu", vec![95.0])]), &mut board);
        r.render(&snapshot_from([("cpu", vec![95.0, 10.0])]), &mut board);

        let cpu = board.tile("cpu").unwrap();
        assert_eq!(cpu.band, Some(ColorBand::Green));
        assert_eq!(cpu.scalar.as_deref(), Some("10"));
        assert_eq!(cpu.samples.len(), 2);
    }
}
