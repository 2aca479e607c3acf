//! Application state and interaction logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::overlay::{
    place_overlay, GraphFetcher, GraphSeries, HoverTarget, HoverTracker, Placement,
};
use crate::render::{Board, Renderer};
use crate::source::DataSource;
use crate::ui::Theme;

/// Size of the hover graph overlay in cells.
pub const OVERLAY_WIDTH: u16 = 64;
pub const OVERLAY_HEIGHT: u16 = 18;

/// Graph shown in the hover overlay.
#[derive(Debug, Clone)]
pub enum OverlayGraph {
    /// Fetch in flight.
    Loading { metric: String, url: String },
    Ready { metric: String, series: GraphSeries },
    Failed { metric: String, error: String },
    /// No graph service configured; the tile's own history is drawn.
    Local { metric: String },
}

impl OverlayGraph {
    pub fn metric(&self) -> &str {
        match self {
            OverlayGraph::Loading { metric, .. }
            | OverlayGraph::Ready { metric, .. }
            | OverlayGraph::Failed { metric, .. }
            | OverlayGraph::Local { metric } => metric,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    renderer: Renderer,
    pub board: Board,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,
    pub last_request_id: Option<u64>,

    // Hover overlay
    pub hover: HoverTracker,
    graphs: Option<GraphFetcher>,
    pub overlay_graph: Option<OverlayGraph>,

    /// Tile areas from the last draw, for mouse hit-testing.
    pub tile_areas: Vec<(String, Rect)>,
    /// Area available to overlays in the last draw.
    pub viewport: Rect,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source` and drawing into `board`.
    pub fn new(source: Box<dyn DataSource>, renderer: Renderer, board: Board) -> Self {
        Self {
            running: true,
            show_help: false,
            source,
            renderer,
            board,
            load_error: None,
            last_updated: None,
            last_request_id: None,
            hover: HoverTracker::default(),
            graphs: None,
            overlay_graph: None,
            tile_areas: Vec::new(),
            viewport: Rect::default(),
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Use a custom hover delay.
    pub fn with_hover_delay(mut self, delay: Duration) -> Self {
        self.hover = HoverTracker::new(delay);
        self
    }

    /// Fetch hover graphs from a graph service.
    pub fn with_graphs(mut self, fetcher: GraphFetcher) -> Self {
        self.graphs = Some(fetcher);
        self
    }

    /// Use a specific theme (defaults to dark).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Lookback of hover graphs, when a graph service is configured.
    pub fn graph_period_secs(&self) -> Option<u64> {
        self.graphs.as_ref().map(|g| g.client().period_secs())
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source and render anything new onto the board.
    ///
    /// Returns true if a snapshot was applied. A failed poll only updates
    /// `load_error`; the board keeps its last state.
    pub fn reload_data(&mut self) -> bool {
        match self.source.poll() {
            Some(polled) => {
                self.renderer.render(&polled.stats, &mut self.board);
                debug!(
                    request_id = polled.request_id,
                    metrics = polled.stats.len(),
                    "at=rendered"
                );
                self.last_request_id = Some(polled.request_id);
                self.last_updated = Some(Instant::now());
                self.load_error = None;
                true
            }
            None => {
                self.load_error = self.source.error();
                false
            }
        }
    }

    /// Ask the source for fresh data now and apply it.
    pub fn force_reload(&mut self) -> bool {
        self.source.refresh();
        self.reload_data()
    }

    /// Pointer moved to a cell; start or drop the hover accordingly.
    pub fn hover_at(&mut self, column: u16, row: u16, now: Instant) {
        let position = Position::new(column, row);
        let hit = self
            .tile_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(metric, area)| HoverTarget::new(metric.clone(), *area));

        let change = match hit {
            Some(target) => self.hover.enter(target, now),
            None => self.hover.leave(),
        };

        if change.removed > 0 {
            self.overlay_graph = None;
        }
    }

    /// Close the overlay and cancel any pending hover.
    pub fn close_overlay(&mut self) {
        self.hover.reset();
        self.overlay_graph = None;
    }

    /// Advance timers and collect finished graph fetches.
    pub fn tick(&mut self, now: Instant) {
        if let Some(target) = self.hover.tick(now) {
            let metric = target.metric.clone();
            self.open_graph(metric);
        }

        let Some(graphs) = self.graphs.as_mut() else {
            return;
        };
        while let Some(done) = graphs.try_recv() {
            let still_shown = self
                .overlay_graph
                .as_ref()
                .is_some_and(|g| g.metric() == done.metric);
            if !still_shown {
                debug!(metric = %done.metric, "dropping graph for closed overlay");
                continue;
            }
            self.overlay_graph = Some(match done.result {
                Ok(series) => OverlayGraph::Ready {
                    metric: done.metric,
                    series,
                },
                Err(e) => OverlayGraph::Failed {
                    metric: done.metric,
                    error: e.to_string(),
                },
            });
        }
    }

    fn open_graph(&mut self, metric: String) {
        self.overlay_graph = Some(match &self.graphs {
            Some(graphs) => {
                graphs.request(&metric);
                OverlayGraph::Loading {
                    url: graphs.client().render_url(&metric),
                    metric,
                }
            }
            None => OverlayGraph::Local { metric },
        });
    }

    /// Where the open overlay goes, if one is open.
    pub fn overlay_placement(&self) -> Option<Placement> {
        let target = self.hover.shown()?;
        Some(place_overlay(
            target.anchor,
            OVERLAY_WIDTH,
            OVERLAY_HEIGHT,
            self.viewport,
        ))
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the board to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.last_updated.is_none() {
            anyhow::bail!("No data to export");
        }
        write_export(&self.board, self.last_request_id, path)
    }
}

/// Write the board as JSON: band counts plus every tile.
pub fn write_export(board: &Board, request_id: Option<u64>, path: &Path) -> Result<()> {
    use std::io::Write;

    let (green, orange, red) = board.band_counts();
    let export = serde_json::json!({
        "summary": {
            "request_id": request_id,
            "metrics": board.len(),
            "green": green,
            "orange": orange,
            "red": red,
        },
        "tiles": board.tiles(),
    });

    let json = serde_json::to_string_pretty(&export)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColorBand, ThresholdScale, Thresholds};
    use crate::render::{Palette, RenderOptions};
    use crate::source::{snapshot_from, ChannelSource, StatsSnapshot};
    use tokio::sync::watch;

    fn app_with(metrics: &[&str]) -> (watch::Sender<StatsSnapshot>, App) {
        let (tx, source) = ChannelSource::create("test");
        let mut thresholds = Thresholds::new();
        thresholds.insert("cpu".to_string(), ThresholdScale::new(50.0, 90.0, 100.0));
        let renderer = Renderer::new(thresholds, RenderOptions::default(), Palette::default());
        let app = App::new(Box::new(source), renderer, Board::fixed(metrics))
            .with_theme(Theme::dark());
        (tx, app)
    }

    fn layout(app: &mut App) {
        app.viewport = Rect::new(0, 0, 120, 40);
        app.tile_areas = vec![
            ("cpu".to_string(), Rect::new(0, 2, 26, 7)),
            ("mem".to_string(), Rect::new(26, 2, 26, 7)),
        ];
    }

    #[test]
    fn test_reload_renders_snapshot() {
        let (tx, mut app) = app_with(&["cpu", "mem"]);
        let _ = app.reload_data(); // initial empty snapshot

        tx.send(snapshot_from([("cpu", vec![10.0, 20.0, 95.0]), ("mem", vec![1.2, 1.8])]))
            .unwrap();
        assert!(app.reload_data());

        let cpu = app.board.tile("cpu").unwrap();
        assert_eq!(cpu.band, Some(ColorBand::Red));
        assert_eq!(cpu.scalar.as_deref(), Some("95"));
        assert_eq!(app.board.tile("mem").unwrap().scalar.as_deref(), Some("1.80"));
        assert_eq!(app.last_request_id, Some(1));

        // Nothing new
        assert!(!app.reload_data());
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_hover_quick_pass_never_opens() {
        let (_tx, mut app) = app_with(&["cpu", "mem"]);
        layout(&mut app);
        let t0 = Instant::now();

        app.hover_at(5, 4, t0);
        app.tick(t0 + Duration::from_millis(100));
        app.hover_at(100, 30, t0 + Duration::from_millis(200));
        app.tick(t0 + Duration::from_millis(1000));

        assert_eq!(app.hover.overlay_count(), 0);
        assert!(app.overlay_graph.is_none());
        assert!(app.overlay_placement().is_none());
    }

    #[test]
    fn test_hover_opens_local_graph_and_closes() {
        let (_tx, mut app) = app_with(&["cpu", "mem"]);
        layout(&mut app);
        let t0 = Instant::now();

        app.hover_at(30, 4, t0);
        app.tick(t0 + Duration::from_millis(500));

        assert_eq!(app.hover.overlay_count(), 1);
        assert!(matches!(
            app.overlay_graph,
            Some(OverlayGraph::Local { ref metric }) if metric == "mem"
        ));
        let placement = app.overlay_placement().unwrap();
        assert!(placement.area.right() <= app.viewport.right());

        // Leaving the tile removes the overlay
        app.hover_at(100, 30, t0 + Duration::from_millis(900));
        assert_eq!(app.hover.overlay_count(), 0);
        assert!(app.overlay_graph.is_none());
    }

    #[test]
    fn test_moving_to_other_tile_replaces_overlay() {
        let (_tx, mut app) = app_with(&["cpu", "mem"]);
        layout(&mut app);
        let t0 = Instant::now();

        app.hover_at(5, 4, t0);
        app.tick(t0 + Duration::from_millis(600));
        assert_eq!(app.overlay_graph.as_ref().unwrap().metric(), "cpu");

        app.hover_at(30, 4, t0 + Duration::from_millis(700));
        assert!(app.overlay_graph.is_none());
        app.tick(t0 + Duration::from_millis(1300));
        assert_eq!(app.overlay_graph.as_ref().unwrap().metric(), "mem");
        assert_eq!(app.hover.overlay_count(), 1);
    }

    #[test]
    fn test_export_requires_data() {
        let (_tx, app) = app_with(&["cpu"]);
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("out.json")).is_err());
    }

    #[test]
    fn test_export_writes_tiles() {
        let (tx, mut app) = app_with(&["cpu"]);
        tx.send(snapshot_from([("cpu", vec![60.0])])).unwrap();
        assert!(app.reload_data());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["orange"], 1);
        assert_eq!(json["tiles"][0]["name"], "cpu");
        assert_eq!(json["tiles"][0]["scalar"], "60");
        assert_eq!(json["tiles"][0]["band"], "Orange");
    }
}
