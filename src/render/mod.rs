//! Per-snapshot render pass.
//!
//! The renderer turns one [`StatsSnapshot`] into display updates. It knows
//! nothing about the terminal: updates go through the [`Display`] trait, and
//! [`Board`] is the implementation the TUI draws from.
//!
//! ```text
//! StatsSnapshot ──▶ Renderer::plan() ──▶ MetricRender ──▶ Display
//!                    (thresholds, base options, palette)    (Board)
//! ```

mod board;
mod options;

pub use board::{Board, Tile};
pub use options::{BandColors, HexColor, Palette, RenderOptions};

use tracing::trace;

use crate::data::{format_val, ColorBand, Thresholds};
use crate::source::{Sample, StatsSnapshot};

/// Targets a render pass writes into.
///
/// Each metric has a scalar target and a sparkline target. Implementations
/// ignore updates for metrics they have no target for.
pub trait Display {
    /// Whether a scalar target exists for this metric.
    fn has_scalar(&self, metric: &str) -> bool;

    /// Replace the sparkline for a metric.
    fn update_sparkline(&mut self, metric: &str, samples: &[Sample], options: &RenderOptions);

    /// Replace the scalar text for a metric (`None` shows nothing).
    fn update_scalar(&mut self, metric: &str, text: Option<String>);

    /// Record the band a metric was colored with (`None` for unscaled metrics).
    fn update_band(&mut self, _metric: &str, _band: Option<ColorBand>) {}
}

/// What a single metric renders to in this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRender {
    /// Band for scaled metrics.
    pub band: Option<ColorBand>,
    pub options: RenderOptions,
    /// Formatted latest value.
    pub scalar: Option<String>,
}

/// Applies thresholds and formatting to snapshots.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    thresholds: Thresholds,
    base: RenderOptions,
    palette: Palette,
}

impl Renderer {
    pub fn new(thresholds: Thresholds, base: RenderOptions, palette: Palette) -> Self {
        Self {
            thresholds,
            base,
            palette,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Work out how one metric renders.
    ///
    /// Returns `None` for an empty history since there is no latest value.
    pub fn plan(&self, metric: &str, samples: &[Sample]) -> Option<MetricRender> {
        let latest = samples.last()?;
        let value = latest.as_f64();
        let scalar = format_val(latest);

        let rendered = match self.thresholds.get(metric) {
            Some(scale) => {
                let band = scale.band(value);
                let options = self
                    .base
                    .merged(self.palette.colors(band), scale.chart_max(value));
                MetricRender {
                    band: Some(band),
                    options,
                    scalar,
                }
            }
            None => MetricRender {
                band: None,
                options: self.base.clone(),
                scalar,
            },
        };

        Some(rendered)
    }

    /// Apply a snapshot to the display.
    ///
    /// Unscaled metrics are only rendered when the display has a scalar target
    /// for them; scaled metrics are always offered to the display.
    pub fn render(&self, stats: &StatsSnapshot, display: &mut dyn Display) {
        for (metric, samples) in stats {
            if !self.thresholds.contains_key(metric) && !display.has_scalar(metric) {
                trace!(metric = %metric, "no target for metric, skipping");
                continue;
            }

            let Some(rendered) = self.plan(metric, samples) else {
                trace!(metric = %metric, "empty history, skipping");
                continue;
            };

            display.update_sparkline(metric, samples, &rendered.options);
            display.update_scalar(metric, rendered.scalar);
            display.update_band(metric, rendered.band);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ThresholdScale;
    use crate::source::snapshot_from;

    /// Records every update, with a fixed set of scalar targets.
    #[derive(Default)]
    struct Recorder {
        targets: Vec<String>,
        sparklines: Vec<(String, usize, RenderOptions)>,
        scalars: Vec<(String, Option<String>)>,
    }

    impl Recorder {
        fn with_targets(names: &[&str]) -> Self {
            Self {
                targets: names.iter().map(|n| n.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Display for Recorder {
        fn has_scalar(&self, metric: &str) -> bool {
            self.targets.iter().any(|t| t == metric)
        }

        fn update_sparkline(&mut self, metric: &str, samples: &[Sample], options: &RenderOptions) {
            self.sparklines.push((metric.to_string(), samples.len(), options.clone()));
        }

        fn update_scalar(&mut self, metric: &str, text: Option<String>) {
            self.scalars.push((metric.to_string(), text));
        }
    }

    fn renderer() -> Renderer {
        let mut thresholds = Thresholds::new();
        thresholds.insert("cpu".to_string(), ThresholdScale::new(50.0, 90.0, 100.0));
        Renderer::new(thresholds, RenderOptions::default(), Palette::default())
    }

    #[test]
    fn test_scaled_metric_goes_red() {
        let r = renderer();
        let stats = snapshot_from([("cpu", vec![10.0, 20.0, 95.0])]);

        let plan = r.plan("cpu", &stats["cpu"]).unwrap();
        assert_eq!(plan.band, Some(ColorBand::Red));
        assert_eq!(plan.options.chart_range_max, Some(100.0));
        assert_eq!(plan.options.line_color, Some(Palette::default().red.line));
        assert_eq!(plan.scalar.as_deref(), Some("95"));

        let mut display = Recorder::with_targets(&["cpu"]);
        r.render(&stats, &mut display);
        assert_eq!(display.scalars, vec![("cpu".to_string(), Some("95".to_string()))]);
        assert_eq!(display.sparklines.len(), 1);
        assert_eq!(display.sparklines[0].1, 3);
    }

    #[test]
    fn test_unscaled_metric_uses_base_options() {
        let r = renderer();
        let stats = snapshot_from([("mem", vec![1.2, 1.8])]);
        let mut display = Recorder::with_targets(&["mem"]);

        r.render(&stats, &mut display);

        assert_eq!(display.scalars, vec![("mem".to_string(), Some("1.80".to_string()))]);
        assert_eq!(display.sparklines[0].2, RenderOptions::default());
    }

    #[test]
    fn test_unscaled_metric_without_target_is_skipped() {
        let r = renderer();
        let stats = snapshot_from([("mem", vec![1.2, 1.8]), ("cpu", vec![40.0])]);
        let mut display = Recorder::with_targets(&[]);

        r.render(&stats, &mut display);

        // cpu is scaled, so it is still offered to the display
        assert_eq!(display.scalars.len(), 1);
        assert_eq!(display.scalars[0].0, "cpu");
        assert!(display.sparklines.iter().all(|(m, _, _)| m != "mem"));
    }

    #[test]
    fn test_orange_and_green_bands() {
        let r = renderer();
        assert_eq!(
            r.plan("cpu", &[Sample::Number(50.0)]).unwrap().band,
            Some(ColorBand::Orange)
        );
        assert_eq!(
            r.plan("cpu", &[Sample::Number(49.0)]).unwrap().band,
            Some(ColorBand::Green)
        );
    }

    #[test]
    fn test_chart_max_grows_with_value() {
        let r = renderer();
        let plan = r.plan("cpu", &[Sample::Number(130.0)]).unwrap();
        assert_eq!(plan.options.chart_range_max, Some(130.0));
    }

    #[test]
    fn test_non_numeric_latest() {
        let r = renderer();
        let samples = vec![Sample::Number(99.0), Sample::Other(serde_json::json!("abc"))];
        let plan = r.plan("cpu", &samples).unwrap();

        assert_eq!(plan.scalar, None);
        assert_eq!(plan.band, Some(ColorBand::Green));
        assert_eq!(plan.options.chart_range_max, Some(100.0));
    }

    #[test]
    fn test_empty_history_is_skipped() {
        let r = renderer();
        let mut stats = StatsSnapshot::new();
        stats.insert("cpu".to_string(), Vec::new());
        let mut display = Recorder::with_targets(&["cpu"]);

        r.render(&stats, &mut display);

        assert!(display.scalars.is_empty());
        assert!(display.sparklines.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = renderer();
        let stats = snapshot_from([("cpu", vec![60.0]), ("mem", vec![3.0])]);

        let mut first = Recorder::with_targets(&["cpu", "mem"]);
        let mut second = Recorder::with_targets(&["cpu", "mem"]);
        r.render(&stats, &mut first);
        r.render(&stats, &mut second);

        assert_eq!(first.scalars, second.scalars);
        assert_eq!(first.sparklines, second.sparklines);
    }
}
