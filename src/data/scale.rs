//! Static threshold scales and color band classification.
//!
//! A scale is configured per metric as `[orange_at, red_at, ceiling]`. It is
//! only used to pick a display band and to size the sparkline axis; nothing
//! here raises alerts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-metric threshold scales, keyed by metric name.
pub type Thresholds = BTreeMap<String, ThresholdScale>;

/// Warning/critical thresholds plus the axis ceiling for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct ThresholdScale {
    /// Values at or above this are at least [`ColorBand::Orange`].
    pub orange_at: f64,
    /// Values at or above this are [`ColorBand::Red`].
    pub red_at: f64,
    /// Minimum top of the sparkline axis.
    pub ceiling: f64,
}

impl ThresholdScale {
    pub fn new(orange_at: f64, red_at: f64, ceiling: f64) -> Self {
        Self {
            orange_at,
            red_at,
            ceiling,
        }
    }

    /// Pick the band for the latest sample.
    ///
    /// Lower bounds are inclusive, so a value sitting exactly on a threshold
    /// takes the hotter band. A non-numeric sample is always green.
    pub fn band(&self, latest: Option<f64>) -> ColorBand {
        match latest {
            Some(v) if v >= self.red_at => ColorBand::Red,
            Some(v) if v >= self.orange_at => ColorBand::Orange,
            _ => ColorBand::Green,
        }
    }

    /// Top of the sparkline axis: the larger of the latest sample and the ceiling.
    pub fn chart_max(&self, latest: Option<f64>) -> f64 {
        latest.map_or(self.ceiling, |v| v.max(self.ceiling))
    }
}

impl From<[f64; 3]> for ThresholdScale {
    fn from([orange_at, red_at, ceiling]: [f64; 3]) -> Self {
        Self::new(orange_at, red_at, ceiling)
    }
}

impl From<ThresholdScale> for [f64; 3] {
    fn from(scale: ThresholdScale) -> Self {
        [scale.orange_at, scale.red_at, scale.ceiling]
    }
}

/// Display band for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ColorBand {
    Green,
    Orange,
    Red,
}

impl ColorBand {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ColorBand::Green => "OK",
            ColorBand::Orange => "WARN",
            ColorBand::Red => "CRIT",
        }
    }
}
