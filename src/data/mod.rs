//! Metric classification and formatting.
//!
//! ## Submodules
//!
//! - [`scale`]: Static per-metric threshold scales and [`ColorBand`] selection
//! - [`format`]: Scalar value formatting for the latest sample
//!
//! ## Data Flow
//!
//! ```text
//! StatsSnapshot (raw JSON)
//!        │
//!        ▼
//! latest sample ──▶ ThresholdScale::band() ──▶ ColorBand
//!        │
//!        └──▶ format_val() ──▶ scalar text
//! ```

pub mod format;
pub mod scale;

pub use format::{format_number, format_val};
pub use scale::{ColorBand, ThresholdScale, Thresholds};
