//! Shared types for stats snapshots.
//!
//! These types match the JSON served by the stats endpoint: a flat object
//! mapping metric names to their recent sample history, oldest first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete snapshot of the stats endpoint.
///
/// Maps metric name to its sample history (most recent last). Snapshots are
/// consumed once per poll cycle and then dropped.
pub type StatsSnapshot = BTreeMap<String, Vec<Sample>>;

/// A single entry in a metric's history.
///
/// The endpoint is expected to send numbers, but nothing stops it from
/// sending strings or nulls. Those are kept as [`Sample::Other`] so that one
/// bad value does not reject the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    /// A numeric reading.
    Number(f64),
    /// Any non-numeric JSON value.
    Other(serde_json::Value),
}

impl Sample {
    /// Returns the numeric value, if this sample is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Sample::Number(v) => Some(*v),
            Sample::Other(_) => None,
        }
    }
}

impl From<f64> for Sample {
    fn from(v: f64) -> Self {
        Sample::Number(v)
    }
}

/// A snapshot tagged with the sequence id of the poll that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolledSnapshot {
    /// Monotonically increasing poll sequence id.
    pub request_id: u64,
    /// The metrics returned by that poll.
    pub stats: StatsSnapshot,
}

/// Build a snapshot from plain numeric histories.
pub fn snapshot_from<I, S>(entries: I) -> StatsSnapshot
where
    I: IntoIterator<Item = (S, Vec<f64>)>,
    S: Into<String>,
{
    entries
        .into_iter()
        .map(|(name, values)| (name.into(), values.into_iter().map(Sample::from).collect()))
        .collect()
}
