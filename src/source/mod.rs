//! Data source abstraction for receiving stats snapshots.
//!
//! This module provides a trait-based abstraction for receiving snapshots
//! from the live HTTP endpoint, a JSON file, or an in-memory channel.

mod channel;
mod endpoint;
mod error;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use endpoint::{basic_auth_header, Endpoint};
pub use error::PollError;
pub use file::FileSource;
pub use http::{Fetch, HttpFetcher, HttpSource, Poller};
pub use snapshot::{snapshot_from, PolledSnapshot, Sample, StatsSnapshot};

use std::fmt::Debug;

/// Trait for receiving stats snapshots from various sources.
///
/// # Example
///
/// ```
/// use pulse_tui::{DataSource, FileSource};
///
/// let mut source = FileSource::new("stats.json");
/// if let Some(polled) = source.poll() {
///     println!("Got {} metrics", polled.stats.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<PolledSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the most recent failed poll, cleared on success.
    fn error(&self) -> Option<String>;

    /// Make the next `poll` return data even if nothing changed.
    ///
    /// Sources that push data on their own schedule ignore this.
    fn refresh(&mut self) {}
}
