//! Channel-based data source.
//!
//! Receives stats snapshots via a tokio watch channel. Useful when another
//! part of a program already produces snapshots and only wants the board.

use tokio::sync::watch;

use super::{DataSource, PolledSnapshot, StatsSnapshot};

/// A data source that receives snapshots pushed through a channel.
///
/// # Example
///
/// ```
/// use pulse_tui::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("in-process");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<StatsSnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
    next_request_id: u64,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<StatsSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
            next_request_id: 0,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source).
    pub fn create(source_description: &str) -> (watch::Sender<StatsSnapshot>, Self) {
        let (tx, rx) = watch::channel(StatsSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<PolledSnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if !self.receiver.has_changed().unwrap_or(false) {
            return None;
        }

        let stats = self.receiver.borrow_and_update().clone();
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        Some(PolledSnapshot { request_id, stats })
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        None
    }
}
