//! Debounced hover tracking.
//!
//! ```text
//!  Idle ──enter──▶ Pending ──delay elapsed──▶ Shown
//!   ▲                 │                         │
//!   └─────leave───────┴──────────leave──────────┘
//! ```
//!
//! Leaving while pending cancels the timer, so a quick pass over a tile never
//! opens an overlay. At most one overlay exists at a time.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tracing::debug;

/// Default hover delay before an overlay opens.
pub const DEFAULT_HOVER_DELAY: Duration = Duration::from_millis(500);

/// The tile being hovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub metric: String,
    /// Screen area of the hovered tile.
    pub anchor: Rect,
}

impl HoverTarget {
    pub fn new(metric: impl Into<String>, anchor: Rect) -> Self {
        Self {
            metric: metric.into(),
            anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Pending { target: HoverTarget, since: Instant },
    Shown { target: HoverTarget },
}

/// What a transition did to the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverChange {
    /// Overlays removed by this transition (0 or 1).
    pub removed: usize,
    /// A pending timer was cancelled before it fired.
    pub cancelled: bool,
}

/// Hover state machine with a debounce delay.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    state: HoverState,
    delay: Duration,
}

impl Default for HoverTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOVER_DELAY)
    }
}

impl HoverTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: HoverState::Idle,
            delay,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pointer entered a tile.
    ///
    /// Re-entering the tile that is already pending or shown keeps the current
    /// state. Entering a different tile drops the old hover first.
    pub fn enter(&mut self, target: HoverTarget, now: Instant) -> HoverChange {
        match &mut self.state {
            HoverState::Pending { target: current, .. } | HoverState::Shown { target: current }
                if current.metric == target.metric =>
            {
                current.anchor = target.anchor;
                return HoverChange::default();
            }
            _ => {}
        }

        let change = self.leave();
        debug!(metric = %target.metric, "hover timer started");
        self.state = HoverState::Pending { target, since: now };
        change
    }

    /// Pointer left the hovered tile.
    pub fn leave(&mut self) -> HoverChange {
        match std::mem::replace(&mut self.state, HoverState::Idle) {
            HoverState::Idle => HoverChange::default(),
            HoverState::Pending { target, .. } => {
                debug!(metric = %target.metric, "hover timer cancelled");
                HoverChange {
                    removed: 0,
                    cancelled: true,
                }
            }
            HoverState::Shown { target } => {
                debug!(metric = %target.metric, "closing hover graph");
                HoverChange {
                    removed: 1,
                    cancelled: false,
                }
            }
        }
    }

    /// Advance the timer.
    ///
    /// Returns the target when this call moved it from pending to shown.
    pub fn tick(&mut self, now: Instant) -> Option<&HoverTarget> {
        let due = matches!(
            &self.state,
            HoverState::Pending { since, .. } if now.saturating_duration_since(*since) >= self.delay
        );
        if !due {
            return None;
        }

        if let HoverState::Pending { target, .. } =
            std::mem::replace(&mut self.state, HoverState::Idle)
        {
            self.state = HoverState::Shown { target };
        }
        self.shown()
    }

    /// The target whose overlay is open.
    pub fn shown(&self) -> Option<&HoverTarget> {
        match &self.state {
            HoverState::Shown { target } => Some(target),
            _ => None,
        }
    }

    /// The target currently hovered, pending or shown.
    pub fn hovered(&self) -> Option<&HoverTarget> {
        match &self.state {
            HoverState::Idle => None,
            HoverState::Pending { target, .. } | HoverState::Shown { target } => Some(target),
        }
    }

    /// Number of overlays open (never more than one).
    pub fn overlay_count(&self) -> usize {
        usize::from(self.shown().is_some())
    }

    /// Close everything without waiting for the pointer to leave.
    pub fn reset(&mut self) -> HoverChange {
        self.leave()
    }
}
