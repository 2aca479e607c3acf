//! Hover graph overlay.
//!
//! Hovering a tile for [`DEFAULT_HOVER_DELAY`] opens a larger graph of that
//! metric's history next to the tile.
//!
//! - [`hover`]: debounced Idle/Pending/Shown state machine
//! - [`placement`]: keeps the overlay inside the viewport
//! - [`graph`]: Graphite render URLs and background fetches

pub mod graph;
pub mod hover;
pub mod placement;

pub use graph::{GraphError, GraphFetcher, GraphResult, GraphSeries, GraphiteClient};
pub use hover::{HoverChange, HoverState, HoverTarget, HoverTracker, DEFAULT_HOVER_DELAY};
pub use placement::{axis_offset, place_overlay, Placement};
