//! Overlay placement against the viewport.
//!
//! The overlay opens at the hovered tile's right/bottom edge, pulled back by a
//! small default offset. When that would push it past the viewport, it is
//! shifted left/up by exactly the overflow instead.

use ratatui::layout::Rect;

/// Default horizontal offset from the tile's right edge.
pub const DEFAULT_OFFSET_X: i32 = -2;
/// Default vertical offset from the tile's bottom edge.
pub const DEFAULT_OFFSET_Y: i32 = -1;

/// Computed overlay position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Offset applied to the anchor's right edge.
    pub offset_x: i32,
    /// Offset applied to the anchor's bottom edge.
    pub offset_y: i32,
    /// Final overlay area, inside the viewport.
    pub area: Rect,
}

/// Offset along one axis.
///
/// `edge` is the anchor's far edge and `viewport_end` the first coordinate
/// past the viewport. Returns `-(edge + size - viewport_end)` on overflow,
/// `default` otherwise.
pub fn axis_offset(edge: u16, size: u16, viewport_end: u16, default: i32) -> i32 {
    let overflow = i32::from(edge) + i32::from(size) - i32::from(viewport_end);
    if overflow > 0 {
        -overflow
    } else {
        default
    }
}

/// Place an overlay of `width` x `height` next to `anchor` inside `viewport`.
pub fn place_overlay(anchor: Rect, width: u16, height: u16, viewport: Rect) -> Placement {
    let width = width.min(viewport.width);
    let height = height.min(viewport.height);

    let offset_x = axis_offset(anchor.right(), width, viewport.right(), DEFAULT_OFFSET_X);
    let offset_y = axis_offset(anchor.bottom(), height, viewport.bottom(), DEFAULT_OFFSET_Y);

    let x = clamp_origin(anchor.right(), offset_x, viewport.x);
    let y = clamp_origin(anchor.bottom(), offset_y, viewport.y);

    Placement {
        offset_x,
        offset_y,
        area: Rect::new(x, y, width, height),
    }
}

fn clamp_origin(edge: u16, offset: i32, min: u16) -> u16 {
    let origin = (i32::from(edge) + offset).max(i32::from(min));
    u16::try_from(origin).unwrap_or(min)
}
