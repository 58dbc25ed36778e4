//! Hit testing: canvas-space point → component lookup.
//!
//! Root order is paint order, so the walk runs back-to-front reversed:
//! the last-painted (topmost) component wins. Groups hit as one unit —
//! clicking anywhere inside a group's bounds targets the group, never a
//! nested child.

use sf_core::ComponentId;
use sf_core::model::Rect;
use sf_core::tree::Layout;

/// Find the topmost root component at canvas position (px, py).
/// Returns `None` for empty canvas.
pub fn hit_test(layout: &Layout, px: f64, py: f64) -> Option<ComponentId> {
    layout
        .components
        .iter()
        .rev()
        .find(|node| node.bounds().contains(px, py))
        .map(|node| node.id)
}

/// All root components whose bounds intersect the given rectangle, in
/// z-order. Used for marquee selection.
pub fn hit_test_rect(layout: &Layout, rect: &Rect) -> Vec<ComponentId> {
    layout
        .components
        .iter()
        .filter(|node| node.bounds().intersects(rect))
        .map(|node| node.id)
        .collect()
}
