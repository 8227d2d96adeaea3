#![forbid(unsafe_code)]

//! Positioning a floating node next to its anchor.
//!
//! [`position_element`] reads both nodes' rectangles, runs
//! [`compute_position`], and writes the result as fixed inline styles.
//! Overflowing the viewport is reported in a debug event only; the
//! computed coordinates are never adjusted.

use windkit_core::dom::{Document, NodeId};
use windkit_layout::{Placement, Position, compute_position};

/// Stacking level written to every positioned floating node.
pub const FLOATING_Z_INDEX: i32 = 9999;

/// Position `element` against `target` and write its inline styles.
///
/// The element's recorded rectangle is moved to the computed spot so later
/// geometry queries see it where it is drawn.
///
/// # Example
///
/// ```
/// use windkit_core::dom::Document;
/// use windkit_core::geometry::Rect;
/// use windkit_layout::Placement;
/// use windkit_widgets::floating::position_element;
///
/// let mut doc = Document::new();
/// let trigger = doc.create_element("button");
/// let menu = doc.create_element("div");
/// doc.set_rect(trigger, Rect::new(100.0, 100.0, 50.0, 20.0));
/// doc.set_rect(menu, Rect::new(0.0, 0.0, 30.0, 10.0));
///
/// position_element(&mut doc, menu, trigger, Placement::Bottom, 8.0);
/// assert_eq!(doc.style(menu, "top"), Some("128px"));
/// assert_eq!(doc.style(menu, "left"), Some("110px"));
/// ```
pub fn position_element(
    doc: &mut Document,
    element: NodeId,
    target: NodeId,
    placement: Placement,
    offset: f64,
) -> Position {
    let target_rect = doc.bounding_rect(target);
    let floating_rect = doc.bounding_rect(element);
    let position = compute_position(target_rect, floating_rect, placement, offset);

    apply_fixed_position(doc, element, position);
    let placed = position.to_rect(floating_rect);
    doc.set_rect(element, placed);

    #[cfg(feature = "tracing")]
    if !placed.is_within(doc.viewport()) {
        tracing::debug!(
            node = element.index(),
            placement = %placement,
            top = position.top,
            left = position.left,
            "floating element overflows viewport"
        );
    }

    position
}

/// Write `position: fixed`, `top`, `left`, and the floating z-index.
pub fn apply_fixed_position(doc: &mut Document, element: NodeId, position: Position) {
    doc.set_style(element, "position", "fixed");
    doc.set_style(element, "top", px(position.top));
    doc.set_style(element, "left", px(position.left));
    doc.set_style(element, "z-index", FLOATING_Z_INDEX.to_string());
}

fn px(value: f64) -> String {
    format!("{value}px")
}
