#![forbid(unsafe_code)]

//! Anchor-relative placement engine.
//!
//! [`compute_position`] answers one question: where must a floating
//! element's top-left corner go so that it sits on a given side of its
//! anchor, `offset` pixels away, aligned on the cross axis?
//!
//! # Invariants
//!
//! - **Primary axis**: with a non-negative offset, the floating rectangle
//!   never overlaps the anchor along the placement side. For `Bottom` its
//!   top edge is `anchor.bottom + offset`; for `Top` its bottom edge is
//!   `anchor.top - offset`; `Left`/`Right` mirror this horizontally.
//! - **Cross axis**: `Start` aligns leading edges, `End` aligns trailing
//!   edges, `Center` centers the floating extent over the anchor extent.
//! - **Purity**: the result depends only on the inputs; identical inputs
//!   give bit-identical output.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Viewport overflow | Anchor near an edge | Position returned unchanged (no flip, no shift) |
//! | Negative offset | Caller bug | Floating element overlaps the anchor by `-offset` |
//! | Unknown placement string | Parse of e.g. `"middle"` | `ParsePlacementError` |
//!
//! Collision handling (flipping to the opposite side, shifting into view)
//! is deliberately absent. Callers that need it can test the result with
//! [`Rect::is_within`] and choose a different placement themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use windkit_core::geometry::Rect;

/// Gap between anchor and floating element used by the widget layer.
pub const DEFAULT_OFFSET: f64 = 8.0;

/// The anchor edge a floating element is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Whether the primary axis is vertical (floating element above/below).
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Cross-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

/// A side plus an alignment: the twelve ways to attach a floating element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

impl Placement {
    /// Every placement, grouped by side.
    pub const ALL: [Placement; 12] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
        Self::Left,
        Self::LeftStart,
        Self::LeftEnd,
        Self::Right,
        Self::RightStart,
        Self::RightEnd,
    ];

    /// Combine a side and an alignment.
    pub const fn new(side: Side, align: Align) -> Self {
        match (side, align) {
            (Side::Top, Align::Center) => Self::Top,
            (Side::Top, Align::Start) => Self::TopStart,
            (Side::Top, Align::End) => Self::TopEnd,
            (Side::Bottom, Align::Center) => Self::Bottom,
            (Side::Bottom, Align::Start) => Self::BottomStart,
            (Side::Bottom, Align::End) => Self::BottomEnd,
            (Side::Left, Align::Center) => Self::Left,
            (Side::Left, Align::Start) => Self::LeftStart,
            (Side::Left, Align::End) => Self::LeftEnd,
            (Side::Right, Align::Center) => Self::Right,
            (Side::Right, Align::Start) => Self::RightStart,
            (Side::Right, Align::End) => Self::RightEnd,
        }
    }

    pub const fn side(self) -> Side {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Side::Top,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Side::Bottom,
            Self::Left | Self::LeftStart | Self::LeftEnd => Side::Left,
            Self::Right | Self::RightStart | Self::RightEnd => Side::Right,
        }
    }

    pub const fn align(self) -> Align {
        match self {
            Self::Top | Self::Bottom | Self::Left | Self::Right => Align::Center,
            Self::TopStart | Self::BottomStart | Self::LeftStart | Self::RightStart => Align::Start,
            Self::TopEnd | Self::BottomEnd | Self::LeftEnd | Self::RightEnd => Align::End,
        }
    }

    /// Canonical kebab-case name, e.g. `"bottom-start"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError(String);

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown placement: {:?}", self.0)
    }
}

impl std::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParsePlacementError(s.to_owned()))
    }
}

/// Viewport coordinates for the floating element's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// The rectangle a floating element of the given rect's size occupies here.
    pub fn to_rect(self, floating: Rect) -> Rect {
        Rect::new(self.left, self.top, floating.width, floating.height)
    }
}

/// Compute where to put `floating` so it sits against `target`.
///
/// Only `floating.width` and `floating.height` are read; its current
/// position is irrelevant. `offset` is the gap along the primary axis.
///
/// # Example
///
/// ```
/// use windkit_core::geometry::Rect;
/// use windkit_layout::{Placement, Position, compute_position};
///
/// let trigger = Rect::new(100.0, 100.0, 50.0, 20.0);
/// let menu = Rect::new(0.0, 0.0, 30.0, 10.0);
///
/// let pos = compute_position(trigger, menu, Placement::Bottom, 8.0);
/// assert_eq!(pos, Position::new(128.0, 110.0));
/// ```
pub fn compute_position(
    target: Rect,
    floating: Rect,
    placement: Placement,
    offset: f64,
) -> Position {
    let align = placement.align();
    match placement.side() {
        Side::Top => Position {
            top: target.top() - floating.height - offset,
            left: cross_axis(target.left(), target.width, floating.width, align),
        },
        Side::Bottom => Position {
            top: target.bottom() + offset,
            left: cross_axis(target.left(), target.width, floating.width, align),
        },
        Side::Left => Position {
            top: cross_axis(target.top(), target.height, floating.height, align),
            left: target.left() - floating.width - offset,
        },
        Side::Right => Position {
            top: cross_axis(target.top(), target.height, floating.height, align),
            left: target.right() + offset,
        },
    }
}

/// Leading coordinate of the floating extent along the cross axis.
#[inline]
fn cross_axis(target_start: f64, target_size: f64, floating_size: f64, align: Align) -> f64 {
    match align {
        Align::Start => target_start,
        Align::Center => target_start + (target_size - floating_size) / 2.0,
        Align::End => target_start + target_size - floating_size,
    }
}
