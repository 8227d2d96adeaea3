#![forbid(unsafe_code)]

//! Placement of floating elements against their anchors.

pub mod placement;

pub use placement::{
    Align, DEFAULT_OFFSET, ParsePlacementError, Placement, Position, Side, compute_position,
};
