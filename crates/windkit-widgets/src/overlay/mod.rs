#![forbid(unsafe_code)]

//! Floating layers (popovers, menus, dialogs) and their stacking.
//!
//! # Focus Management
//!
//! Overlays configured with `trap_focus` integrate with
//! [`FocusTrap`](crate::focus_trap::FocusTrap):
//!
//! - **Auto-focus**: first tabbable descendant receives focus when opened
//! - **Focus trap**: Tab wraps around inside the content
//! - **Focus restore**: previous focus is restored when closed
//!
//! Use [`OverlayStack`] when overlays nest, so only the topmost one reacts
//! to Escape and backdrop clicks.

mod container;
mod stack;

pub use container::{BACKDROP_ATTRIBUTE, Overlay, OverlayAction, OverlayConfig};
pub use stack::{BASE_OVERLAY_Z, OverlayId, OverlayStack, Z_INCREMENT};
