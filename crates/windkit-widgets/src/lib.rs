#![forbid(unsafe_code)]

//! Overlay utilities for windkit floating components.
//!
//! - [`focus_trap`]: keep Tab navigation inside a container
//! - [`portal`]: shared off-tree containers under `body`
//! - [`floating`]: write computed placements as fixed inline styles
//! - [`overlay`]: open/close lifecycle and nesting for popovers and dialogs

pub mod floating;
pub mod focus_trap;
pub mod overlay;
pub mod portal;

pub use floating::{FLOATING_Z_INDEX, apply_fixed_position, position_element};
pub use focus_trap::{FocusHost, FocusTrap};
pub use overlay::{Overlay, OverlayAction, OverlayConfig, OverlayId, OverlayStack};
pub use portal::{DEFAULT_PORTAL_ID, DIALOG_PORTAL_ID, Portal, registered_portal, reset_portals};
