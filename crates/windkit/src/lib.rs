#![forbid(unsafe_code)]

//! windkit public facade.
//!
//! Re-exports the member crates' modules at the top level and collects the
//! everyday types in [`prelude`].
//!
//! ```
//! use windkit::prelude::*;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let trigger = doc.create_element("button");
//! doc.append_child(body, trigger).unwrap();
//! doc.set_rect(trigger, Rect::new(100.0, 100.0, 50.0, 20.0));
//!
//! let menu = doc.create_element("div");
//! doc.set_rect(menu, Rect::new(0.0, 0.0, 30.0, 10.0));
//!
//! let mut popover = Overlay::new(menu).trigger(trigger);
//! popover.open(&mut doc).unwrap();
//! assert_eq!(doc.style(menu, "top"), Some("128px"));
//! ```

pub use windkit_core::{dom, event, geometry};
pub use windkit_layout::placement;
#[cfg(feature = "registry")]
pub use windkit_registry as registry;
pub use windkit_widgets::{floating, focus_trap, overlay, portal};

pub mod prelude {
    pub use windkit_core::dom::{Document, DomError, KeyboardEvent, NodeId};
    pub use windkit_core::event::{KeyCode, KeyEvent, Modifiers};
    pub use windkit_core::geometry::{Rect, Size};
    pub use windkit_layout::{Align, DEFAULT_OFFSET, Placement, Position, Side, compute_position};
    pub use windkit_widgets::focus_trap::{FocusHost, FocusTrap};
    pub use windkit_widgets::overlay::{Overlay, OverlayAction, OverlayConfig, OverlayStack};
    pub use windkit_widgets::portal::Portal;

    #[cfg(feature = "registry")]
    pub use windkit_registry::{
        InstallPlan, ProjectConfig, Registry, RegistryError, resolve_dependencies,
        resolve_install_set,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn prelude_places_against_trigger() {
        let target = Rect::new(100.0, 100.0, 50.0, 20.0);
        let floating = Rect::new(0.0, 0.0, 80.0, 40.0);
        let pos = compute_position(target, floating, Placement::Bottom, DEFAULT_OFFSET);
        assert_eq!(pos, Position::new(128.0, 85.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_feature_reaches_geometry() {
        let json = serde_json::to_string(&Size::new(2.0, 3.0)).unwrap();
        assert_eq!(json, r#"{"width":2.0,"height":3.0}"#);
    }
}
