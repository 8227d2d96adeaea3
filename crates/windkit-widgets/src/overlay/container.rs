#![forbid(unsafe_code)]

//! A single floating layer: content node, optional trigger, optional backdrop.
//!
//! Opening an overlay moves its content (and backdrop) into a shared
//! [`Portal`], positions the content against the trigger, and optionally
//! traps focus inside it. Closing undoes each step in reverse.

use windkit_core::dom::{Document, DomError, KeyboardEvent, NodeId};
use windkit_core::event::KeyCode;
use windkit_core::geometry::Rect;
use windkit_layout::{DEFAULT_OFFSET, Placement, Position};

use crate::floating::{FLOATING_Z_INDEX, position_element};
use crate::focus_trap::FocusTrap;
use crate::portal::{DEFAULT_PORTAL_ID, DIALOG_PORTAL_ID, Portal};

/// Attribute marking backdrop nodes created by an overlay.
pub const BACKDROP_ATTRIBUTE: &str = "data-overlay-backdrop";

/// Action reported by [`Overlay::handle_key_down`] and [`Overlay::handle_click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Escape was pressed and the overlay closed.
    EscapePressed,
    /// The backdrop was clicked and the overlay closed.
    BackdropClicked,
    /// Tab wrapped around inside the focus trap.
    FocusWrapped,
}

/// Overlay behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub placement: Placement,
    pub offset: f64,
    pub portal_id: String,
    pub trap_focus: bool,
    pub close_on_escape: bool,
    pub backdrop: bool,
    pub close_on_backdrop: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::popover()
    }
}

impl OverlayConfig {
    /// Anchored panel below its trigger, dismissed by a click outside.
    pub fn popover() -> Self {
        Self {
            placement: Placement::Bottom,
            offset: DEFAULT_OFFSET,
            portal_id: DEFAULT_PORTAL_ID.to_owned(),
            trap_focus: false,
            close_on_escape: true,
            backdrop: true,
            close_on_backdrop: true,
        }
    }

    /// Menu aligned to the trigger's leading edge, no backdrop.
    pub fn dropdown_menu() -> Self {
        Self {
            placement: Placement::BottomStart,
            offset: 4.0,
            backdrop: false,
            close_on_backdrop: false,
            ..Self::popover()
        }
    }

    /// Modal dialog in its own portal with focus trapped inside.
    pub fn dialog() -> Self {
        Self {
            portal_id: DIALOG_PORTAL_ID.to_owned(),
            trap_focus: true,
            ..Self::popover()
        }
    }

    /// Dialog that demands an explicit choice: Escape and backdrop clicks are ignored.
    pub fn alert_dialog() -> Self {
        Self {
            portal_id: DEFAULT_PORTAL_ID.to_owned(),
            close_on_escape: false,
            close_on_backdrop: false,
            ..Self::dialog()
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn portal_id(mut self, id: impl Into<String>) -> Self {
        self.portal_id = id.into();
        self
    }

    pub fn trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }
}

type OpenChangeCallback = Box<dyn FnMut(bool)>;

/// A floating layer bound to one content node.
///
/// # Invariants
///
/// - While open, the content (and backdrop, if configured) are children of
///   the portal container, and a focus trap is active iff `trap_focus`.
/// - While closed, neither node is in the portal and no trap is active.
/// - The open-change callback fires exactly once per state transition.
///
/// # Failure Modes
///
/// - `open()` fails with [`DomError`] only if the content is an ancestor of
///   the portal container; the overlay then stays closed.
/// - A trigger with no recorded rectangle positions against the origin.
pub struct Overlay {
    content: NodeId,
    trigger: Option<NodeId>,
    config: OverlayConfig,
    backdrop: Option<NodeId>,
    portal: Option<Portal>,
    trap: Option<FocusTrap>,
    z_index: i32,
    on_open_change: Option<OpenChangeCallback>,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("content", &self.content)
            .field("trigger", &self.trigger)
            .field("config", &self.config)
            .field("open", &self.is_open())
            .field("z_index", &self.z_index)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Overlay for `content` with the popover defaults.
    pub fn new(content: NodeId) -> Self {
        Self {
            content,
            trigger: None,
            config: OverlayConfig::default(),
            backdrop: None,
            portal: None,
            trap: None,
            z_index: FLOATING_Z_INDEX,
            on_open_change: None,
        }
    }

    /// Anchor the content to `trigger`.
    pub fn trigger(mut self, trigger: NodeId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with `true` after opening and `false` after closing.
    pub fn on_open_change(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(callback));
        self
    }

    #[inline]
    pub const fn content(&self) -> NodeId {
        self.content
    }

    #[inline]
    pub const fn trigger_node(&self) -> Option<NodeId> {
        self.trigger
    }

    /// The backdrop node, once the overlay has opened with one.
    #[inline]
    pub const fn backdrop_node(&self) -> Option<NodeId> {
        self.backdrop
    }

    #[inline]
    pub fn config_ref(&self) -> &OverlayConfig {
        &self.config
    }

    #[inline]
    pub const fn is_open(&self) -> bool {
        self.portal.is_some()
    }

    #[inline]
    pub const fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Whether the focus trap is currently engaged.
    pub fn is_trapping(&self) -> bool {
        self.trap.as_ref().is_some_and(FocusTrap::is_active)
    }

    /// Change the stacking level; applied immediately when open.
    pub fn set_z_index(&mut self, doc: &mut Document, z_index: i32) {
        self.z_index = z_index;
        if self.is_open() {
            self.apply_z_index(doc);
        }
    }

    /// Show the overlay. No-op when already open.
    pub fn open(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.is_open() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "overlay.open",
            content = self.content.index(),
            portal = %self.config.portal_id
        )
        .entered();

        let portal = Portal::with_id(doc, self.config.portal_id.clone());
        if self.config.backdrop {
            let backdrop = self.ensure_backdrop(doc);
            portal.append(doc, backdrop)?;
        }
        if let Err(err) = portal.append(doc, self.content) {
            if let Some(backdrop) = self.backdrop {
                portal.remove(doc, backdrop);
            }
            return Err(err);
        }
        self.portal = Some(portal);
        self.set_state_attribute(doc, "open");

        self.reposition(doc);
        self.apply_z_index(doc);

        if self.config.trap_focus {
            let mut trap = FocusTrap::new(self.content);
            trap.activate(doc);
            self.trap = Some(trap);
        }

        self.notify(true);
        Ok(())
    }

    /// Hide the overlay. No-op when already closed.
    pub fn close(&mut self, doc: &mut Document) {
        let Some(portal) = self.portal.take() else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(content = self.content.index(), "overlay.close");

        self.set_state_attribute(doc, "closed");
        portal.remove(doc, self.content);
        if let Some(backdrop) = self.backdrop {
            portal.remove(doc, backdrop);
        }
        if let Some(mut trap) = self.trap.take() {
            trap.deactivate(doc);
        }

        self.notify(false);
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.is_open() {
            self.close(doc);
            Ok(())
        } else {
            self.open(doc)
        }
    }

    /// Re-run placement against the trigger, e.g. after scroll or resize.
    ///
    /// Returns `None` when closed or when there is no trigger.
    pub fn reposition(&mut self, doc: &mut Document) -> Option<Position> {
        if !self.is_open() {
            return None;
        }
        let trigger = self.trigger?;
        let position = position_element(
            doc,
            self.content,
            trigger,
            self.config.placement,
            self.config.offset,
        );
        if self.z_index != FLOATING_Z_INDEX {
            self.apply_z_index(doc);
        }
        Some(position)
    }

    /// Keyboard handling while open: Escape dismisses, Tab feeds the trap.
    pub fn handle_key_down(
        &mut self,
        doc: &mut Document,
        event: &mut KeyboardEvent,
    ) -> Option<OverlayAction> {
        if !self.is_open() || !event.key.is_press() {
            return None;
        }

        match event.key.code {
            KeyCode::Escape if self.config.close_on_escape => {
                event.prevent_default();
                self.close(doc);
                Some(OverlayAction::EscapePressed)
            }
            KeyCode::Tab => {
                let trap = self.trap.as_ref()?;
                trap.handle_key_down(doc, event)
                    .then_some(OverlayAction::FocusWrapped)
            }
            _ => None,
        }
    }

    /// Pointer handling while open: a click on the backdrop dismisses.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> Option<OverlayAction> {
        if !self.is_open() || !self.config.close_on_backdrop || self.backdrop != Some(target) {
            return None;
        }
        self.close(doc);
        Some(OverlayAction::BackdropClicked)
    }

    fn ensure_backdrop(&mut self, doc: &mut Document) -> NodeId {
        if let Some(backdrop) = self.backdrop {
            return backdrop;
        }
        let backdrop = doc.create_element("div");
        doc.set_attribute(backdrop, BACKDROP_ATTRIBUTE, "");
        doc.set_style(backdrop, "position", "fixed");
        doc.set_style(backdrop, "inset", "0");
        let viewport = doc.viewport();
        doc.set_rect(backdrop, Rect::from_size(viewport));
        self.backdrop = Some(backdrop);
        backdrop
    }

    fn apply_z_index(&self, doc: &mut Document) {
        doc.set_style(self.content, "z-index", self.z_index.to_string());
        if let Some(backdrop) = self.backdrop {
            doc.set_style(backdrop, "z-index", (self.z_index - 1).to_string());
        }
    }

    fn set_state_attribute(&self, doc: &mut Document, state: &str) {
        doc.set_attribute(self.content, "data-state", state);
        if let Some(backdrop) = self.backdrop {
            doc.set_attribute(backdrop, "data-state", state);
        }
    }

    fn notify(&mut self, open: bool) {
        if let Some(callback) = self.on_open_change.as_mut() {
            callback(open);
        }
    }
}
