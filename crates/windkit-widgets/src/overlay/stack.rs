#![forbid(unsafe_code)]

//! Stack of nested overlays with z-ordering and input routing.
//!
//! `OverlayStack` keeps open overlays in LIFO order. A dialog opened from a
//! popover sits above it, and only the topmost overlay sees keyboard and
//! backdrop events.
//!
//! # Invariants
//!
//! - Z-order is strictly increasing: later overlays are always on top.
//! - Only the top overlay receives input events.
//! - Close ordering is LIFO by default; close-by-id removes from any position.
//! - Every overlay in the stack is open; closing hands the overlay back.
//!
//! # Failure Modes
//!
//! - `close_top()` on an empty stack returns `None` (no panic).
//! - `close_id()` for a non-existent ID returns `None`.
//! - `push()` of an overlay whose content cannot be attached returns the
//!   `DomError` and leaves the stack unchanged.
//!
//! # Example
//!
//! ```
//! use windkit_core::dom::Document;
//! use windkit_widgets::overlay::{Overlay, OverlayConfig, OverlayStack};
//!
//! let mut doc = Document::new();
//! let menu = doc.create_element("div");
//! let confirm = doc.create_element("div");
//!
//! let mut stack = OverlayStack::new();
//! let below = stack.push(&mut doc, Overlay::new(menu)).unwrap();
//! let above = stack
//!     .push(&mut doc, Overlay::new(confirm).config(OverlayConfig::dialog()))
//!     .unwrap();
//!
//! assert!(stack.z_index(above) > stack.z_index(below));
//! assert_eq!(stack.top_id(), Some(above));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use windkit_core::dom::{Document, DomError, KeyboardEvent, NodeId};

use super::container::{Overlay, OverlayAction};

/// Z-index of the first overlay in a stack.
pub const BASE_OVERLAY_Z: i32 = 9999;

/// Z-index increment between overlays (leaves room for backdrops).
pub const Z_INCREMENT: i32 = 10;

static OVERLAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an overlay in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    fn new() -> Self {
        Self(OVERLAY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

struct ActiveOverlay {
    id: OverlayId,
    overlay: Overlay,
}

/// Open overlays, bottom to top.
#[derive(Default)]
pub struct OverlayStack {
    overlays: Vec<ActiveOverlay>,
    next_z: i32,
}

impl std::fmt::Debug for OverlayStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStack")
            .field("depth", &self.depth())
            .field("top", &self.top_id())
            .finish()
    }
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Stack Operations ---

    /// Open `overlay` above everything already in the stack.
    pub fn push(
        &mut self,
        doc: &mut Document,
        mut overlay: Overlay,
    ) -> Result<OverlayId, DomError> {
        let z_index = BASE_OVERLAY_Z + self.next_z;
        overlay.set_z_index(doc, z_index);
        overlay.open(doc)?;
        self.next_z += Z_INCREMENT;

        let id = OverlayId::new();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            overlay = id.id(),
            z_index,
            depth = self.overlays.len() + 1,
            "overlay pushed"
        );

        self.overlays.push(ActiveOverlay { id, overlay });
        Ok(id)
    }

    /// Close and return the top overlay.
    pub fn close_top(&mut self, doc: &mut Document) -> Option<(OverlayId, Overlay)> {
        let mut active = self.overlays.pop()?;
        active.overlay.close(doc);
        self.settle();
        Some((active.id, active.overlay))
    }

    /// Close and return a specific overlay, wherever it sits.
    pub fn close_id(&mut self, doc: &mut Document, id: OverlayId) -> Option<Overlay> {
        let idx = self.overlays.iter().position(|a| a.id == id)?;
        let mut active = self.overlays.remove(idx);
        active.overlay.close(doc);
        self.settle();
        Some(active.overlay)
    }

    /// Close every overlay, top first.
    pub fn close_all(&mut self, doc: &mut Document) -> Vec<(OverlayId, Overlay)> {
        let mut closed = Vec::with_capacity(self.overlays.len());
        while let Some(entry) = self.close_top(doc) {
            closed.push(entry);
        }
        closed
    }

    // --- Queries ---

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.overlays.len()
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.overlays.iter().any(|a| a.id == id)
    }

    pub fn top_id(&self) -> Option<OverlayId> {
        self.overlays.last().map(|a| a.id)
    }

    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last().map(|a| &a.overlay)
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays
            .iter()
            .find(|a| a.id == id)
            .map(|a| &a.overlay)
    }

    /// Z-index assigned to `id`, if it is in the stack.
    pub fn z_index(&self, id: OverlayId) -> Option<i32> {
        self.get(id).map(Overlay::z_index)
    }

    // --- Input Routing ---

    /// Route a key press to the top overlay.
    ///
    /// An overlay that closes in response is removed from the stack.
    pub fn handle_key_down(
        &mut self,
        doc: &mut Document,
        event: &mut KeyboardEvent,
    ) -> Option<(OverlayId, OverlayAction)> {
        let top = self.overlays.last_mut()?;
        let action = top.overlay.handle_key_down(doc, event)?;
        let id = top.id;
        self.drop_closed();
        Some((id, action))
    }

    /// Route a click to the top overlay.
    pub fn handle_click(
        &mut self,
        doc: &mut Document,
        target: NodeId,
    ) -> Option<(OverlayId, OverlayAction)> {
        let top = self.overlays.last_mut()?;
        let action = top.overlay.handle_click(doc, target)?;
        let id = top.id;
        self.drop_closed();
        Some((id, action))
    }

    /// Reposition every open overlay, e.g. after scroll or resize.
    pub fn reposition_all(&mut self, doc: &mut Document) {
        for active in &mut self.overlays {
            active.overlay.reposition(doc);
        }
    }

    fn drop_closed(&mut self) {
        if self.overlays.last().is_some_and(|a| !a.overlay.is_open()) {
            self.overlays.pop();
            self.settle();
        }
    }

    fn settle(&mut self) {
        if self.overlays.is_empty() {
            self.next_z = 0;
        }
    }
}
