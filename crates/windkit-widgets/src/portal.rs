#![forbid(unsafe_code)]

//! Shared off-tree containers for floating content.
//!
//! A [`Portal`] resolves an identifier to a container element attached
//! directly under `body`. Floating components append their content there so
//! it escapes ancestor clipping, overflow, and stacking contexts.
//!
//! Containers are shared: every portal built with the same identifier in the
//! same document resolves to the same node. The identifier → container
//! mapping lives in a thread-local registry (all UI work is confined to one
//! thread), initialized on first use and never torn down implicitly.
//! [`reset_portals`] clears it for tests; the containers themselves stay in
//! their documents for the page's lifetime.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Stale registry entry | Container detached or its `id` changed | Entry replaced after a fresh lookup |
//! | Remove of a stranger | Element not a direct child | `remove()` returns `false`, container untouched |
//! | Append of an ancestor | e.g. appending `body` | `DomError::HierarchyRequest` |

use std::cell::RefCell;

use ahash::AHashMap;
use windkit_core::dom::{Document, DocumentId, DomError, NodeId};

/// Identifier used when none is given.
pub const DEFAULT_PORTAL_ID: &str = "windkit-portal";

/// Identifier used by dialog-style overlays, kept apart from menus/popovers.
pub const DIALOG_PORTAL_ID: &str = "windkit-dialog-portal";

thread_local! {
    static PORTAL_REGISTRY: RefCell<AHashMap<(DocumentId, String), NodeId>> =
        RefCell::new(AHashMap::new());
}

/// Forget every registered container on this thread.
///
/// Existing [`Portal`] values keep pointing at their containers; the next
/// construction re-discovers containers by `id` attribute.
pub fn reset_portals() {
    PORTAL_REGISTRY.with(|registry| registry.borrow_mut().clear());
}

/// The container currently registered for `id` in `doc`, if any.
pub fn registered_portal(doc: &Document, id: &str) -> Option<NodeId> {
    PORTAL_REGISTRY.with(|registry| {
        registry
            .borrow()
            .get(&(doc.id(), id.to_owned()))
            .copied()
    })
}

/// Handle to a shared portal container.
///
/// # Example
///
/// ```
/// use windkit_core::dom::Document;
/// use windkit_widgets::portal::Portal;
///
/// let mut doc = Document::new();
/// let menu = doc.create_element("div");
/// let tooltip = doc.create_element("div");
///
/// let a = Portal::new(&mut doc);
/// let b = Portal::new(&mut doc);
/// a.append(&mut doc, menu).unwrap();
/// b.append(&mut doc, tooltip).unwrap();
///
/// assert_eq!(doc.parent(menu), doc.parent(tooltip));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portal {
    id: String,
    container: NodeId,
}

impl Portal {
    /// Portal with the [`DEFAULT_PORTAL_ID`].
    pub fn new(doc: &mut Document) -> Self {
        Self::with_id(doc, DEFAULT_PORTAL_ID)
    }

    /// Portal for `id`, creating its container under `body` on first use.
    pub fn with_id(doc: &mut Document, id: impl Into<String>) -> Self {
        let id = id.into();
        let key = (doc.id(), id.clone());

        let cached = PORTAL_REGISTRY.with(|registry| registry.borrow().get(&key).copied());
        let container = match cached.filter(|&node| is_live_container(doc, node, &id)) {
            Some(node) => node,
            None => {
                let node = doc
                    .get_element_by_id(&id)
                    .unwrap_or_else(|| create_container(doc, &id));
                PORTAL_REGISTRY.with(|registry| registry.borrow_mut().insert(key, node));
                node
            }
        };

        Self { id, container }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The shared container node.
    #[inline]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Append `element` to the container, moving it from any previous parent.
    pub fn append(&self, doc: &mut Document, element: NodeId) -> Result<(), DomError> {
        doc.append_child(self.container, element)
    }

    /// Remove `element` if it is a direct child of the container.
    ///
    /// Returns whether anything was removed; never fails.
    pub fn remove(&self, doc: &mut Document, element: NodeId) -> bool {
        if !self.holds(doc, element) {
            return false;
        }
        doc.remove_child(self.container, element).is_ok()
    }

    /// Whether `element` is a direct child of the container.
    pub fn holds(&self, doc: &Document, element: NodeId) -> bool {
        doc.parent(element) == Some(self.container)
    }
}

fn is_live_container(doc: &Document, node: NodeId, id: &str) -> bool {
    doc.is_connected(node) && doc.attribute(node, "id") == Some(id)
}

fn create_container(doc: &mut Document, id: &str) -> NodeId {
    let node = doc.create_element("div");
    doc.set_attribute(node, "id", id);
    let body = doc.body();
    // A fresh node is never an ancestor of `body`.
    let _ = doc.append_child(body, node);

    #[cfg(feature = "tracing")]
    tracing::debug!(portal = id, node = node.index(), "portal container created");

    node
}
