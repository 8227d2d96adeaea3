#![forbid(unsafe_code)]

//! In-memory document model.
//!
//! A [`Document`] is an arena of elements addressed by [`NodeId`]. It models
//! the slice of browser DOM behavior the overlay utilities rely on: the
//! element tree with move-on-append semantics, attributes and inline style,
//! the layout rectangle of each element, a single document-wide focus, and
//! keydown listener registrations.
//!
//! # Invariants
//!
//! - Every document owns a root `html` element with a `body` child; neither
//!   can be removed or moved.
//! - A node has at most one parent, and the parent lists it exactly once.
//! - The tree is acyclic: appending a node into its own subtree is refused.
//! - `active_element()` is always connected. Detaching the focused node (or
//!   one of its ancestors) clears focus, as the browser does.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Foreign `NodeId` | Id minted by another document (or a clone) | Reads return `None`/empty, writes are ignored, tree ops return `UnknownNode` |
//! | Cyclic append | Child is an inclusive ancestor of parent | `DomError::HierarchyRequest` |
//! | Moving root or body | `append_child`/`remove_child` on `html` or `body` | `DomError::HierarchyRequest` |
//! | Remove non-child | `child.parent != parent` | `DomError::NotFound` |
//! | Focus refused | Node detached or not focusable | `focus()` returns `false`, focus unchanged |

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;

use crate::event::KeyEvent;
use crate::geometry::{Rect, Size};

/// Global counter for unique document IDs.
static DOCUMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Viewport used until the host reports a real one.
const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 720.0);

/// Tags whose elements are focusable unless `disabled`.
const FORM_CONTROLS: [&str; 4] = ["button", "input", "select", "textarea"];

/// Handle to an element inside one [`Document`].
///
/// Carries the owning document's id, so a handle is never mistaken for a
/// node of another document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    document: DocumentId,
    index: u32,
}

impl NodeId {
    /// Arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The document that minted this handle.
    #[inline]
    pub const fn document(self) -> DocumentId {
        self.document
    }
}

/// Process-unique identifier of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    fn new() -> Self {
        Self(DOCUMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Handle returned when registering a keydown listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw id. Hosts other than [`Document`] use this to mint ids.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Errors from tree mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The node id does not belong to this document.
    UnknownNode(NodeId),
    /// The operation would make a node its own ancestor, or detach the
    /// document's `html` or `body` element.
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// The node to remove is not a child of the given parent.
    NotFound { parent: NodeId, child: NodeId },
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "unknown node #{}", node.index()),
            Self::HierarchyRequest { parent, child } => write!(
                f,
                "cannot move node #{} under node #{}",
                child.index(),
                parent.index()
            ),
            Self::NotFound { parent, child } => write!(
                f,
                "node #{} is not a child of node #{}",
                child.index(),
                parent.index()
            ),
        }
    }
}

impl std::error::Error for DomError {}

/// A keydown event travelling to listeners.
///
/// Mirrors the DOM event object: listeners may call
/// [`prevent_default`](Self::prevent_default) to suppress the browser's own
/// handling (for Tab, moving focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The node the event was dispatched to (the focused element).
    pub target: NodeId,
    pub key: KeyEvent,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub const fn new(target: NodeId, key: KeyEvent) -> Self {
        Self {
            target,
            key,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[inline]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: AHashMap<String, String>,
    style: AHashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: AHashMap::new(),
            style: AHashMap::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
        }
    }

    fn tab_index(&self) -> Option<i32> {
        self.attributes
            .get("tabindex")
            .and_then(|v| v.trim().parse().ok())
    }

    fn is_disabled_control(&self) -> bool {
        FORM_CONTROLS.contains(&self.tag.as_str()) && self.attributes.contains_key("disabled")
    }
}

#[derive(Debug, Clone, Copy)]
struct KeyListener {
    id: ListenerId,
    target: NodeId,
}

/// An element tree with focus and listener state.
///
/// # Example
///
/// ```
/// use windkit_core::dom::Document;
///
/// let mut doc = Document::new();
/// let button = doc.create_element("button");
/// doc.append_child(doc.body(), button).unwrap();
///
/// assert!(doc.focus(button));
/// assert_eq!(doc.active_element(), Some(button));
/// ```
///
/// Cloning produces an independent document with a fresh [`DocumentId`];
/// handles from the original are foreign to the clone. Reach the clone's
/// nodes through [`root`](Self::root), [`body`](Self::body) and the tree
/// queries.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    nodes: Vec<Element>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    viewport: Size,
    listeners: Vec<KeyListener>,
    next_listener: u64,
}

impl Clone for Document {
    fn clone(&self) -> Self {
        let id = DocumentId::new();
        let restamp = move |node: NodeId| NodeId {
            document: id,
            index: node.index,
        };
        let nodes = self
            .nodes
            .iter()
            .map(|el| Element {
                parent: el.parent.map(restamp),
                children: el.children.iter().copied().map(restamp).collect(),
                ..el.clone()
            })
            .collect();
        let listeners = self
            .listeners
            .iter()
            .map(|l| KeyListener {
                id: l.id,
                target: restamp(l.target),
            })
            .collect();

        Self {
            id,
            nodes,
            root: restamp(self.root),
            body: restamp(self.body),
            active: self.active.map(restamp),
            viewport: self.viewport,
            listeners,
            next_listener: self.next_listener,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing `<html><body></body></html>`.
    pub fn new() -> Self {
        let id = DocumentId::new();
        let mut root = Element::new("html");
        let mut body = Element::new("body");
        let root_id = NodeId {
            document: id,
            index: 0,
        };
        let body_id = NodeId {
            document: id,
            index: 1,
        };
        root.children.push(body_id);
        body.parent = Some(root_id);

        Self {
            id,
            nodes: vec![root, body],
            root: root_id,
            body: body_id,
            active: None,
            viewport: DEFAULT_VIEWPORT,
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    #[inline]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// The `html` element.
    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    #[inline]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    fn node(&self, id: NodeId) -> Option<&Element> {
        if id.document != self.id {
            return None;
        }
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        if id.document != self.id {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    fn require(&self, id: NodeId) -> Result<&Element, DomError> {
        self.node(id).ok_or(DomError::UnknownNode(id))
    }

    // --- Tree ---

    /// Create a detached element. Tag names are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId {
            document: self.id,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(Element::new(tag));
        id
    }

    /// Tag name of a node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |el| el.children.as_slice())
    }

    /// Whether `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `node` is attached to this document's root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.node(node).is_some() && self.contains(self.root, node)
    }

    /// Strict descendants of `node` in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved. The `html` and `body`
    /// elements cannot be moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.require(parent)?;
        self.require(child)?;
        if self.is_fixed(child) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        if let Some(el) = self.node_mut(parent) {
            el.children.push(child);
        }
        if let Some(el) = self.node_mut(child) {
            el.parent = Some(parent);
        }
        self.drop_stale_focus();
        Ok(())
    }

    /// Remove `child` from `parent`. The `body` element cannot be removed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.require(parent)?;
        if self.require(child)?.parent != Some(parent) {
            return Err(DomError::NotFound { parent, child });
        }
        if self.is_fixed(child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(child);
        self.drop_stale_focus();
        Ok(())
    }

    fn is_fixed(&self, node: NodeId) -> bool {
        node == self.root || node == self.body
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.node_mut(child).and_then(|el| el.parent.take()) else {
            return;
        };
        if let Some(el) = self.node_mut(old_parent) {
            el.children.retain(|&c| c != child);
        }
    }

    fn drop_stale_focus(&mut self) {
        if let Some(active) = self.active
            && !self.is_connected(active)
        {
            self.active = None;
        }
    }

    // --- Attributes & style ---

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.node_mut(node) {
            el.attributes.insert(name.to_ascii_lowercase(), value.into());
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .and_then(|el| el.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.node_mut(node)
            .and_then(|el| el.attributes.remove(&name.to_ascii_lowercase()))
    }

    /// First connected element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        if let Some(el) = self.node_mut(node) {
            el.style.insert(property.to_owned(), value.into());
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    // --- Geometry ---

    /// Record the layout rectangle the host computed for `node`.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.node_mut(node) {
            el.rect = rect;
        }
    }

    /// Viewport-relative bounding rectangle (zero-sized if never laid out).
    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        self.node(node).map(|el| el.rect).unwrap_or_default()
    }

    // --- Focus ---

    /// Whether `node` takes part in sequential (Tab) navigation.
    ///
    /// Matches links with `href`, enabled form controls, and any element
    /// with a non-negative `tabindex`.
    pub fn is_tabbable(&self, node: NodeId) -> bool {
        let Some(el) = self.node(node) else {
            return false;
        };
        let by_tag = match el.tag.as_str() {
            "a" => el.attributes.contains_key("href"),
            tag => FORM_CONTROLS.contains(&tag) && !el.is_disabled_control(),
        };
        by_tag || el.tab_index().is_some_and(|index| index >= 0)
    }

    /// Whether `node` accepts programmatic focus.
    ///
    /// Any element with an explicit `tabindex` (including `-1`) qualifies,
    /// except disabled form controls.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(el) = self.node(node) else {
            return false;
        };
        if el.is_disabled_control() {
            return false;
        }
        self.is_tabbable(node) || el.tab_index().is_some()
    }

    /// Tabbable strict descendants of `container` in document order.
    pub fn tabbable_descendants(&self, container: NodeId) -> Vec<NodeId> {
        self.descendants(container)
            .into_iter()
            .filter(|&node| self.is_tabbable(node))
            .collect()
    }

    /// The focused element, if any.
    #[inline]
    pub const fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Move focus to `node`. Returns `false` (focus unchanged) when the node
    /// is detached or not focusable.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node) || !self.is_focusable(node) {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(node = node.index(), "focus moved");
        self.active = Some(node);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Build a keydown event targeted at the focused element (or `body`).
    pub fn keyboard_event(&self, key: KeyEvent) -> KeyboardEvent {
        KeyboardEvent::new(self.active.unwrap_or(self.body), key)
    }

    // --- Listeners ---

    /// Register a keydown listener on `target`.
    pub fn add_key_listener(&mut self, target: NodeId) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(KeyListener { id, target });
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_key_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Listeners an event dispatched to `target` reaches, in bubbling order
    /// (target first, then each ancestor).
    pub fn key_listeners_for(&self, target: NodeId) -> Vec<ListenerId> {
        let mut out = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            out.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.target == node)
                    .map(|l| l.id),
            );
            current = self.parent(node);
        }
        out
    }

    /// Number of registered keydown listeners.
    pub fn key_listener_count(&self) -> usize {
        self.listeners.len()
    }
}
