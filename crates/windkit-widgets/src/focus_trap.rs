#![forbid(unsafe_code)]

//! Keyboard focus trap for modal overlays.
//!
//! A [`FocusTrap`] keeps Tab / Shift+Tab cycling inside one container
//! element while active, and hands focus back to whatever was focused
//! before it activated.
//!
//! The trap never touches global state directly. Everything it needs from
//! the environment (reading and moving focus, enumerating tabbable
//! elements, registering its keydown listener) goes through [`FocusHost`],
//! which [`Document`] implements and tests can fake.
//!
//! # Invariants
//!
//! - At most one activation is live per trap: `activate()` on an active
//!   trap and `deactivate()` on an inactive one are no-ops.
//! - While active, Tab from the last tabbable descendant wraps to the first
//!   and Shift+Tab from the first wraps to the last; the event's default
//!   action is suppressed only when a wrap happened.
//! - The tabbable set is recomputed on every Tab press, so content that
//!   changes while trapped is honored.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty container | No tabbable descendants | Focus not moved; Tab passes through |
//! | Restore target gone | Element detached while trapped | Best-effort `focus()` fails silently |
//! | Event from outside | Target not in container | Ignored, as a container listener would be |
//!
//! Two traps active over overlapping containers is a usage error and is
//! not defended against.

use windkit_core::dom::{Document, KeyboardEvent, ListenerId, NodeId};
use windkit_core::event::KeyCode;

/// Focus capabilities a [`FocusTrap`] needs from its environment.
pub trait FocusHost {
    /// The currently focused element.
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus, returning whether it took effect.
    fn focus(&mut self, node: NodeId) -> bool;

    /// Whether `node` is `container` or inside it.
    fn contains(&self, container: NodeId, node: NodeId) -> bool;

    /// Tabbable strict descendants of `container` in document order.
    fn tabbable_descendants(&self, container: NodeId) -> Vec<NodeId>;

    /// Register a keydown listener on `target`.
    fn add_key_listener(&mut self, target: NodeId) -> ListenerId;

    /// Unregister a keydown listener.
    fn remove_key_listener(&mut self, id: ListenerId) -> bool;
}

impl FocusHost for Document {
    fn active_element(&self) -> Option<NodeId> {
        Document::active_element(self)
    }

    fn focus(&mut self, node: NodeId) -> bool {
        Document::focus(self, node)
    }

    fn contains(&self, container: NodeId, node: NodeId) -> bool {
        Document::contains(self, container, node)
    }

    fn tabbable_descendants(&self, container: NodeId) -> Vec<NodeId> {
        Document::tabbable_descendants(self, container)
    }

    fn add_key_listener(&mut self, target: NodeId) -> ListenerId {
        Document::add_key_listener(self, target)
    }

    fn remove_key_listener(&mut self, id: ListenerId) -> bool {
        Document::remove_key_listener(self, id)
    }
}

/// Constrains Tab navigation to one container while active.
///
/// # Example
///
/// ```
/// use windkit_core::dom::Document;
/// use windkit_core::event::{KeyCode, KeyEvent};
/// use windkit_widgets::focus_trap::FocusTrap;
///
/// let mut doc = Document::new();
/// let dialog = doc.create_element("div");
/// let ok = doc.create_element("button");
/// doc.append_child(dialog, ok).unwrap();
/// doc.append_child(doc.body(), dialog).unwrap();
///
/// let mut trap = FocusTrap::new(dialog);
/// trap.activate(&mut doc);
/// assert_eq!(doc.active_element(), Some(ok));
///
/// let mut tab = doc.keyboard_event(KeyEvent::new(KeyCode::Tab));
/// assert!(trap.handle_key_down(&mut doc, &mut tab));
/// assert_eq!(doc.active_element(), Some(ok));
///
/// trap.deactivate(&mut doc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    container: NodeId,
    previous_focus: Option<NodeId>,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    /// Create an inert trap over `container`.
    pub const fn new(container: NodeId) -> Self {
        Self {
            container,
            previous_focus: None,
            listener: None,
        }
    }

    #[inline]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// The element focus returns to on deactivation.
    #[inline]
    pub const fn previous_focus(&self) -> Option<NodeId> {
        self.previous_focus
    }

    /// Start trapping: remember the current focus, focus the first
    /// tabbable descendant (if any), and listen for keydown.
    pub fn activate<H: FocusHost + ?Sized>(&mut self, host: &mut H) {
        if self.is_active() {
            return;
        }

        self.previous_focus = host.active_element();
        if let Some(&first) = host.tabbable_descendants(self.container).first() {
            host.focus(first);
        }
        self.listener = Some(host.add_key_listener(self.container));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            container = self.container.index(),
            previous = ?self.previous_focus,
            "focus trap activated"
        );
    }

    /// Stop trapping and restore the focus recorded at activation.
    pub fn deactivate<H: FocusHost + ?Sized>(&mut self, host: &mut H) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        host.remove_key_listener(listener);

        if let Some(previous) = self.previous_focus.take() {
            let _restored = host.focus(previous);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                container = self.container.index(),
                restored = _restored,
                "focus trap deactivated"
            );
        }
    }

    /// Keydown listener body. Returns `true` when focus was wrapped and the
    /// event's default action prevented.
    pub fn handle_key_down<H: FocusHost + ?Sized>(
        &self,
        host: &mut H,
        event: &mut KeyboardEvent,
    ) -> bool {
        if !self.is_active()
            || event.key.code != KeyCode::Tab
            || !event.key.is_press()
            || !host.contains(self.container, event.target)
        {
            return false;
        }

        let tabbable = host.tabbable_descendants(self.container);
        let (Some(&first), Some(&last)) = (tabbable.first(), tabbable.last()) else {
            return false;
        };

        let current = host.active_element();
        let wrap_to = if event.key.shift() {
            (current == Some(first)).then_some(last)
        } else {
            (current == Some(last)).then_some(first)
        };

        match wrap_to {
            Some(next) => {
                host.focus(next);
                event.prevent_default();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use windkit_core::event::{KeyEvent, KeyEventKind, Modifiers};

    struct Fixture {
        doc: Document,
        outside: NodeId,
        container: NodeId,
        buttons: [NodeId; 3],
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();

        let outside = doc.create_element("button");
        doc.append_child(body, outside).unwrap();

        let container = doc.create_element("div");
        doc.append_child(body, container).unwrap();
        let buttons = [(); 3].map(|_| {
            let b = doc.create_element("button");
            doc.append_child(container, b).unwrap();
            b
        });

        Fixture {
            doc,
            outside,
            container,
            buttons,
        }
    }

    fn tab(doc: &Document) -> KeyboardEvent {
        doc.keyboard_event(KeyEvent::new(KeyCode::Tab))
    }

    fn shift_tab(doc: &Document) -> KeyboardEvent {
        doc.keyboard_event(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT))
    }

    #[test]
    fn activate_focuses_first_tabbable() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);

        assert!(trap.is_active());
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
        assert_eq!(f.doc.key_listeners_for(f.container).len(), 1);
    }

    #[test]
    fn wraps_in_both_directions() {
        let mut f = fixture();
        let [a, b, c] = f.buttons;
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);

        let mut ev = shift_tab(&f.doc);
        assert!(trap.handle_key_down(&mut f.doc, &mut ev));
        assert!(ev.default_prevented());
        assert_eq!(f.doc.active_element(), Some(c));

        let mut ev = tab(&f.doc);
        assert!(trap.handle_key_down(&mut f.doc, &mut ev));
        assert!(ev.default_prevented());
        assert_eq!(f.doc.active_element(), Some(a));

        // Mid-list Tab is left to the browser.
        f.doc.focus(b);
        let mut ev = tab(&f.doc);
        assert!(!trap.handle_key_down(&mut f.doc, &mut ev));
        assert!(!ev.default_prevented());
        assert_eq!(f.doc.active_element(), Some(b));
    }

    #[test]
    fn deactivate_restores_previous_focus() {
        let mut f = fixture();
        assert!(f.doc.focus(f.outside));

        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);
        assert_eq!(trap.previous_focus(), Some(f.outside));
        assert_ne!(f.doc.active_element(), Some(f.outside));

        trap.deactivate(&mut f.doc);
        assert!(!trap.is_active());
        assert_eq!(f.doc.active_element(), Some(f.outside));
        assert_eq!(f.doc.key_listener_count(), 0);
    }

    #[test]
    fn double_activate_is_noop() {
        let mut f = fixture();
        f.doc.focus(f.outside);
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);
        trap.activate(&mut f.doc);

        assert_eq!(f.doc.key_listener_count(), 1);
        // Second activation must not overwrite the restore target.
        assert_eq!(trap.previous_focus(), Some(f.outside));
    }

    #[test]
    fn double_deactivate_is_noop() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.deactivate(&mut f.doc);

        trap.activate(&mut f.doc);
        trap.deactivate(&mut f.doc);
        f.doc.focus(f.buttons[1]);
        trap.deactivate(&mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.buttons[1]));
    }

    #[test]
    fn inactive_trap_ignores_tab() {
        let mut f = fixture();
        let trap = FocusTrap::new(f.container);
        f.doc.focus(f.buttons[2]);
        let mut ev = tab(&f.doc);
        assert!(!trap.handle_key_down(&mut f.doc, &mut ev));
        assert!(!ev.default_prevented());
    }

    #[test]
    fn other_keys_and_releases_pass_through() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);
        f.doc.focus(f.buttons[2]);

        let mut enter = f.doc.keyboard_event(KeyEvent::new(KeyCode::Enter));
        assert!(!trap.handle_key_down(&mut f.doc, &mut enter));

        let mut release =
            f.doc
                .keyboard_event(KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Release));
        assert!(!trap.handle_key_down(&mut f.doc, &mut release));
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));
    }

    #[test]
    fn events_from_outside_are_ignored() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);

        let mut ev = KeyboardEvent::new(f.outside, KeyEvent::new(KeyCode::Tab));
        f.doc.focus(f.buttons[2]);
        assert!(!trap.handle_key_down(&mut f.doc, &mut ev));
    }

    #[test]
    fn empty_container_is_degenerate_but_valid() {
        let mut doc = Document::new();
        let body = doc.body();
        let outside = doc.create_element("button");
        doc.append_child(body, outside).unwrap();
        let container = doc.create_element("div");
        doc.append_child(body, container).unwrap();
        doc.focus(outside);

        let mut trap = FocusTrap::new(container);
        trap.activate(&mut doc);
        assert!(trap.is_active());
        assert_eq!(doc.active_element(), Some(outside));

        let mut ev = KeyboardEvent::new(container, KeyEvent::new(KeyCode::Tab));
        assert!(!trap.handle_key_down(&mut doc, &mut ev));

        trap.deactivate(&mut doc);
        assert_eq!(doc.active_element(), Some(outside));
    }

    #[test]
    fn tabbable_set_is_recomputed_per_keypress() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);

        let late = f.doc.create_element("a");
        f.doc.set_attribute(late, "href", "/more");
        f.doc.append_child(f.container, late).unwrap();

        // The old last element is no longer last: no wrap.
        f.doc.focus(f.buttons[2]);
        let mut ev = tab(&f.doc);
        assert!(!trap.handle_key_down(&mut f.doc, &mut ev));

        f.doc.focus(late);
        let mut ev = tab(&f.doc);
        assert!(trap.handle_key_down(&mut f.doc, &mut ev));
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn vanished_restore_target_is_tolerated() {
        let mut f = fixture();
        f.doc.focus(f.outside);
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);

        let body = f.doc.body();
        f.doc.remove_child(body, f.outside).unwrap();
        trap.deactivate(&mut f.doc);

        assert!(!trap.is_active());
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn nothing_focused_before_activation() {
        let mut f = fixture();
        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut f.doc);
        assert_eq!(trap.previous_focus(), None);

        trap.deactivate(&mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    /// Host without a document: a flat list of nodes, all inside container 0.
    #[derive(Default)]
    struct ListHost {
        focused: Option<NodeId>,
        tabbable: Vec<NodeId>,
        listeners: Vec<ListenerId>,
        focus_calls: Vec<NodeId>,
    }

    impl FocusHost for ListHost {
        fn active_element(&self) -> Option<NodeId> {
            self.focused
        }

        fn focus(&mut self, node: NodeId) -> bool {
            self.focus_calls.push(node);
            self.focused = Some(node);
            true
        }

        fn contains(&self, _container: NodeId, node: NodeId) -> bool {
            self.tabbable.contains(&node)
        }

        fn tabbable_descendants(&self, _container: NodeId) -> Vec<NodeId> {
            self.tabbable.clone()
        }

        fn add_key_listener(&mut self, _target: NodeId) -> ListenerId {
            let id = ListenerId::from_raw(self.listeners.len() as u64 + 1);
            self.listeners.push(id);
            id
        }

        fn remove_key_listener(&mut self, id: ListenerId) -> bool {
            let before = self.listeners.len();
            self.listeners.retain(|&l| l != id);
            before != self.listeners.len()
        }
    }

    #[test]
    fn works_against_injected_host() {
        // Borrow real ids so the fake host has distinct nodes to hand out.
        let f = fixture();
        let [a, _, c] = f.buttons;
        let mut host = ListHost {
            tabbable: f.buttons.to_vec(),
            ..ListHost::default()
        };

        let mut trap = FocusTrap::new(f.container);
        trap.activate(&mut host);
        assert_eq!(host.focus_calls, vec![a]);
        assert_eq!(host.listeners.len(), 1);

        let key = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
        let mut ev = KeyboardEvent::new(a, key);
        assert!(trap.handle_key_down(&mut host, &mut ev));
        assert_eq!(host.focused, Some(c));

        trap.deactivate(&mut host);
        assert!(host.listeners.is_empty());
        // Nothing was focused before activation, so nothing is restored.
        assert_eq!(host.focus_calls, vec![a, c]);
    }

    proptest! {
        /// Drive random Tab/Shift+Tab presses, letting unhandled presses move
        /// focus the way a browser would (next/previous tabbable in the
        /// document). Focus must never leave the container.
        #[test]
        fn focus_never_escapes(presses in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut f = fixture();
            let mut trap = FocusTrap::new(f.container);
            trap.activate(&mut f.doc);

            let body = f.doc.body();
            let order = f.doc.tabbable_descendants(body);

            for shift in presses {
                let mut ev = if shift { shift_tab(&f.doc) } else { tab(&f.doc) };
                if !trap.handle_key_down(&mut f.doc, &mut ev) {
                    let current = f
                        .doc
                        .active_element()
                        .and_then(|n| order.iter().position(|&o| o == n));
                    let next = match (current, shift) {
                        (Some(i), false) => order.get(i + 1).copied(),
                        (Some(i), true) => i.checked_sub(1).and_then(|j| order.get(j).copied()),
                        (None, _) => None,
                    };
                    if let Some(next) = next {
                        f.doc.focus(next);
                    }
                }
                let focused = f.doc.active_element();
                prop_assert!(focused.is_some_and(|n| f.doc.contains(f.container, n)));
            }
        }
    }
}
