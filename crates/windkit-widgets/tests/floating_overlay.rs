#![forbid(unsafe_code)]

//! Integration tests: overlays composed from portal, placement, and focus trap.

use std::cell::Cell;
use std::rc::Rc;

use windkit_core::dom::{Document, NodeId};
use windkit_core::event::{KeyCode, KeyEvent, Modifiers};
use windkit_core::geometry::Rect;
use windkit_layout::Placement;
use windkit_widgets::overlay::{Overlay, OverlayAction, OverlayConfig, OverlayStack};
use windkit_widgets::portal::{DEFAULT_PORTAL_ID, DIALOG_PORTAL_ID, Portal};

fn button(doc: &mut Document, parent: NodeId) -> NodeId {
    let node = doc.create_element("button");
    doc.append_child(parent, node).unwrap();
    node
}

fn panel(doc: &mut Document, width: f64, height: f64) -> NodeId {
    let node = doc.create_element("div");
    doc.set_rect(node, Rect::new(0.0, 0.0, width, height));
    node
}

// ============================================================================
// Shared portal
// ============================================================================

#[test]
fn independent_overlays_share_one_portal_root() {
    let mut doc = Document::new();
    let body = doc.body();
    let trigger_a = button(&mut doc, body);
    let trigger_b = button(&mut doc, body);
    let menu = panel(&mut doc, 80.0, 40.0);
    let tooltip = panel(&mut doc, 40.0, 16.0);

    let mut dropdown = Overlay::new(menu)
        .trigger(trigger_a)
        .config(OverlayConfig::dropdown_menu());
    let mut hint = Overlay::new(tooltip)
        .trigger(trigger_b)
        .config(OverlayConfig::popover().backdrop(false).placement(Placement::Top));
    dropdown.open(&mut doc).unwrap();
    hint.open(&mut doc).unwrap();

    assert_eq!(doc.parent(menu), doc.parent(tooltip));
    let roots: Vec<_> = doc
        .children(body)
        .iter()
        .filter(|&&n| doc.attribute(n, "id") == Some(DEFAULT_PORTAL_ID))
        .collect();
    assert_eq!(roots.len(), 1);

    // A later Portal handle lands in the same container.
    let portal = Portal::new(&mut doc);
    assert_eq!(Some(portal.container()), doc.parent(menu));
}

// ============================================================================
// Popover lifecycle
// ============================================================================

#[test]
fn popover_follows_trigger_on_scroll() {
    let mut doc = Document::new();
    let body = doc.body();
    let trigger = button(&mut doc, body);
    doc.set_rect(trigger, Rect::new(100.0, 100.0, 50.0, 20.0));
    let content = panel(&mut doc, 30.0, 10.0);

    let mut popover = Overlay::new(content).trigger(trigger);
    popover.open(&mut doc).unwrap();
    assert_eq!(doc.style(content, "top"), Some("128px"));

    // Page scrolled 60px: the trigger moved up in viewport space.
    doc.set_rect(trigger, Rect::new(100.0, 40.0, 50.0, 20.0));
    popover.reposition(&mut doc);
    assert_eq!(doc.style(content, "top"), Some("68px"));
    assert_eq!(doc.style(content, "position"), Some("fixed"));
}

#[test]
fn open_change_callback_reports_transitions() {
    let mut doc = Document::new();
    let body = doc.body();
    let trigger = button(&mut doc, body);
    let content = panel(&mut doc, 30.0, 10.0);

    let opened = Rc::new(Cell::new(0));
    let closed = Rc::new(Cell::new(0));
    let (o, c) = (Rc::clone(&opened), Rc::clone(&closed));
    let mut popover = Overlay::new(content)
        .trigger(trigger)
        .on_open_change(move |open| {
            if open {
                o.set(o.get() + 1);
            } else {
                c.set(c.get() + 1);
            }
        });

    popover.toggle(&mut doc).unwrap();
    let backdrop = popover.backdrop_node().unwrap();
    assert_eq!(
        popover.handle_click(&mut doc, backdrop),
        Some(OverlayAction::BackdropClicked)
    );
    popover.toggle(&mut doc).unwrap();
    let mut esc = doc.keyboard_event(KeyEvent::new(KeyCode::Escape));
    popover.handle_key_down(&mut doc, &mut esc);

    assert_eq!((opened.get(), closed.get()), (2, 2));
}

// ============================================================================
// Dialog over popover
// ============================================================================

#[test]
fn dialog_from_popover_traps_then_returns_focus() {
    let mut doc = Document::new();
    let body = doc.body();
    let trigger = button(&mut doc, body);
    doc.set_rect(trigger, Rect::new(10.0, 10.0, 40.0, 20.0));
    assert!(doc.focus(trigger));

    let menu = panel(&mut doc, 80.0, 40.0);
    let delete = button(&mut doc, menu);

    let confirm = panel(&mut doc, 200.0, 120.0);
    let cancel = button(&mut doc, confirm);
    let ok = button(&mut doc, confirm);

    let mut stack = OverlayStack::new();
    let popover = stack
        .push(&mut doc, Overlay::new(menu).trigger(trigger))
        .unwrap();
    assert!(doc.focus(delete));

    let dialog = stack
        .push(&mut doc, Overlay::new(confirm).config(OverlayConfig::dialog()))
        .unwrap();
    let dialog_root = doc.get_element_by_id(DIALOG_PORTAL_ID).unwrap();
    assert_eq!(doc.parent(confirm), Some(dialog_root));
    assert_eq!(doc.active_element(), Some(cancel));

    // Shift+Tab from the first control wraps to the last.
    let shift_tab = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
    let mut back = doc.keyboard_event(shift_tab);
    assert_eq!(
        stack.handle_key_down(&mut doc, &mut back),
        Some((dialog, OverlayAction::FocusWrapped))
    );
    assert!(back.default_prevented());
    assert_eq!(doc.active_element(), Some(ok));

    // Escape dismisses the dialog only.
    let mut esc = doc.keyboard_event(KeyEvent::new(KeyCode::Escape));
    assert_eq!(
        stack.handle_key_down(&mut doc, &mut esc),
        Some((dialog, OverlayAction::EscapePressed))
    );
    assert_eq!(stack.top_id(), Some(popover));
    assert_eq!(doc.active_element(), Some(delete));

    stack.close_all(&mut doc);
    assert_eq!(doc.parent(menu), None);
    assert!(stack.is_empty());
}
