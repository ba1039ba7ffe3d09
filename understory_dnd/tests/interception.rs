// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input interception tests for the `understory_dnd` crate.
//!
//! These feed [`InputEvent`]s through [`DragManager::handle_event`] and check
//! both the returned [`Disposition`] and the session transitions the events
//! trigger: keyboard navigation, virtual clicks and focus redirection.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use understory_dnd::host::AccessTree;
use understory_dnd::input::{EventKind, PointerGeometry};
use understory_dnd::memory::{MemoryHost, NodeId};
use understory_dnd::messages::EnglishStrings;
use understory_dnd::types::{CollectionTarget, DragItem, DropEvent, DropOperation, DropPosition};
use understory_dnd::{
    Disposition, DragManager, DragTarget, DropTarget, DroppableItem, InputEvent, Key, Lifecycle,
    Modifiers,
};

// root
// ├── source
// ├── toolbar
// ├── a
// │   └── a_inner
// └── b
struct Fixture {
    host: MemoryHost,
    manager: DragManager<NodeId, u32>,
    source: NodeId,
    toolbar: NodeId,
    a: NodeId,
    a_inner: NodeId,
    b: NodeId,
    log: Rc<RefCell<Vec<String>>>,
}

fn fixture() -> Fixture {
    let mut host = MemoryHost::new();
    let root = host.root();
    let source = host.insert(root, Rect::new(0.0, 0.0, 10.0, 10.0));
    let toolbar = host.insert(root, Rect::new(0.0, 20.0, 100.0, 30.0));
    let a = host.insert(root, Rect::new(20.0, 0.0, 40.0, 10.0));
    let a_inner = host.insert(a, Rect::new(22.0, 2.0, 38.0, 8.0));
    let b = host.insert(root, Rect::new(50.0, 0.0, 70.0, 10.0));

    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let mut manager = DragManager::new();
    for (element, name) in [(a, "a"), (b, "b")] {
        let (dropped, activated, keys) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        let _ = manager.register_drop_target(
            &mut host,
            DropTarget::new(element)
                .on_drop(move |_: &DropEvent, _: Option<&CollectionTarget<u32>>| {
                    dropped.borrow_mut().push(format!("drop {name}"));
                })
                .on_activate(move |_: &understory_dnd::types::DropActivateEvent| {
                    activated.borrow_mut().push(format!("activate {name}"));
                })
                .on_key_down(move |event: &InputEvent<NodeId>, _: &DragTarget<NodeId>| {
                    keys.borrow_mut().push(format!("key {name} {:?}", event.key));
                }),
        );
    }

    let mut f = Fixture {
        host,
        manager,
        source,
        toolbar,
        a,
        a_inner,
        b,
        log,
    };
    let drag = DragTarget::new(
        f.source,
        [DragItem::new().with("text/plain", "payload")],
        [DropOperation::Move],
    );
    f.manager.begin(&mut f.host, drag, EnglishStrings).unwrap();
    f.manager.frame(&mut f.host);
    f
}

impl Fixture {
    fn send(&mut self, event: InputEvent<NodeId>) -> Disposition {
        self.manager.handle_event(&mut self.host, &event)
    }

    fn current(&self) -> Option<NodeId> {
        self.manager
            .session()
            .and_then(|session| session.current_drop_target().copied())
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

#[test]
fn tab_and_shift_tab_navigate() {
    let mut f = fixture();
    let tab = InputEvent::key_down(Some(f.source), Key::Tab);
    assert_eq!(f.send(tab), Disposition::StopAndPreventDefault);
    assert_eq!(f.current(), Some(f.a));
    f.send(tab);
    assert_eq!(f.current(), Some(f.b));

    f.send(tab.with_modifiers(Modifiers::SHIFT));
    assert_eq!(f.current(), Some(f.a));
    // Navigation keys are not forwarded to the target.
    assert!(f.log().is_empty());
}

#[test]
fn modified_tab_and_other_keys_reach_the_target() {
    let mut f = fixture();
    f.send(InputEvent::key_down(None, Key::Tab));
    assert_eq!(f.current(), Some(f.a));

    f.send(InputEvent::key_down(None, Key::Tab).with_modifiers(Modifiers::CONTROL));
    f.send(InputEvent::key_down(None, Key::ArrowDown));
    assert_eq!(f.current(), Some(f.a));
    assert_eq!(f.log(), vec!["key a Tab", "key a ArrowDown"]);
}

#[test]
fn enter_drops_and_alt_enter_activates() {
    let mut f = fixture();
    f.send(InputEvent::key_down(None, Key::Tab));
    f.send(InputEvent::key_down(None, Key::Enter).with_modifiers(Modifiers::ALT));
    assert_eq!(f.log(), vec!["activate a"]);
    assert_eq!(f.manager.lifecycle(), Lifecycle::Active);

    f.send(InputEvent::key_down(None, Key::Enter));
    assert_eq!(f.log(), vec!["activate a", "drop a"]);
    assert_eq!(f.manager.lifecycle(), Lifecycle::Absent);

    // Interception stops with the session.
    assert_eq!(
        f.send(InputEvent::key_down(None, Key::Enter)),
        Disposition::Pass
    );
}

#[test]
fn escape_cancels() {
    let mut f = fixture();
    let before_toolbar = f.host.is_hidden(f.toolbar);
    assert!(before_toolbar);
    f.send(InputEvent::key_down(None, Key::Tab));
    f.send(InputEvent::key_down(None, Key::Escape));

    assert!(!f.manager.is_dragging());
    assert!(!f.host.is_hidden(f.toolbar));
    assert_eq!(f.host.focused(), Some(f.source));
    assert!(f.log().is_empty());
    assert_eq!(
        f.send(InputEvent::new(EventKind::PointerMove, Some(f.toolbar))),
        Disposition::Pass
    );
}

#[test]
fn virtual_click_on_target_drops() {
    let mut f = fixture();
    let disposition = f.send(InputEvent::click(Some(f.a_inner), 0));
    assert_eq!(disposition, Disposition::StopAndPreventDefault);
    assert_eq!(f.log(), vec!["drop a"]);
    assert!(!f.manager.is_dragging());
    assert_eq!(f.host.announcements().last().unwrap().message, "Drop complete.");
}

#[test]
fn virtual_click_on_drag_source_cancels() {
    let mut f = fixture();
    f.send(InputEvent::click(Some(f.source), 0));
    assert!(!f.manager.is_dragging());
    assert!(f.log().is_empty());
    assert_eq!(f.host.announcements().last().unwrap().message, "Drop canceled.");
}

#[test]
fn real_clicks_are_swallowed_without_dropping() {
    let mut f = fixture();
    f.send(InputEvent::pointer_down(Some(f.b), PointerGeometry::MOUSE));
    assert_eq!(
        f.send(InputEvent::new(EventKind::PointerUp, Some(f.b))),
        Disposition::Stop
    );
    assert_eq!(
        f.send(InputEvent::click(Some(f.b), 1)),
        Disposition::StopAndPreventDefault
    );
    assert!(f.manager.is_dragging());
    assert!(f.log().is_empty());
}

#[test]
fn screen_reader_double_tap_counts_as_virtual() {
    let mut f = fixture();
    // TalkBack reports a real click count; the pointer-down gives it away.
    f.send(InputEvent::pointer_down(Some(f.b), PointerGeometry::VIRTUAL));
    f.send(InputEvent::click(Some(f.b), 1));
    assert_eq!(f.log(), vec!["drop b"]);
}

#[test]
fn talkback_press_without_click_count_counts_as_virtual() {
    let mut f = fixture();
    let down = InputEvent::pointer_down(Some(f.b), PointerGeometry::TALKBACK);
    f.send(down);
    f.send(InputEvent::click(Some(f.b), 1));
    assert!(f.manager.is_dragging());
    assert!(f.log().is_empty());

    f.send(down.with_detail(0));
    f.send(InputEvent::click(Some(f.b), 1));
    assert_eq!(f.log(), vec!["drop b"]);
}

#[test]
fn focus_inside_a_target_makes_it_current() {
    let mut f = fixture();
    let disposition = f.send(InputEvent::focus(Some(f.a_inner), None));
    assert_eq!(disposition, Disposition::StopAndPreventDefault);
    assert_eq!(f.current(), Some(f.a));
    assert_eq!(f.host.focused(), Some(f.a));
}

#[test]
fn focus_outside_targets_is_redirected() {
    let mut f = fixture();
    f.send(InputEvent::focus(Some(f.toolbar), None));
    assert_eq!(f.host.focused(), Some(f.source));

    f.send(InputEvent::key_down(None, Key::Tab));
    f.send(InputEvent::key_down(None, Key::Tab));
    f.send(InputEvent::focus(Some(f.toolbar), None));
    assert_eq!(f.host.focused(), Some(f.b));
}

#[test]
fn focus_on_drag_source_passes() {
    let mut f = fixture();
    let focus = InputEvent::focus(Some(f.source), None);
    assert_eq!(f.send(focus), Disposition::Pass);
    let focus_in = InputEvent::new(EventKind::FocusIn, Some(f.source));
    assert_eq!(f.send(focus_in), Disposition::Pass);
    assert_eq!(f.current(), None);
}

#[test]
fn blur_to_nowhere_restores_focus() {
    let mut f = fixture();
    f.send(InputEvent::key_down(None, Key::Tab));
    f.host.blur(f.a);
    assert_eq!(f.host.focused(), None);

    f.send(InputEvent::blur(Some(f.a), None));
    assert_eq!(f.host.focused(), Some(f.a));

    // Focus moving to another element is handled by that element's focus event.
    f.host.blur(f.a);
    f.send(InputEvent::blur(Some(f.a), Some(f.toolbar)));
    assert_eq!(f.host.focused(), None);
}

#[test]
fn focus_on_a_droppable_item_enters_it() {
    let mut host = MemoryHost::new();
    let root = host.root();
    let source = host.insert(root, Rect::new(0.0, 0.0, 10.0, 10.0));
    let list = host.insert(root, Rect::new(20.0, 0.0, 60.0, 40.0));
    let row = host.insert_labelled(list, Rect::new(20.0, 0.0, 60.0, 20.0), "Inbox");

    let mut manager: DragManager<NodeId, u32> = DragManager::new();
    let _ = manager.register_drop_target(&mut host, DropTarget::new(list));
    let _ = manager.register_drop_item(
        &mut host,
        DroppableItem::new(
            row,
            CollectionTarget::Item {
                key: 9,
                position: DropPosition::On,
            },
        ),
    );
    let drag = DragTarget::new(
        source,
        [DragItem::new().with("text/plain", "x")],
        [DropOperation::Copy],
    );
    manager.begin(&mut host, drag, EnglishStrings).unwrap();
    manager.frame(&mut host);

    let _ = manager.handle_event(&mut host, &InputEvent::focus(Some(row), None));
    let session = manager.session().unwrap();
    assert_eq!(session.current_drop_target(), Some(&list));
    assert_eq!(session.current_drop_item(), Some(&row));
    assert_eq!(host.focused(), Some(row));
    assert_eq!(host.announcements().last().unwrap().message, "Inbox");

    // Only the first entered item is announced.
    let _ = manager.handle_event(&mut host, &InputEvent::focus(Some(list), None));
    let _ = manager.handle_event(&mut host, &InputEvent::focus(Some(row), None));
    let count = host
        .announcements()
        .iter()
        .filter(|a| a.message == "Inbox")
        .count();
    assert_eq!(count, 1);
}
