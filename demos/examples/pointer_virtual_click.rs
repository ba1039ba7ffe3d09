// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-reader drag session driven by synthesized pointer events.
//!
//! Screen readers activate elements with pointer events that have no contact
//! geometry, or with a click whose count is zero. This demo starts a drag in
//! virtual modality, shows that a real mouse click is swallowed without
//! dropping, then drops into a list row with a virtual double tap.
//!
//! Run:
//! - `cargo run -p understory_dnd_demos --example pointer_virtual_click`

use kurbo::Rect;
use understory_dnd::host::AccessTree;
use understory_dnd::input::{EventKind, PointerGeometry};
use understory_dnd::memory::MemoryHost;
use understory_dnd::messages::EnglishStrings;
use understory_dnd::modality::{ModalityDetector, ModalityTracker};
use understory_dnd::types::{CollectionTarget, DragItem, DropEvent, DropOperation, DropPosition};
use understory_dnd::{DragManager, DragTarget, DropTarget, DroppableItem, InputEvent};
use understory_dnd_demos::{describe, init_tracing, print_announcements, pump_frame};

fn main() {
    init_tracing();

    let mut host = MemoryHost::new();
    let root = host.root();
    let file = host.insert_labelled(root, Rect::new(0.0, 0.0, 80.0, 20.0), "report.txt");
    let folders = host.insert_labelled(root, Rect::new(100.0, 0.0, 300.0, 90.0), "Folders");
    let rows = ["Inbox", "Projects", "Trash"];
    let mut row_elements = Vec::new();
    for (i, label) in rows.iter().enumerate() {
        let y = 30.0 * i as f64;
        let bounds = Rect::new(100.0, y, 300.0, y + 30.0);
        row_elements.push(host.insert_labelled(folders, bounds, label));
    }

    let mut manager: DragManager<_, usize> = DragManager::new();
    let _ = manager.register_drop_target(
        &mut host,
        DropTarget::new(folders).on_drop(
            move |event: &DropEvent, target: Option<&CollectionTarget<usize>>| {
                let name = match target {
                    Some(CollectionTarget::Item { key, .. }) => rows[*key],
                    _ => "Folders",
                };
                println!("  -> {:?} into {name}", event.drop_operation);
            },
        ),
    );
    for (key, &row) in row_elements.iter().enumerate() {
        let item = DroppableItem::new(
            row,
            CollectionTarget::Item {
                key,
                position: DropPosition::On,
            },
        );
        let _ = manager.register_drop_item(&mut host, item);
    }

    // A screen reader activated the file's drag button.
    let mut tracker = ModalityTracker::new();
    let activation = InputEvent::click(Some(file), 0);
    tracker.observe(&activation);
    println!("observed modality: {:?}", tracker.drag_modality());
    host.set_interaction_modality(tracker.interaction_modality());

    let drag = DragTarget::new(
        file,
        [DragItem::new().with("text/plain", "report.txt")],
        [DropOperation::Move],
    );
    manager
        .begin(&mut host, drag, EnglishStrings)
        .expect("no drag in progress");
    pump_frame(&mut manager, &mut host);
    let mut seen = print_announcements(&host, 0);
    println!("after setup: {}", describe(&manager, &host));

    let projects = row_elements[1];
    let script = [
        (
            "mouse down on Projects",
            InputEvent::pointer_down(Some(projects), PointerGeometry::MOUSE),
        ),
        (
            "mouse up on Projects",
            InputEvent::new(EventKind::PointerUp, Some(projects)),
        ),
        ("mouse click on Projects", InputEvent::click(Some(projects), 1)),
        (
            "virtual tap on Projects",
            InputEvent::pointer_down(Some(projects), PointerGeometry::VIRTUAL),
        ),
        ("virtual click on Projects", InputEvent::click(Some(projects), 1)),
    ];
    for (name, event) in script {
        let disposition = manager.handle_event(&mut host, &event);
        println!(
            "{name}: stop={} prevent={}, {}",
            disposition.stops_propagation(),
            disposition.prevents_default(),
            describe(&manager, &host)
        );
        seen = print_announcements(&host, seen);
    }
}
