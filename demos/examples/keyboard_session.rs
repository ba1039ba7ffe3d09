// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard drag session.
//!
//! Drag a card onto one of three columns using Tab, Shift+Tab and Enter, the
//! way a keyboard user would. The "Archive" column rejects plain text and is
//! hidden from assistive technology for the duration of the drag.
//!
//! Run:
//! - `cargo run -p understory_dnd_demos --example keyboard_session`
//! - `RUST_LOG=understory_dnd=trace cargo run -p understory_dnd_demos --example keyboard_session`

use kurbo::Rect;
use understory_dnd::host::AccessTree;
use understory_dnd::memory::MemoryHost;
use understory_dnd::messages::EnglishStrings;
use understory_dnd::modality::InteractionModality;
use understory_dnd::types::{
    CollectionTarget, DragEndEvent, DragItem, DragTypes, DropEvent, DropOperation,
};
use understory_dnd::{DragManager, DragTarget, DropTarget, InputEvent, Key, Modifiers};
use understory_dnd_demos::{describe, init_tracing, print_announcements, pump_frame};

fn text_only(types: &DragTypes, allowed: &[DropOperation]) -> DropOperation {
    if types.contains("text/plain") {
        allowed.first().copied().unwrap_or(DropOperation::Cancel)
    } else {
        DropOperation::Cancel
    }
}

fn images_only(types: &DragTypes, _: &[DropOperation]) -> DropOperation {
    if types.iter().any(|ty| ty.starts_with("image/")) {
        DropOperation::Copy
    } else {
        DropOperation::Cancel
    }
}

fn main() {
    init_tracing();

    let mut host = MemoryHost::new();
    let root = host.root();
    let card = host.insert_labelled(root, Rect::new(10.0, 10.0, 110.0, 50.0), "Write docs");
    let columns = [
        ("To do", Rect::new(200.0, 0.0, 300.0, 400.0)),
        ("Doing", Rect::new(320.0, 0.0, 420.0, 400.0)),
        ("Done", Rect::new(440.0, 0.0, 540.0, 400.0)),
        ("Archive", Rect::new(560.0, 0.0, 660.0, 400.0)),
    ]
    .map(|(label, bounds)| (label, host.insert_labelled(root, bounds, label)));

    let mut manager: DragManager<_, u32> = DragManager::new();
    for (label, element) in columns {
        let negotiator: fn(&DragTypes, &[DropOperation]) -> DropOperation =
            if label == "Archive" { images_only } else { text_only };
        let target = DropTarget::new(element)
            .negotiate_with(negotiator)
            .on_drop(move |event: &DropEvent, _: Option<&CollectionTarget<u32>>| {
                let text = event
                    .items
                    .first()
                    .and_then(|item| item.get_text("text/plain"))
                    .unwrap_or_default();
                println!("  -> {label} received {text:?} ({:?})", event.drop_operation);
            });
        let _ = manager.register_drop_target(&mut host, target);
    }

    // The user pressed Enter on the card's drag affordance.
    host.set_interaction_modality(Some(InteractionModality::Keyboard));
    let drag = DragTarget::new(
        card,
        [DragItem::new().with("text/plain", "Write docs")],
        [DropOperation::Move, DropOperation::Copy],
    )
    .on_drag_end(|event: &DragEndEvent| {
        println!("  drag ended with {:?} at {:?}", event.drop_operation, event.point);
    });
    manager
        .begin(&mut host, drag, EnglishStrings)
        .expect("no drag in progress");

    let mut seen = 0;
    pump_frame(&mut manager, &mut host);
    seen = print_announcements(&host, seen);
    println!("after setup: {}", describe(&manager, &host));
    let hidden: Vec<_> = columns
        .iter()
        .filter(|(_, element)| host.is_hidden(*element))
        .map(|(label, _)| *label)
        .collect();
    println!("hidden from assistive technology: {hidden:?}");

    let script = [
        ("Tab", InputEvent::key_down(Some(card), Key::Tab)),
        ("Tab", InputEvent::key_down(Some(card), Key::Tab)),
        ("Tab", InputEvent::key_down(Some(card), Key::Tab)),
        (
            "Shift+Tab",
            InputEvent::key_down(Some(card), Key::Tab).with_modifiers(Modifiers::SHIFT),
        ),
        ("Enter", InputEvent::key_down(Some(card), Key::Enter)),
    ];
    for (name, event) in script {
        let disposition = manager.handle_event(&mut host, &event);
        println!("{name}: {disposition:?}, {}", describe(&manager, &host));
        seen = print_announcements(&host, seen);
    }
}
