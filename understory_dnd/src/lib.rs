// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DnD: an accessible, modality-agnostic drag-and-drop session manager.
//!
//! This crate coordinates one drag at a time over an abstract accessibility
//! tree. Pointer, keyboard and screen-reader users share one interaction
//! grammar: while a session runs, the manager owns the input stream, hides
//! everything that is not a valid drop location from assistive technology,
//! negotiates the drop operation, and narrates every transition.
//!
//! It does **not** decide what a drop does to application data, render a drag
//! preview, or track native platform drags. Those belong to the host.
//!
//! ## Pieces
//!
//! - [`DragManager`]: the registries, the single [`DragSession`], and the
//!   interception logic.
//! - [`target`]: descriptors for the drag source ([`DragTarget`]), drop targets
//!   ([`DropTarget`]) and droppable collection items ([`DroppableItem`]), each
//!   with optional capabilities expressed as traits that closures implement.
//! - [`host`]: the collaborator traits the manager drives, bundled by
//!   [`DndHost`].
//! - [`visibility`]: hiding the complement of a keep-list, with exact restore.
//! - [`modality`]: input modality classification and the heuristic for
//!   pointer events synthesized by assistive technology.
//! - [`memory`]: [`MemoryHost`](memory::MemoryHost), an in-memory host for
//!   tests and headless use.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_dnd::host::AccessTree;
//! use understory_dnd::memory::MemoryHost;
//! use understory_dnd::messages::EnglishStrings;
//! use understory_dnd::types::{CollectionTarget, DragItem, DropEvent, DropOperation};
//! use understory_dnd::{DragManager, DragTarget, DropTarget};
//!
//! let mut host = MemoryHost::new();
//! let root = host.root();
//! let card = host.insert(root, Rect::new(0.0, 0.0, 40.0, 20.0));
//! let bin = host.insert(root, Rect::new(100.0, 0.0, 140.0, 40.0));
//!
//! let mut manager: DragManager<_, u32> = DragManager::new();
//! let _registration = manager.register_drop_target(
//!     &mut host,
//!     DropTarget::new(bin).on_drop(|event: &DropEvent, _: Option<&CollectionTarget<u32>>| {
//!         assert_eq!(event.drop_operation, DropOperation::Move);
//!     }),
//! );
//!
//! let drag = DragTarget::new(
//!     card,
//!     [DragItem::new().with("text/plain", "card 1")],
//!     [DropOperation::Move],
//! );
//! manager.begin(&mut host, drag, EnglishStrings).unwrap();
//! // The host runs the deferred setup on its next frame.
//! manager.frame(&mut host);
//!
//! manager.next(&mut host).unwrap();
//! assert_eq!(host.focused(), Some(bin));
//! manager.drop(&mut host, None).unwrap();
//! assert!(!manager.is_dragging());
//! ```
//!
//! ## Interception
//!
//! Hosts offer every platform event to [`DragManager::handle_event`] before
//! their own dispatch and honor the returned [`Disposition`]. Interception
//! starts in [`DragManager::frame`], never in [`DragManager::begin`], so the
//! event that started a drag is not swallowed by its own session.
//!
//! ## Logging
//!
//! Session transitions are reported through [`tracing`] at `debug` level;
//! navigation, focus and interception decisions at `trace` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod broadcast;
pub mod error;
pub mod host;
pub mod input;
pub mod manager;
pub mod memory;
pub mod messages;
pub mod modality;
pub mod registry;
pub mod session;
pub mod target;
pub mod types;
pub mod visibility;

pub use broadcast::{SessionEvent, SubscriptionId};
pub use error::DndError;
pub use host::{AccessTree, Announcer, DndHost, Urgency};
pub use input::{Disposition, EventKind, InputEvent, Key, Modifiers};
pub use manager::{
    AutoNavigate, DragManager, DragManagerOptions, DropItemRegistration, DropTargetRegistration,
};
pub use session::{DragSession, Lifecycle};
pub use target::{DragTarget, DropTarget, DroppableItem};
