// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sources, drop targets, droppable items and their optional capabilities.
//!
//! Every capability is its own trait so a descriptor declares exactly what it
//! supports. Closures with the matching signature implement each trait, so
//! most call sites just pass a closure:
//!
//! ```
//! use understory_dnd::target::DropTarget;
//! use understory_dnd::types::{DropEvent, DropOperation};
//!
//! let target: DropTarget<u32, u64> = DropTarget::new(7)
//!     .negotiate_with(|types: &understory_dnd::types::DragTypes, allowed: &[DropOperation]| {
//!         if types.contains("text/plain") {
//!             allowed.first().copied().unwrap_or(DropOperation::Cancel)
//!         } else {
//!             DropOperation::Cancel
//!         }
//!     })
//!     .on_drop(|event: &DropEvent, _key: Option<&understory_dnd::types::CollectionTarget<u64>>| {
//!         assert!(!event.items.is_empty());
//!     });
//! assert!(target.has_drop_handler());
//! ```
//!
//! A capability that is absent is never an error: the manager skips the call
//! and falls back to its default policy.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use smallvec::SmallVec;

use crate::input::InputEvent;
use crate::types::{
    CollectionTarget, DragEndEvent, DragItem, DragTypes, DropActivateEvent, DropEnterEvent,
    DropEvent, DropExitEvent, DropOperation,
};

/// Decide which operation a drop would perform for the given payload types.
///
/// Return [`DropOperation::Cancel`] when the payload is not acceptable.
pub trait NegotiateDropOperation {
    /// Pick an operation for `types` out of `allowed` (ordered by preference).
    fn drop_operation(&self, types: &DragTypes, allowed: &[DropOperation]) -> DropOperation;
}

impl<F> NegotiateDropOperation for F
where
    F: Fn(&DragTypes, &[DropOperation]) -> DropOperation,
{
    fn drop_operation(&self, types: &DragTypes, allowed: &[DropOperation]) -> DropOperation {
        self(types, allowed)
    }
}

/// Observe a drop target becoming the current target.
pub trait DropEnterHandler<E> {
    /// Called with the target's center and the active drag source.
    fn drop_enter(&mut self, event: &DropEnterEvent, drag: &DragTarget<E>);
}

impl<E, F> DropEnterHandler<E> for F
where
    F: FnMut(&DropEnterEvent, &DragTarget<E>),
{
    fn drop_enter(&mut self, event: &DropEnterEvent, drag: &DragTarget<E>) {
        self(event, drag);
    }
}

/// Observe a drop target losing current-target status.
pub trait DropExitHandler {
    /// Called with the target's center.
    fn drop_exit(&mut self, event: &DropExitEvent);
}

impl<F> DropExitHandler for F
where
    F: FnMut(&DropExitEvent),
{
    fn drop_exit(&mut self, event: &DropExitEvent) {
        self(event);
    }
}

/// Observe focus entering an addressable location inside a collection target.
pub trait CollectionEnterHandler<K> {
    /// Called with the location of the entered item.
    fn collection_enter(&mut self, target: &CollectionTarget<K>);
}

impl<K, F> CollectionEnterHandler<K> for F
where
    F: FnMut(&CollectionTarget<K>),
{
    fn collection_enter(&mut self, target: &CollectionTarget<K>) {
        self(target);
    }
}

/// Handle the secondary "open/expand" gesture on a drop target.
pub trait DropActivateHandler {
    /// Called with the target's center.
    fn drop_activate(&mut self, event: &DropActivateEvent);
}

impl<F> DropActivateHandler for F
where
    F: FnMut(&DropActivateEvent),
{
    fn drop_activate(&mut self, event: &DropActivateEvent) {
        self(event);
    }
}

/// Receive a drop.
pub trait DropHandler<K> {
    /// Called with the drop event and, for collection targets, the sub-target location.
    fn drop(&mut self, event: &DropEvent, target: Option<&CollectionTarget<K>>);
}

impl<K, F> DropHandler<K> for F
where
    F: FnMut(&DropEvent, Option<&CollectionTarget<K>>),
{
    fn drop(&mut self, event: &DropEvent, target: Option<&CollectionTarget<K>>) {
        self(event, target);
    }
}

/// Receive key presses the drag manager does not interpret itself.
pub trait DropKeyHandler<E> {
    /// Called with the key event and the active drag source.
    fn key_down(&mut self, event: &InputEvent<E>, drag: &DragTarget<E>);
}

impl<E, F> DropKeyHandler<E> for F
where
    F: FnMut(&InputEvent<E>, &DragTarget<E>),
{
    fn key_down(&mut self, event: &InputEvent<E>, drag: &DragTarget<E>) {
        self(event, drag);
    }
}

/// Observe the end of a drag session on the drag source.
pub trait DragEndHandler {
    /// Called once, after the session has been torn down.
    fn drag_end(&mut self, event: &DragEndEvent);
}

impl<F> DragEndHandler for F
where
    F: FnMut(&DragEndEvent),
{
    fn drag_end(&mut self, event: &DragEndEvent) {
        self(event);
    }
}

/// Allowed operations of a drag source, in preference order.
pub type AllowedOperations = SmallVec<[DropOperation; 4]>;

/// The source of a drag session.
pub struct DragTarget<E> {
    element: E,
    items: Vec<DragItem>,
    allowed_operations: AllowedOperations,
    on_drag_end: Option<Box<dyn DragEndHandler>>,
}

impl<E> DragTarget<E> {
    /// Create a drag source for `element` carrying `items`, permitting `allowed` operations.
    pub fn new(
        element: E,
        items: impl IntoIterator<Item = DragItem>,
        allowed: impl IntoIterator<Item = DropOperation>,
    ) -> Self {
        Self {
            element,
            items: items.into_iter().collect(),
            allowed_operations: allowed.into_iter().collect(),
            on_drag_end: None,
        }
    }

    /// Install the drag-end handler.
    #[must_use]
    pub fn on_drag_end(mut self, handler: impl DragEndHandler + 'static) -> Self {
        self.on_drag_end = Some(Box::new(handler));
        self
    }

    /// The dragged element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The dragged items.
    pub fn items(&self) -> &[DragItem] {
        &self.items
    }

    /// The operations the source permits, in preference order.
    pub fn allowed_operations(&self) -> &[DropOperation] {
        &self.allowed_operations
    }

    pub(crate) fn drag_end_handler(&mut self) -> Option<&mut (dyn DragEndHandler + 'static)> {
        self.on_drag_end.as_deref_mut()
    }
}

impl<E: fmt::Debug> fmt::Debug for DragTarget<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragTarget")
            .field("element", &self.element)
            .field("items", &self.items)
            .field("allowed_operations", &self.allowed_operations)
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

/// An element that can receive drops, with its optional capabilities.
pub struct DropTarget<E, K> {
    element: E,
    pub(crate) negotiator: Option<Box<dyn NegotiateDropOperation>>,
    pub(crate) on_enter: Option<Box<dyn DropEnterHandler<E>>>,
    pub(crate) on_exit: Option<Box<dyn DropExitHandler>>,
    pub(crate) on_collection_enter: Option<Box<dyn CollectionEnterHandler<K>>>,
    pub(crate) on_activate: Option<Box<dyn DropActivateHandler>>,
    pub(crate) on_drop: Option<Box<dyn DropHandler<K>>>,
    pub(crate) on_key_down: Option<Box<dyn DropKeyHandler<E>>>,
}

impl<E, K> DropTarget<E, K> {
    /// Create a drop target for `element` with no capabilities.
    ///
    /// A target without a negotiator accepts every payload.
    pub fn new(element: E) -> Self {
        Self {
            element,
            negotiator: None,
            on_enter: None,
            on_exit: None,
            on_collection_enter: None,
            on_activate: None,
            on_drop: None,
            on_key_down: None,
        }
    }

    /// Install the operation negotiator.
    #[must_use]
    pub fn negotiate_with(mut self, negotiator: impl NegotiateDropOperation + 'static) -> Self {
        self.negotiator = Some(Box::new(negotiator));
        self
    }

    /// Install the enter handler.
    #[must_use]
    pub fn on_enter(mut self, handler: impl DropEnterHandler<E> + 'static) -> Self {
        self.on_enter = Some(Box::new(handler));
        self
    }

    /// Install the exit handler.
    #[must_use]
    pub fn on_exit(mut self, handler: impl DropExitHandler + 'static) -> Self {
        self.on_exit = Some(Box::new(handler));
        self
    }

    /// Install the collection sub-target enter handler.
    #[must_use]
    pub fn on_collection_enter(
        mut self,
        handler: impl CollectionEnterHandler<K> + 'static,
    ) -> Self {
        self.on_collection_enter = Some(Box::new(handler));
        self
    }

    /// Install the activation handler.
    #[must_use]
    pub fn on_activate(mut self, handler: impl DropActivateHandler + 'static) -> Self {
        self.on_activate = Some(Box::new(handler));
        self
    }

    /// Install the drop handler.
    #[must_use]
    pub fn on_drop(mut self, handler: impl DropHandler<K> + 'static) -> Self {
        self.on_drop = Some(Box::new(handler));
        self
    }

    /// Install the key handler.
    #[must_use]
    pub fn on_key_down(mut self, handler: impl DropKeyHandler<E> + 'static) -> Self {
        self.on_key_down = Some(Box::new(handler));
        self
    }

    /// The target element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Returns `true` if a drop handler is installed.
    pub fn has_drop_handler(&self) -> bool {
        self.on_drop.is_some()
    }

    /// Returns `true` unless the negotiator rejects `types`.
    pub fn accepts(&self, types: &DragTypes, allowed: &[DropOperation]) -> bool {
        self.negotiator
            .as_ref()
            .is_none_or(|n| n.drop_operation(types, allowed) != DropOperation::Cancel)
    }
}

impl<E: fmt::Debug, K> fmt::Debug for DropTarget<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("element", &self.element)
            .field("negotiator", &self.negotiator.is_some())
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("on_collection_enter", &self.on_collection_enter.is_some())
            .field("on_activate", &self.on_activate.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .field("on_key_down", &self.on_key_down.is_some())
            .finish()
    }
}

/// An addressable location inside a collection drop target.
pub struct DroppableItem<E, K> {
    element: E,
    target: CollectionTarget<K>,
    pub(crate) negotiator: Option<Box<dyn NegotiateDropOperation>>,
}

impl<E, K> DroppableItem<E, K> {
    /// Create a droppable item for `element` addressing `target`.
    pub fn new(element: E, target: CollectionTarget<K>) -> Self {
        Self {
            element,
            target,
            negotiator: None,
        }
    }

    /// Install the operation negotiator.
    #[must_use]
    pub fn negotiate_with(mut self, negotiator: impl NegotiateDropOperation + 'static) -> Self {
        self.negotiator = Some(Box::new(negotiator));
        self
    }

    /// The item element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The collection location this item addresses.
    pub fn target(&self) -> &CollectionTarget<K> {
        &self.target
    }

    /// Returns `true` unless the negotiator rejects `types`.
    pub fn accepts(&self, types: &DragTypes, allowed: &[DropOperation]) -> bool {
        self.negotiator
            .as_ref()
            .is_none_or(|n| n.drop_operation(types, allowed) != DropOperation::Cancel)
    }
}

impl<E: fmt::Debug, K: fmt::Debug> fmt::Debug for DroppableItem<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroppableItem")
            .field("element", &self.element)
            .field("target", &self.target)
            .field("negotiator", &self.negotiator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DragItem;
    use alloc::string::String;
    use alloc::vec;

    fn text_only(types: &DragTypes, allowed: &[DropOperation]) -> DropOperation {
        if types.contains("text/plain") {
            allowed.first().copied().unwrap_or(DropOperation::Cancel)
        } else {
            DropOperation::Cancel
        }
    }

    #[test]
    fn target_without_negotiator_accepts_everything() {
        let target: DropTarget<u32, u32> = DropTarget::new(1);
        assert!(target.accepts(&DragTypes::new(), &[]));
    }

    #[test]
    fn negotiator_decides_acceptance() {
        let target: DropTarget<u32, u32> = DropTarget::new(1).negotiate_with(text_only);
        let mut types = DragTypes::new();
        types.insert(String::from("image/png"));
        assert!(!target.accepts(&types, &[DropOperation::Move]));
        types.insert(String::from("text/plain"));
        assert!(target.accepts(&types, &[DropOperation::Move]));
        // Rejected for every ordering of allowed operations when types do not match.
        let mut png = DragTypes::new();
        png.insert(String::from("image/png"));
        for allowed in [
            vec![DropOperation::Copy, DropOperation::Move],
            vec![DropOperation::Move, DropOperation::Copy],
            vec![DropOperation::Link],
        ] {
            assert!(!target.accepts(&png, &allowed));
        }
    }

    #[test]
    fn drag_target_keeps_preference_order() {
        let drag = DragTarget::new(
            5_u32,
            [DragItem::new().with("text/plain", "x")],
            [DropOperation::Move, DropOperation::Copy],
        );
        assert_eq!(
            drag.allowed_operations(),
            &[DropOperation::Move, DropOperation::Copy]
        );
        assert_eq!(drag.items().len(), 1);
        assert_eq!(*drag.element(), 5);
    }

    #[test]
    fn debug_reports_capabilities() {
        let target: DropTarget<u32, u32> = DropTarget::new(3).on_exit(|_: &DropExitEvent| {});
        let text = alloc::format!("{target:?}");
        assert!(text.contains("on_exit: true"));
        assert!(text.contains("on_drop: false"));
    }
}
