// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The state of one drag session.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::messages::LocalizedStrings;
use crate::target::DragTarget;
use crate::types::DropOperation;
use crate::visibility::VisibilityMask;

/// Where the drag manager is in its session lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// No session exists.
    #[default]
    Absent,
    /// A session was begun; its setup waits for the next frame.
    Starting,
    /// The session intercepts input and masks visibility.
    Active,
}

/// One drag interaction, from [`begin`](crate::DragManager::begin) to its end.
///
/// Drop targets and items are referenced by element; their descriptors live in
/// the manager's registries.
pub struct DragSession<E> {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) drag_target: DragTarget<E>,
    pub(crate) valid_drop_targets: Vec<E>,
    pub(crate) current_drop_target: Option<E>,
    pub(crate) current_drop_item: Option<E>,
    pub(crate) drop_operation: Option<DropOperation>,
    pub(crate) visibility: Option<VisibilityMask<E>>,
    pub(crate) strings: Box<dyn LocalizedStrings>,
    pub(crate) is_virtual_click: bool,
    pub(crate) initial_focused: bool,
}

impl<E> DragSession<E> {
    pub(crate) fn new(drag_target: DragTarget<E>, strings: Box<dyn LocalizedStrings>) -> Self {
        Self {
            lifecycle: Lifecycle::Starting,
            drag_target,
            valid_drop_targets: Vec::new(),
            current_drop_target: None,
            current_drop_item: None,
            drop_operation: None,
            visibility: None,
            strings,
            is_virtual_click: false,
            initial_focused: false,
        }
    }

    /// [`Lifecycle::Starting`] until the deferred setup ran, then [`Lifecycle::Active`].
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The drag source.
    pub fn drag_target(&self) -> &DragTarget<E> {
        &self.drag_target
    }

    /// Drop targets that accept the payload, in navigation order.
    pub fn valid_drop_targets(&self) -> &[E] {
        &self.valid_drop_targets
    }

    /// The drop target that currently has focus, if any.
    pub fn current_drop_target(&self) -> Option<&E> {
        self.current_drop_target.as_ref()
    }

    /// The droppable item inside the current target that has focus, if any.
    pub fn current_drop_item(&self) -> Option<&E> {
        self.current_drop_item.as_ref()
    }

    /// The negotiated operation, once a drop or cancel decided it.
    pub fn drop_operation(&self) -> Option<DropOperation> {
        self.drop_operation
    }

    /// Returns `true` while elements are hidden by this session.
    pub fn is_masking(&self) -> bool {
        self.visibility.is_some()
    }
}

impl<E: fmt::Debug> fmt::Debug for DragSession<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("lifecycle", &self.lifecycle)
            .field("drag_target", &self.drag_target)
            .field("valid_drop_targets", &self.valid_drop_targets)
            .field("current_drop_target", &self.current_drop_target)
            .field("current_drop_item", &self.current_drop_item)
            .field("drop_operation", &self.drop_operation)
            .field("visibility", &self.visibility)
            .field("is_virtual_click", &self.is_virtual_click)
            .field("initial_focused", &self.initial_focused)
            .finish_non_exhaustive()
    }
}
