// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload, operation and event types shared by the drag manager and its collaborators.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use kurbo::{Point, Rect};

/// Identity of an element in the host's accessibility tree.
///
/// Anything that is a small, copyable, hashable handle qualifies; for example a
/// generational node id from a box tree.
pub trait ElementId: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> ElementId for T {}

/// The operation a drop performs on the dragged data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropOperation {
    /// Copy the data to the drop target.
    Copy,
    /// Move the data to the drop target.
    Move,
    /// Link the data from the drop target.
    Link,
    /// The drop is not acceptable here.
    Cancel,
}

/// The set of type identifiers present across all dragged items.
pub type DragTypes = BTreeSet<String>;

/// One dragged item: a mapping from a type identifier (for example a MIME type)
/// to its textual representation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragItem {
    data: BTreeMap<String, String>,
}

impl DragItem {
    /// Create an empty item.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a representation of this item, replacing any previous value for `ty`.
    #[must_use]
    pub fn with(mut self, ty: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(ty.into(), value.into());
        self
    }

    /// Return the representation for `ty`, if present.
    #[must_use]
    pub fn get(&self, ty: &str) -> Option<&str> {
        self.data.get(ty).map(String::as_str)
    }

    /// Iterate the type identifiers of this item in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

/// Collect the union of type identifiers across `items`.
#[must_use]
pub fn drag_types(items: &[DragItem]) -> DragTypes {
    let mut types = DragTypes::new();
    for item in items {
        types.extend(item.types().map(String::from));
    }
    types
}

/// A dropped item as seen by a drop handler.
///
/// Each payload item is projected to a text item whose values resolve on
/// demand through [`TextDropItem::get_text`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDropItem {
    types: DragTypes,
    data: BTreeMap<String, String>,
}

impl TextDropItem {
    pub(crate) fn from_drag_item(item: &DragItem) -> Self {
        Self {
            types: item.data.keys().cloned().collect(),
            data: item.data.clone(),
        }
    }

    /// The kind of this item. Keyboard and virtual drops only ever carry text.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        "text"
    }

    /// The type identifiers this item can be read as.
    #[must_use]
    pub fn types(&self) -> &DragTypes {
        &self.types
    }

    /// Resolve the value for `ty`.
    #[must_use]
    pub fn get_text(&self, ty: &str) -> Option<&str> {
        self.data.get(ty).map(String::as_str)
    }
}

/// Where inside a collection item a drop lands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Between this item and the one before it.
    Before,
    /// Between this item and the one after it.
    After,
    /// Onto the item itself.
    On,
}

/// An addressable location inside a collection drop target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollectionTarget<K> {
    /// The collection as a whole.
    Root,
    /// A position relative to the item identified by `key`.
    Item {
        /// The application key of the item.
        key: K,
        /// Position relative to that item.
        position: DropPosition,
    },
}

/// Fired when a drop target becomes the current target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DropEnterEvent {
    /// Center of the target's bounds.
    pub point: Point,
}

/// Fired when a drop target stops being the current target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DropExitEvent {
    /// Center of the target's bounds.
    pub point: Point,
}

/// Fired for the secondary "open/expand" gesture on the current target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DropActivateEvent {
    /// Center of the target's bounds.
    pub point: Point,
}

/// Delivered to a drop target's drop handler.
#[derive(Clone, Debug, PartialEq)]
pub struct DropEvent {
    /// Center of the target's bounds.
    pub point: Point,
    /// The dragged items, projected to text.
    pub items: Vec<TextDropItem>,
    /// The negotiated operation.
    pub drop_operation: DropOperation,
}

/// Delivered to the drag source when the session ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragEndEvent {
    /// Center of the element where the drag ended.
    pub point: Point,
    /// The negotiated operation, or [`DropOperation::Cancel`] when nothing was dropped.
    pub drop_operation: DropOperation,
}

/// The synthetic pointer location used for keyboard and virtual drags.
pub(crate) fn center(rect: Rect) -> Point {
    rect.center()
}
