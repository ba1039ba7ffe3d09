// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits the drag manager drives.
//!
//! The manager does not own the accessibility tree, the live announcer, or the
//! frame loop. Each manager call borrows a host implementing [`DndHost`], which
//! bundles:
//!
//! - [`AccessTree`]: structure, hidden state, bounds, labels and focus of elements.
//! - [`Announcer`]: narration to assistive technology.
//! - [`ModalityDetector`]: the current input modality.
//! - [`DndHost::request_frame`]: scheduling of the deferred session setup.

use alloc::string::String;
use kurbo::Rect;

use crate::modality::ModalityDetector;
use crate::types::ElementId;

/// Read and mutate the host's accessibility tree.
pub trait AccessTree {
    /// Element handle.
    type Element: ElementId;

    /// The root of the tree that visibility masking walks.
    fn root(&self) -> Self::Element;

    /// The parent of `element`, or `None` for the root and detached elements.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// The children of `element` in document order.
    fn children(&self, element: Self::Element) -> &[Self::Element];

    /// Returns `true` if `element` itself is marked hidden from assistive technology.
    fn is_hidden(&self, element: Self::Element) -> bool;

    /// Mark or unmark `element` itself as hidden from assistive technology.
    fn set_hidden(&mut self, element: Self::Element, hidden: bool);

    /// Returns `true` for live regions used for announcements. They are never hidden.
    fn is_live_region(&self, _element: Self::Element) -> bool {
        false
    }

    /// Bounding box of `element` in window coordinates.
    fn bounds(&self, element: Self::Element) -> Rect;

    /// Accessible label of `element`, if any.
    fn label(&self, element: Self::Element) -> Option<String>;

    /// Move input focus to `element`.
    fn focus(&mut self, element: Self::Element);

    /// Remove input focus from `element` if it has it.
    fn blur(&mut self, _element: Self::Element) {}

    /// Start or stop reporting hidden-state changes to
    /// [`DragManager::hidden_state_changed`](crate::DragManager::hidden_state_changed).
    fn watch_hidden_changes(&mut self, _watch: bool) {}

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, node: Self::Element) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Returns `true` if `element` or any of its ancestors is hidden.
    fn is_inside_hidden(&self, element: Self::Element) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if self.is_hidden(id) {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// How urgently a message interrupts assistive technology.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// Interrupt current speech.
    #[default]
    Assertive,
    /// Wait until current speech finishes.
    Polite,
}

/// Narrates messages to assistive technology.
pub trait Announcer {
    /// Announce `message` with the given urgency.
    fn announce(&mut self, message: &str, urgency: Urgency);
}

/// Everything the drag manager needs from its environment.
pub trait DndHost: AccessTree + Announcer + ModalityDetector {
    /// Ask the host to call [`DragManager::frame`](crate::DragManager::frame)
    /// once its current dispatch and render have settled.
    fn request_frame(&mut self);
}
