// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility controller: hide everything except a keep-list from assistive technology.
//!
//! [`hide_outside`] walks the tree from [`AccessTree::root`] depth-first:
//!
//! - Elements in the keep-list are left alone together with their subtrees.
//! - Ancestors of kept elements are left visible and their children are visited.
//! - Live regions are never hidden, so announcements stay audible.
//! - Every other element that is not already hidden is hidden, and its subtree
//!   is skipped.
//!
//! The returned [`VisibilityMask`] remembers exactly which elements it hid.
//! Restoring it unhides those and nothing else, so elements hidden by someone
//! else before the call keep their state.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_dnd::host::AccessTree;
//! use understory_dnd::memory::MemoryHost;
//! use understory_dnd::visibility::hide_outside;
//!
//! let mut host = MemoryHost::new();
//! let root = host.root();
//! let keep = host.insert(root, Rect::new(0.0, 0.0, 10.0, 10.0));
//! let other = host.insert(root, Rect::new(10.0, 0.0, 20.0, 10.0));
//!
//! let mask = hide_outside(&mut host, &[keep]);
//! assert!(host.is_hidden(other));
//! assert!(!host.is_hidden(keep));
//!
//! mask.restore(&mut host);
//! assert!(!host.is_hidden(other));
//! ```

use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::host::AccessTree;
use crate::types::ElementId;

/// The set of elements hidden by one [`hide_outside`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use = "dropping a mask without restoring it leaves elements hidden"]
pub struct VisibilityMask<E> {
    hidden: Vec<E>,
}

impl<E: ElementId> VisibilityMask<E> {
    /// The elements this mask hid, in traversal order.
    pub fn hidden(&self) -> &[E] {
        &self.hidden
    }

    /// Unhide every element this mask hid.
    pub fn restore<T>(self, tree: &mut T)
    where
        T: AccessTree<Element = E> + ?Sized,
    {
        for &element in self.hidden.iter().rev() {
            tree.set_hidden(element, false);
        }
    }
}

/// Hide every element that is neither in `keep`, inside an element of `keep`,
/// nor an ancestor of one.
pub fn hide_outside<T>(tree: &mut T, keep: &[T::Element]) -> VisibilityMask<T::Element>
where
    T: AccessTree + ?Sized,
{
    let kept: HashSet<T::Element> = keep.iter().copied().collect();

    let mut ancestors: HashSet<T::Element> = HashSet::new();
    for &element in keep {
        let mut parent = tree.parent(element);
        while let Some(id) = parent {
            // A shared ancestor has already had its chain recorded.
            if !ancestors.insert(id) {
                break;
            }
            parent = tree.parent(id);
        }
    }

    let mut hidden = Vec::new();
    let mut stack = Vec::new();
    stack.push(tree.root());

    while let Some(id) = stack.pop() {
        if kept.contains(&id) || tree.is_live_region(id) {
            continue;
        }

        if ancestors.contains(&id) {
            // Reverse so that popping visits children in document order.
            for &child in tree.children(id).iter().rev() {
                stack.push(child);
            }
            continue;
        }

        if !tree.is_hidden(id) {
            tree.set_hidden(id, true);
            hidden.push(id);
        }
    }

    tracing::trace!(kept = keep.len(), hidden = hidden.len(), "applied visibility mask");
    VisibilityMask { hidden }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryHost, NodeId};
    use kurbo::Rect;

    // root
    // ├── toolbar
    // ├── list
    // │   ├── row_a
    // │   └── row_b
    // └── sidebar
    //     └── panel
    struct Fixture {
        host: MemoryHost,
        toolbar: NodeId,
        list: NodeId,
        row_a: NodeId,
        row_b: NodeId,
        sidebar: NodeId,
        panel: NodeId,
    }

    fn fixture() -> Fixture {
        let mut host = MemoryHost::new();
        let root = host.root();
        let toolbar = host.insert(root, Rect::new(0.0, 0.0, 100.0, 10.0));
        let list = host.insert(root, Rect::new(0.0, 10.0, 50.0, 100.0));
        let row_a = host.insert(list, Rect::new(0.0, 10.0, 50.0, 20.0));
        let row_b = host.insert(list, Rect::new(0.0, 20.0, 50.0, 30.0));
        let sidebar = host.insert(root, Rect::new(50.0, 10.0, 100.0, 100.0));
        let panel = host.insert(sidebar, Rect::new(50.0, 10.0, 100.0, 50.0));
        Fixture {
            host,
            toolbar,
            list,
            row_a,
            row_b,
            sidebar,
            panel,
        }
    }

    #[test]
    fn hides_siblings_but_not_ancestors() {
        let mut f = fixture();
        let mask = hide_outside(&mut f.host, &[f.row_a]);

        assert!(!f.host.is_hidden(f.row_a));
        assert!(!f.host.is_hidden(f.list));
        assert!(f.host.is_hidden(f.row_b));
        assert!(f.host.is_hidden(f.toolbar));
        assert!(f.host.is_hidden(f.sidebar));
        // Subtrees of hidden elements are not touched individually.
        assert!(!f.host.is_hidden(f.panel));
        assert_eq!(mask.hidden(), &[f.toolbar, f.row_b, f.sidebar]);

        mask.restore(&mut f.host);
        for id in [f.toolbar, f.list, f.row_a, f.row_b, f.sidebar, f.panel] {
            assert!(!f.host.is_hidden(id), "{id:?} should be visible after restore");
        }
    }

    #[test]
    fn restore_preserves_prior_hidden_state() {
        let mut f = fixture();
        f.host.set_hidden(f.sidebar, true);

        let mask = hide_outside(&mut f.host, &[f.row_a]);
        assert!(!mask.hidden().contains(&f.sidebar));

        mask.restore(&mut f.host);
        assert!(f.host.is_hidden(f.sidebar));
        assert!(!f.host.is_hidden(f.toolbar));
    }

    #[test]
    fn kept_subtrees_stay_visible() {
        let mut f = fixture();
        let mask = hide_outside(&mut f.host, &[f.sidebar, f.row_b]);
        assert!(!f.host.is_hidden(f.sidebar));
        assert!(!f.host.is_hidden(f.panel));
        assert!(!f.host.is_hidden(f.row_b));
        assert!(f.host.is_hidden(f.row_a));
        assert!(f.host.is_hidden(f.toolbar));
        mask.restore(&mut f.host);
    }

    #[test]
    fn live_regions_are_never_hidden() {
        let mut f = fixture();
        f.host.set_live_region(f.toolbar, true);
        let mask = hide_outside(&mut f.host, &[f.row_a]);
        assert!(!f.host.is_hidden(f.toolbar));
        assert!(!mask.hidden().contains(&f.toolbar));
        mask.restore(&mut f.host);
    }
}
