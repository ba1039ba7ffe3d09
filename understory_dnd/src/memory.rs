// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`DndHost`] for headless use.
//!
//! [`MemoryHost`] keeps a plain parent/children tree with per-node bounds,
//! labels and hidden flags, records focus moves and announcements, and tracks
//! whether a frame was requested. It is what the crate's own tests and demos
//! drive, and a reasonable starting point for wiring a real toolkit.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::host::{AccessTree, Announcer, DndHost, Urgency};
use crate::modality::{InteractionModality, ModalityDetector};

/// Handle of a node in a [`MemoryHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Rect,
    label: Option<String>,
    hidden: bool,
    live_region: bool,
}

/// An announcement recorded by [`MemoryHost`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    /// The narrated text.
    pub message: String,
    /// Its urgency.
    pub urgency: Urgency,
}

/// A headless host backed by vectors.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
    focus_history: Vec<NodeId>,
    announcements: Vec<Announcement>,
    modality: Option<InteractionModality>,
    frame_requested: bool,
    watching_hidden: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create a host whose tree holds only a root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![Node {
                parent: None,
                children: Vec::new(),
                bounds: Rect::ZERO,
                label: None,
                hidden: false,
                live_region: false,
            }],
            focused: None,
            focus_history: Vec::new(),
            announcements: Vec::new(),
            modality: None,
            frame_requested: false,
            watching_hidden: false,
        }
    }

    /// Append a child of `parent` with the given bounds.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` nodes are inserted.
    pub fn insert(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "Too many nodes inserted (max {})",
            u32::MAX
        );
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            bounds,
            label: None,
            hidden: false,
            live_region: false,
        });
        self.nodes[parent.idx()].children.push(id);
        id
    }

    /// Append a labelled child of `parent`.
    pub fn insert_labelled(&mut self, parent: NodeId, bounds: Rect, label: &str) -> NodeId {
        let id = self.insert(parent, bounds);
        self.nodes[id.idx()].label = Some(String::from(label));
        id
    }

    /// Set or clear the accessible label of `node`.
    pub fn set_label(&mut self, node: NodeId, label: Option<&str>) {
        self.nodes[node.idx()].label = label.map(String::from);
    }

    /// Mark `node` as a live region.
    pub fn set_live_region(&mut self, node: NodeId, live: bool) {
        self.nodes[node.idx()].live_region = live;
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Every node focused so far, in order.
    #[must_use]
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_history
    }

    /// Every announcement so far, in order.
    #[must_use]
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Override the reported interaction modality.
    pub fn set_interaction_modality(&mut self, modality: Option<InteractionModality>) {
        self.modality = modality;
    }

    /// Returns `true` once after [`DndHost::request_frame`] was called.
    pub fn take_frame_request(&mut self) -> bool {
        core::mem::take(&mut self.frame_requested)
    }

    /// Returns `true` while the drag manager wants hidden-state changes reported.
    #[must_use]
    pub fn is_watching_hidden(&self) -> bool {
        self.watching_hidden
    }

    /// Snapshot of the hidden flag of every node, indexed by node order.
    #[must_use]
    pub fn hidden_snapshot(&self) -> Vec<bool> {
        self.nodes.iter().map(|n| n.hidden).collect()
    }
}

impl AccessTree for MemoryHost {
    type Element = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.nodes.get(element.idx()).and_then(|n| n.parent)
    }

    fn children(&self, element: NodeId) -> &[NodeId] {
        self.nodes
            .get(element.idx())
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    fn is_hidden(&self, element: NodeId) -> bool {
        self.nodes.get(element.idx()).is_some_and(|n| n.hidden)
    }

    fn set_hidden(&mut self, element: NodeId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(element.idx()) {
            node.hidden = hidden;
        }
    }

    fn is_live_region(&self, element: NodeId) -> bool {
        self.nodes.get(element.idx()).is_some_and(|n| n.live_region)
    }

    fn bounds(&self, element: NodeId) -> Rect {
        self.nodes
            .get(element.idx())
            .map_or(Rect::ZERO, |n| n.bounds)
    }

    fn label(&self, element: NodeId) -> Option<String> {
        self.nodes.get(element.idx()).and_then(|n| n.label.clone())
    }

    fn focus(&mut self, element: NodeId) {
        self.focused = Some(element);
        self.focus_history.push(element);
    }

    fn blur(&mut self, element: NodeId) {
        if self.focused == Some(element) {
            self.focused = None;
        }
    }

    fn watch_hidden_changes(&mut self, watch: bool) {
        self.watching_hidden = watch;
    }
}

impl Announcer for MemoryHost {
    fn announce(&mut self, message: &str, urgency: Urgency) {
        self.announcements.push(Announcement {
            message: String::from(message),
            urgency,
        });
    }
}

impl ModalityDetector for MemoryHost {
    fn interaction_modality(&self) -> Option<InteractionModality> {
        self.modality
    }
}

impl DndHost for MemoryHost {
    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
