// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session lifecycle notifications.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// A change in whether a drag session exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// A session was created by [`DragManager::begin`](crate::DragManager::begin).
    Started,
    /// The session was torn down and cleared.
    Ended,
}

/// Handle identifying one subscriber.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A list of callbacks notified in subscription order.
pub struct Broadcast<Ev> {
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(Ev)>)>,
    next_id: u64,
}

impl<Ev> Default for Broadcast<Ev> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<Ev> fmt::Debug for Broadcast<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field(
                "subscribers",
                &self.subscribers.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<Ev: Copy> Broadcast<Ev> {
    /// Create an emitter without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `callback`; it is called for every later [`emit`](Self::emit).
    pub fn subscribe(&mut self, callback: impl FnMut(Ev) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Call every subscriber with `event`.
    pub fn emit(&mut self, event: Ev) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
