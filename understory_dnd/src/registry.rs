// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element-keyed registries of drop targets and droppable items.
//!
//! A [`DropRegistry`] maps an element to one descriptor. Iteration follows
//! registration order, which is also the order in which keyboard navigation
//! visits drop targets. Re-registering an element replaces its descriptor but
//! keeps its position.
//!
//! Every registration hands back a [`Registration`] handle. Handles carry a
//! generation, so disposing a handle whose element has been registered again
//! since is a no-op and never removes the replacement.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use hashbrown::HashMap;

use crate::types::ElementId;

/// Handle returned when registering a descriptor; pass it back to unregister.
pub struct Registration<E, T> {
    element: E,
    generation: u64,
    _kind: PhantomData<fn() -> T>,
}

impl<E: ElementId, T> Registration<E, T> {
    /// The registered element.
    pub fn element(&self) -> E {
        self.element
    }
}

impl<E: fmt::Debug, T> fmt::Debug for Registration<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("element", &self.element)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<E: PartialEq, T> PartialEq for Registration<E, T> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.generation == other.generation
    }
}

impl<E: Eq, T> Eq for Registration<E, T> {}

#[derive(Debug)]
struct Slot<T> {
    seq: u64,
    generation: u64,
    value: T,
}

/// Descriptors keyed by element, iterated in registration order.
pub struct DropRegistry<E, T> {
    slots: HashMap<E, Slot<T>>,
    next_seq: u64,
    next_generation: u64,
}

impl<E, T> Default for DropRegistry<E, T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            next_seq: 0,
            next_generation: 0,
        }
    }
}

impl<E: fmt::Debug, T> fmt::Debug for DropRegistry<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropRegistry")
            .field("elements", &self.slots.keys().collect::<Vec<_>>())
            .field("next_seq", &self.next_seq)
            .field("next_generation", &self.next_generation)
            .finish()
    }
}

impl<E: ElementId, T> DropRegistry<E, T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` for `element`, replacing any previous descriptor.
    ///
    /// Returns the new handle and the replaced descriptor, if any.
    pub fn insert(&mut self, element: E, value: T) -> (Registration<E, T>, Option<T>) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let replaced = match self.slots.get_mut(&element) {
            Some(slot) => {
                slot.generation = generation;
                Some(core::mem::replace(&mut slot.value, value))
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.slots.insert(
                    element,
                    Slot {
                        seq,
                        generation,
                        value,
                    },
                );
                None
            }
        };

        let registration = Registration {
            element,
            generation,
            _kind: PhantomData,
        };
        (registration, replaced)
    }

    /// Remove the descriptor `registration` refers to.
    ///
    /// Returns `None` when the handle is stale.
    pub fn remove(&mut self, registration: &Registration<E, T>) -> Option<T> {
        match self.slots.get(&registration.element) {
            Some(slot) if slot.generation == registration.generation => self
                .slots
                .remove(&registration.element)
                .map(|slot| slot.value),
            _ => None,
        }
    }

    /// The descriptor registered for `element`.
    pub fn get(&self, element: &E) -> Option<&T> {
        self.slots.get(element).map(|slot| &slot.value)
    }

    /// Mutable access to the descriptor registered for `element`.
    pub fn get_mut(&mut self, element: &E) -> Option<&mut T> {
        self.slots.get_mut(element).map(|slot| &mut slot.value)
    }

    /// Returns `true` if `element` has a descriptor.
    pub fn contains(&self, element: &E) -> bool {
        self.slots.contains_key(element)
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate `(element, descriptor)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (E, &T)> {
        let mut entries: Vec<(u64, E, &T)> = self
            .slots
            .iter()
            .map(|(&element, slot)| (slot.seq, element, &slot.value))
            .collect();
        entries.sort_unstable_by_key(|&(seq, ..)| seq);
        entries.into_iter().map(|(_, element, value)| (element, value))
    }

    /// Iterate registered elements in registration order.
    pub fn elements(&self) -> impl Iterator<Item = E> + '_ {
        self.iter().map(|(element, _)| element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry: DropRegistry<u32, &str> = DropRegistry::new();
        for (element, name) in [(30, "c"), (10, "a"), (20, "b")] {
            let _ = registry.insert(element, name);
        }
        let order: Vec<u32> = registry.elements().collect();
        assert_eq!(order, vec![30, 10, 20]);
    }

    #[test]
    fn overwrite_keeps_position_and_returns_previous() {
        let mut registry: DropRegistry<u32, &str> = DropRegistry::new();
        let _ = registry.insert(1, "first");
        let _ = registry.insert(2, "second");
        let (_, replaced) = registry.insert(1, "again");
        assert_eq!(replaced, Some("first"));
        let entries: Vec<(u32, &str)> = registry.iter().map(|(e, v)| (e, *v)).collect();
        assert_eq!(entries, vec![(1, "again"), (2, "second")]);
    }

    #[test]
    fn stale_handle_does_not_remove_replacement() {
        let mut registry: DropRegistry<u32, &str> = DropRegistry::new();
        let (old, _) = registry.insert(1, "old");
        let (new, _) = registry.insert(1, "new");
        assert_ne!(old, new);

        assert_eq!(registry.remove(&old), None);
        assert_eq!(registry.get(&1), Some(&"new"));

        assert_eq!(registry.remove(&new), Some("new"));
        assert!(registry.is_empty());
        // Removing twice is harmless.
        assert_eq!(registry.remove(&new), None);
    }

    #[test]
    fn reregistered_after_removal_goes_to_the_back() {
        let mut registry: DropRegistry<u32, ()> = DropRegistry::new();
        let (a, _) = registry.insert(1, ());
        let _ = registry.insert(2, ());
        let _ = registry.remove(&a);
        let _ = registry.insert(1, ());
        let order: Vec<u32> = registry.elements().collect();
        assert_eq!(order, vec![2, 1]);
    }
}
