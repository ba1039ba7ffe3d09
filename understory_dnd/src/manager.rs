// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag manager: registries, the single drag session, and input interception.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::broadcast::{Broadcast, SessionEvent, SubscriptionId};
use crate::error::DndError;
use crate::host::{AccessTree, DndHost, Urgency};
use crate::input::{Disposition, EventKind, InputEvent, Key, Modifiers};
use crate::messages::{LocalizedStrings, MessageKey};
use crate::modality::DragModality;
use crate::registry::{DropRegistry, Registration};
use crate::session::{DragSession, Lifecycle};
use crate::target::{DragTarget, DropTarget, DroppableItem};
use crate::types::{
    DragEndEvent, DropActivateEvent, DropEnterEvent, DropEvent, DropExitEvent, DropOperation,
    ElementId, TextDropItem, center, drag_types,
};
use crate::visibility::hide_outside;

/// Handle returned by [`DragManager::register_drop_target`].
pub type DropTargetRegistration<E, K> = Registration<E, DropTarget<E, K>>;

/// Handle returned by [`DragManager::register_drop_item`].
pub type DropItemRegistration<E, K> = Registration<E, DroppableItem<E, K>>;

/// When the deferred setup moves focus to the first valid drop target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutoNavigate {
    /// For keyboard drags, and whenever the last interaction came from assistive technology.
    #[default]
    Modality,
    /// For every drag.
    Always,
    /// Never; the host navigates explicitly.
    Never,
}

/// Behavior switches for a [`DragManager`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DragManagerOptions {
    /// When the session setup selects the first drop target.
    pub auto_navigate: AutoNavigate,
    /// Politely announce the label of the first droppable item that receives focus.
    pub announce_item_labels: bool,
}

impl Default for DragManagerOptions {
    fn default() -> Self {
        Self {
            auto_navigate: AutoNavigate::Modality,
            announce_item_labels: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Next,
    Previous,
}

enum Step<E> {
    To(Option<E>),
    DragSource,
}

/// Coordinates one keyboard, pointer or screen-reader drag at a time.
///
/// `E` is the host's element handle and `K` the key type of collection items.
/// The manager owns the drop target and droppable item registries and the
/// optional [`DragSession`]. It never owns the host: every call that may touch
/// the accessibility tree, focus, or announcements borrows a [`DndHost`].
///
/// ## Session flow
///
/// 1. [`begin`](Self::begin) creates the session and requests a frame.
/// 2. The host calls [`frame`](Self::frame) once the triggering event has
///    finished dispatching. From then on the session is [`Lifecycle::Active`]:
///    it masks everything that is not a valid drop location and answers every
///    input event offered to [`handle_event`](Self::handle_event).
/// 3. Navigation ([`next`](Self::next), [`previous`](Self::previous), focus and
///    click handling) moves the current drop target.
/// 4. [`drop`](Self::drop), [`cancel`](Self::cancel) or [`end`](Self::end)
///    tear the session down and restore everything the session hid.
#[derive(Debug)]
pub struct DragManager<E, K> {
    drop_targets: DropRegistry<E, DropTarget<E, K>>,
    drop_items: DropRegistry<E, DroppableItem<E, K>>,
    session: Option<DragSession<E>>,
    subscribers: Broadcast<SessionEvent>,
    options: DragManagerOptions,
    revision: u64,
}

impl<E: ElementId, K> Default for DragManager<E, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ElementId, K> DragManager<E, K> {
    /// Create a manager with default options.
    pub fn new() -> Self {
        Self::with_options(DragManagerOptions::default())
    }

    /// Create a manager with the given options.
    pub fn with_options(options: DragManagerOptions) -> Self {
        Self {
            drop_targets: DropRegistry::new(),
            drop_items: DropRegistry::new(),
            session: None,
            subscribers: Broadcast::new(),
            options,
            revision: 0,
        }
    }

    /// The options this manager was created with.
    pub fn options(&self) -> &DragManagerOptions {
        &self.options
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession<E>> {
        self.session.as_ref()
    }

    /// Where the manager is in its session lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.session
            .as_ref()
            .map_or(Lifecycle::Absent, |session| session.lifecycle)
    }

    /// Returns `true` while a session exists.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Counter bumped on every observable session change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get notified when a session starts or ends.
    pub fn subscribe(&mut self, callback: impl FnMut(SessionEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    /// Stop notifying a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// The drop target registered for `element`.
    pub fn drop_target(&self, element: E) -> Option<&DropTarget<E, K>> {
        self.drop_targets.get(&element)
    }

    /// The droppable item registered for `element`.
    pub fn drop_item(&self, element: E) -> Option<&DroppableItem<E, K>> {
        self.drop_items.get(&element)
    }

    /// Register a drop target, replacing any target registered for the same element.
    ///
    /// During an active session the valid drop targets are recomputed, so a
    /// target registered mid-drag becomes reachable immediately.
    pub fn register_drop_target<H>(
        &mut self,
        host: &mut H,
        target: DropTarget<E, K>,
    ) -> DropTargetRegistration<E, K>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let element = *target.element();
        let (registration, replaced) = self.drop_targets.insert(element, target);
        tracing::debug!(
            ?element,
            replaced = replaced.is_some(),
            targets = self.drop_targets.len(),
            "registered drop target"
        );
        self.invalidate(host);
        registration
    }

    /// Dispose a drop target registration.
    ///
    /// Returns `false` if the registration is stale. A removed current drop
    /// target receives its exit callback before the session re-anchors.
    pub fn unregister_drop_target<H>(
        &mut self,
        host: &mut H,
        registration: DropTargetRegistration<E, K>,
    ) -> bool
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let Some(mut removed) = self.drop_targets.remove(&registration) else {
            return false;
        };
        let element = registration.element();
        tracing::debug!(?element, targets = self.drop_targets.len(), "unregistered drop target");

        let was_current = self
            .session
            .as_ref()
            .is_some_and(|session| session.current_drop_target == Some(element));
        if was_current {
            if let Some(handler) = removed.on_exit.as_deref_mut() {
                handler.drop_exit(&DropExitEvent {
                    point: center(host.bounds(element)),
                });
            }
        }

        self.invalidate(host);
        true
    }

    /// Register a droppable item, replacing any item registered for the same element.
    pub fn register_drop_item<H>(
        &mut self,
        host: &mut H,
        item: DroppableItem<E, K>,
    ) -> DropItemRegistration<E, K>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let element = *item.element();
        let (registration, replaced) = self.drop_items.insert(element, item);
        tracing::debug!(
            ?element,
            replaced = replaced.is_some(),
            items = self.drop_items.len(),
            "registered drop item"
        );
        self.invalidate(host);
        registration
    }

    /// Dispose a droppable item registration. Returns `false` if it is stale.
    pub fn unregister_drop_item<H>(
        &mut self,
        host: &mut H,
        registration: DropItemRegistration<E, K>,
    ) -> bool
    where
        H: DndHost<Element = E> + ?Sized,
    {
        if self.drop_items.remove(&registration).is_none() {
            return false;
        }
        tracing::debug!(
            element = ?registration.element(),
            items = self.drop_items.len(),
            "unregistered drop item"
        );
        self.invalidate(host);
        true
    }

    /// Returns `true` if `element` is a registered drop target or inside one.
    pub fn is_inside_any_drop_target<H>(&self, host: &H, element: E) -> bool
    where
        H: AccessTree<Element = E> + ?Sized,
    {
        self.drop_targets
            .elements()
            .any(|target| host.contains(target, element))
    }

    /// Start a drag session for `drag_target`.
    ///
    /// The session is created and announced to subscribers immediately. Its
    /// setup runs in [`frame`](Self::frame), which the host is asked to
    /// schedule, so the event that started the drag is not intercepted.
    pub fn begin<H>(
        &mut self,
        host: &mut H,
        drag_target: DragTarget<E>,
        strings: impl LocalizedStrings + 'static,
    ) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        if self.session.is_some() {
            return Err(DndError::AlreadyDragging);
        }

        tracing::debug!(
            element = ?drag_target.element(),
            items = drag_target.items().len(),
            subscribers = self.subscribers.len(),
            "begin dragging"
        );
        self.session = Some(DragSession::new(drag_target, Box::new(strings)));
        self.revision += 1;
        host.request_frame();
        self.subscribers.emit(SessionEvent::Started);
        Ok(())
    }

    /// Run the deferred session setup.
    ///
    /// Activates interception and the visibility mask, announces the drag,
    /// and auto-navigates according to [`DragManagerOptions::auto_navigate`].
    /// Does nothing unless a session is waiting for its setup.
    pub fn frame<H>(&mut self, host: &mut H)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if session.lifecycle != Lifecycle::Starting {
            self.session = Some(session);
            return;
        }

        session.lifecycle = Lifecycle::Active;
        self.revision += 1;
        self.update_valid_drop_targets(host, &mut session);

        let modality = host.drag_modality();
        let message = session.strings.format(MessageKey::drag_started(modality));
        host.announce(&message, Urgency::Assertive);
        tracing::debug!(
            ?modality,
            valid = session.valid_drop_targets.len(),
            "drag session active"
        );

        let navigate = match self.options.auto_navigate {
            AutoNavigate::Modality => modality == DragModality::Keyboard || host.is_virtual(),
            AutoNavigate::Always => true,
            AutoNavigate::Never => false,
        };
        if navigate {
            self.navigate(host, &mut session, Direction::Next);
        }
        self.session = Some(session);
    }

    /// Move to the next valid drop target.
    ///
    /// Past the last target focus returns to the drag source, unless the drag
    /// source is hidden, in which case navigation wraps to the first target.
    pub fn next<H>(&mut self, host: &mut H) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let mut session = self.take_session()?;
        self.navigate(host, &mut session, Direction::Next);
        self.session = Some(session);
        Ok(())
    }

    /// Move to the previous valid drop target. Mirrors [`next`](Self::next).
    pub fn previous<H>(&mut self, host: &mut H) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let mut session = self.take_session()?;
        self.navigate(host, &mut session, Direction::Previous);
        self.session = Some(session);
        Ok(())
    }

    /// Make `target` (and optionally the droppable `item` inside it) current.
    ///
    /// Elements without a registration are treated as `None`.
    pub fn set_current_drop_target<H>(
        &mut self,
        host: &mut H,
        target: Option<E>,
        item: Option<E>,
    ) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let mut session = self.take_session()?;
        let target = target.filter(|element| self.drop_targets.contains(element));
        let item = item.filter(|element| self.drop_items.contains(element));
        self.set_current(host, &mut session, target, item);
        self.session = Some(session);
        Ok(())
    }

    /// Fire the current drop target's activation callback.
    pub fn activate<H>(&mut self, host: &mut H) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let session = self.take_session()?;
        self.activate_current(&*host, &session);
        self.session = Some(session);
        Ok(())
    }

    /// Drop onto the current drop target, optionally at a specific droppable `item`.
    ///
    /// Without a current drop target this cancels the session.
    pub fn drop<H>(&mut self, host: &mut H, item: Option<E>) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let session = self.take_session()?;
        self.drop_session(host, session, item);
        Ok(())
    }

    /// Abandon the drag and return focus to the drag source.
    pub fn cancel<H>(&mut self, host: &mut H) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let session = self.take_session()?;
        self.cancel_session(host, session);
        Ok(())
    }

    /// Tear the session down without announcing an outcome.
    pub fn end<H>(&mut self, host: &mut H) -> Result<(), DndError>
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let session = self.take_session()?;
        self.end_session(host, session);
        Ok(())
    }

    /// Report that hidden state changed outside the manager's control.
    ///
    /// Hosts call this while [`AccessTree::watch_hidden_changes`] is on.
    pub fn hidden_state_changed<H>(&mut self, host: &mut H)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        self.invalidate(host);
    }

    /// Offer an input event to the active session before the host dispatches it.
    ///
    /// Returns [`Disposition::Pass`] when no session is active or the event
    /// kind is not intercepted.
    pub fn handle_event<H>(&mut self, host: &mut H, event: &InputEvent<E>) -> Disposition
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let Some(mut session) = self.session.take() else {
            return Disposition::Pass;
        };
        if session.lifecycle != Lifecycle::Active || !event.kind.is_intercepted() {
            self.session = Some(session);
            return Disposition::Pass;
        }

        let disposition = interception(&session, event);
        tracing::trace!(
            kind = ?event.kind,
            target = ?event.target,
            ?disposition,
            "intercepted event"
        );

        match event.kind {
            EventKind::KeyDown => self.on_key_down(host, session, event),
            EventKind::Focus => self.on_focus(host, session, event),
            EventKind::Blur => self.on_blur(host, session, event),
            EventKind::Click => self.on_click(host, session, event),
            EventKind::PointerDown => {
                session.is_virtual_click = event.is_virtual_pointer();
                self.session = Some(session);
            }
            _ => self.session = Some(session),
        }
        disposition
    }

    fn take_session(&mut self) -> Result<DragSession<E>, DndError> {
        self.session.take().ok_or(DndError::NoActiveSession)
    }

    fn invalidate<H>(&mut self, host: &mut H)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let Some(mut session) = self.session.take() else {
            return;
        };
        // Nothing is masked before the deferred setup ran.
        if session.lifecycle == Lifecycle::Active {
            self.update_valid_drop_targets(host, &mut session);
        }
        self.session = Some(session);
    }

    fn update_valid_drop_targets<H>(&mut self, host: &mut H, session: &mut DragSession<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        host.watch_hidden_changes(false);
        if let Some(mask) = session.visibility.take() {
            mask.restore(host);
        }

        let types = drag_types(session.drag_target.items());
        let allowed = session.drag_target.allowed_operations();
        session.valid_drop_targets = self
            .drop_targets
            .iter()
            .filter(|(element, target)| {
                !host.is_inside_hidden(*element) && target.accepts(&types, allowed)
            })
            .map(|(element, _)| element)
            .collect();

        if let Some(current) = session.current_drop_target {
            if !session.valid_drop_targets.contains(&current) {
                let first = session.valid_drop_targets.first().copied();
                self.set_current(host, session, first, None);
            }
        }
        if let Some(item) = session.current_drop_item {
            if !self.drop_items.contains(&item) {
                session.current_drop_item = None;
            }
        }

        let allowed = session.drag_target.allowed_operations();
        let valid_items: Vec<E> = self
            .drop_items
            .iter()
            .filter(|(_, item)| item.accepts(&types, allowed))
            .map(|(element, _)| element)
            .collect();

        // A target that contains accepted items stays masked; only its items are kept.
        let mut keep = Vec::with_capacity(1 + valid_items.len() + session.valid_drop_targets.len());
        keep.push(*session.drag_target.element());
        keep.extend(valid_items.iter().copied());
        keep.extend(
            session
                .valid_drop_targets
                .iter()
                .copied()
                .filter(|&target| !valid_items.iter().any(|&item| host.contains(target, item))),
        );

        session.visibility = Some(hide_outside(host, &keep));
        host.watch_hidden_changes(true);
        self.revision += 1;
        tracing::trace!(
            targets = session.valid_drop_targets.len(),
            items = valid_items.len(),
            "recomputed valid drop targets"
        );
    }

    fn navigate<H>(&mut self, host: &mut H, session: &mut DragSession<E>, direction: Direction)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let step = {
            let valid = &session.valid_drop_targets;
            let index = session
                .current_drop_target
                .and_then(|current| valid.iter().position(|&target| target == current));
            let wrapped = match direction {
                Direction::Next => valid.first().copied(),
                Direction::Previous => valid.last().copied(),
            };
            match (direction, index) {
                (_, None) => Step::To(wrapped),
                (Direction::Next, Some(i)) if i + 1 < valid.len() => {
                    Step::To(valid.get(i + 1).copied())
                }
                (Direction::Previous, Some(i)) if i > 0 => Step::To(valid.get(i - 1).copied()),
                // At the boundary, visit the drag source so users without Escape can still cancel.
                (_, Some(_)) => {
                    if host.is_inside_hidden(*session.drag_target.element()) {
                        Step::To(wrapped)
                    } else {
                        Step::DragSource
                    }
                }
            }
        };

        tracing::trace!(?direction, "navigate drop targets");
        match step {
            Step::To(target) => self.set_current(host, session, target, None),
            Step::DragSource => {
                self.set_current(host, session, None, None);
                host.focus(*session.drag_target.element());
            }
        }
    }

    fn set_current<H>(
        &mut self,
        host: &mut H,
        session: &mut DragSession<E>,
        target: Option<E>,
        item: Option<E>,
    ) where
        H: DndHost<Element = E> + ?Sized,
    {
        if target != session.current_drop_target {
            if let Some(previous) = session.current_drop_target {
                if let Some(handler) = self
                    .drop_targets
                    .get_mut(&previous)
                    .and_then(|t| t.on_exit.as_deref_mut())
                {
                    handler.drop_exit(&DropExitEvent {
                        point: center(host.bounds(previous)),
                    });
                }
            }

            session.current_drop_target = target;
            self.revision += 1;
            tracing::trace!(?target, "current drop target changed");

            if let Some(next) = target {
                // Entering a collection item focuses the item instead.
                if item.is_none() {
                    if let Some(handler) = self
                        .drop_targets
                        .get_mut(&next)
                        .and_then(|t| t.on_enter.as_deref_mut())
                    {
                        handler.drop_enter(
                            &DropEnterEvent {
                                point: center(host.bounds(next)),
                            },
                            &session.drag_target,
                        );
                    }
                    host.focus(next);
                }
            }
        }

        if item != session.current_drop_item {
            if let (Some(entered), Some(current)) = (item, session.current_drop_target) {
                let location = self.drop_items.get(&entered).map(DroppableItem::target);
                let handler = self
                    .drop_targets
                    .get_mut(&current)
                    .and_then(|t| t.on_collection_enter.as_deref_mut());
                if let (Some(location), Some(handler)) = (location, handler) {
                    handler.collection_enter(location);
                }
            }

            if let Some(entered) = item {
                host.focus(entered);
            }
            session.current_drop_item = item;
            self.revision += 1;
            tracing::trace!(?item, "current drop item changed");

            // Only the first entered item gets a polite label announcement.
            if !session.initial_focused {
                session.initial_focused = true;
                if self.options.announce_item_labels {
                    if let Some(label) = item.and_then(|entered| host.label(entered)) {
                        host.announce(&label, Urgency::Polite);
                    }
                }
            }
        }
    }

    fn activate_current<H>(&mut self, host: &H, session: &DragSession<E>)
    where
        H: AccessTree<Element = E> + ?Sized,
    {
        let Some(current) = session.current_drop_target else {
            return;
        };
        if let Some(handler) = self
            .drop_targets
            .get_mut(&current)
            .and_then(|t| t.on_activate.as_deref_mut())
        {
            tracing::trace!(target = ?current, "activate drop target");
            handler.drop_activate(&DropActivateEvent {
                point: center(host.bounds(current)),
            });
        }
    }

    fn drop_session<H>(&mut self, host: &mut H, mut session: DragSession<E>, item: Option<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let Some(target) = session.current_drop_target else {
            self.cancel_session(host, session);
            return;
        };
        let item = item.or(session.current_drop_item);

        let types = drag_types(session.drag_target.items());
        let allowed = session.drag_target.allowed_operations();
        let operation = item
            .and_then(|element| self.drop_items.get(&element))
            .and_then(|entry| entry.negotiator.as_deref())
            .or_else(|| {
                self.drop_targets
                    .get(&target)
                    .and_then(|entry| entry.negotiator.as_deref())
            })
            .map_or_else(
                || allowed.first().copied().unwrap_or(DropOperation::Cancel),
                |negotiator| negotiator.drop_operation(&types, allowed),
            );
        session.drop_operation = Some(operation);
        tracing::debug!(?target, ?item, ?operation, "drop");

        let location = item
            .and_then(|element| self.drop_items.get(&element))
            .map(DroppableItem::target);
        if let Some(handler) = self
            .drop_targets
            .get_mut(&target)
            .and_then(|t| t.on_drop.as_deref_mut())
        {
            let event = DropEvent {
                point: center(host.bounds(target)),
                items: session
                    .drag_target
                    .items()
                    .iter()
                    .map(TextDropItem::from_drag_item)
                    .collect(),
                drop_operation: operation,
            };
            handler.drop(&event, location);
        }

        let message = session.strings.format(MessageKey::DropComplete);
        self.end_session(host, session);
        host.announce(&message, Urgency::Assertive);
    }

    fn cancel_session<H>(&mut self, host: &mut H, mut session: DragSession<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        tracing::debug!("cancel drag");
        session.drop_operation = Some(DropOperation::Cancel);
        let message = session.strings.format(MessageKey::DropCanceled);
        self.end_session(host, session);
        host.announce(&message, Urgency::Assertive);
    }

    fn end_session<H>(&mut self, host: &mut H, mut session: DragSession<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        host.watch_hidden_changes(false);
        if let Some(mask) = session.visibility.take() {
            mask.restore(host);
        }

        let source = *session.drag_target.element();
        let operation = session.drop_operation.unwrap_or(DropOperation::Cancel);
        let end_element = match session.current_drop_target {
            Some(target) if operation != DropOperation::Cancel => target,
            _ => source,
        };

        if let Some(handler) = session.drag_target.drag_end_handler() {
            handler.drag_end(&DragEndEvent {
                point: center(host.bounds(end_element)),
                drop_operation: operation,
            });
        }

        // Blur first so the focus ring repaints on the element that already had focus.
        if end_element != source || !host.is_inside_hidden(source) {
            host.blur(end_element);
            host.focus(end_element);
        }

        self.set_current(host, &mut session, None, None);
        self.revision += 1;
        tracing::debug!(
            ?operation,
            ?end_element,
            subscribers = self.subscribers.len(),
            "drag session ended"
        );
        self.subscribers.emit(SessionEvent::Ended);
    }

    fn on_key_down<H>(&mut self, host: &mut H, mut session: DragSession<E>, event: &InputEvent<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        match event.key {
            Key::Escape => self.cancel_session(host, session),
            Key::Enter if event.modifiers.contains(Modifiers::ALT) => {
                self.activate_current(&*host, &session);
                self.session = Some(session);
            }
            Key::Enter => self.drop_session(host, session, None),
            Key::Tab
                if !event
                    .modifiers
                    .intersects(Modifiers::META | Modifiers::ALT | Modifiers::CONTROL) =>
            {
                let direction = if event.modifiers.contains(Modifiers::SHIFT) {
                    Direction::Previous
                } else {
                    Direction::Next
                };
                self.navigate(host, &mut session, direction);
                self.session = Some(session);
            }
            _ => {
                if let Some(current) = session.current_drop_target {
                    if let Some(handler) = self
                        .drop_targets
                        .get_mut(&current)
                        .and_then(|t| t.on_key_down.as_deref_mut())
                    {
                        handler.key_down(event, &session.drag_target);
                    }
                }
                self.session = Some(session);
            }
        }
    }

    fn on_focus<H>(&mut self, host: &mut H, mut session: DragSession<E>, event: &InputEvent<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        let source = *session.drag_target.element();
        // Window focus is handled through blur.
        if let Some(focused) = event.target.filter(|&focused| focused != source) {
            let target = session
                .valid_drop_targets
                .iter()
                .copied()
                .find(|&target| host.contains(target, focused));
            match target {
                Some(target) => {
                    let item = self.drop_items.contains(&focused).then_some(focused);
                    self.set_current(host, &mut session, Some(target), item);
                }
                None => host.focus(session.current_drop_target.unwrap_or(source)),
            }
        }
        self.session = Some(session);
    }

    fn on_blur<H>(&mut self, host: &mut H, session: DragSession<E>, event: &InputEvent<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        // Focus is leaving for nowhere: keep it on the drag.
        if event.related_target.is_none() {
            let source = *session.drag_target.element();
            host.focus(session.current_drop_target.unwrap_or(source));
        }
        self.session = Some(session);
    }

    fn on_click<H>(&mut self, host: &mut H, mut session: DragSession<E>, event: &InputEvent<E>)
    where
        H: DndHost<Element = E> + ?Sized,
    {
        if event.detail == 0 || session.is_virtual_click {
            let source = *session.drag_target.element();
            if let Some(clicked) = event.target {
                if clicked == source {
                    self.cancel_session(host, session);
                    return;
                }
                let target = session
                    .valid_drop_targets
                    .iter()
                    .copied()
                    .find(|&target| host.contains(target, clicked));
                if let Some(target) = target {
                    let item = self.drop_items.contains(&clicked).then_some(clicked);
                    self.set_current(host, &mut session, Some(target), item);
                    self.drop_session(host, session, item);
                    return;
                }
            }
        }
        self.session = Some(session);
    }
}

fn interception<E: ElementId>(session: &DragSession<E>, event: &InputEvent<E>) -> Disposition {
    let on_drag_source = event.target == Some(*session.drag_target.element());
    match event.kind {
        // Focus ring on the drag source keeps working.
        EventKind::FocusIn | EventKind::FocusOut | EventKind::Focus | EventKind::Blur
            if on_drag_source =>
        {
            Disposition::Pass
        }
        kind if kind.may_produce_click() => Disposition::Stop,
        _ => Disposition::StopAndPreventDefault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryHost, NodeId};
    use crate::messages::EnglishStrings;
    use crate::types::DragItem;
    use kurbo::Rect;

    fn host_with_targets(n: usize) -> (MemoryHost, NodeId, Vec<NodeId>) {
        let mut host = MemoryHost::new();
        let root = host.root();
        let source = host.insert(root, Rect::new(0.0, 0.0, 10.0, 10.0));
        let targets = (0..n)
            .map(|i| {
                let x = 20.0 * (i as f64 + 1.0);
                host.insert(root, Rect::new(x, 0.0, x + 10.0, 10.0))
            })
            .collect();
        (host, source, targets)
    }

    fn drag(source: NodeId) -> DragTarget<NodeId> {
        DragTarget::new(
            source,
            [DragItem::new().with("text/plain", "hello")],
            [DropOperation::Move, DropOperation::Copy],
        )
    }

    #[test]
    fn begin_defers_setup_to_frame() {
        let (mut host, source, targets) = host_with_targets(1);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        let _ = manager.register_drop_target(&mut host, DropTarget::new(targets[0]));

        manager.begin(&mut host, drag(source), EnglishStrings).unwrap();
        assert_eq!(manager.lifecycle(), Lifecycle::Starting);
        assert!(host.take_frame_request());
        assert!(manager.session().unwrap().valid_drop_targets().is_empty());

        // The triggering event is not intercepted.
        let event = InputEvent::key_down(Some(source), Key::Enter);
        assert_eq!(manager.handle_event(&mut host, &event), Disposition::Pass);

        manager.frame(&mut host);
        assert_eq!(manager.lifecycle(), Lifecycle::Active);
        assert_eq!(manager.session().unwrap().valid_drop_targets(), &targets[..]);
        assert!(host.is_watching_hidden());
    }

    #[test]
    fn second_begin_fails() {
        let (mut host, source, _) = host_with_targets(0);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        manager.begin(&mut host, drag(source), EnglishStrings).unwrap();
        assert_eq!(
            manager.begin(&mut host, drag(source), EnglishStrings),
            Err(DndError::AlreadyDragging)
        );
    }

    #[test]
    fn operations_require_a_session() {
        let (mut host, _, _) = host_with_targets(0);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        assert_eq!(manager.next(&mut host), Err(DndError::NoActiveSession));
        assert_eq!(manager.previous(&mut host), Err(DndError::NoActiveSession));
        assert_eq!(manager.activate(&mut host), Err(DndError::NoActiveSession));
        assert_eq!(manager.drop(&mut host, None), Err(DndError::NoActiveSession));
        assert_eq!(manager.cancel(&mut host), Err(DndError::NoActiveSession));
        assert_eq!(manager.end(&mut host), Err(DndError::NoActiveSession));
        assert_eq!(
            manager.set_current_drop_target(&mut host, None, None),
            Err(DndError::NoActiveSession)
        );
    }

    #[test]
    fn interception_verdicts() {
        let (mut host, source, targets) = host_with_targets(1);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        manager.begin(&mut host, drag(source), EnglishStrings).unwrap();
        manager.frame(&mut host);

        let other = Some(targets[0]);
        let cases = [
            (EventKind::PointerMove, other, Disposition::StopAndPreventDefault),
            (EventKind::PointerUp, other, Disposition::Stop),
            (EventKind::MouseUp, other, Disposition::Stop),
            (EventKind::TouchEnd, other, Disposition::Stop),
            (EventKind::FocusIn, Some(source), Disposition::Pass),
            (EventKind::FocusOut, Some(source), Disposition::Pass),
            (EventKind::FocusIn, other, Disposition::StopAndPreventDefault),
            (EventKind::KeyUp, other, Disposition::StopAndPreventDefault),
            (EventKind::Wheel, other, Disposition::Pass),
        ];
        for (kind, target, expected) in cases {
            let event = InputEvent::new(kind, target);
            assert_eq!(manager.handle_event(&mut host, &event), expected, "{kind:?}");
        }
    }

    #[test]
    fn inside_any_drop_target_includes_descendants() {
        let (mut host, source, targets) = host_with_targets(1);
        let inner = host.insert(targets[0], Rect::new(22.0, 2.0, 28.0, 8.0));
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        let _ = manager.register_drop_target(&mut host, DropTarget::new(targets[0]));

        assert!(manager.is_inside_any_drop_target(&host, targets[0]));
        assert!(manager.is_inside_any_drop_target(&host, inner));
        assert!(!manager.is_inside_any_drop_target(&host, source));
    }

    #[test]
    fn end_reports_cancel_at_drag_source() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        let (mut host, source, targets) = host_with_targets(1);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        let _ = manager.register_drop_target(&mut host, DropTarget::new(targets[0]));

        let ended = Rc::new(Cell::new(None));
        let sink = Rc::clone(&ended);
        let drag = drag(source).on_drag_end(move |event: &DragEndEvent| {
            sink.set(Some((event.point, event.drop_operation)));
        });
        manager.begin(&mut host, drag, EnglishStrings).unwrap();
        manager.frame(&mut host);
        manager.next(&mut host).unwrap();
        manager.end(&mut host).unwrap();

        let expected = Rect::new(0.0, 0.0, 10.0, 10.0).center();
        assert_eq!(ended.get(), Some((expected, DropOperation::Cancel)));
        assert_eq!(host.focused(), Some(source));
        assert!(manager.session().is_none());
    }

    #[test]
    fn revision_moves_with_session_changes() {
        let (mut host, source, targets) = host_with_targets(2);
        let mut manager: DragManager<NodeId, u32> = DragManager::new();
        for &t in &targets {
            let _ = manager.register_drop_target(&mut host, DropTarget::new(t));
        }
        let r0 = manager.revision();
        manager.begin(&mut host, drag(source), EnglishStrings).unwrap();
        let r1 = manager.revision();
        assert!(r1 > r0);
        manager.frame(&mut host);
        manager.next(&mut host).unwrap();
        let r2 = manager.revision();
        assert!(r2 > r1);
        manager.end(&mut host).unwrap();
        assert!(manager.revision() > r2);
        assert_eq!(manager.lifecycle(), Lifecycle::Absent);
    }
}
