// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events fed to the drag manager and the interception verdicts it returns.
//!
//! Hosts translate their platform events into [`InputEvent`] values and offer
//! each one to [`DragManager::handle_event`](crate::DragManager::handle_event)
//! before their own capture phase runs. The returned [`Disposition`] says
//! whether the host must stop propagation and whether it must suppress the
//! default action.

use crate::modality::is_virtual_pointer_event;

/// The kind of an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer entered an element.
    PointerEnter,
    /// Pointer left an element.
    PointerLeave,
    /// Pointer moved over an element (bubbling enter).
    PointerOver,
    /// Pointer moved out of an element (bubbling leave).
    PointerOut,
    /// Pointer released.
    PointerUp,
    /// Mouse button pressed.
    MouseDown,
    /// Mouse moved.
    MouseMove,
    /// Mouse entered an element.
    MouseEnter,
    /// Mouse left an element.
    MouseLeave,
    /// Mouse moved over an element.
    MouseOver,
    /// Mouse moved out of an element.
    MouseOut,
    /// Mouse button released.
    MouseUp,
    /// Touch contact started.
    TouchStart,
    /// Touch contact moved.
    TouchMove,
    /// Touch contact ended.
    TouchEnd,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Focus is about to move into an element (bubbling).
    FocusIn,
    /// Focus is about to move out of an element (bubbling).
    FocusOut,
    /// An element (or the window, when the target is `None`) received focus.
    Focus,
    /// An element (or the window, when the target is `None`) lost focus.
    Blur,
    /// Activation click.
    Click,
    /// Wheel or scroll input. Never intercepted.
    Wheel,
}

impl EventKind {
    /// Returns `true` for the kinds a session suppresses while active.
    #[must_use]
    pub fn is_intercepted(self) -> bool {
        !matches!(self, Self::Wheel)
    }

    /// Returns `true` for kinds whose default action may synthesize a click.
    ///
    /// A session stops their propagation but leaves the default action alone
    /// so that the following click still fires.
    #[must_use]
    pub fn may_produce_click(self) -> bool {
        matches!(self, Self::PointerUp | Self::MouseUp | Self::TouchEnd)
    }
}

/// Logical key values the drag manager reacts to.
///
/// Keys the manager does not interpret are still forwarded to the current drop
/// target's key handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter or Return.
    Enter,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// A printable character.
    Character(char),
    /// No key, or a key without a logical value.
    Unidentified,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

/// Contact geometry reported with pointer events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerGeometry {
    /// Contact width in CSS pixels.
    pub width: f64,
    /// Contact height in CSS pixels.
    pub height: f64,
    /// Normalized pressure in `0.0..=1.0`.
    pub pressure: f64,
}

impl PointerGeometry {
    /// A mouse with a button pressed.
    pub const MOUSE: Self = Self {
        width: 1.0,
        height: 1.0,
        pressure: 0.5,
    };

    /// Degenerate geometry emitted by screen readers.
    pub const VIRTUAL: Self = Self {
        width: 0.0,
        height: 0.0,
        pressure: 0.0,
    };

    /// The pressureless 1×1 contact Android TalkBack reports.
    ///
    /// This only reads as virtual together with a click count of zero; build
    /// the event with [`InputEvent::pointer_down`] and then
    /// [`with_detail(0)`](InputEvent::with_detail).
    pub const TALKBACK: Self = Self {
        width: 1.0,
        height: 1.0,
        pressure: 0.0,
    };
}

impl Default for PointerGeometry {
    fn default() -> Self {
        Self::MOUSE
    }
}

/// A platform input event, reduced to what the drag manager inspects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputEvent<E> {
    /// What happened.
    pub kind: EventKind,
    /// The element the event is dispatched to, or `None` for the window/document.
    pub target: Option<E>,
    /// For focus and blur, the element losing or gaining focus on the other side.
    pub related_target: Option<E>,
    /// The logical key, for keyboard events.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Contact geometry, for pointer events.
    pub pointer: PointerGeometry,
    /// Click count (`UIEvent.detail`). Zero for clicks without a real press.
    pub detail: u32,
}

impl<E> InputEvent<E> {
    /// Create an event of `kind` dispatched to `target`.
    pub fn new(kind: EventKind, target: Option<E>) -> Self {
        Self {
            kind,
            target,
            related_target: None,
            key: Key::Unidentified,
            modifiers: Modifiers::empty(),
            pointer: PointerGeometry::default(),
            detail: 0,
        }
    }

    /// A key-down event.
    pub fn key_down(target: Option<E>, key: Key) -> Self {
        Self {
            key,
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    /// A click with the given press count.
    pub fn click(target: Option<E>, detail: u32) -> Self {
        Self {
            detail,
            ..Self::new(EventKind::Click, target)
        }
    }

    /// A pointer-down event with the given contact geometry and a click count of one.
    ///
    /// Use [`with_detail`](Self::with_detail) for synthesized presses that
    /// report no click count.
    pub fn pointer_down(target: Option<E>, pointer: PointerGeometry) -> Self {
        Self {
            pointer,
            detail: 1,
            ..Self::new(EventKind::PointerDown, target)
        }
    }

    /// A focus event; `related` is the element losing focus.
    pub fn focus(target: Option<E>, related: Option<E>) -> Self {
        Self {
            related_target: related,
            ..Self::new(EventKind::Focus, target)
        }
    }

    /// A blur event; `related` is the element gaining focus.
    pub fn blur(target: Option<E>, related: Option<E>) -> Self {
        Self {
            related_target: related,
            ..Self::new(EventKind::Blur, target)
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the click count.
    #[must_use]
    pub fn with_detail(mut self, detail: u32) -> Self {
        self.detail = detail;
        self
    }

    /// Returns `true` if this pointer event looks synthesized by assistive technology.
    #[must_use]
    pub fn is_virtual_pointer(&self) -> bool {
        is_virtual_pointer_event(
            self.pointer.width,
            self.pointer.height,
            self.pointer.pressure,
            self.detail,
        )
    }
}

/// What the host must do with an event after offering it to the drag manager.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Dispatch normally.
    #[default]
    Pass,
    /// Stop propagation (including other listeners on the same node) but keep
    /// the default action.
    Stop,
    /// Stop propagation and suppress the default action.
    StopAndPreventDefault,
}

impl Disposition {
    /// Returns `true` if propagation must stop.
    #[must_use]
    pub fn stops_propagation(self) -> bool {
        !matches!(self, Self::Pass)
    }

    /// Returns `true` if the default action must be suppressed.
    #[must_use]
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::StopAndPreventDefault)
    }
}
