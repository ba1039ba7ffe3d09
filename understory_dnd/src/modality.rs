// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input modality classification and the synthesized-gesture heuristic.
//!
//! ## Usage
//!
//! 1) Feed every platform input event to a [`ModalityTracker`] (or implement
//!    [`ModalityDetector`] over your toolkit's own tracking).
//! 2) The drag manager asks the detector for the [`DragModality`] when a session
//!    starts, to pick the narration and decide whether to auto-navigate.
//!
//! ```
//! use understory_dnd::input::{InputEvent, Key, PointerGeometry};
//! use understory_dnd::modality::{DragModality, ModalityDetector, ModalityTracker};
//!
//! let mut tracker = ModalityTracker::new();
//! tracker.observe(&InputEvent::<u32>::key_down(None, Key::Tab));
//! assert_eq!(tracker.drag_modality(), DragModality::Keyboard);
//!
//! tracker.observe(&InputEvent::<u32>::pointer_down(None, PointerGeometry::VIRTUAL));
//! assert!(tracker.is_virtual());
//! ```

use crate::input::{EventKind, InputEvent, Key};

/// The modality of the most recent user interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionModality {
    /// Keyboard navigation.
    Keyboard,
    /// Mouse, pen or touch.
    Pointer,
    /// Screen reader or other assistive technology.
    Virtual,
}

/// The modality controlling a drag session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragModality {
    /// Keyboard drag: Tab navigates, Enter drops, Escape cancels.
    Keyboard,
    /// Touch or pointer drag started without a drag gesture.
    Touch,
    /// Screen-reader driven drag.
    Virtual,
}

impl DragModality {
    /// Derive the drag modality from the last interaction modality.
    #[must_use]
    pub fn from_interaction(modality: Option<InteractionModality>) -> Self {
        match modality {
            Some(InteractionModality::Keyboard) => Self::Keyboard,
            Some(InteractionModality::Virtual) => Self::Virtual,
            Some(InteractionModality::Pointer) | None => Self::Touch,
        }
    }
}

/// Source of the current input modality.
pub trait ModalityDetector {
    /// The modality of the last interaction, if any was observed.
    fn interaction_modality(&self) -> Option<InteractionModality>;

    /// The modality a newly started drag session is controlled by.
    fn drag_modality(&self) -> DragModality {
        DragModality::from_interaction(self.interaction_modality())
    }

    /// Returns `true` if the current modality is assistive-technology driven.
    fn is_virtual(&self) -> bool {
        self.interaction_modality() == Some(InteractionModality::Virtual)
    }
}

/// Classify a pointer event as synthesized by assistive technology.
///
/// Screen readers dispatch pointer events with zero-sized contact geometry.
/// Some platforms report a double-tap activation as a 1×1 contact with zero
/// pressure and a zero click count; that exact combination is also treated as
/// synthesized. Zero pressure alone is not enough: some engines always report
/// zero pressure for real mouse input.
#[must_use]
pub fn is_virtual_pointer_event(width: f64, height: f64, pressure: f64, detail: u32) -> bool {
    (width == 0.0 && height == 0.0)
        || (width == 1.0 && height == 1.0 && pressure == 0.0 && detail == 0)
}

/// Tracks the modality of the most recent interaction from observed events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalityTracker {
    modality: Option<InteractionModality>,
}

impl ModalityTracker {
    /// Create a tracker that has not observed any interaction yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { modality: None }
    }

    /// Update the tracked modality from an input event.
    pub fn observe<E>(&mut self, event: &InputEvent<E>) {
        let next = match event.kind {
            EventKind::KeyDown | EventKind::KeyUp if event.key != Key::Unidentified => {
                Some(InteractionModality::Keyboard)
            }
            EventKind::PointerDown | EventKind::MouseDown | EventKind::TouchStart => {
                if event.is_virtual_pointer() {
                    Some(InteractionModality::Virtual)
                } else {
                    Some(InteractionModality::Pointer)
                }
            }
            EventKind::Click if event.detail == 0 => Some(InteractionModality::Virtual),
            _ => None,
        };
        if let Some(modality) = next {
            self.modality = Some(modality);
        }
    }

    /// Override the tracked modality.
    pub fn set(&mut self, modality: Option<InteractionModality>) {
        self.modality = modality;
    }
}

impl ModalityDetector for ModalityTracker {
    fn interaction_modality(&self) -> Option<InteractionModality> {
        self.modality
    }
}
