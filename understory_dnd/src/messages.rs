// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Localized narration for session transitions.

use alloc::string::String;

use crate::modality::DragModality;

/// Messages the drag manager narrates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// A keyboard drag started.
    DragStartedKeyboard,
    /// A touch drag started.
    DragStartedTouch,
    /// A screen-reader drag started.
    DragStartedVirtual,
    /// The session was canceled.
    DropCanceled,
    /// The drop completed.
    DropComplete,
}

impl MessageKey {
    /// The "drag started" message for `modality`.
    #[must_use]
    pub fn drag_started(modality: DragModality) -> Self {
        match modality {
            DragModality::Keyboard => Self::DragStartedKeyboard,
            DragModality::Touch => Self::DragStartedTouch,
            DragModality::Virtual => Self::DragStartedVirtual,
        }
    }
}

/// Resolve message keys to display text in the user's locale.
pub trait LocalizedStrings {
    /// The text for `key`.
    fn format(&self, key: MessageKey) -> String;
}

impl<F> LocalizedStrings for F
where
    F: Fn(MessageKey) -> String,
{
    fn format(&self, key: MessageKey) -> String {
        self(key)
    }
}

/// Built-in English (`en-US`) strings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EnglishStrings;

impl LocalizedStrings for EnglishStrings {
    fn format(&self, key: MessageKey) -> String {
        let text = match key {
            MessageKey::DragStartedKeyboard => {
                "Started dragging. Press Tab to navigate to a drop target, then press Enter to drop, or press Escape to cancel."
            }
            MessageKey::DragStartedTouch => {
                "Started dragging. Navigate to a drop target, then double tap to drop."
            }
            MessageKey::DragStartedVirtual => {
                "Started dragging. Navigate to a drop target, then click or press Enter to drop."
            }
            MessageKey::DropCanceled => "Drop canceled.",
            MessageKey::DropComplete => "Drop complete.",
        };
        String::from(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_message_follows_modality() {
        assert_eq!(
            MessageKey::drag_started(DragModality::Keyboard),
            MessageKey::DragStartedKeyboard
        );
        assert_eq!(
            MessageKey::drag_started(DragModality::Touch),
            MessageKey::DragStartedTouch
        );
        assert_eq!(
            MessageKey::drag_started(DragModality::Virtual),
            MessageKey::DragStartedVirtual
        );
    }

    #[test]
    fn closures_are_string_tables() {
        let strings = |key: MessageKey| match key {
            MessageKey::DropCanceled => String::from("Abgebrochen."),
            _ => String::from("?"),
        };
        assert_eq!(strings.format(MessageKey::DropCanceled), "Abgebrochen.");
        assert_eq!(EnglishStrings.format(MessageKey::DropComplete), "Drop complete.");
    }
}
