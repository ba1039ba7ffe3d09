// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by [`DragManager`](crate::DragManager).

/// Errors surfaced by the drag manager's public operations.
///
/// Both variants indicate a caller bug rather than a runtime condition: the
/// manager never produces an error for missing capabilities or stale
/// registrations, which degrade to defaults instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DndError {
    /// [`DragManager::begin`](crate::DragManager::begin) was called while a
    /// session already exists.
    #[error("cannot begin dragging while already dragging")]
    AlreadyDragging,
    /// A session operation was requested while no session exists.
    #[error("no drag session is active")]
    NoActiveSession,
}
