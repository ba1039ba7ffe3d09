// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the `understory_dnd` demos.

use understory_dnd::memory::{MemoryHost, NodeId};
use understory_dnd::{DragManager, Lifecycle};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `understory_dnd=debug`.
///
/// Calling this more than once is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("understory_dnd=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run the deferred session setup if the host was asked for a frame.
pub fn pump_frame<K>(manager: &mut DragManager<NodeId, K>, host: &mut MemoryHost) {
    if host.take_frame_request() {
        manager.frame(host);
        tracing::info!(lifecycle = ?manager.lifecycle(), "frame");
    }
}

/// Print every announcement the host recorded since `from`, returning the new count.
pub fn print_announcements(host: &MemoryHost, from: usize) -> usize {
    for announcement in &host.announcements()[from..] {
        println!("  [{:?}] {}", announcement.urgency, announcement.message);
    }
    host.announcements().len()
}

/// One-line summary of the manager state.
pub fn describe<K>(manager: &DragManager<NodeId, K>, host: &MemoryHost) -> String {
    match manager.lifecycle() {
        Lifecycle::Absent => format!("idle, focus on {:?}", host.focused()),
        lifecycle => {
            let current = manager
                .session()
                .and_then(|session| session.current_drop_target().copied());
            format!(
                "{lifecycle:?}, current target {current:?}, focus on {:?}",
                host.focused()
            )
        }
    }
}
