//! Memory orderings for the runner's shared flags.
//!
//! Map state is synchronized by the backend itself; the harness only shares
//! the stop flag between the coordinating thread and the workers, plus the
//! skip list's insert-token counter.

use std::sync::atomic::Ordering;

/// Ordering for raising the stop flag.
/// Pairs with the workers' Acquire loads.
pub const STOP_STORE: Ordering = Ordering::Release;

/// Ordering for polling the stop flag between batches.
/// Pairs with the coordinator's Release store.
pub const STOP_LOAD: Ordering = Ordering::Acquire;

/// Ordering for handing out insert-token prefixes.
/// Only uniqueness matters, nothing is published through the counter.
pub const TOKEN_ISSUE: Ordering = Ordering::Relaxed;
