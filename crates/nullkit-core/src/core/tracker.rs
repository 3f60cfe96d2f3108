// crates/nullkit-core/src/core/tracker.rs
// ============================================================================
// Module: Output Tracking
// Description: Append-only record of outbound calls made through a wrapper.
// Purpose: Let tests assert on observable output instead of mock interactions.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every public operation on an infrastructure wrapper appends a
//! [`TrackedCall`] to the wrapper's [`OutputLog`] on entry, before the
//! underlying client is invoked. Tests obtain a read-only [`OutputTracker`]
//! view and assert on the calls that actually occurred.
//!
//! Invariants:
//! - The log is append-only; entries are never mutated or removed.
//! - Sequence indices are dense, zero-based, and assigned under one lock
//!   acquisition, so they reflect invocation order even across threads.
//! - Each wrapper instance owns its log; two independently created
//!   instances never cross-contaminate records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tracked Call
// ============================================================================

/// One outbound call recorded by a wrapper.
///
/// # Invariants
/// - `arguments` is a snapshot taken at call entry, never a live reference.
/// - `index` is the call's zero-based position in the owning log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedCall {
    /// Name of the public operation invoked.
    pub operation: String,
    /// Snapshot of the call arguments.
    pub arguments: Value,
    /// Zero-based invocation-order index within the owning log.
    pub index: u64,
}

// ============================================================================
// SECTION: Output Log
// ============================================================================

/// Append-only call log owned by one wrapper instance.
///
/// # Invariants
/// - Entries are appended on operation entry, before the delegate call
///   returns, so interleavings are observable.
/// - A poisoned lock is recovered rather than propagated; the log never
///   panics an operation.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    /// Shared backing storage for recorded calls.
    calls: Arc<Mutex<Vec<TrackedCall>>>,
}

impl OutputLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call record and returns its sequence index.
    pub fn record(&self, operation: impl Into<String>, arguments: Value) -> u64 {
        let mut calls = lock_calls(&self.calls);
        let index = calls.len() as u64;
        calls.push(TrackedCall {
            operation: operation.into(),
            arguments,
            index,
        });
        index
    }

    /// Returns a read-only tracker over this log.
    #[must_use]
    pub fn tracker(&self) -> OutputTracker {
        OutputTracker {
            calls: Arc::clone(&self.calls),
        }
    }
}

// ============================================================================
// SECTION: Output Tracker
// ============================================================================

/// Read-only view over a wrapper's call log.
///
/// # Invariants
/// - Exposes query operations only; the log cannot be mutated through it.
/// - Reflects exactly the calls recorded on the instance it was obtained
///   from.
#[derive(Debug, Clone)]
pub struct OutputTracker {
    /// Shared backing storage, read side.
    calls: Arc<Mutex<Vec<TrackedCall>>>,
}

impl OutputTracker {
    /// Returns a snapshot of all recorded calls, in invocation order.
    #[must_use]
    pub fn calls(&self) -> Vec<TrackedCall> {
        lock_calls(&self.calls).clone()
    }

    /// Returns a snapshot of the calls recorded for one operation.
    #[must_use]
    pub fn calls_to(&self, operation: &str) -> Vec<TrackedCall> {
        lock_calls(&self.calls).iter().filter(|call| call.operation == operation).cloned().collect()
    }

    /// Returns the number of calls recorded for one operation.
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        lock_calls(&self.calls).iter().filter(|call| call.operation == operation).count()
    }

    /// Returns the total number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        lock_calls(&self.calls).len()
    }

    /// Returns true when no calls have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_calls(&self.calls).is_empty()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Locks the call vector, recovering from poisoning.
fn lock_calls(calls: &Mutex<Vec<TrackedCall>>) -> MutexGuard<'_, Vec<TrackedCall>> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}
