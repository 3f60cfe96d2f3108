// crates/nullkit-core/src/core/events.rs
// ============================================================================
// Module: State Events
// Description: Synchronous observer primitive for state-change notification.
// Purpose: Let tests observe internal state transitions without polling.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Stateful components own a [`StateEventEmitter`] and emit a [`StateEvent`]
//! whenever observable internal state changes, independent of how the change
//! was triggered. Delivery is a direct synchronous call to each registered
//! handler, in registration order, before the mutating operation returns to
//! its caller.
//!
//! Invariants:
//! - Handlers only observe events emitted after their registration; there is
//!   no replay of historical state.
//! - Handlers are invoked outside the registry lock, so a handler may
//!   register or unregister other handlers without deadlocking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::Weak;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: State Event
// ============================================================================

/// One observed state transition.
///
/// # Invariants
/// - `payload` is a snapshot of the post-mutation state, never a live
///   reference into the emitting component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    /// Event name, scoped to the emitting component.
    pub name: String,
    /// Snapshot of the state that was reached.
    pub payload: Value,
}

// ============================================================================
// SECTION: Emitter
// ============================================================================

/// Handler invoked synchronously for matching events.
type Handler = Arc<dyn Fn(&StateEvent) + Send + Sync>;

/// One registered handler with its registration identity.
struct HandlerEntry {
    /// Registration identifier used for de-registration.
    id: u64,
    /// Event name the handler is registered for.
    name: String,
    /// The handler itself.
    handler: Handler,
}

/// Registry state shared between the emitter and its subscriptions.
#[derive(Default)]
struct Registry {
    /// Next registration identifier.
    next_id: u64,
    /// Registered handlers, in registration order.
    entries: Vec<HandlerEntry>,
}

/// Synchronous state-event emitter owned by a stateful component.
///
/// # Invariants
/// - Delivery order equals registration order for handlers of the same
///   event name.
/// - Emission is synchronous with respect to the mutation that caused it.
#[derive(Clone, Default)]
pub struct StateEventEmitter {
    /// Shared handler registry.
    registry: Arc<Mutex<Registry>>,
}

impl StateEventEmitter {
    /// Creates an emitter with no registered handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event name and returns its
    /// de-registration handle.
    ///
    /// Dropping the returned [`Subscription`] without calling
    /// [`Subscription::unsubscribe`] leaves the handler registered.
    pub fn on(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&StateEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = lock_registry(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(HandlerEntry {
            id,
            name: name.into(),
            handler: Arc::new(handler),
        });
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Emits an event to all handlers currently registered for its name.
    ///
    /// Handlers are invoked after the registry lock is released, in
    /// registration order.
    pub fn emit(&self, name: impl Into<String>, payload: Value) {
        let event = StateEvent {
            name: name.into(),
            payload,
        };
        let matching: Vec<Handler> = {
            let registry = lock_registry(&self.registry);
            registry
                .entries
                .iter()
                .filter(|entry| entry.name == event.name)
                .map(|entry| Arc::clone(&entry.handler))
                .collect()
        };
        for handler in matching {
            handler(&event);
        }
    }

    /// Returns the number of currently registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        lock_registry(&self.registry).entries.len()
    }
}

impl std::fmt::Debug for StateEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEventEmitter")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

// ============================================================================
// SECTION: Subscription
// ============================================================================

/// De-registration handle returned by [`StateEventEmitter::on`].
///
/// # Invariants
/// - Unsubscribing is explicit; dropping the handle changes nothing.
/// - Unsubscribing after the emitter is gone is a no-op.
#[derive(Debug)]
pub struct Subscription {
    /// Weak reference back to the handler registry.
    registry: Weak<Mutex<Registry>>,
    /// Registration identifier of the handler to remove.
    id: u64,
}

impl Subscription {
    /// Removes the registered handler from the emitter.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock_registry(&registry);
            registry.entries.retain(|entry| entry.id != self.id);
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Locks the handler registry, recovering from poisoning.
fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
