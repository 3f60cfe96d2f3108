// crates/nullkit-core/src/lib.rs
// ============================================================================
// Module: Nullkit Core
// Description: Framework primitives for nullable infrastructure components.
// Purpose: Provide the create/create_null convention, configurable responses,
// output tracking, and state events shared by all Nullkit components.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Nullkit components expose two construction paths: `create` builds a
//! production instance that talks to the real outside world, and
//! `create_null` builds a fully wired, deterministic, in-memory substitute.
//! This crate holds the primitives every component shares:
//! - the [`Nullable`] factory convention and [`ConstructionError`];
//! - [`ConfiguredResponse`] values consumed by embedded stubs;
//! - [`OutputLog`]/[`OutputTracker`] for asserting on outbound calls;
//! - [`StateEventEmitter`] for observing internal state transitions.
//!
//! Invariants:
//! - Null-mode execution is synchronous and performs no I/O.
//! - Tracked calls and state events are ordered by real invocation order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::events::StateEvent;
pub use crate::core::events::StateEventEmitter;
pub use crate::core::events::Subscription;
pub use crate::core::response::ConfiguredResponse;
pub use crate::core::response::ExhaustionPolicy;
pub use crate::core::response::ResponseMap;
pub use crate::core::response::ResponseSet;
pub use crate::core::response::ResponseSource;
pub use crate::core::response::StubError;
pub use crate::core::time::Timestamp;
pub use crate::core::tracker::OutputLog;
pub use crate::core::tracker::OutputTracker;
pub use crate::core::tracker::TrackedCall;
pub use crate::interfaces::ConstructionError;
pub use crate::interfaces::Nullable;
