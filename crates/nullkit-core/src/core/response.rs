// crates/nullkit-core/src/core/response.rs
// ============================================================================
// Module: Configured Responses
// Description: Canned response values consumed by embedded stubs.
// Purpose: Replace real I/O with deterministic, explicitly configured results.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`ConfiguredResponse`] is what a null-mode wrapper returns instead of
//! performing real I/O: a fixed value, an ordered sequence of values, or an
//! error. Sequences are consumed strictly in FIFO order; what happens after
//! the last element is never implicit: the stub author must pick an
//! [`ExhaustionPolicy`] when configuring a sequence.
//!
//! Invariants:
//! - Sequence values are returned in configuration order, one per call.
//! - An unconfigured operation yields `Ok(None)` from [`ResponseSet::next`],
//!   so stubs fall back to their documented harmless default instead of
//!   failing.
//! - Response state is owned by exactly one stub; two null-mode wrappers
//!   never share consumption cursors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Configured Response
// ============================================================================

/// Behavior applied when a response sequence runs out of elements.
///
/// # Invariants
/// - Always explicit; there is no serde default for this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Keep returning the last element of the sequence.
    RepeatLast,
    /// Fail every call after the sequence is consumed.
    Fail,
}

/// A canned response configured for one stub operation.
///
/// # Invariants
/// - `Value` repeats on every call and never exhausts.
/// - `Sequence` is consumed in FIFO order; exhaustion behavior is governed
///   by its explicit `on_exhausted` policy.
/// - `Error` fails every call with the configured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfiguredResponse {
    /// A single value returned on every call.
    Value {
        /// The value to return.
        value: Value,
    },
    /// An ordered queue of values, one per call.
    Sequence {
        /// Values returned in order, first element first.
        values: Vec<Value>,
        /// Behavior once all values are consumed.
        on_exhausted: ExhaustionPolicy,
    },
    /// A configured failure returned on every call.
    Error {
        /// Message surfaced through the stub's error channel.
        message: String,
    },
}

/// Per-operation response configuration supplied to `create_null`.
pub type ResponseMap = BTreeMap<String, ConfiguredResponse>;

// ============================================================================
// SECTION: Stub Errors
// ============================================================================

/// Errors produced by stub-side response resolution.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Configured` is the only variant reachable without a configuration
///   mistake; it carries the stub author's own message.
#[derive(Debug, Error)]
pub enum StubError {
    /// A response of kind `error` was configured for the operation.
    #[error("configured error for {operation}: {message}")]
    Configured {
        /// Operation the error was configured for.
        operation: String,
        /// Configured error message.
        message: String,
    },
    /// A sequence with the `fail` policy was fully consumed.
    #[error("response sequence exhausted for {operation}")]
    Exhausted {
        /// Operation whose sequence ran out.
        operation: String,
    },
    /// A sequence with the `repeat_last` policy has no elements to repeat.
    #[error("empty response sequence with repeat_last policy for {operation}")]
    EmptySequence {
        /// Operation configured with the empty sequence.
        operation: String,
    },
    /// A configured value does not deserialize into the operation's reply type.
    #[error("configured response for {operation} has invalid shape: {reason}")]
    Shape {
        /// Operation whose response failed to deserialize.
        operation: String,
        /// Deserialization failure detail.
        reason: String,
    },
}

// ============================================================================
// SECTION: Response Source
// ============================================================================

/// Consumption state for one operation's configured response.
///
/// # Invariants
/// - The cursor only moves forward; consumed elements are never revisited.
/// - Construction rejects sequences that can never produce a value under
///   their own policy.
#[derive(Debug)]
pub struct ResponseSource {
    /// Operation name, used in error reporting.
    operation: String,
    /// Current resolution state.
    state: SourceState,
}

/// Internal state machine for a response source.
#[derive(Debug)]
enum SourceState {
    /// Fixed value returned on every call.
    Fixed(Value),
    /// FIFO queue with an explicit exhaustion policy.
    Queue {
        /// Remaining and consumed values, in configuration order.
        values: Vec<Value>,
        /// Index of the next value to return.
        cursor: usize,
        /// Behavior once `cursor` reaches `values.len()`.
        on_exhausted: ExhaustionPolicy,
    },
    /// Configured failure returned on every call.
    Failing(String),
}

impl ResponseSource {
    /// Builds a source for one operation from its configured response.
    ///
    /// # Errors
    ///
    /// Returns [`StubError::EmptySequence`] when a sequence has no elements
    /// and the `repeat_last` policy, which could never produce a value.
    pub fn new(
        operation: impl Into<String>,
        response: ConfiguredResponse,
    ) -> Result<Self, StubError> {
        let operation = operation.into();
        let state = match response {
            ConfiguredResponse::Value {
                value,
            } => SourceState::Fixed(value),
            ConfiguredResponse::Sequence {
                values,
                on_exhausted,
            } => {
                if values.is_empty() && on_exhausted == ExhaustionPolicy::RepeatLast {
                    return Err(StubError::EmptySequence {
                        operation,
                    });
                }
                SourceState::Queue {
                    values,
                    cursor: 0,
                    on_exhausted,
                }
            }
            ConfiguredResponse::Error {
                message,
            } => SourceState::Failing(message),
        };
        Ok(Self {
            operation,
            state,
        })
    }

    /// Returns the operation this source resolves.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Resolves the next response for this operation.
    ///
    /// # Errors
    ///
    /// Returns [`StubError::Configured`] for `error` responses and
    /// [`StubError::Exhausted`] once a `fail`-policy sequence is consumed.
    pub fn next(&mut self) -> Result<Value, StubError> {
        match &mut self.state {
            SourceState::Fixed(value) => Ok(value.clone()),
            SourceState::Queue {
                values,
                cursor,
                on_exhausted,
            } => {
                if let Some(value) = values.get(*cursor) {
                    *cursor += 1;
                    return Ok(value.clone());
                }
                match on_exhausted {
                    ExhaustionPolicy::RepeatLast => values.last().cloned().ok_or_else(|| {
                        StubError::EmptySequence {
                            operation: self.operation.clone(),
                        }
                    }),
                    ExhaustionPolicy::Fail => Err(StubError::Exhausted {
                        operation: self.operation.clone(),
                    }),
                }
            }
            SourceState::Failing(message) => Err(StubError::Configured {
                operation: self.operation.clone(),
                message: message.clone(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Response Set
// ============================================================================

/// A stub's owned collection of response sources, keyed by operation.
///
/// # Invariants
/// - Owned exclusively by one stub instance; consumption state is never
///   shared across wrapper instances.
/// - Operations without a configured response resolve to `Ok(None)`.
#[derive(Debug, Default)]
pub struct ResponseSet {
    /// Response sources keyed by operation name.
    sources: BTreeMap<String, ResponseSource>,
}

impl ResponseSet {
    /// Builds a response set from per-operation configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StubError`] when any configured response is rejected by
    /// [`ResponseSource::new`].
    pub fn new(responses: ResponseMap) -> Result<Self, StubError> {
        let mut sources = BTreeMap::new();
        for (operation, response) in responses {
            let source = ResponseSource::new(operation.clone(), response)?;
            sources.insert(operation, source);
        }
        Ok(Self {
            sources,
        })
    }

    /// Resolves the next response for an operation, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StubError`] when the configured response is an error or an
    /// exhausted `fail`-policy sequence.
    pub fn next(&mut self, operation: &str) -> Result<Option<Value>, StubError> {
        match self.sources.get_mut(operation) {
            Some(source) => source.next().map(Some),
            None => Ok(None),
        }
    }

    /// Returns true when a response is configured for the operation.
    #[must_use]
    pub fn is_configured(&self, operation: &str) -> bool {
        self.sources.contains_key(operation)
    }
}
