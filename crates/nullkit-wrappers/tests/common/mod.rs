// crates/nullkit-wrappers/tests/common/mod.rs
// ============================================================================
// Module: Wrapper Test Helpers
// Description: Shared response-map builders for wrapper tests.
// Purpose: Keep null-mode configuration terse across test files.
// ============================================================================

//! ## Overview
//! Helpers for building per-operation response maps in wrapper tests.

#![allow(
    dead_code,
    reason = "Each integration test binary uses a subset of these helpers."
)]

use nullkit_core::ConfiguredResponse;
use nullkit_core::ExhaustionPolicy;
use nullkit_core::ResponseMap;
use serde_json::Value;

/// Builds a response map with a single fixed-value operation.
pub fn value_response(operation: &str, value: Value) -> ResponseMap {
    let mut map = ResponseMap::new();
    map.insert(operation.to_string(), ConfiguredResponse::Value {
        value,
    });
    map
}

/// Builds a response map with a single sequence operation.
pub fn sequence_response(
    operation: &str,
    values: Vec<Value>,
    on_exhausted: ExhaustionPolicy,
) -> ResponseMap {
    let mut map = ResponseMap::new();
    map.insert(operation.to_string(), ConfiguredResponse::Sequence {
        values,
        on_exhausted,
    });
    map
}

/// Builds a response map with a single error operation.
pub fn error_response(operation: &str, message: &str) -> ResponseMap {
    let mut map = ResponseMap::new();
    map.insert(operation.to_string(), ConfiguredResponse::Error {
        message: message.to_string(),
    });
    map
}
