// demos/pipeline/src/logic.rs
// ============================================================================
// Module: Pipeline Logic
// Description: Pure value object for numeric readings.
// Purpose: Keep the computation layer free of I/O and ambient state.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`Reading`] is a pure value object: its methods transform in-memory
//! state and nothing else. Anything that needs a disk, a socket, or a clock
//! lives in an infrastructure wrapper that accepts or returns `Reading`
//! values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// SECTION: Reading
// ============================================================================

/// A numeric reading flowing through the pipeline.
///
/// # Invariants
/// - Integer readings stay integers under doubling until they would
///   overflow, at which point they widen to floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Integer reading.
    Int(i64),
    /// Floating-point reading.
    Float(f64),
}

impl Reading {
    /// Extracts a reading from a stored JSON document.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Some(int) = value.as_i64() {
            return Some(Self::Int(int));
        }
        value.as_f64().map(Self::Float)
    }

    /// Returns the reading doubled.
    #[must_use]
    pub fn doubled(self) -> Self {
        match self {
            Self::Int(int) => int
                .checked_mul(2)
                .map_or_else(|| Self::Float(int as f64 * 2.0), Self::Int),
            Self::Float(float) => Self::Float(float * 2.0),
        }
    }

    /// Renders the reading back into a JSON document.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Int(int) => Value::from(int),
            Self::Float(float) => Value::from(float),
        }
    }
}
