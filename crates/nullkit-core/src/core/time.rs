// crates/nullkit-core/src/core/time.rs
// ============================================================================
// Module: Nullkit Time Model
// Description: Canonical timestamp representation for clock wrappers.
// Purpose: Provide deterministic, replayable time values across components.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Nullkit components never read wall-clock time directly; time enters a
//! graph through a clock wrapper, which in null mode returns configured
//! values. This module defines the canonical timestamp those wrappers hand
//! out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp in unix epoch milliseconds.
///
/// # Invariants
/// - Opaque to arithmetic; no validation or monotonicity is enforced by
///   this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The unix epoch, the deterministic default for null-mode clocks.
    pub const UNIX_EPOCH: Self = Self(0);

    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
