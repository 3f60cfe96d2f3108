// crates/nullkit-wrappers/src/clock.rs
// ============================================================================
// Module: Clock Wrapper
// Description: Infrastructure wrapper for wall-clock reads.
// Purpose: Confine ambient time behind a nullable, tracked seam.
// Dependencies: nullkit-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! The clock wrapper is how time enters a component graph. Live mode reads
//! UTC wall-clock time; null mode resolves the `now` operation from
//! configured responses, so tests can pin or advance time deterministically.
//! An unconfigured null clock returns the unix epoch on every read.
//!
//! Clock reads mutate no wrapper-local state, so this wrapper emits no
//! state events; reads are still tracked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;

use nullkit_core::ConstructionError;
use nullkit_core::Nullable;
use nullkit_core::OutputLog;
use nullkit_core::OutputTracker;
use nullkit_core::ResponseMap;
use nullkit_core::ResponseSet;
use nullkit_core::StubError;
use nullkit_core::Timestamp;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Component name used in construction errors.
const COMPONENT: &str = "ClockWrapper";

/// Configuration for the clock wrapper.
///
/// # Invariants
/// - `responses` is test-only and ignored by `create`; configured `now`
///   values are integer unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockWrapperConfig {
    /// Canned responses for null mode, keyed by operation name.
    pub responses: Option<ResponseMap>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Clock wrapper operation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClockWrapperError {
    /// The wall-clock reading does not fit the timestamp range.
    #[error("wall-clock reading out of timestamp range")]
    Range,
    /// The embedded stub reported an error.
    #[error(transparent)]
    Stub(#[from] StubError),
}

// ============================================================================
// SECTION: Wrapper
// ============================================================================

/// Infrastructure wrapper for wall-clock reads.
///
/// # Invariants
/// - Owns exactly one time source, live or stub, fixed at construction.
/// - Null-mode reads are deterministic and perform no timer work.
#[derive(Debug)]
pub struct ClockWrapper {
    /// The time source this instance delegates to.
    source: ClockSource,
    /// Append-only record of clock reads.
    log: OutputLog,
}

impl ClockWrapper {
    /// Returns the current time from this instance's source.
    ///
    /// # Errors
    ///
    /// Returns [`ClockWrapperError`] when the live reading is out of range,
    /// a configured value has the wrong shape, or a stub error response is
    /// configured for `now`.
    pub fn now(&self) -> Result<Timestamp, ClockWrapperError> {
        self.log.record("now", Value::Null);
        match &self.source {
            ClockSource::Live => {
                let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
                let millis =
                    i64::try_from(nanos / 1_000_000).map_err(|_| ClockWrapperError::Range)?;
                Ok(Timestamp::from_unix_millis(millis))
            }
            ClockSource::Stub(responses) => {
                let mut responses =
                    responses.lock().unwrap_or_else(PoisonError::into_inner);
                match responses.next("now")? {
                    Some(value) => value
                        .as_i64()
                        .map(Timestamp::from_unix_millis)
                        .ok_or_else(|| {
                            StubError::Shape {
                                operation: "now".to_string(),
                                reason: "expected integer unix milliseconds".to_string(),
                            }
                            .into()
                        }),
                    None => Ok(Timestamp::UNIX_EPOCH),
                }
            }
        }
    }

    /// Returns a read-only tracker over this instance's clock reads.
    #[must_use]
    pub fn track(&self) -> OutputTracker {
        self.log.tracker()
    }
}

impl Nullable for ClockWrapper {
    type Config = ClockWrapperConfig;

    fn create(_config: Self::Config) -> Result<Self, ConstructionError> {
        Ok(Self {
            source: ClockSource::Live,
            log: OutputLog::new(),
        })
    }

    fn create_null(config: Self::Config) -> Result<Self, ConstructionError> {
        let responses = ResponseSet::new(config.responses.unwrap_or_default()).map_err(
            |source| ConstructionError::Responses {
                component: COMPONENT,
                source,
            },
        )?;
        Ok(Self {
            source: ClockSource::Stub(Mutex::new(responses)),
            log: OutputLog::new(),
        })
    }
}

// ============================================================================
// SECTION: Sources
// ============================================================================

/// The two time sources a clock wrapper can delegate to.
#[derive(Debug)]
enum ClockSource {
    /// Real UTC wall clock.
    Live,
    /// Embedded deterministic stub.
    Stub(Mutex<ResponseSet>),
}
