// demos/pipeline/src/lib.rs
// ============================================================================
// Module: Nullkit Pipeline Demo
// Description: Worked application service composing nullable wrappers.
// Purpose: Demonstrate the read → pure logic → write sandwich with a
// cascading create/create_null dependency graph.
// Dependencies: nullkit-core, nullkit-wrappers, serde_json
// ============================================================================

//! ## Overview
//! [`PipelineService`] is an application-layer component: it orchestrates a
//! store wrapper and a clock wrapper around a pure doubling computation. It
//! holds no mutable state of its own beyond its injected dependencies, and
//! its factories cascade mode-for-mode into theirs, so
//! `PipelineService::create_null` yields a graph in which no component
//! touches the disk or the wall clock.
//!
//! Invariants:
//! - `run_once` never catches infrastructure errors; they propagate to the
//!   caller unchanged.
//! - The doubling step is pure; all I/O stays inside the wrappers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod logic;

// ============================================================================
// SECTION: Imports
// ============================================================================

use nullkit_core::ConstructionError;
use nullkit_core::Nullable;
use nullkit_core::Timestamp;
use nullkit_wrappers::ClockWrapper;
use nullkit_wrappers::ClockWrapperConfig;
use nullkit_wrappers::ClockWrapperError;
use nullkit_wrappers::StoreWrapper;
use nullkit_wrappers::StoreWrapperConfig;
use nullkit_wrappers::StoreWrapperError;
use serde_json::Value;
use thiserror::Error;

use crate::logic::Reading;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Component name used in construction errors.
const COMPONENT: &str = "PipelineService";

/// Configuration for the pipeline service and its dependencies.
///
/// # Invariants
/// - `store` and `clock` are passed down to the wrapper factories as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Store wrapper configuration slice.
    pub store: StoreWrapperConfig,
    /// Clock wrapper configuration slice.
    pub clock: ClockWrapperConfig,
    /// Key the input reading is loaded from.
    pub source_key: String,
    /// Key the doubled result is written to.
    pub sink_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store: StoreWrapperConfig::default(),
            clock: ClockWrapperConfig::default(),
            source_key: "reading".to_string(),
            sink_key: "doubled".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pipeline operation errors.
///
/// # Invariants
/// - Infrastructure errors pass through unchanged; there is no retry or
///   fallback policy on any operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No document exists under the source key.
    #[error("no reading stored under {key}")]
    MissingSource {
        /// The source key that was empty.
        key: String,
    },
    /// The stored document is not a numeric reading.
    #[error("document under {key} is not a numeric reading")]
    NotNumeric {
        /// The source key holding the non-numeric document.
        key: String,
    },
    /// The store wrapper reported an error.
    #[error(transparent)]
    Store(#[from] StoreWrapperError),
    /// The clock wrapper reported an error.
    #[error(transparent)]
    Clock(#[from] ClockWrapperError),
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Report returned by one pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// The doubled value that was written.
    pub doubled: Value,
    /// When the pass ran, per the service's clock.
    pub stamped_at: Timestamp,
}

/// Application service doubling a stored reading.
///
/// # Invariants
/// - Holds no mutable state beyond its injected dependencies.
/// - Both factories cascade mode-for-mode into the wrapper factories.
#[derive(Debug)]
pub struct PipelineService {
    /// Store the reading is loaded from and written back to.
    store: StoreWrapper,
    /// Clock stamping each pass.
    clock: ClockWrapper,
    /// Key the input reading is loaded from.
    source_key: String,
    /// Key the doubled result is written to.
    sink_key: String,
}

impl PipelineService {
    /// Runs one read → double → write pass.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the source is missing or non-numeric,
    /// or when a wrapper operation fails; wrapper errors propagate
    /// unchanged.
    pub fn run_once(&self) -> Result<PipelineReport, PipelineError> {
        let document = self.store.read(&self.source_key)?;
        let document = document.ok_or_else(|| PipelineError::MissingSource {
            key: self.source_key.clone(),
        })?;
        let reading = Reading::from_value(&document).ok_or_else(|| PipelineError::NotNumeric {
            key: self.source_key.clone(),
        })?;
        let doubled = reading.doubled().to_value();
        let stamped_at = self.clock.now()?;
        self.store.write(&self.sink_key, doubled.clone())?;
        Ok(PipelineReport {
            doubled,
            stamped_at,
        })
    }

    /// Returns the store wrapper, for tracking and event assertions.
    #[must_use]
    pub const fn store(&self) -> &StoreWrapper {
        &self.store
    }

    /// Returns the clock wrapper, for tracking assertions.
    #[must_use]
    pub const fn clock(&self) -> &ClockWrapper {
        &self.clock
    }

    /// Validates the service's own config slice.
    fn check_keys(config: &PipelineConfig) -> Result<(), ConstructionError> {
        if config.source_key.is_empty() {
            return Err(ConstructionError::InvalidField {
                component: COMPONENT,
                field: "source_key",
                reason: "source key must not be empty".to_string(),
            });
        }
        if config.sink_key.is_empty() {
            return Err(ConstructionError::InvalidField {
                component: COMPONENT,
                field: "sink_key",
                reason: "sink key must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Nullable for PipelineService {
    type Config = PipelineConfig;

    fn create(config: Self::Config) -> Result<Self, ConstructionError> {
        Self::check_keys(&config)?;
        let store = StoreWrapper::create(config.store)?;
        let clock = ClockWrapper::create(config.clock)?;
        Ok(Self {
            store,
            clock,
            source_key: config.source_key,
            sink_key: config.sink_key,
        })
    }

    fn create_null(config: Self::Config) -> Result<Self, ConstructionError> {
        Self::check_keys(&config)?;
        let store = StoreWrapper::create_null(config.store)?;
        let clock = ClockWrapper::create_null(config.clock)?;
        Ok(Self {
            store,
            clock,
            source_key: config.source_key,
            sink_key: config.sink_key,
        })
    }
}
