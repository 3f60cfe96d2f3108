// crates/nullkit-core/src/interfaces/mod.rs
// ============================================================================
// Module: Nullkit Interfaces
// Description: The create/create_null factory convention and its errors.
// Purpose: Define the construction contract every Nullkit component follows.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Every infrastructure wrapper and application service exposes a pair of
//! factories: [`Nullable::create`] builds a production instance, and
//! [`Nullable::create_null`] builds its deterministic in-memory mirror. A
//! factory recursively constructs its declared dependencies through the
//! matching factory, so one top-level call cascades through the whole
//! dependency graph. Modes never mix inside a graph: live factories call
//! only `create` on their dependencies, null factories only `create_null`.
//!
//! Pure logic and value-object types have no external effects to suppress
//! and do not implement this trait; their construction stays ordinary.
//!
//! Invariants:
//! - Construction is synchronous and, in null mode, performs no I/O.
//! - Dependency construction failures propagate unmodified; factories never
//!   swallow or translate a child's [`ConstructionError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::response::StubError;

// ============================================================================
// SECTION: Construction Errors
// ============================================================================

/// Errors raised when a factory cannot produce a valid instance.
///
/// # Invariants
/// - Always fatal to the factory call; construction is never retried
///   automatically.
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// A config field holds a value the component cannot accept.
    #[error("invalid config field {field} for {component}: {reason}")]
    InvalidField {
        /// Component whose factory rejected the field.
        component: &'static str,
        /// Config field that failed validation.
        field: &'static str,
        /// Validation failure detail.
        reason: String,
    },
    /// The live client for a wrapper could not be initialized.
    #[error("failed to initialize live client for {component}: {reason}")]
    Client {
        /// Component whose live client failed to initialize.
        component: &'static str,
        /// Initialization failure detail.
        reason: String,
    },
    /// The configured null responses were rejected by the embedded stub.
    #[error("invalid null responses for {component}")]
    Responses {
        /// Component whose stub rejected the configuration.
        component: &'static str,
        /// Underlying stub rejection.
        #[source]
        source: StubError,
    },
}

// ============================================================================
// SECTION: Factory Convention
// ============================================================================

/// The dual-construction contract for infrastructure and application
/// components.
///
/// `Config` is one structured value with named, defaulted fields; the same
/// shape serves both modes. Test-only fields such as `responses` are
/// ignored by `create`.
///
/// # Invariants
/// - `create` with `Config::default()` yields a usable production instance.
/// - `create_null` with `Config::default()` yields a deterministic,
///   harmless instance; no component in the resulting graph performs real
///   I/O.
/// - Constructed dependencies are held as-is and never re-resolved after
///   construction.
pub trait Nullable: Sized {
    /// Construction configuration; every field carries a documented default.
    type Config: Default;

    /// Builds a production-ready instance, cascading `create` through all
    /// declared dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when configuration is invalid or a
    /// dependency factory fails; child failures propagate unmodified.
    fn create(config: Self::Config) -> Result<Self, ConstructionError>;

    /// Builds the deterministic in-memory mirror of [`Nullable::create`],
    /// cascading `create_null` through all declared dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when configuration is invalid or a
    /// dependency factory fails; child failures propagate unmodified.
    fn create_null(config: Self::Config) -> Result<Self, ConstructionError>;

    /// Builds a production instance from the all-defaults configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when the default configuration is
    /// rejected, which indicates a component defect.
    fn create_default() -> Result<Self, ConstructionError> {
        Self::create(Self::Config::default())
    }

    /// Builds a null instance from the all-defaults configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when the default configuration is
    /// rejected, which indicates a component defect.
    fn create_null_default() -> Result<Self, ConstructionError> {
        Self::create_null(Self::Config::default())
    }
}
