// crates/nullkit-core/src/core/mod.rs
// ============================================================================
// Module: Core Primitives
// Description: Response, tracking, event, and time primitives.
// Purpose: Group the data-model modules shared by wrappers and services.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Data-model primitives for nullable components. Each submodule owns one
//! concern: configured responses, output tracking, state events, and the
//! canonical timestamp type.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod events;
pub mod response;
pub mod time;
pub mod tracker;
