// system-tests/src/lib.rs
// ============================================================================
// Module: Nullkit System Tests Library
// Description: Shared harness utilities for system test scenarios.
// Purpose: Provide a local HTTP fixture for live-versus-null parity suites.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! This crate hosts the shared harness used by the parity suites in
//! `system-tests/tests`. The suites exercise each wrapper twice, once live
//! against local fixtures and once through `create_null`, and assert that
//! callers cannot tell the two modes apart.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod harness;
