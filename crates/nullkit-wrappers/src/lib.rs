// crates/nullkit-wrappers/src/lib.rs
// ============================================================================
// Module: Nullkit Wrappers
// Description: Built-in infrastructure wrappers with embedded stubs.
// Purpose: Provide worked, reusable instances of the create/create_null
// convention for HTTP, file storage, and wall-clock time.
// Dependencies: nullkit-core, reqwest, serde, serde_json, time, url
// ============================================================================

//! ## Overview
//! Each wrapper in this crate is the sole code boundary for one class of
//! real-world effect. `create` builds the wrapper around a real client;
//! `create_null` builds it around an embedded stub that lives in the same
//! module and mimics exactly the client subset the wrapper uses, so the
//! wrapper's own logic cannot tell the two apart.
//!
//! Invariants:
//! - Every public operation appends a tracked call on entry.
//! - Wrapper-local state changes emit a state event before the operation
//!   returns.
//! - Null-mode operations perform no network, disk, or timer work and
//!   resolve in the same logical tick.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod clock;
pub mod http;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::ClockWrapper;
pub use clock::ClockWrapperConfig;
pub use clock::ClockWrapperError;
pub use http::HttpReply;
pub use http::HttpWrapper;
pub use http::HttpWrapperConfig;
pub use http::HttpWrapperError;
pub use store::StoreWrapper;
pub use store::StoreWrapperConfig;
pub use store::StoreWrapperError;
