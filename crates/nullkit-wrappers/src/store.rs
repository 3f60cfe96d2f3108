// crates/nullkit-wrappers/src/store.rs
// ============================================================================
// Module: File Store Wrapper
// Description: Infrastructure wrapper for key-addressed JSON storage.
// Purpose: Confine disk I/O behind a nullable, tracked, observable seam.
// Dependencies: nullkit-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The store wrapper persists one JSON document per key under a configured
//! root directory. Keys are validated fail-closed before any disk access.
//! In null mode the wrapper delegates to [`StoreStub`]: configured `read`
//! responses take precedence, otherwise reads observe the stub's own
//! in-memory writes, and reads of unwritten keys yield `None`.
//!
//! Invariants:
//! - `read` and `write` calls are tracked on entry with their arguments.
//! - Successful writes bump the `writes_completed` counter and emit a
//!   `value_written` event carrying the new state before returning.
//! - The live root directory is created on first write, not at
//!   construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use nullkit_core::ConstructionError;
use nullkit_core::Nullable;
use nullkit_core::OutputLog;
use nullkit_core::OutputTracker;
use nullkit_core::ResponseMap;
use nullkit_core::ResponseSet;
use nullkit_core::StateEventEmitter;
use nullkit_core::StubError;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Component name used in construction errors.
const COMPONENT: &str = "StoreWrapper";

/// Maximum accepted key length in bytes.
const MAX_KEY_BYTES: usize = 255;

/// Configuration for the file store wrapper.
///
/// # Invariants
/// - `max_value_bytes` is a hard upper bound on serialized documents, in
///   both modes.
/// - `responses` is test-only and ignored by `create`.
/// - Both factories validate `root` and `max_value_bytes` identically; a
///   config that builds a null wrapper also builds a live one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreWrapperConfig {
    /// Directory holding one `<key>.json` file per key.
    pub root: PathBuf,
    /// Pretty-print stored documents.
    pub pretty: bool,
    /// Maximum serialized document size allowed, in bytes.
    pub max_value_bytes: usize,
    /// Canned responses for null mode, keyed by operation name.
    pub responses: Option<ResponseMap>,
}

impl Default for StoreWrapperConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./nullkit-store"),
            pretty: false,
            max_value_bytes: 1024 * 1024,
            responses: None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store wrapper operation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Disk failures are re-surfaced unchanged; there is no hidden retry
///   policy.
#[derive(Debug, Error)]
pub enum StoreWrapperError {
    /// The key failed fail-closed validation.
    #[error("invalid store key {key}: {reason}")]
    Key {
        /// The rejected key.
        key: String,
        /// Validation failure detail.
        reason: String,
    },
    /// The underlying filesystem reported an error.
    #[error("store io error: {0}")]
    Io(String),
    /// A stored document could not be parsed as JSON.
    #[error("corrupt document for key {key}: {reason}")]
    Corrupt {
        /// Key whose document failed to parse.
        key: String,
        /// Parse failure detail.
        reason: String,
    },
    /// The document exceeded the configured size limit.
    #[error("document exceeds configured limit ({actual_bytes} > {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Observed serialized size in bytes.
        actual_bytes: usize,
    },
    /// The embedded stub reported an error.
    #[error(transparent)]
    Stub(#[from] StubError),
}

// ============================================================================
// SECTION: Wrapper
// ============================================================================

/// Infrastructure wrapper for key-addressed JSON storage.
///
/// # Invariants
/// - Owns exactly one backend, live or stub, fixed at construction.
/// - Tracked calls and state events belong to this instance alone.
#[derive(Debug)]
pub struct StoreWrapper {
    /// The backend this instance delegates to.
    backend: StoreBackend,
    /// Hard cap on serialized document size.
    max_value_bytes: usize,
    /// Append-only record of outbound calls.
    log: OutputLog,
    /// Emitter for wrapper-local state changes.
    events: StateEventEmitter,
    /// Count of successfully completed writes.
    writes_completed: Mutex<u64>,
}

impl StoreWrapper {
    /// Reads the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreWrapperError`] when the key is invalid, the backend
    /// fails, or a stub error response is configured for `read`.
    pub fn read(&self, key: &str) -> Result<Option<Value>, StoreWrapperError> {
        validate_key(key)?;
        self.log.record("read", json!({ "key": key }));
        match &self.backend {
            StoreBackend::Live(client) => client.read(key),
            StoreBackend::Stub(stub) => stub.read(key),
        }
    }

    /// Writes `value` under `key`, replacing any existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreWrapperError`] when the key or document is invalid,
    /// the backend fails, or a stub error response is configured for
    /// `write`.
    pub fn write(&self, key: &str, value: Value) -> Result<(), StoreWrapperError> {
        validate_key(key)?;
        let serialized = serde_json::to_vec(&value)
            .map_err(|error| StoreWrapperError::Corrupt {
                key: key.to_string(),
                reason: error.to_string(),
            })?;
        if serialized.len() > self.max_value_bytes {
            return Err(StoreWrapperError::TooLarge {
                max_bytes: self.max_value_bytes,
                actual_bytes: serialized.len(),
            });
        }
        self.log.record("write", json!({ "key": key, "value": value }));
        match &self.backend {
            StoreBackend::Live(client) => client.write(key, &value)?,
            StoreBackend::Stub(stub) => stub.write(key, value.clone())?,
        }
        let writes_completed = {
            let mut counter = lock_counter(&self.writes_completed);
            *counter += 1;
            *counter
        };
        self.events.emit(
            "value_written",
            json!({ "key": key, "value": value, "writes_completed": writes_completed }),
        );
        Ok(())
    }

    /// Returns a read-only tracker over this instance's outbound calls.
    #[must_use]
    pub fn track(&self) -> OutputTracker {
        self.log.tracker()
    }

    /// Returns the emitter for this instance's state events.
    #[must_use]
    pub const fn events(&self) -> &StateEventEmitter {
        &self.events
    }

    /// Returns the number of successfully completed writes.
    #[must_use]
    pub fn writes_completed(&self) -> u64 {
        *lock_counter(&self.writes_completed)
    }

    /// Wraps a backend with fresh tracking and event state.
    fn with_backend(backend: StoreBackend, max_value_bytes: usize) -> Self {
        Self {
            backend,
            max_value_bytes,
            log: OutputLog::new(),
            events: StateEventEmitter::new(),
            writes_completed: Mutex::new(0),
        }
    }
}

impl Nullable for StoreWrapper {
    type Config = StoreWrapperConfig;

    fn create(config: Self::Config) -> Result<Self, ConstructionError> {
        validate_config(&config)?;
        let max_value_bytes = config.max_value_bytes;
        Ok(Self::with_backend(
            StoreBackend::Live(FileStoreClient {
                root: config.root,
                pretty: config.pretty,
                max_value_bytes,
            }),
            max_value_bytes,
        ))
    }

    fn create_null(config: Self::Config) -> Result<Self, ConstructionError> {
        validate_config(&config)?;
        let responses = ResponseSet::new(config.responses.unwrap_or_default()).map_err(
            |source| ConstructionError::Responses {
                component: COMPONENT,
                source,
            },
        )?;
        Ok(Self::with_backend(
            StoreBackend::Stub(StoreStub {
                state: Mutex::new(StubState {
                    responses,
                    written: BTreeMap::new(),
                }),
            }),
            config.max_value_bytes,
        ))
    }
}

// ============================================================================
// SECTION: Backends
// ============================================================================

/// The two backends a store wrapper can delegate to.
#[derive(Debug)]
enum StoreBackend {
    /// Real filesystem client.
    Live(FileStoreClient),
    /// Embedded deterministic stub.
    Stub(StoreStub),
}

/// Live backend storing one JSON file per key.
#[derive(Debug)]
struct FileStoreClient {
    /// Directory holding the documents.
    root: PathBuf,
    /// Pretty-print stored documents.
    pretty: bool,
    /// Hard cap applied when reading documents back.
    max_value_bytes: usize,
}

impl FileStoreClient {
    /// Returns the document path for a validated key.
    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Reads and parses the document for `key`, if present.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreWrapperError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|error| StoreWrapperError::Io(error.to_string()))?;
        if bytes.len() > self.max_value_bytes {
            return Err(StoreWrapperError::TooLarge {
                max_bytes: self.max_value_bytes,
                actual_bytes: bytes.len(),
            });
        }
        let value = serde_json::from_slice(&bytes).map_err(|error| StoreWrapperError::Corrupt {
            key: key.to_string(),
            reason: error.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Serializes and persists the document for `key`.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreWrapperError> {
        let serialized = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(|error| StoreWrapperError::Corrupt {
            key: key.to_string(),
            reason: error.to_string(),
        })?;
        fs::create_dir_all(&self.root)
            .map_err(|error| StoreWrapperError::Io(error.to_string()))?;
        fs::write(self.document_path(key), serialized)
            .map_err(|error| StoreWrapperError::Io(error.to_string()))
    }
}

/// Mutable state owned by one store stub.
#[derive(Debug)]
struct StubState {
    /// Configured responses for this instance.
    responses: ResponseSet,
    /// Documents written through this instance in null mode.
    written: BTreeMap<String, Value>,
}

/// Embedded stub mimicking the filesystem subset the wrapper uses.
///
/// # Invariants
/// - Configured `read` responses take precedence over in-memory writes; a
///   configured JSON `null` reads as a missing document.
/// - Performs no I/O; unconfigured reads of unwritten keys yield `None`.
#[derive(Debug)]
struct StoreStub {
    /// Response and write state for this instance.
    state: Mutex<StubState>,
}

impl StoreStub {
    /// Locks the stub state, recovering from poisoning.
    fn locked(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves a read from configured responses or in-memory writes.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreWrapperError> {
        let mut state = self.locked();
        if state.responses.is_configured("read") {
            let value = state.responses.next("read")?;
            return Ok(value.filter(|value| !value.is_null()));
        }
        Ok(state.written.get(key).cloned())
    }

    /// Applies a write to in-memory state, honoring configured errors.
    fn write(&self, key: &str, value: Value) -> Result<(), StoreWrapperError> {
        let mut state = self.locked();
        // A configured "write" response models failure injection only; any
        // non-error response is consumed and discarded.
        let _ = state.responses.next("write")?;
        state.written.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the config fields shared by both construction modes.
fn validate_config(config: &StoreWrapperConfig) -> Result<(), ConstructionError> {
    if config.root.as_os_str().is_empty() {
        return Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "root",
            reason: "store root must not be empty".to_string(),
        });
    }
    if config.max_value_bytes == 0 {
        return Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "max_value_bytes",
            reason: "document cap must be non-zero".to_string(),
        });
    }
    Ok(())
}

/// Validates a store key fail-closed before any backend access.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreWrapperError> {
    if key.is_empty() {
        return Err(StoreWrapperError::Key {
            key: key.to_string(),
            reason: "key must not be empty".to_string(),
        });
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(StoreWrapperError::Key {
            key: key.to_string(),
            reason: format!("key exceeds {MAX_KEY_BYTES} bytes"),
        });
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return Err(StoreWrapperError::Key {
            key: key.to_string(),
            reason: "key must be ascii alphanumeric, '-', '_', or '.'".to_string(),
        });
    }
    if key.split('.').any(str::is_empty) || key == "." || key.contains("..") {
        return Err(StoreWrapperError::Key {
            key: key.to_string(),
            reason: "key must not contain empty dot segments".to_string(),
        });
    }
    Ok(())
}

/// Locks the write counter, recovering from poisoning.
fn lock_counter(counter: &Mutex<u64>) -> MutexGuard<'_, u64> {
    counter.lock().unwrap_or_else(PoisonError::into_inner)
}
