// crates/nullkit-wrappers/src/http.rs
// ============================================================================
// Module: HTTP Wrapper
// Description: Infrastructure wrapper for outbound HTTP GET requests.
// Purpose: Confine network I/O behind a nullable, tracked, observable seam.
// Dependencies: nullkit-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! The HTTP wrapper issues bounded blocking GET requests against a
//! configured endpoint. Redirects are disabled, cleartext HTTP is blocked
//! unless explicitly allowed, and response bodies are capped. In null mode
//! the wrapper delegates to [`HttpStub`], which resolves the `get`
//! operation from its configured responses without touching the network.
//!
//! Invariants:
//! - Every `get` call is tracked on entry with its request path.
//! - Successful calls bump the `requests_completed` counter and emit a
//!   `request_completed` event before returning.
//! - An unconfigured stub `get` succeeds with status 200 and an empty body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use nullkit_core::ConstructionError;
use nullkit_core::Nullable;
use nullkit_core::OutputLog;
use nullkit_core::OutputTracker;
use nullkit_core::ResponseMap;
use nullkit_core::ResponseSet;
use nullkit_core::StateEventEmitter;
use nullkit_core::StubError;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Component name used in construction errors.
const COMPONENT: &str = "HttpWrapper";

/// Configuration for the HTTP wrapper.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` endpoints.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `responses` is test-only and ignored by `create`.
/// - Both factories validate `endpoint`, `timeout_ms`, and
///   `max_response_bytes` identically; a config that builds a null wrapper
///   also builds a live one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpWrapperConfig {
    /// Base URL requests are issued against.
    pub endpoint: String,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Canned responses for null mode, keyed by operation name.
    pub responses: Option<ResponseMap>,
}

impl Default for HttpWrapperConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:9443".to_string(),
            allow_http: false,
            timeout_ms: 5_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "nullkit/0.1".to_string(),
            responses: None,
        }
    }
}

// ============================================================================
// SECTION: Reply and Errors
// ============================================================================

/// Response returned by the `get` operation in both modes.
///
/// # Invariants
/// - Identical shape in live and null mode; callers cannot distinguish the
///   transport from the reply alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body, capped at the configured limit.
    #[serde(default)]
    pub body: String,
}

/// HTTP wrapper operation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Live transport errors are re-surfaced unchanged; there is no hidden
///   retry policy.
#[derive(Debug, Error)]
pub enum HttpWrapperError {
    /// The underlying transport reported an error.
    #[error("http transport error: {0}")]
    Transport(String),
    /// The request path could not be joined onto the endpoint.
    #[error("invalid request path {path}: {reason}")]
    Path {
        /// The rejected request path.
        path: String,
        /// Join failure detail.
        reason: String,
    },
    /// The response body exceeded the configured limit.
    #[error("response exceeds configured limit ({actual_bytes} > {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Observed body size lower bound in bytes.
        actual_bytes: usize,
    },
    /// The response body was not valid UTF-8.
    #[error("response body is not valid utf-8")]
    Body,
    /// The embedded stub reported an error.
    #[error(transparent)]
    Stub(#[from] StubError),
}

// ============================================================================
// SECTION: Wrapper
// ============================================================================

/// Infrastructure wrapper for outbound HTTP GET requests.
///
/// # Invariants
/// - Owns exactly one transport, live or stub, fixed at construction.
/// - Tracked calls and state events belong to this instance alone.
#[derive(Debug)]
pub struct HttpWrapper {
    /// The transport this instance delegates to.
    transport: HttpTransport,
    /// Append-only record of outbound calls.
    log: OutputLog,
    /// Emitter for wrapper-local state changes.
    events: StateEventEmitter,
    /// Count of successfully completed requests.
    requests_completed: Mutex<u64>,
}

impl HttpWrapper {
    /// Issues a GET request for `path` relative to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpWrapperError`] when the path is invalid, the transport
    /// fails, the body exceeds the configured limit, or a stub error
    /// response is configured for `get`.
    pub fn get(&self, path: &str) -> Result<HttpReply, HttpWrapperError> {
        self.log.record("get", json!({ "path": path }));
        let reply = match &self.transport {
            HttpTransport::Live(client) => client.get(path)?,
            HttpTransport::Stub(stub) => stub.get(path)?,
        };
        let requests_completed = {
            let mut counter = lock_counter(&self.requests_completed);
            *counter += 1;
            *counter
        };
        self.events.emit(
            "request_completed",
            json!({ "operation": "get", "requests_completed": requests_completed }),
        );
        Ok(reply)
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

    /// Returns the number of successfully completed requests.
    #[must_use]
    pub fn requests_completed(&self) -> u64 {
        *lock_counter(&self.requests_completed)
    }

    /// Wraps a transport with fresh tracking and event state.
    fn with_transport(transport: HttpTransport) -> Self {
        Self {
            transport,
            log: OutputLog::new(),
            events: StateEventEmitter::new(),
            requests_completed: Mutex::new(0),
        }
    }
}

impl Nullable for HttpWrapper {
    type Config = HttpWrapperConfig;

    fn create(config: Self::Config) -> Result<Self, ConstructionError> {
        let endpoint = validate_endpoint(&config)?;
        validate_limits(&config)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|error| ConstructionError::Client {
                component: COMPONENT,
                reason: error.to_string(),
            })?;
        Ok(Self::with_transport(HttpTransport::Live(LiveHttpClient {
            client,
            endpoint,
            max_response_bytes: config.max_response_bytes,
        })))
    }

    fn create_null(config: Self::Config) -> Result<Self, ConstructionError> {
        validate_endpoint(&config)?;
        validate_limits(&config)?;
        let responses = ResponseSet::new(config.responses.unwrap_or_default()).map_err(
            |source| ConstructionError::Responses {
                component: COMPONENT,
                source,
            },
        )?;
        Ok(Self::with_transport(HttpTransport::Stub(HttpStub {
            responses: Mutex::new(responses),
        })))
    }
}

// ============================================================================
// SECTION: Transports
// ============================================================================

/// The two transports an HTTP wrapper can delegate to.
#[derive(Debug)]
enum HttpTransport {
    /// Real blocking HTTP client.
    Live(LiveHttpClient),
    /// Embedded deterministic stub.
    Stub(HttpStub),
}

/// Live transport backed by a bounded blocking client.
#[derive(Debug)]
struct LiveHttpClient {
    /// Configured blocking client (timeout, no redirects).
    client: Client,
    /// Base URL requests are joined onto.
    endpoint: Url,
    /// Hard cap on response body size.
    max_response_bytes: usize,
}

impl LiveHttpClient {
    /// Issues the request and reads the body under the configured cap.
    fn get(&self, path: &str) -> Result<HttpReply, HttpWrapperError> {
        let url = self.endpoint.join(path).map_err(|error| HttpWrapperError::Path {
            path: path.to_string(),
            reason: error.to_string(),
        })?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|error| HttpWrapperError::Transport(error.to_string()))?;
        let status = response.status().as_u16();
        let mut body = Vec::new();
        let mut limited = response.take(self.max_response_bytes as u64 + 1);
        limited
            .read_to_end(&mut body)
            .map_err(|error| HttpWrapperError::Transport(error.to_string()))?;
        if body.len() > self.max_response_bytes {
            return Err(HttpWrapperError::TooLarge {
                max_bytes: self.max_response_bytes,
                actual_bytes: body.len(),
            });
        }
        let body = String::from_utf8(body).map_err(|_| HttpWrapperError::Body)?;
        Ok(HttpReply {
            status,
            body,
        })
    }
}

/// Embedded stub mimicking the client subset the wrapper uses.
///
/// # Invariants
/// - Owned exclusively by one wrapper instance; response state is never
///   shared.
/// - Performs no I/O; unconfigured calls succeed with the documented
///   default.
#[derive(Debug)]
struct HttpStub {
    /// Configured responses for this instance.
    responses: Mutex<ResponseSet>,
}

impl HttpStub {
    /// Resolves the `get` operation from the configured responses.
    fn get(&self, _path: &str) -> Result<HttpReply, HttpWrapperError> {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.next("get")? {
            Some(value) => {
                serde_json::from_value(value).map_err(|error| StubError::Shape {
                    operation: "get".to_string(),
                    reason: error.to_string(),
                }.into())
            }
            None => Ok(HttpReply {
                status: 200,
                body: String::new(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the configured endpoint URL and scheme policy.
pub(crate) fn validate_endpoint(config: &HttpWrapperConfig) -> Result<Url, ConstructionError> {
    let endpoint =
        Url::parse(&config.endpoint).map_err(|error| ConstructionError::InvalidField {
            component: COMPONENT,
            field: "endpoint",
            reason: error.to_string(),
        })?;
    match endpoint.scheme() {
        "https" => Ok(endpoint),
        "http" if config.allow_http => Ok(endpoint),
        "http" => Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "endpoint",
            reason: "cleartext http is blocked unless allow_http is set".to_string(),
        }),
        other => Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "endpoint",
            reason: format!("unsupported scheme: {other}"),
        }),
    }
}

/// Validates the limit fields shared by both construction modes.
fn validate_limits(config: &HttpWrapperConfig) -> Result<(), ConstructionError> {
    if config.timeout_ms == 0 {
        return Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "timeout_ms",
            reason: "timeout must be non-zero".to_string(),
        });
    }
    if config.max_response_bytes == 0 {
        return Err(ConstructionError::InvalidField {
            component: COMPONENT,
            field: "max_response_bytes",
            reason: "response cap must be non-zero".to_string(),
        });
    }
    Ok(())
}

/// Locks the request counter, recovering from poisoning.
fn lock_counter(counter: &Mutex<u64>) -> MutexGuard<'_, u64> {
    counter.lock().unwrap_or_else(PoisonError::into_inner)
}
