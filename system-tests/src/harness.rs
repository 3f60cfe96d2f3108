// system-tests/src/harness.rs
// ============================================================================
// Module: System Test Harness
// Description: Local HTTP fixture serving canned replies.
// Purpose: Give live-mode wrappers a real socket to talk to without leaving
// the loopback interface.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! [`HttpFixture`] binds an ephemeral loopback port and answers every
//! request with one configured status and body. The fixture shuts its
//! worker thread down on drop, so each test owns its server for exactly the
//! test's lifetime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;

// ============================================================================
// SECTION: HttpFixture
// ============================================================================

/// Loopback HTTP server answering every request identically.
///
/// # Invariants
/// - Listens only on `127.0.0.1` with an ephemeral port.
/// - The worker thread exits once the fixture is dropped.
/// - Failed responds are counted, so harness faults are distinguishable
///   from wrapper transport errors.
pub struct HttpFixture {
    /// Handle used to unblock the worker on shutdown.
    server: Arc<Server>,
    /// Worker thread answering requests.
    worker: Option<JoinHandle<()>>,
    /// Base URL the fixture is reachable at, with a trailing slash.
    base_url: String,
    /// Number of responds the fixture failed to deliver.
    failed_responds: Arc<AtomicUsize>,
}

impl HttpFixture {
    /// Starts a fixture answering every request with `status` and `body`.
    ///
    /// # Errors
    ///
    /// Returns a message when the loopback socket cannot be bound.
    pub fn serve(status: u16, body: &str) -> Result<Self, String> {
        let server = Server::http("127.0.0.1:0").map_err(|error| error.to_string())?;
        let server = Arc::new(server);
        let address = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| "fixture bound to a non-ip address".to_string())?;
        let base_url = format!("http://{address}/");
        let body = body.to_string();
        let failed_responds = Arc::new(AtomicUsize::new(0));
        let worker_server = Arc::clone(&server);
        let worker_failures = Arc::clone(&failed_responds);
        let worker = thread::spawn(move || {
            for request in worker_server.incoming_requests() {
                let response =
                    Response::from_string(body.clone()).with_status_code(StatusCode(status));
                if request.respond(response).is_err() {
                    worker_failures.fetch_add(1, Ordering::SeqCst);
                }
            }
        });
        Ok(Self {
            server,
            worker: Some(worker),
            base_url,
            failed_responds,
        })
    }

    /// Returns the base URL the fixture is reachable at.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the number of responds the fixture failed to deliver.
    #[must_use]
    pub fn failed_responds(&self) -> usize {
        self.failed_responds.load(Ordering::SeqCst)
    }
}

impl Drop for HttpFixture {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
