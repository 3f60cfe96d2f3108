// system-tests/tests/parity.rs
// ============================================================================
// Module: Live Versus Null Parity Suite
// Description: Exercises each wrapper live and null through the same calls.
// Purpose: Prove callers cannot distinguish the two construction modes by
// observable behavior.
// ============================================================================

//! ## Overview
//! Each scenario builds the wrapper twice from equivalent configuration,
//! once through `create` against a local fixture and once through
//! `create_null`, drives both through the same call sequence, and compares
//! replies, tracked output, and emitted events.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use nullkit_core::ConfiguredResponse;
use nullkit_core::Nullable;
use nullkit_core::ResponseMap;
use nullkit_core::Timestamp;
use nullkit_system_tests::harness::HttpFixture;
use nullkit_wrappers::ClockWrapper;
use nullkit_wrappers::ClockWrapperConfig;
use nullkit_wrappers::HttpReply;
use nullkit_wrappers::HttpWrapper;
use nullkit_wrappers::HttpWrapperConfig;
use nullkit_wrappers::StoreWrapper;
use nullkit_wrappers::StoreWrapperConfig;
use serde_json::json;
use tempfile::TempDir;

/// Builds a response map for one operation.
fn single_response(operation: &str, response: ConfiguredResponse) -> ResponseMap {
    let mut map = ResponseMap::new();
    map.insert(operation.to_string(), response);
    map
}

#[test]
fn http_replies_match_across_modes() {
    let fixture = HttpFixture::serve(200, "pong").unwrap();
    let live = HttpWrapper::create(HttpWrapperConfig {
        endpoint: fixture.base_url().to_string(),
        allow_http: true,
        ..HttpWrapperConfig::default()
    })
    .unwrap();
    let null = HttpWrapper::create_null(HttpWrapperConfig {
        responses: Some(single_response(
            "get",
            ConfiguredResponse::Value {
                value: json!({"status": 200, "body": "pong"}),
            },
        )),
        ..HttpWrapperConfig::default()
    })
    .unwrap();

    let live_reply = live.get("ping").unwrap();
    let null_reply = null.get("ping").unwrap();
    assert_eq!(live_reply, null_reply);
    assert_eq!(live_reply, HttpReply {
        status: 200,
        body: "pong".to_string(),
    });

    for wrapper in [&live, &null] {
        let calls = wrapper.track().calls_to("get");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments, json!({"path": "ping"}));
        assert_eq!(wrapper.requests_completed(), 1);
    }
    assert_eq!(fixture.failed_responds(), 0, "fixture failed to deliver a reply");
}

#[test]
fn http_error_statuses_are_replies_in_both_modes() {
    // Non-2xx statuses are data, not transport errors, in either mode.
    let fixture = HttpFixture::serve(503, "maintenance").unwrap();
    let live = HttpWrapper::create(HttpWrapperConfig {
        endpoint: fixture.base_url().to_string(),
        allow_http: true,
        ..HttpWrapperConfig::default()
    })
    .unwrap();
    let null = HttpWrapper::create_null(HttpWrapperConfig {
        responses: Some(single_response(
            "get",
            ConfiguredResponse::Value {
                value: json!({"status": 503, "body": "maintenance"}),
            },
        )),
        ..HttpWrapperConfig::default()
    })
    .unwrap();

    assert_eq!(live.get("status").unwrap(), null.get("status").unwrap());
}

#[test]
fn http_completion_events_fire_in_both_modes() {
    let fixture = HttpFixture::serve(200, "ok").unwrap();
    let live = HttpWrapper::create(HttpWrapperConfig {
        endpoint: fixture.base_url().to_string(),
        allow_http: true,
        ..HttpWrapperConfig::default()
    })
    .unwrap();
    let null = HttpWrapper::create_null(HttpWrapperConfig::default()).unwrap();

    for wrapper in [&live, &null] {
        let seen = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&seen);
        let subscription = wrapper.events().on(
            "request_completed",
            move |event| {
                assert_eq!(
                    event.payload,
                    json!({"operation": "get", "requests_completed": 1})
                );
                observed.fetch_add(1, Ordering::SeqCst);
            },
        );
        wrapper.get("ok").unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        subscription.unsubscribe();
    }
}

#[test]
fn store_round_trips_match_across_modes() {
    let sandbox = TempDir::new().unwrap();
    let live = StoreWrapper::create(StoreWrapperConfig {
        root: sandbox.path().to_path_buf(),
        ..StoreWrapperConfig::default()
    })
    .unwrap();
    let null = StoreWrapper::create_null(StoreWrapperConfig::default()).unwrap();

    for store in [&live, &null] {
        assert_eq!(store.read("missing").unwrap(), None);
        store.write("greeting", json!({"text": "hello"})).unwrap();
        assert_eq!(
            store.read("greeting").unwrap(),
            Some(json!({"text": "hello"}))
        );
        assert_eq!(store.writes_completed(), 1);

        let calls = store.track().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].arguments, json!({"key": "missing"}));
        assert_eq!(
            calls[1].arguments,
            json!({"key": "greeting", "value": {"text": "hello"}})
        );
        assert_eq!(calls[2].arguments, json!({"key": "greeting"}));
    }
}

#[test]
fn store_rejects_hostile_keys_identically() {
    let sandbox = TempDir::new().unwrap();
    let live = StoreWrapper::create(StoreWrapperConfig {
        root: sandbox.path().to_path_buf(),
        ..StoreWrapperConfig::default()
    })
    .unwrap();
    let null = StoreWrapper::create_null(StoreWrapperConfig::default()).unwrap();

    for store in [&live, &null] {
        assert!(store.read("../escape").is_err());
        assert!(store.write("nested/key", json!(1)).is_err());
        assert!(store.track().is_empty(), "rejected calls are not tracked");
    }
}

#[test]
fn clock_reports_plausible_time_live_and_configured_time_null() {
    let live = ClockWrapper::create_default().unwrap();
    let null = ClockWrapper::create_null(ClockWrapperConfig {
        responses: Some(single_response(
            "now",
            ConfiguredResponse::Value {
                value: json!(1_735_689_600_000_i64),
            },
        )),
    })
    .unwrap();

    // 2020-01-01T00:00:00Z in unix milliseconds.
    let lower_bound = 1_577_836_800_000;
    assert!(live.now().unwrap().as_unix_millis() > lower_bound);
    assert_eq!(
        null.now().unwrap(),
        Timestamp::from_unix_millis(1_735_689_600_000)
    );

    for clock in [&live, &null] {
        assert_eq!(clock.track().count("now"), 1);
    }
}
