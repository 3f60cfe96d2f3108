// demos/pipeline/tests/pipeline_unit.rs
// ============================================================================
// Module: Pipeline Service Unit Tests
// Description: State-based tests for the worked application service.
// Purpose: Verify the null service graph behaves deterministically and the
// logic sandwich writes what the pure layer computed.
// ============================================================================

//! ## Overview
//! Builds the whole service graph through `create_null` and asserts on
//! tracked output and propagated errors. The live graph is exercised once
//! against a `tempfile` sandbox to confirm the cascade mirrors correctly.

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

use nullkit_core::ConfiguredResponse;
use nullkit_core::ExhaustionPolicy;
use nullkit_core::Nullable;
use nullkit_core::ResponseMap;
use nullkit_core::Timestamp;
use nullkit_demo_pipeline::PipelineConfig;
use nullkit_demo_pipeline::PipelineError;
use nullkit_demo_pipeline::PipelineService;
use nullkit_wrappers::ClockWrapperConfig;
use nullkit_wrappers::StoreWrapperConfig;
use serde_json::json;
use tempfile::TempDir;

/// Builds a response map configuring the store's `read` operation.
fn read_response(response: ConfiguredResponse) -> ResponseMap {
    let mut map = ResponseMap::new();
    map.insert("read".to_string(), response);
    map
}

#[test]
fn doubles_the_stubbed_reading_and_tracks_the_write() {
    // A stubbed read of 5 must produce a tracked write of 10.
    let service = PipelineService::create_null(PipelineConfig {
        store: StoreWrapperConfig {
            responses: Some(read_response(ConfiguredResponse::Value {
                value: json!(5),
            })),
            ..StoreWrapperConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap();

    let report = service.run_once().unwrap();
    assert_eq!(report.doubled, json!(10));

    let writes = service.store().track().calls_to("write");
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].arguments, json!({"key": "doubled", "value": 10}));
}

#[test]
fn stamps_each_pass_with_the_configured_clock() {
    let service = PipelineService::create_null(PipelineConfig {
        store: StoreWrapperConfig {
            responses: Some(read_response(ConfiguredResponse::Value {
                value: json!(3),
            })),
            ..StoreWrapperConfig::default()
        },
        clock: ClockWrapperConfig {
            responses: Some({
                let mut map = ResponseMap::new();
                map.insert("now".to_string(), ConfiguredResponse::Sequence {
                    values: vec![json!(1_000), json!(2_000)],
                    on_exhausted: ExhaustionPolicy::Fail,
                });
                map
            }),
        },
        ..PipelineConfig::default()
    })
    .unwrap();

    assert_eq!(service.run_once().unwrap().stamped_at, Timestamp::from_unix_millis(1_000));
    assert_eq!(service.run_once().unwrap().stamped_at, Timestamp::from_unix_millis(2_000));
}

#[test]
fn missing_source_is_reported_without_writing() {
    let service = PipelineService::create_null_default().unwrap();
    assert!(matches!(service.run_once(), Err(PipelineError::MissingSource { .. })));
    assert_eq!(service.store().track().count("write"), 0);
}

#[test]
fn non_numeric_source_is_reported_without_writing() {
    let service = PipelineService::create_null(PipelineConfig {
        store: StoreWrapperConfig {
            responses: Some(read_response(ConfiguredResponse::Value {
                value: json!({"unexpected": true}),
            })),
            ..StoreWrapperConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap();
    assert!(matches!(service.run_once(), Err(PipelineError::NotNumeric { .. })));
    assert_eq!(service.store().track().count("write"), 0);
}

#[test]
fn infrastructure_failures_propagate_unchanged() {
    let service = PipelineService::create_null(PipelineConfig {
        store: StoreWrapperConfig {
            responses: Some(read_response(ConfiguredResponse::Error {
                message: "disk detached".to_string(),
            })),
            ..StoreWrapperConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap();
    match service.run_once() {
        Err(PipelineError::Store(error)) => {
            assert!(error.to_string().contains("disk detached"));
        }
        other => panic!("expected a store error, got {other:?}"),
    }
}

#[test]
fn null_graphs_from_identical_config_are_independent() {
    let config = PipelineConfig {
        store: StoreWrapperConfig {
            responses: Some(read_response(ConfiguredResponse::Sequence {
                values: vec![json!(1)],
                on_exhausted: ExhaustionPolicy::Fail,
            })),
            ..StoreWrapperConfig::default()
        },
        ..PipelineConfig::default()
    };
    let first = PipelineService::create_null(config.clone()).unwrap();
    let second = PipelineService::create_null(config).unwrap();

    assert!(first.store().track().is_empty());
    assert!(second.store().track().is_empty());

    first.run_once().unwrap();
    assert!(first.run_once().is_err(), "first service's sequence is spent");
    // The second graph's responses are independently exhausted.
    second.run_once().unwrap();
}

#[test]
fn live_graph_runs_the_same_sandwich_against_a_sandbox() {
    let sandbox = TempDir::new().unwrap();
    let service = PipelineService::create(PipelineConfig {
        store: StoreWrapperConfig {
            root: sandbox.path().to_path_buf(),
            ..StoreWrapperConfig::default()
        },
        ..PipelineConfig::default()
    })
    .unwrap();

    service.store().write("reading", json!(21)).unwrap();
    let report = service.run_once().unwrap();
    assert_eq!(report.doubled, json!(42));
    assert_eq!(service.store().read("doubled").unwrap(), Some(json!(42)));
}
