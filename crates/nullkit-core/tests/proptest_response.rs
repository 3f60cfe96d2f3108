// crates/nullkit-core/tests/proptest_response.rs
// ============================================================================
// Module: Response Property Tests
// Description: Property coverage for sequence consumption and tracking order.
// Purpose: Verify ordering invariants hold for arbitrary configurations.
// ============================================================================

//! ## Overview
//! Property tests over the two ordering invariants the framework guarantees:
//! configured sequences come back element-for-element in configuration
//! order before the exhaustion policy applies, and tracked-call indices are
//! always dense and ordered regardless of how calls are issued.

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
use nullkit_core::OutputLog;
use nullkit_core::ResponseSource;
use nullkit_core::StubError;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

/// Strategy for non-empty vectors of scalar JSON values.
fn scalar_values() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ],
        1..16,
    )
}

proptest! {
    #[test]
    fn sequences_replay_in_configuration_order(values in scalar_values()) {
        let mut source = ResponseSource::new("op", ConfiguredResponse::Sequence {
            values: values.clone(),
            on_exhausted: ExhaustionPolicy::Fail,
        }).unwrap();
        for expected in &values {
            prop_assert_eq!(&source.next().unwrap(), expected);
        }
        prop_assert!(
            matches!(source.next(), Err(StubError::Exhausted { .. })),
            "expected StubError::Exhausted after the sequence is consumed"
        );
    }

    #[test]
    fn repeat_last_pins_the_final_element(values in scalar_values(), extra in 1usize..8) {
        let mut source = ResponseSource::new("op", ConfiguredResponse::Sequence {
            values: values.clone(),
            on_exhausted: ExhaustionPolicy::RepeatLast,
        }).unwrap();
        for expected in &values {
            prop_assert_eq!(&source.next().unwrap(), expected);
        }
        let last = values.last().cloned().unwrap_or(Value::Null);
        for _ in 0..extra {
            prop_assert_eq!(source.next().unwrap(), last.clone());
        }
    }

    #[test]
    fn tracked_indices_are_dense_and_ordered(operations in prop::collection::vec("[a-z]{1,6}", 0..32)) {
        let log = OutputLog::new();
        for operation in &operations {
            log.record(operation.clone(), json!(null));
        }
        let calls = log.tracker().calls();
        prop_assert_eq!(calls.len(), operations.len());
        for (position, call) in calls.iter().enumerate() {
            prop_assert_eq!(call.index, position as u64);
            prop_assert_eq!(&call.operation, &operations[position]);
        }
    }
}
